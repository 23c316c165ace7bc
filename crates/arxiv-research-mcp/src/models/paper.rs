//! Paper record as stored in topic catalogs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A paper returned by the search provider.
///
/// `paper_id` is the provider-assigned arXiv short id (version suffix
/// included, e.g. `2301.12345v1`) and is unique across the whole registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaperRecord {
    /// arXiv short id.
    pub paper_id: String,

    /// Paper title, whitespace-collapsed.
    pub title: String,

    /// Author names in byline order.
    pub authors: Vec<String>,

    /// Abstract.
    pub summary: String,

    /// Link to the PDF on arXiv.
    pub pdf_url: String,

    /// Publication date of the first version.
    pub published: NaiveDate,
}

impl PaperRecord {
    /// Comma-separated author names.
    #[must_use]
    pub fn author_names(&self) -> String {
        self.authors.join(", ")
    }

    /// Abstract cut to at most `max_chars` characters, on a char boundary.
    ///
    /// Returns the abstract unchanged when it is already short enough.
    #[must_use]
    pub fn summary_excerpt(&self, max_chars: usize) -> &str {
        match self.summary.char_indices().nth(max_chars) {
            Some((idx, _)) => &self.summary[..idx],
            None => &self.summary,
        }
    }
}
