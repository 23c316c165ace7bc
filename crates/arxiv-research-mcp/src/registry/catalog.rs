//! One topic's catalog and its on-disk document.
//!
//! The document is a JSON object keyed by paper id, in discovery order:
//!
//! ```json
//! {
//!   "2301.00001v1": {
//!     "title": "...",
//!     "authors": ["..."],
//!     "summary": "...",
//!     "pdf_url": "...",
//!     "published": "2023-01-02"
//!   }
//! }
//! ```

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::Path;

use chrono::NaiveDate;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{RegistryError, RegistryResult};
use crate::models::{PaperRecord, Topic};

/// Papers filed under one topic, unique by id, in discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TopicCatalog {
    papers: Vec<PaperRecord>,
    positions: HashMap<String, usize>,
}

impl TopicCatalog {
    /// Create an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct papers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.papers.len()
    }

    /// True when the topic was searched but nothing was filed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.papers.is_empty()
    }

    /// Paper by id.
    #[must_use]
    pub fn get(&self, paper_id: &str) -> Option<&PaperRecord> {
        self.positions.get(paper_id).map(|&i| &self.papers[i])
    }

    /// Insert a paper, or overwrite the one with the same id in place.
    ///
    /// Returns true if the id was new to this catalog.
    pub fn upsert(&mut self, record: PaperRecord) -> bool {
        if let Some(&i) = self.positions.get(&record.paper_id) {
            self.papers[i] = record;
            false
        } else {
            self.positions.insert(record.paper_id.clone(), self.papers.len());
            self.papers.push(record);
            true
        }
    }

    /// Papers in discovery order.
    pub fn iter(&self) -> impl Iterator<Item = &PaperRecord> {
        self.papers.iter()
    }

    /// Paper ids in discovery order.
    pub fn paper_ids(&self) -> impl Iterator<Item = &str> {
        self.papers.iter().map(|p| p.paper_id.as_str())
    }

    /// Decode a catalog document.
    pub fn from_json(bytes: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(bytes)
    }
}

impl FromIterator<PaperRecord> for TopicCatalog {
    fn from_iter<I: IntoIterator<Item = PaperRecord>>(iter: I) -> Self {
        let mut catalog = Self::new();
        for record in iter {
            catalog.upsert(record);
        }
        catalog
    }
}

/// Persisted value of one paper; the id is the enclosing key.
#[derive(Serialize)]
struct StoredPaperRef<'a> {
    title: &'a str,
    authors: &'a [String],
    summary: &'a str,
    pdf_url: &'a str,
    published: &'a NaiveDate,
}

#[derive(Deserialize)]
struct StoredPaper {
    title: String,
    #[serde(default)]
    authors: Vec<String>,
    #[serde(default)]
    summary: String,
    #[serde(default)]
    pdf_url: String,
    published: NaiveDate,
}

impl Serialize for TopicCatalog {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.papers.len()))?;
        for p in &self.papers {
            map.serialize_entry(
                &p.paper_id,
                &StoredPaperRef {
                    title: &p.title,
                    authors: &p.authors,
                    summary: &p.summary,
                    pdf_url: &p.pdf_url,
                    published: &p.published,
                },
            )?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for TopicCatalog {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct CatalogVisitor;

        impl<'de> Visitor<'de> for CatalogVisitor {
            type Value = TopicCatalog;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an object mapping paper ids to paper records")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut catalog = TopicCatalog::new();
                while let Some((paper_id, stored)) = access.next_entry::<String, StoredPaper>()? {
                    catalog.upsert(PaperRecord {
                        paper_id,
                        title: stored.title,
                        authors: stored.authors,
                        summary: stored.summary,
                        pdf_url: stored.pdf_url,
                        published: stored.published,
                    });
                }
                Ok(catalog)
            }
        }

        deserializer.deserialize_map(CatalogVisitor)
    }
}

/// Read the catalog at `path`; `Ok(None)` when the file does not exist.
pub(crate) fn read(path: &Path, topic: &Topic) -> RegistryResult<Option<TopicCatalog>> {
    match fs::read(path) {
        Ok(bytes) => TopicCatalog::from_json(&bytes)
            .map(Some)
            .map_err(|e| RegistryError::corrupt(topic.display_name(), e)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(RegistryError::storage(path, e)),
    }
}

/// Replace the catalog at `path` in one step.
///
/// The document is written to a temporary file in the same directory,
/// synced, then renamed over `path`, so readers see either the old or the
/// new catalog and never a partial one.
pub(crate) fn write_atomic(path: &Path, catalog: &TopicCatalog) -> RegistryResult<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));

    let bytes = serde_json::to_vec_pretty(catalog)
        .map_err(|e| RegistryError::storage(path, e.into()))?;

    let mut tmp = tempfile::Builder::new()
        .prefix(".papers_info.")
        .suffix(".tmp")
        .tempfile_in(dir)
        .map_err(|e| RegistryError::storage(dir, e))?;

    tmp.write_all(&bytes).map_err(|e| RegistryError::storage(tmp.path(), e))?;
    tmp.as_file().sync_all().map_err(|e| RegistryError::storage(tmp.path(), e))?;

    tmp.persist(path).map_err(|e| RegistryError::storage(path, e.error))?;
    Ok(())
}
