//! Markdown rendering of the paper resources.

use crate::models::{PaperRecord, Topic};
use crate::registry::TopicCatalog;

/// Characters of each abstract shown on a topic page.
pub const SUMMARY_EXCERPT_CHARS: usize = 500;

/// Format the topic folder list (`papers://folders`).
#[must_use]
pub fn format_folders_markdown(topics: &[Topic]) -> String {
    let mut output = String::from("# Available Topics\n\n");

    let Some(last) = topics.last() else {
        output.push_str("No topics found.\n");
        return output;
    };

    for topic in topics {
        output.push_str(&format!("- {}\n", topic.slug()));
    }
    output.push_str(&format!("\nUse @{} to access papers in that topic.\n", last.slug()));

    output
}

/// Format one topic's catalog (`papers://{topic}`).
///
/// A topic that was never searched gets a short "not found" page instead.
#[must_use]
pub fn format_topic_markdown(topic: &Topic, catalog: Option<&TopicCatalog>) -> String {
    let Some(catalog) = catalog else {
        return format!(
            "# No papers found for topic: {}\n\nTry searching for papers on this topic first.",
            topic.display_name()
        );
    };

    let mut output = format!("# Papers on {}\n\n", title_case(&topic.display_name()));
    output.push_str(&format!("Total papers: {}\n\n", catalog.len()));

    for paper in catalog.iter() {
        output.push_str(&format_paper_markdown(paper));
        output.push_str("---\n\n");
    }

    output
}

/// Format a single paper entry of a topic page.
#[must_use]
pub fn format_paper_markdown(paper: &PaperRecord) -> String {
    let mut output = String::new();

    output.push_str(&format!("## {}\n", paper.title));
    output.push_str(&format!("- **Paper ID**: {}\n", paper.paper_id));
    output.push_str(&format!("- **Authors**: {}\n", paper.author_names()));
    output.push_str(&format!("- **Published**: {}\n", paper.published));
    output.push_str(&format!("- **PDF URL**: [{0}]({0})\n\n", paper.pdf_url));

    let excerpt = paper.summary_excerpt(SUMMARY_EXCERPT_CHARS);
    let ellipsis = if excerpt.len() < paper.summary.len() { "..." } else { "" };
    output.push_str(&format!("### Summary\n{excerpt}{ellipsis}\n\n"));

    output
}

fn title_case(text: &str) -> String {
    text.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect()
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}
