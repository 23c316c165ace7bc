//! JSON rendering of tool results.
//!
//! Every tool answers with a single pretty-printed JSON document inside an
//! MCP text content block. Rendering goes through [`Value`]'s `Display`, so
//! it cannot fail for values built here; paper counts are serialized
//! directly to keep their order and report failure as an internal error.

use serde_json::{Value, json};

use crate::error::{ToolError, ToolResult};
use crate::models::PaperRecord;
use crate::registry::PaperCounts;

/// Pretty-print a JSON value.
#[must_use]
pub fn to_pretty(value: &Value) -> String {
    format!("{value:#}")
}

/// Full paper record, including its id.
#[must_use]
pub fn paper_json(paper: &PaperRecord) -> Value {
    json!({
        "paper_id": paper.paper_id,
        "title": paper.title,
        "authors": paper.authors,
        "summary": paper.summary,
        "pdf_url": paper.pdf_url,
        "published": paper.published.to_string(),
    })
}

/// Typed not-found answer for `extract_info`.
#[must_use]
pub fn paper_not_found_json(paper_id: &str) -> Value {
    json!({
        "found": false,
        "paper_id": paper_id,
        "message": format!("There's no saved information related to paper {paper_id}."),
    })
}

/// `search_papers` result: ids in provider relevance order.
#[must_use]
pub fn format_paper_ids(papers: &[PaperRecord]) -> String {
    let ids: Vec<&str> = papers.iter().map(|p| p.paper_id.as_str()).collect();
    to_pretty(&json!(ids))
}

/// `extract_info` result.
#[must_use]
pub fn format_paper_lookup(paper_id: &str, paper: Option<&PaperRecord>) -> String {
    match paper {
        Some(p) => to_pretty(&paper_json(p)),
        None => to_pretty(&paper_not_found_json(paper_id)),
    }
}

/// `list_topics` result.
#[must_use]
pub fn format_topics(topics: &[String]) -> String {
    to_pretty(&json!(topics))
}

/// `get_paper_count` result, keys in topic order.
///
/// # Errors
///
/// Returns [`ToolError::Internal`] if the mapping cannot be serialized.
pub fn format_counts(counts: &PaperCounts) -> ToolResult<String> {
    // Serialized directly: a `Value::Object` would re-sort the keys.
    serde_json::to_string_pretty(counts).map_err(|e| {
        tracing::error!(error = %e, topics = counts.len(), "Failed to serialize paper counts");
        ToolError::internal(format!("Failed to serialize paper counts: {e}"))
    })
}
