//! Shared fixtures for integration tests.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use tempfile::TempDir;

use arxiv_research_mcp::error::GatewayResult;
use arxiv_research_mcp::gateway::SearchGateway;
use arxiv_research_mcp::models::PaperRecord;
use arxiv_research_mcp::registry::Registry;
use arxiv_research_mcp::tools::ToolContext;

/// A paper record with predictable fields.
pub fn paper(id: &str, title: &str) -> PaperRecord {
    PaperRecord {
        paper_id: id.to_string(),
        title: title.to_string(),
        authors: vec!["Ada Lovelace".to_string(), "Alan Turing".to_string()],
        summary: format!("Abstract of {title}."),
        pdf_url: format!("https://arxiv.org/pdf/{id}"),
        published: NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
    }
}

/// One Atom `<entry>` as returned by the arXiv API.
pub fn atom_entry(id: &str, title: &str) -> String {
    format!(
        r#"<entry>
    <id>http://arxiv.org/abs/{id}</id>
    <updated>2024-03-16T00:00:00Z</updated>
    <published>2024-03-15T12:00:00Z</published>
    <title>{title}</title>
    <summary>Abstract of {title}.</summary>
    <author><name>Ada Lovelace</name></author>
    <author><name>Alan Turing</name></author>
    <link href="http://arxiv.org/abs/{id}" rel="alternate" type="text/html"/>
    <link title="pdf" href="http://arxiv.org/pdf/{id}" rel="related" type="application/pdf"/>
  </entry>"#
    )
}

/// An Atom feed with `n` entries `2401.0000{i}v1`.
pub fn atom_feed(n: usize) -> String {
    let entries: Vec<String> =
        (1..=n).map(|i| atom_entry(&format!("2401.{i:05}v1"), &format!("Paper {i}"))).collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>ArXiv Query</title>
  <id>http://arxiv.org/api/query</id>
  <updated>2024-03-16T00:00:00Z</updated>
  {}
</feed>"#,
        entries.join("\n  ")
    )
}

/// Gateway serving a fixed result list and recording the queries it saw.
#[derive(Default)]
pub struct FixedGateway {
    pub papers: Vec<PaperRecord>,
    pub queries: Mutex<Vec<(String, usize)>>,
}

impl FixedGateway {
    pub fn new(papers: Vec<PaperRecord>) -> Self {
        Self { papers, queries: Mutex::new(Vec::new()) }
    }

    pub fn query_count(&self) -> usize {
        self.queries.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl SearchGateway for FixedGateway {
    fn name(&self) -> &'static str {
        "fixed"
    }

    async fn search(&self, topic: &str, max_results: usize) -> GatewayResult<Vec<PaperRecord>> {
        self.queries.lock().unwrap().push((topic.to_string(), max_results));
        Ok(self.papers.iter().take(max_results).cloned().collect())
    }
}

/// Tool context over a fresh temporary registry and the given gateway.
pub fn context_with(gateway: Arc<dyn SearchGateway>) -> (TempDir, ToolContext) {
    let dir = tempfile::tempdir().unwrap();
    let registry = Registry::open(dir.path()).unwrap();
    (dir, ToolContext::new(Arc::new(registry), gateway))
}
