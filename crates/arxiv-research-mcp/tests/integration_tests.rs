//! Integration tests against the live arXiv API.
//!
//! Run with: `cargo test --features integration -- --nocapture`

#![cfg(feature = "integration")]

use serde_json::{Value, json};

use arxiv_research_mcp::config::Config;
use arxiv_research_mcp::gateway::{ArxivGateway, SearchGateway};
use arxiv_research_mcp::tools::{ExtractInfoTool, McpTool, SearchPapersTool, ToolContext};

#[tokio::test]
async fn test_live_search() {
    let gateway = ArxivGateway::new(&Config::default()).expect("Failed to create gateway");
    let papers = gateway.search("attention is all you need", 3).await.expect("Search failed");

    assert!(!papers.is_empty());
    assert!(papers.len() <= 3);
    for p in &papers {
        assert!(!p.paper_id.is_empty());
        assert!(!p.title.is_empty());
        assert!(p.pdf_url.starts_with("http"));
    }
}

#[tokio::test]
async fn test_live_search_then_extract() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = ToolContext::from_config(&Config::new(dir.path())).expect("Failed to build context");

    let ids = SearchPapersTool
        .execute(&ctx, json!({"topic": "quantum error correction", "max_results": 2}))
        .await
        .expect("Search failed");
    let ids: Vec<String> = serde_json::from_str(&ids).unwrap();
    assert!(!ids.is_empty());

    let info = ExtractInfoTool.execute(&ctx, json!({"paper_id": ids[0]})).await.unwrap();
    let info: Value = serde_json::from_str(&info).unwrap();
    assert_eq!(info["paper_id"], ids[0].as_str());
}
