//! Paper tools: search_papers, extract_info.

use std::sync::Arc;

use serde_json::json;

use super::{McpTool, ToolContext};
use crate::config::api;
use crate::error::{ToolError, ToolResult};
use crate::formatters;
use crate::models::{ExtractInfoInput, SearchPapersInput};

/// Search arXiv and file the results under the topic.
pub struct SearchPapersTool;

#[async_trait::async_trait]
impl McpTool for SearchPapersTool {
    fn name(&self) -> &'static str {
        SearchPapersInput::TOOL
    }

    fn description(&self) -> &'static str {
        "Search for papers on arXiv based on a topic and store their information locally. \
         Returns the ids of the papers found, most relevant first."
    }

    fn input_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "topic": {
                    "type": "string",
                    "description": "The topic to search for (e.g., 'quantum error correction')"
                },
                "max_results": {
                    "type": "integer",
                    "minimum": 1,
                    "maximum": api::MAX_RESULTS_LIMIT,
                    "default": api::DEFAULT_MAX_RESULTS,
                    "description": "Maximum number of results to retrieve"
                }
            },
            "required": ["topic"]
        })
    }

    async fn execute(&self, ctx: &ToolContext, input: serde_json::Value) -> ToolResult<String> {
        let params = SearchPapersInput::parse(&input, ctx.default_max_results)?;

        let papers = ctx
            .gateway
            .search(&params.topic.display_name(), params.max_results)
            .await
            .map_err(ToolError::from)?;

        // File I/O stays off the async workers; no lock spans the search above.
        let registry = Arc::clone(&ctx.registry);
        let topic = params.topic.clone();
        let records = papers.clone();
        tokio::task::spawn_blocking(move || registry.upsert(&topic, &records))
            .await
            .map_err(|e| ToolError::internal(format!("Catalog write task failed: {e}")))??;

        tracing::info!(
            topic = %params.topic,
            requested = params.max_results,
            found = papers.len(),
            provider = ctx.gateway.name(),
            "Papers searched and saved"
        );

        Ok(formatters::format_paper_ids(&papers))
    }
}

/// Look up a saved paper in any topic.
pub struct ExtractInfoTool;

#[async_trait::async_trait]
impl McpTool for ExtractInfoTool {
    fn name(&self) -> &'static str {
        ExtractInfoInput::TOOL
    }

    fn description(&self) -> &'static str {
        "Search for information about a specific paper across all topic directories. \
         Returns the saved record, or a not-found answer if the paper was never saved."
    }

    fn input_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "paper_id": {
                    "type": "string",
                    "description": "The arXiv id of the paper (e.g., '2301.12345v1')"
                }
            },
            "required": ["paper_id"]
        })
    }

    async fn execute(&self, ctx: &ToolContext, input: serde_json::Value) -> ToolResult<String> {
        let params = ExtractInfoInput::parse(&input)?;

        let registry = Arc::clone(&ctx.registry);
        let paper_id = params.paper_id.clone();
        let paper = tokio::task::spawn_blocking(move || registry.lookup(&paper_id))
            .await
            .map_err(|e| ToolError::internal(format!("Catalog read task failed: {e}")))??;

        if paper.is_none() {
            tracing::info!(paper_id = %params.paper_id, "Paper not found in any topic");
        }

        Ok(formatters::format_paper_lookup(&params.paper_id, paper.as_ref()))
    }
}
