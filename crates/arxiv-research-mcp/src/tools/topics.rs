//! Topic tools: list_topics, get_paper_count.

use std::sync::Arc;

use serde_json::json;

use super::{McpTool, ToolContext};
use crate::error::{ToolError, ToolResult};
use crate::formatters;
use crate::models::{ListTopicsInput, PaperCountInput};

/// List topics that have a saved catalog.
pub struct ListTopicsTool;

#[async_trait::async_trait]
impl McpTool for ListTopicsTool {
    fn name(&self) -> &'static str {
        ListTopicsInput::TOOL
    }

    fn description(&self) -> &'static str {
        "List all research topics that have been searched, oldest first."
    }

    fn input_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {}
        })
    }

    async fn execute(&self, ctx: &ToolContext, input: serde_json::Value) -> ToolResult<String> {
        ListTopicsInput::parse(&input)?;

        let registry = Arc::clone(&ctx.registry);
        let topics = tokio::task::spawn_blocking(move || registry.list_topics())
            .await
            .map_err(|e| ToolError::internal(format!("Topic listing task failed: {e}")))?;

        tracing::debug!(count = topics.len(), "Listed topics");
        Ok(formatters::format_topics(&topics))
    }
}

/// Count saved papers per topic.
pub struct PaperCountTool;

#[async_trait::async_trait]
impl McpTool for PaperCountTool {
    fn name(&self) -> &'static str {
        PaperCountInput::TOOL
    }

    fn description(&self) -> &'static str {
        "Get the count of saved papers for a specific topic, or for every topic when \
         no topic is given."
    }

    fn input_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "topic": {
                    "type": "string",
                    "description": "Topic to count papers for (omit to count all topics)"
                }
            }
        })
    }

    async fn execute(&self, ctx: &ToolContext, input: serde_json::Value) -> ToolResult<String> {
        let params = PaperCountInput::parse(&input)?;

        let registry = Arc::clone(&ctx.registry);
        let topic = params.topic.clone();
        let counts = tokio::task::spawn_blocking(move || registry.count(topic.as_ref()))
            .await
            .map_err(|e| ToolError::internal(format!("Count task failed: {e}")))??;

        tracing::info!(topics = counts.len(), total = counts.total(), "Paper counts computed");
        formatters::format_counts(&counts)
    }
}
