//! MCP tool implementations.
//!
//! Each tool:
//! 1. Validates its arguments before any side effect
//! 2. Calls the search gateway and/or the paper registry
//! 3. Renders the result as pretty-printed JSON text

mod papers;
mod topics;

pub use papers::*;
pub use topics::*;

use std::sync::Arc;

use crate::config::Config;
use crate::error::{ToolError, ToolResult};
use crate::gateway::{ArxivGateway, SearchGateway};
use crate::registry::Registry;

/// Tool execution context.
#[derive(Clone)]
pub struct ToolContext {
    /// Local paper storage.
    pub registry: Arc<Registry>,

    /// Remote search provider.
    pub gateway: Arc<dyn SearchGateway>,

    /// `max_results` used when `search_papers` is called without one.
    pub default_max_results: usize,
}

impl ToolContext {
    /// Create a new tool context.
    #[must_use]
    pub fn new(registry: Arc<Registry>, gateway: Arc<dyn SearchGateway>) -> Self {
        Self { registry, gateway, default_max_results: crate::config::api::DEFAULT_MAX_RESULTS }
    }

    /// Open the registry and build the arXiv gateway described by `config`.
    ///
    /// # Errors
    ///
    /// Returns error if the storage root cannot be opened or the HTTP client
    /// cannot be built.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let registry = Registry::open(&config.papers_dir)?;
        let gateway = ArxivGateway::new(config)?;

        Ok(Self {
            registry: Arc::new(registry),
            gateway: Arc::new(gateway),
            default_max_results: config.default_max_results,
        })
    }
}

impl std::fmt::Debug for ToolContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolContext")
            .field("registry", &self.registry)
            .field("gateway", &self.gateway.name())
            .field("default_max_results", &self.default_max_results)
            .finish()
    }
}

/// Trait for MCP tools.
#[async_trait::async_trait]
pub trait McpTool: Send + Sync {
    /// Tool name (e.g., "search_papers").
    fn name(&self) -> &'static str;

    /// Tool description for LLM.
    fn description(&self) -> &'static str;

    /// JSON Schema for input parameters.
    fn input_schema(&self) -> serde_json::Value;

    /// Execute the tool with given input.
    async fn execute(&self, ctx: &ToolContext, input: serde_json::Value) -> ToolResult<String>;
}

/// Register all tools.
#[must_use]
pub fn register_all_tools() -> Vec<Box<dyn McpTool>> {
    vec![
        // Paper tools (2)
        Box::new(papers::SearchPapersTool),
        Box::new(papers::ExtractInfoTool),
        // Topic tools (2)
        Box::new(topics::ListTopicsTool),
        Box::new(topics::PaperCountTool),
    ]
}

/// Look up a tool by name and run it.
///
/// # Errors
///
/// [`ToolError::UnknownTool`] if no tool has this name, otherwise whatever
/// the tool returns.
pub async fn dispatch(
    tools: &[Box<dyn McpTool>],
    ctx: &ToolContext,
    name: &str,
    input: serde_json::Value,
) -> ToolResult<String> {
    let tool = tools
        .iter()
        .find(|t| t.name() == name)
        .ok_or_else(|| ToolError::UnknownTool(name.to_string()))?;

    tracing::info!(tool = name, "Executing tool");
    tool.execute(ctx, input).await
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_tool_names_unique() {
        let tools = register_all_tools();
        let names: HashSet<_> = tools.iter().map(|t| t.name()).collect();
        assert_eq!(names.len(), tools.len());
        assert_eq!(tools.len(), 4);
    }

    #[test]
    fn test_schemas_are_objects() {
        for tool in register_all_tools() {
            let schema = tool.input_schema();
            assert_eq!(schema["type"], "object", "{}", tool.name());
            assert!(schema["properties"].is_object(), "{}", tool.name());
            assert!(!tool.description().is_empty());
        }
    }
}
