//! JSON-RPC 2.0 message types and MCP method handling shared by both transports.

use std::borrow::Cow;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::error::{RegistryError, RegistryResult, ToolError};
use crate::formatters;
use crate::models::{SearchPromptInput, Topic};
use crate::registry::{Registry, TopicCatalog};
use crate::tools::{self, McpTool, ToolContext};

/// Protocol version answered when the client does not name one.
pub const DEFAULT_PROTOCOL_VERSION: &str = "2024-11-05";

/// URI of the topic folder listing.
pub const FOLDERS_URI: &str = "papers://folders";

/// URI scheme prefix of topic resources.
const PAPERS_SCHEME: &str = "papers://";

/// JSON-RPC error codes.
pub mod codes {
    pub const PARSE_ERROR: i32 = -32700;
    pub const INVALID_REQUEST: i32 = -32600;
    pub const METHOD_NOT_FOUND: i32 = -32601;
    pub const INVALID_PARAMS: i32 = -32602;
    pub const INTERNAL_ERROR: i32 = -32603;
}

/// JSON-RPC 2.0 request.
#[derive(Debug, Clone, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    pub method: String,
    #[serde(default)]
    pub params: Value,
    #[serde(default)]
    pub id: Option<Value>,
}

impl JsonRpcRequest {
    /// Requests without an id expect no response.
    #[must_use]
    pub const fn is_notification(&self) -> bool {
        self.id.is_none()
    }
}

/// JSON-RPC 2.0 response.
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: Cow<'static, str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
    pub id: Option<Value>,
}

/// JSON-RPC 2.0 error.
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl JsonRpcResponse {
    /// JSON-RPC version constant.
    const VERSION: &'static str = "2.0";

    #[must_use]
    pub fn success(id: Option<Value>, result: Value) -> Self {
        Self { jsonrpc: Cow::Borrowed(Self::VERSION), result: Some(result), error: None, id }
    }

    #[must_use]
    pub fn error(id: Option<Value>, code: i32, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: Cow::Borrowed(Self::VERSION),
            result: None,
            error: Some(JsonRpcError { code, message: message.into(), data: None }),
            id,
        }
    }
}

/// MCP tool info for tools/list response.
#[derive(Debug, Serialize)]
pub struct McpToolInfo {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

/// Dispatch one request to its MCP method.
///
/// Returns `None` for notifications, which get no response.
pub async fn handle_request(
    req: JsonRpcRequest,
    tools: &[Box<dyn McpTool>],
    ctx: &ToolContext,
) -> Option<JsonRpcResponse> {
    if req.jsonrpc != "2.0" {
        return Some(JsonRpcResponse::error(
            req.id,
            codes::INVALID_REQUEST,
            format!("Unsupported JSON-RPC version: {}", req.jsonrpc),
        ));
    }

    let id = req.id.clone();
    let response = match req.method.as_str() {
        "initialize" => JsonRpcResponse::success(id, initialize_result(&req.params)),
        "notifications/initialized" | "initialized" | "notifications/cancelled" => {
            JsonRpcResponse::success(id, json!({}))
        }
        "ping" => JsonRpcResponse::success(id, json!({})),
        "tools/list" => JsonRpcResponse::success(id, tools_list(tools)),
        "tools/call" => handle_tools_call(id, &req.params, tools, ctx).await,
        "resources/list" => handle_resources_list(id, ctx).await,
        "resources/templates/list" => JsonRpcResponse::success(id, resource_templates()),
        "resources/read" => handle_resources_read(id, &req.params, ctx).await,
        "prompts/list" => JsonRpcResponse::success(id, prompts_list()),
        "prompts/get" => handle_prompts_get(id, &req.params),
        _ => JsonRpcResponse::error(
            id,
            codes::METHOD_NOT_FOUND,
            format!("Method not found: {}", req.method),
        ),
    };

    if req.is_notification() {
        tracing::debug!(method = %req.method, "Notification handled");
        return None;
    }
    Some(response)
}

/// Result of `initialize`.
#[must_use]
pub fn initialize_result(params: &Value) -> Value {
    let protocol_version = params
        .get("protocolVersion")
        .and_then(Value::as_str)
        .unwrap_or(DEFAULT_PROTOCOL_VERSION);

    tracing::info!("MCP initialize: protocol version {}", protocol_version);

    json!({
        "protocolVersion": protocol_version,
        "capabilities": {
            "tools": {},
            "resources": {},
            "prompts": {}
        },
        "serverInfo": {
            "name": "arxiv-research-mcp",
            "version": env!("CARGO_PKG_VERSION")
        }
    })
}

fn tools_list(tools: &[Box<dyn McpTool>]) -> Value {
    let tool_list: Vec<McpToolInfo> = tools
        .iter()
        .map(|t| McpToolInfo {
            name: t.name().to_string(),
            description: t.description().to_string(),
            input_schema: t.input_schema(),
        })
        .collect();

    json!({ "tools": tool_list })
}

async fn handle_tools_call(
    id: Option<Value>,
    params: &Value,
    tools: &[Box<dyn McpTool>],
    ctx: &ToolContext,
) -> JsonRpcResponse {
    let Some(tool_name) = params.get("name").and_then(Value::as_str) else {
        return JsonRpcResponse::error(id, codes::INVALID_PARAMS, "Missing 'name' parameter");
    };

    let arguments = params.get("arguments").cloned().unwrap_or(Value::Null);

    match tools::dispatch(tools, ctx, tool_name, arguments).await {
        Ok(text) => JsonRpcResponse::success(
            id,
            json!({
                "content": [{ "type": "text", "text": text }]
            }),
        ),
        Err(e @ ToolError::UnknownTool(_)) => {
            JsonRpcResponse::error(id, codes::INVALID_PARAMS, e.to_string())
        }
        Err(e) => {
            if e.is_caller_error() {
                tracing::warn!(tool = %tool_name, error = %e, "Rejected tool call");
            } else {
                tracing::error!(tool = %tool_name, error = %e, "Tool execution failed");
            }
            JsonRpcResponse::success(
                id,
                json!({
                    "content": [{ "type": "text", "text": e.to_user_message() }],
                    "isError": true
                }),
            )
        }
    }
}

async fn handle_resources_list(id: Option<Value>, ctx: &ToolContext) -> JsonRpcResponse {
    let registry = Arc::clone(&ctx.registry);
    let Ok(topics) = tokio::task::spawn_blocking(move || registry.topics()).await else {
        return JsonRpcResponse::error(id, codes::INTERNAL_ERROR, "Topic listing task failed");
    };

    let mut resources = vec![json!({
        "uri": FOLDERS_URI,
        "name": "folders",
        "description": "List of topics with saved papers",
        "mimeType": "text/markdown"
    })];
    resources.extend(topics.iter().map(|topic| {
        json!({
            "uri": format!("{PAPERS_SCHEME}{}", topic.slug()),
            "name": topic.display_name(),
            "description": format!("Saved papers on {}", topic.display_name()),
            "mimeType": "text/markdown"
        })
    }));

    JsonRpcResponse::success(id, json!({ "resources": resources }))
}

fn resource_templates() -> Value {
    json!({
        "resourceTemplates": [{
            "uriTemplate": "papers://{topic}",
            "name": "topic_papers",
            "description": "Detailed information about the saved papers on a topic",
            "mimeType": "text/markdown"
        }]
    })
}

async fn handle_resources_read(
    id: Option<Value>,
    params: &Value,
    ctx: &ToolContext,
) -> JsonRpcResponse {
    let Some(uri) = params.get("uri").and_then(Value::as_str) else {
        return JsonRpcResponse::error(id, codes::INVALID_PARAMS, "Missing 'uri' parameter");
    };

    let Some(rest) = uri.strip_prefix(PAPERS_SCHEME) else {
        return JsonRpcResponse::error(
            id,
            codes::INVALID_PARAMS,
            format!("Unknown resource: {uri}"),
        );
    };

    let text = if uri == FOLDERS_URI {
        let registry = Arc::clone(&ctx.registry);
        let Ok(topics) = tokio::task::spawn_blocking(move || registry.topics()).await else {
            return JsonRpcResponse::error(id, codes::INTERNAL_ERROR, "Topic listing task failed");
        };
        formatters::format_folders_markdown(&topics)
    } else {
        // Slugs listed by resources/list are used verbatim; anything else is normalized.
        let topic = match Topic::from_slug(rest).or_else(|_| Topic::parse(rest)) {
            Ok(t) => t,
            Err(e) => {
                return JsonRpcResponse::error(
                    id,
                    codes::INVALID_PARAMS,
                    format!("Invalid topic in {uri}: {e}"),
                );
            }
        };

        let registry = Arc::clone(&ctx.registry);
        let lookup = topic.clone();
        match tokio::task::spawn_blocking(move || resolve_catalog(&registry, &lookup)).await {
            Ok(Ok(catalog)) => formatters::format_topic_markdown(&topic, catalog.as_ref()),
            Ok(Err(e @ RegistryError::CorruptCatalog { .. })) => {
                tracing::warn!(topic = %topic, error = %e, "Corrupt catalog requested");
                format!(
                    "# Error reading papers data for {}\n\nThe papers data file is corrupted.",
                    topic.display_name()
                )
            }
            Ok(Err(e)) => {
                tracing::error!(topic = %topic, error = %e, "Failed to read catalog");
                return JsonRpcResponse::error(id, codes::INTERNAL_ERROR, e.to_string());
            }
            Err(e) => {
                return JsonRpcResponse::error(
                    id,
                    codes::INTERNAL_ERROR,
                    format!("Catalog read task failed: {e}"),
                );
            }
        }
    };

    JsonRpcResponse::success(
        id,
        json!({
            "contents": [{ "uri": uri, "mimeType": "text/markdown", "text": text }]
        }),
    )
}

/// Read the catalog named by a resource URI.
///
/// The URI segment is tried as a slug first, then normalized like a tool
/// argument, so `papers://Quantum Computing` finds `quantum_computing`.
fn resolve_catalog(registry: &Registry, topic: &Topic) -> RegistryResult<Option<TopicCatalog>> {
    if let Some(catalog) = registry.catalog(topic)? {
        return Ok(Some(catalog));
    }
    match Topic::parse(&topic.display_name()) {
        Ok(normalized) if &normalized != topic => registry.catalog(&normalized),
        _ => Ok(None),
    }
}

fn prompts_list() -> Value {
    json!({
        "prompts": [{
            "name": SearchPromptInput::PROMPT,
            "description": "Generate a prompt to find and discuss academic papers on a specific topic",
            "arguments": [
                { "name": "topic", "description": "Research topic", "required": true },
                { "name": "num_papers", "description": "Number of papers to search for (default 5)", "required": false }
            ]
        }]
    })
}

fn handle_prompts_get(id: Option<Value>, params: &Value) -> JsonRpcResponse {
    let Some(name) = params.get("name").and_then(Value::as_str) else {
        return JsonRpcResponse::error(id, codes::INVALID_PARAMS, "Missing 'name' parameter");
    };
    if name != SearchPromptInput::PROMPT {
        return JsonRpcResponse::error(id, codes::INVALID_PARAMS, format!("Prompt not found: {name}"));
    }

    let arguments = params.get("arguments").cloned().unwrap_or(Value::Null);
    let input = match SearchPromptInput::parse(&arguments) {
        Ok(input) => input,
        Err(e) => return JsonRpcResponse::error(id, codes::INVALID_PARAMS, e.to_user_message()),
    };

    JsonRpcResponse::success(
        id,
        json!({
            "description": format!("Search and synthesize papers about '{}'", input.topic),
            "messages": [{
                "role": "user",
                "content": { "type": "text", "text": search_prompt_text(&input) }
            }]
        }),
    )
}

/// Research-synthesis instructions for `generate_search_prompt`.
#[must_use]
pub fn search_prompt_text(input: &SearchPromptInput) -> String {
    let SearchPromptInput { topic, num_papers } = input;
    format!(
        "Search for {num_papers} academic papers about '{topic}' using the search_papers tool.

Follow these instructions:
1. First, search for papers using search_papers(topic='{topic}', max_results={num_papers})
2. For each paper found, extract and organize the following information:
   - Paper title
   - Authors
   - Publication date
   - Brief summary of the key findings
   - Main contributions or innovations
   - Methodologies used
   - Relevance to the topic '{topic}'

3. Provide a comprehensive summary that includes:
   - Overview of the current state of research in '{topic}'
   - Common themes and trends across the papers
   - Key research gaps or areas for future investigation
   - Most impactful or influential papers in this area

4. Organize your findings in a clear, structured format with headings and bullet points for easy readability.

Please present both detailed information about each paper and a high-level synthesis of the research landscape in {topic}."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_serialization() {
        let ok = serde_json::to_value(JsonRpcResponse::success(Some(json!(1)), json!({}))).unwrap();
        assert_eq!(ok["jsonrpc"], "2.0");
        assert!(ok.get("error").is_none());

        let err = serde_json::to_value(JsonRpcResponse::error(None, codes::PARSE_ERROR, "bad")).unwrap();
        assert_eq!(err["error"]["code"], -32700);
        assert!(err["id"].is_null());
    }

    #[test]
    fn test_initialize_echoes_version() {
        let result = initialize_result(&json!({"protocolVersion": "2025-03-26"}));
        assert_eq!(result["protocolVersion"], "2025-03-26");
        assert!(result["capabilities"]["resources"].is_object());

        let result = initialize_result(&Value::Null);
        assert_eq!(result["protocolVersion"], DEFAULT_PROTOCOL_VERSION);
    }

    #[test]
    fn test_prompt_text_mentions_arguments() {
        let text = search_prompt_text(&SearchPromptInput { topic: "graph neural nets".into(), num_papers: 3 });
        assert!(text.starts_with("Search for 3 academic papers about 'graph neural nets'"));
        assert!(text.contains("search_papers(topic='graph neural nets', max_results=3)"));
    }

    #[test]
    fn test_prompts_get_validates() {
        let resp = handle_prompts_get(Some(json!(1)), &json!({"name": "other"}));
        assert_eq!(resp.error.unwrap().code, codes::INVALID_PARAMS);

        let resp = handle_prompts_get(Some(json!(1)), &json!({"name": "generate_search_prompt"}));
        assert_eq!(resp.error.unwrap().code, codes::INVALID_PARAMS);

        let resp = handle_prompts_get(
            Some(json!(1)),
            &json!({"name": "generate_search_prompt", "arguments": {"topic": "llm", "num_papers": "2"}}),
        );
        let result = resp.result.unwrap();
        assert_eq!(result["messages"][0]["role"], "user");
    }
}
