//! Streamable HTTP transport.
//!
//! A single `POST /mcp` endpoint carries JSON-RPC requests; each request is
//! answered in the HTTP response body. `initialize` hands out an
//! `Mcp-Session-Id` that later requests echo back.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::protocol::{self, JsonRpcRequest};
use crate::tools::{McpTool, ToolContext};

/// Session header defined by the Streamable HTTP transport.
pub const SESSION_HEADER: &str = "Mcp-Session-Id";

/// Shared state for HTTP handlers.
pub struct HttpState {
    pub tools: Vec<Box<dyn McpTool>>,
    pub ctx: ToolContext,
}

/// Create the HTTP router for MCP.
pub fn create_router(tools: Vec<Box<dyn McpTool>>, ctx: ToolContext) -> Router {
    let state = Arc::new(HttpState { tools, ctx });

    Router::new()
        .route("/", get(health_check))
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        .route("/mcp", post(handle_mcp_post))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "arxiv-research-mcp",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

async fn readiness_check(State(state): State<Arc<HttpState>>) -> Response {
    let registry = Arc::clone(&state.ctx.registry);
    match tokio::task::spawn_blocking(move || registry.topics().len()).await {
        Ok(topics) => Json(serde_json::json!({
            "status": "ready",
            "service": "arxiv-research-mcp",
            "version": env!("CARGO_PKG_VERSION"),
            "tools": state.tools.len(),
            "topics": topics
        }))
        .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Readiness check failed");
            StatusCode::SERVICE_UNAVAILABLE.into_response()
        }
    }
}

/// Handle POST requests to /mcp.
async fn handle_mcp_post(
    State(state): State<Arc<HttpState>>,
    headers: HeaderMap,
    Json(req): Json<JsonRpcRequest>,
) -> Response {
    tracing::debug!(method = %req.method, "Handling MCP POST request");

    let session_id = if req.method == "initialize" {
        let id = uuid::Uuid::new_v4().to_string();
        tracing::info!(session_id = %id, "New MCP session");
        HeaderValue::from_str(&id).ok()
    } else {
        headers.get(SESSION_HEADER).cloned()
    };

    let Some(response) = protocol::handle_request(req, &state.tools, &state.ctx).await else {
        return StatusCode::ACCEPTED.into_response();
    };

    let mut res = Json(response).into_response();
    if let Some(session_id) = session_id {
        res.headers_mut().insert(SESSION_HEADER, session_id);
    }
    res
}
