//! arXiv Research MCP Server
//!
//! A Model Context Protocol (MCP) server that lets an AI assistant search
//! arXiv for papers, file what it finds under a topic on local disk, and
//! later retrieve or summarize that saved knowledge.
//!
//! # Features
//!
//! - **4 MCP Tools**: `search_papers`, `extract_info`, `list_topics`, `get_paper_count`
//! - **Resources**: `papers://folders` and `papers://{topic}` as Markdown
//! - **Prompt**: `generate_search_prompt` for guided literature synthesis
//! - **Durable**: one JSON catalog per topic, replaced atomically on every write
//!
//! # Example
//!
//! ```no_run
//! use arxiv_research_mcp::{config::Config, server::McpServer, tools::ToolContext};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let ctx = ToolContext::from_config(&config)?;
//!
//!     McpServer::new(ctx).run_stdio().await
//! }
//! ```

pub mod config;
pub mod error;
pub mod formatters;
pub mod gateway;
pub mod models;
pub mod registry;
pub mod server;
pub mod tools;

pub use config::Config;
pub use error::{GatewayError, RegistryError, ToolError};
pub use gateway::{ArxivGateway, SearchGateway};
pub use registry::Registry;
