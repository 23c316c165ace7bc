//! arXiv Research MCP Server - Entry Point
//!
//! Provides both stdio and HTTP transports.

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use arxiv_research_mcp::{config::Config, server::McpServer, tools::ToolContext};

#[derive(Parser, Debug)]
#[command(name = "arxiv-research-mcp")]
#[command(about = "MCP server for searching arXiv and keeping a local paper registry")]
#[command(version)]
struct Cli {
    /// Directory holding one sub-directory per topic
    #[arg(long, env = "PAPERS_DIR")]
    papers_dir: Option<PathBuf>,

    /// arXiv query endpoint (for mirrors or mock servers)
    #[arg(long, env = "ARXIV_API_URL")]
    arxiv_url: Option<String>,

    /// Transport mode: stdio or http
    #[arg(long, default_value = "stdio")]
    transport: Transport,

    /// HTTP server port (only used with --transport http)
    #[arg(long, default_value = "8000", env = "PORT")]
    port: u16,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    log_level: String,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum Transport {
    /// Standard input/output
    #[default]
    Stdio,
    /// Streamable HTTP on a single /mcp endpoint
    Http,
}

/// Logs go to stderr; stdout belongs to the stdio transport.
fn init_tracing(log_level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let subscriber = tracing_subscriber::registry().with(filter);

    if json {
        subscriber.with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr)).init();
    } else {
        subscriber
            .with(tracing_subscriber::fmt::layer().compact().with_writer(std::io::stderr))
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_tracing(&cli.log_level, cli.json_logs);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        transport = ?cli.transport,
        "Starting arXiv research MCP server"
    );

    let mut config = Config::from_env()?;
    if let Some(dir) = cli.papers_dir {
        config.papers_dir = dir;
    }
    if let Some(url) = cli.arxiv_url {
        config.arxiv_api_url = url;
    }

    let ctx = ToolContext::from_config(&config)?;
    let server = McpServer::new(ctx);

    match cli.transport {
        Transport::Stdio => {
            tracing::info!(papers_dir = %config.papers_dir.display(), "Running in stdio mode");
            server.run_stdio().await?;
        }
        Transport::Http => {
            tracing::info!(port = cli.port, papers_dir = %config.papers_dir.display(), "Running in HTTP mode");
            server.run_http(cli.port).await?;
        }
    }

    Ok(())
}
