//! Configuration for the arXiv research MCP server.

use std::path::PathBuf;
use std::time::Duration;

/// API configuration constants.
pub mod api {
    use std::time::Duration;

    /// arXiv Atom query endpoint.
    pub const ARXIV_API_URL: &str = "http://export.arxiv.org/api/query";

    /// Base URL for arXiv PDFs, used when an entry carries no PDF link.
    pub const ARXIV_PDF_URL: &str = "https://arxiv.org/pdf";

    /// Request timeout. A search that exceeds it fails outright.
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

    /// Connection timeout.
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Results per search when the caller does not say.
    pub const DEFAULT_MAX_RESULTS: usize = 5;

    /// Largest page the arXiv API serves in a single request.
    pub const MAX_RESULTS_LIMIT: usize = 2000;

    /// User agent sent to arXiv.
    pub const USER_AGENT: &str = concat!("arxiv-research-mcp/", env!("CARGO_PKG_VERSION"));
}

/// Storage layout constants.
pub mod storage {
    /// Default storage root, relative to the working directory.
    pub const DEFAULT_PAPERS_DIR: &str = "papers";

    /// File name of a topic's catalog inside its directory.
    pub const CATALOG_FILE: &str = "papers_info.json";
}

/// Server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Root directory holding one sub-directory per topic.
    pub papers_dir: PathBuf,

    /// arXiv query endpoint (for testing with mock servers).
    pub arxiv_api_url: String,

    /// Request timeout.
    pub request_timeout: Duration,

    /// Connection timeout.
    pub connect_timeout: Duration,

    /// Default `max_results` for `search_papers`.
    pub default_max_results: usize,
}

impl Config {
    /// Create a configuration storing catalogs under `papers_dir`.
    #[must_use]
    pub fn new(papers_dir: impl Into<PathBuf>) -> Self {
        Self {
            papers_dir: papers_dir.into(),
            arxiv_api_url: api::ARXIV_API_URL.to_string(),
            request_timeout: api::REQUEST_TIMEOUT,
            connect_timeout: api::CONNECT_TIMEOUT,
            default_max_results: api::DEFAULT_MAX_RESULTS,
        }
    }

    /// Create a test configuration pointing at a mock server and an isolated storage root.
    #[must_use]
    pub fn for_testing(base_url: &str, papers_dir: impl Into<PathBuf>) -> Self {
        Self {
            papers_dir: papers_dir.into(),
            arxiv_api_url: format!("{}/api/query", base_url.trim_end_matches('/')),
            request_timeout: Duration::from_secs(5),
            connect_timeout: Duration::from_secs(2),
            default_max_results: api::DEFAULT_MAX_RESULTS,
        }
    }

    /// Create configuration from environment variables.
    ///
    /// Reads a `.env` file first when one is present. Recognized variables:
    /// `PAPERS_DIR`, `ARXIV_API_URL` and `ARXIV_TIMEOUT_SECS`.
    ///
    /// # Errors
    ///
    /// Returns error if environment variables are invalid.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv::dotenv().ok();

        let papers_dir = std::env::var("PAPERS_DIR")
            .unwrap_or_else(|_| storage::DEFAULT_PAPERS_DIR.to_string());
        let mut config = Self::new(papers_dir);

        if let Ok(url) = std::env::var("ARXIV_API_URL") {
            config.arxiv_api_url = url;
        }

        if let Ok(secs) = std::env::var("ARXIV_TIMEOUT_SECS") {
            let secs: u64 = secs
                .parse()
                .map_err(|e| anyhow::anyhow!("ARXIV_TIMEOUT_SECS must be a number of seconds: {e}"))?;
            config.request_timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(storage::DEFAULT_PAPERS_DIR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.papers_dir, PathBuf::from("papers"));
        assert_eq!(config.arxiv_api_url, api::ARXIV_API_URL);
        assert_eq!(config.default_max_results, 5);
    }

    #[test]
    fn test_config_for_testing() {
        let config = Config::for_testing("http://127.0.0.1:4000/", "/tmp/p");
        assert_eq!(config.arxiv_api_url, "http://127.0.0.1:4000/api/query");
        assert_eq!(config.papers_dir, PathBuf::from("/tmp/p"));
    }
}
