//! arXiv Atom API gateway.

use std::time::Duration;

use feed_rs::model::Entry;
use reqwest::Client;
use url::Url;

use super::SearchGateway;
use crate::config::{Config, api};
use crate::error::{GatewayError, GatewayResult};
use crate::models::PaperRecord;

/// Gateway to `export.arxiv.org`.
#[derive(Clone)]
pub struct ArxivGateway {
    /// HTTP client.
    client: Client,

    /// Query endpoint.
    api_url: String,

    /// Reported in timeout errors.
    request_timeout: Duration,
}

impl ArxivGateway {
    /// Create a gateway with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails.
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let client = Client::builder()
            .user_agent(api::USER_AGENT)
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .gzip(true)
            .build()?;

        Ok(Self {
            client,
            api_url: config.arxiv_api_url.clone(),
            request_timeout: config.request_timeout,
        })
    }

    /// Query endpoint in use.
    #[must_use]
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Parse an Atom feed body into at most `max_results` records.
    ///
    /// arXiv answers a bad query with HTTP 200 and a single entry under
    /// `/api/errors`; that feed is reported as [`GatewayError::Rejected`].
    /// Other entries without an arXiv id, a title or a publication date are
    /// dropped; the number dropped is logged.
    pub fn parse_feed(body: &[u8], max_results: usize) -> GatewayResult<Vec<PaperRecord>> {
        let feed = feed_rs::parser::parse(body)
            .map_err(|e| GatewayError::Feed(format!("Failed to parse Atom feed: {e}")))?;

        if let Some(fault) = feed.entries.iter().find(|e| Self::is_error_entry(&e.id)) {
            let message = fault
                .summary
                .as_ref()
                .map(|s| s.content.trim().to_string())
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| fault.id.clone());
            return Err(GatewayError::Rejected(message));
        }

        let total = feed.entries.len();
        let papers: Vec<PaperRecord> = feed.entries.iter().filter_map(Self::parse_entry).collect();

        let dropped = total - papers.len();
        if dropped > 0 {
            tracing::warn!(dropped, total, "Dropped malformed arXiv entries");
        }

        Ok(papers.into_iter().take(max_results).collect())
    }

    /// Extract the short id (`2301.12345v1`, `hep-th/9901001v2`) from an entry id URL.
    #[must_use]
    pub fn short_id(entry_id: &str) -> Option<String> {
        let url = Url::parse(entry_id.trim()).ok()?;
        let id = url.path().strip_prefix("/abs/")?.trim_matches('/');
        (!id.is_empty()).then(|| id.to_string())
    }

    fn is_error_entry(entry_id: &str) -> bool {
        Url::parse(entry_id.trim()).is_ok_and(|url| url.path().starts_with("/api/errors"))
    }

    fn parse_entry(entry: &Entry) -> Option<PaperRecord> {
        let paper_id = Self::short_id(&entry.id)?;

        let title = entry
            .title
            .as_ref()
            .map(|t| t.content.split_whitespace().collect::<Vec<_>>().join(" "))
            .filter(|t| !t.is_empty())?;

        let published = entry.published?.date_naive();

        let summary = entry
            .summary
            .as_ref()
            .map(|s| s.content.trim().to_string())
            .unwrap_or_default();

        let authors = entry
            .authors
            .iter()
            .map(|a| a.name.trim().to_string())
            .filter(|n| !n.is_empty())
            .collect();

        let pdf_url = entry
            .links
            .iter()
            .find(|l| {
                l.media_type.as_deref() == Some("application/pdf")
                    || l.title.as_deref() == Some("pdf")
            })
            .map(|l| l.href.clone())
            .unwrap_or_else(|| format!("{}/{}", api::ARXIV_PDF_URL, paper_id));

        Some(PaperRecord { paper_id, title, authors, summary, pdf_url, published })
    }

    fn map_send_error(&self, e: reqwest::Error) -> GatewayError {
        if e.is_timeout() { GatewayError::Timeout(self.request_timeout) } else { GatewayError::Http(e) }
    }
}

#[async_trait::async_trait]
impl SearchGateway for ArxivGateway {
    fn name(&self) -> &'static str {
        "arXiv"
    }

    async fn search(&self, topic: &str, max_results: usize) -> GatewayResult<Vec<PaperRecord>> {
        if max_results == 0 {
            return Ok(Vec::new());
        }

        let params = [
            ("search_query", topic.to_string()),
            ("start", "0".to_string()),
            ("max_results", max_results.to_string()),
            ("sortBy", "relevance".to_string()),
            ("sortOrder", "descending".to_string()),
        ];

        tracing::debug!(topic, max_results, "Querying arXiv");

        let response = self
            .client
            .get(&self.api_url)
            .header("Accept", "application/atom+xml")
            .query(&params)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(GatewayError::status(status.as_u16(), text));
        }

        let body = response.bytes().await.map_err(|e| self.map_send_error(e))?;
        let papers = Self::parse_feed(&body, max_results)?;

        tracing::info!(topic, returned = papers.len(), "arXiv search complete");
        Ok(papers)
    }
}

impl std::fmt::Debug for ArxivGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArxivGateway").field("api_url", &self.api_url).finish()
    }
}
