//! External search gateway.
//!
//! The dispatcher only depends on [`SearchGateway`]; [`ArxivGateway`] is the
//! production implementation backed by the arXiv Atom API.

mod arxiv;

pub use arxiv::ArxivGateway;

use crate::error::GatewayResult;
use crate::models::PaperRecord;

/// A remote bibliographic search provider.
///
/// Each call is one outbound query with no retries; failures are reported to
/// the caller, which decides how to surface them.
#[async_trait::async_trait]
pub trait SearchGateway: Send + Sync {
    /// Provider name for logs.
    fn name(&self) -> &'static str;

    /// Search by topic, returning at most `max_results` well-formed records
    /// in provider relevance order.
    async fn search(&self, topic: &str, max_results: usize) -> GatewayResult<Vec<PaperRecord>>;
}
