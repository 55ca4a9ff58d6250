use async_trait::async_trait;
use ferrous_doh_domain::{DnsQuery, DomainError, NormalizedResponse};
use tokio_util::sync::CancellationToken;

/// Anything that can answer a domain/type question. The orchestrator fans
/// out over a set of these.
#[async_trait]
pub trait Source: Send + Sync {
    /// Label attached to results from this source.
    fn name(&self) -> &str;

    /// Resolve one query. Returns `DomainError::Cancelled` promptly once
    /// `cancel` fires, including while waiting on a concurrency permit.
    async fn query(
        &self,
        cancel: &CancellationToken,
        query: &DnsQuery,
    ) -> Result<NormalizedResponse, DomainError>;
}
