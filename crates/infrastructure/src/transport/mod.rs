pub mod http_client;
pub mod resolver;
pub mod retry;
pub mod tcp;
pub mod udp;

use async_trait::async_trait;
use ferrous_doh_domain::config::HttpConfig;
use ferrous_doh_domain::DomainError;
use std::sync::Arc;

pub use http_client::{build_client, ReqwestTransport};
pub use resolver::UpstreamResolver;
pub use retry::{RetryPolicy, RetryTransport};

/// Sends one HTTP request. Every DoH exchange goes through an explicitly
/// passed transport; there is no process-wide client.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn execute(&self, request: reqwest::Request) -> Result<reqwest::Response, DomainError>;
}

/// Transport for the configured options: reqwest, wrapped in the retry
/// policy when `retry_max > 0`.
pub fn from_config(config: &HttpConfig) -> Result<Arc<dyn HttpTransport>, DomainError> {
    let transport = ReqwestTransport::new(config)?;
    if config.retry_max == 0 {
        return Ok(Arc::new(transport));
    }
    Ok(Arc::new(RetryTransport::new(
        transport,
        RetryPolicy::new(config.retry_max),
    )))
}
