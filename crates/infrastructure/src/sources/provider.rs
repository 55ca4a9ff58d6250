use crate::doh::{DohClient, JsonApiClient};
use crate::transport::HttpTransport;
use async_trait::async_trait;
use ferrous_doh_application::ports::Source;
use ferrous_doh_domain::config::SourceApi;
use ferrous_doh_domain::{DnsQuery, DomainError, NormalizedResponse};
use std::num::NonZeroUsize;
use std::sync::{Arc, OnceLock};
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Host parallelism, or 1 when it cannot be determined.
pub fn default_parallelism() -> usize {
    std::thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1)
}

/// One DoH provider reachable at `base_url`.
///
/// Every query holds one permit of the limiter for its whole duration. A
/// source built without a limiter creates its own on first use, sized to
/// the host's parallelism.
pub struct ProviderSource {
    name: String,
    base_url: String,
    api: SourceApi,
    doh: DohClient,
    json: JsonApiClient,
    limiter: OnceLock<Arc<Semaphore>>,
}

impl ProviderSource {
    pub fn new(
        name: impl Into<String>,
        base_url: impl Into<String>,
        api: SourceApi,
        transport: Arc<dyn HttpTransport>,
    ) -> Self {
        Self {
            name: name.into(),
            base_url: base_url.into(),
            api,
            doh: DohClient::new(transport.clone()),
            json: JsonApiClient::new(transport),
            limiter: OnceLock::new(),
        }
    }

    pub fn with_limiter(mut self, limiter: Arc<Semaphore>) -> Self {
        self.limiter = OnceLock::from(limiter);
        self
    }

    pub fn limiter(&self) -> &Arc<Semaphore> {
        self.limiter
            .get_or_init(|| Arc::new(Semaphore::new(default_parallelism())))
    }
}

#[async_trait]
impl Source for ProviderSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn query(
        &self,
        cancel: &CancellationToken,
        query: &DnsQuery,
    ) -> Result<NormalizedResponse, DomainError> {
        let limiter = self.limiter();
        let _permit = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(DomainError::Cancelled),
            permit = limiter.acquire() => permit.map_err(|_| DomainError::Cancelled)?,
        };

        let type_text = query.record_type.to_string();
        debug!(
            source = %self.name,
            domain = %query.domain,
            record_type = %type_text,
            api = self.api.as_str(),
            "Querying source"
        );

        match self.api {
            SourceApi::Message => {
                self.doh
                    .simple_query(cancel, &self.base_url, &query.domain, &type_text)
                    .await
            }
            SourceApi::Json => {
                self.json
                    .query(cancel, &self.base_url, &query.domain, &type_text)
                    .await
            }
        }
    }
}
