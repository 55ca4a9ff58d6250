use super::client::{DohClient, DohMethod};
use async_trait::async_trait;
use ferrous_doh_application::ports::DohHandler;
use ferrous_doh_domain::DomainError;
use hickory_proto::op::Message;
use http::request::Parts;
use http::HeaderMap;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Relays DoH queries to a fixed, ordered list of upstream DoH servers.
///
/// Upstreams are tried one at a time; the first successful answer wins.
pub struct Forwarder {
    client: DohClient,
    upstreams: Vec<String>,
}

impl Forwarder {
    pub fn new(client: DohClient, upstreams: Vec<String>) -> Self {
        Self { client, upstreams }
    }

    pub fn upstreams(&self) -> &[String] {
        &self.upstreams
    }

    pub async fn forward(
        &self,
        cancel: &CancellationToken,
        query: &Message,
    ) -> Result<Message, DomainError> {
        for (position, url) in self.upstreams.iter().enumerate() {
            match self.client.query(cancel, url, query, DohMethod::Get).await {
                Ok(response) => {
                    debug!(url = %url, position = position, id = query.id(), "Upstream answered");
                    return Ok(response);
                }
                Err(e) if e.is_cancelled() => return Err(e),
                Err(e) => {
                    warn!(url = %url, error = %e, position = position, "Upstream failed, trying next");
                }
            }
        }

        Err(DomainError::ForwarderFailed)
    }
}

#[async_trait]
impl DohHandler for Forwarder {
    async fn handle(
        &self,
        request: &Parts,
        _response_headers: &mut HeaderMap,
        query: Message,
    ) -> Result<Message, DomainError> {
        let cancel = request
            .extensions
            .get::<CancellationToken>()
            .cloned()
            .unwrap_or_default();

        self.forward(&cancel, &query).await
    }
}
