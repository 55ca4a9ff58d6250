use async_trait::async_trait;
use ferrous_doh_domain::DomainError;
use hickory_proto::op::Message;
use http::request::Parts;
use http::HeaderMap;

/// Answers a decoded DoH request.
///
/// `request` exposes the inbound method, URI, headers and extensions.
/// Headers written to `response_headers` are added to a successful HTTP
/// response; status and content type stay under the endpoint's control.
#[async_trait]
pub trait DohHandler: Send + Sync {
    async fn handle(
        &self,
        request: &Parts,
        response_headers: &mut HeaderMap,
        query: Message,
    ) -> Result<Message, DomainError>;
}
