//! DNS-over-HTTPS client (RFC 8484)
//!
//! Wire format (HTTP):
//! ```text
//! GET /dns-query?dns=<base64url, no padding> HTTP/2
//! Accept: application/dns-message
//!
//! POST /dns-query HTTP/2
//! Content-Type: application/dns-message
//! Accept: application/dns-message
//!
//! <raw DNS message bytes>
//! ```

use crate::dns::wire::{MessageBuilder, ResponseNormalizer, ResponseParser};
use crate::transport::HttpTransport;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use ferrous_doh_domain::{DomainError, NormalizedResponse};
use hickory_proto::op::Message;
use reqwest::header::{HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Method, Request, Url};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Media type of a DNS wire message carried over HTTP (RFC 8484 §6).
pub const DNS_MESSAGE_CONTENT_TYPE: &str = "application/dns-message";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DohMethod {
    #[default]
    Get,
    Post,
}

#[derive(Clone)]
pub struct DohClient {
    transport: Arc<dyn HttpTransport>,
}

impl DohClient {
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self { transport }
    }

    /// Send `message` to `server_url` and decode the reply.
    ///
    /// Returns `Cancelled` as soon as `cancel` fires; the in-flight request
    /// is dropped.
    pub async fn query(
        &self,
        cancel: &CancellationToken,
        server_url: &str,
        message: &Message,
        method: DohMethod,
    ) -> Result<Message, DomainError> {
        let wire = MessageBuilder::to_wire(message)?;
        let request = Self::build_request(server_url, wire, method)?;

        debug!(
            url = server_url,
            method = ?method,
            id = message.id(),
            "Sending DoH query"
        );

        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(DomainError::Cancelled),
            result = self.exchange(server_url, request) => result,
        }
    }

    /// Build a recursive query for `domain`, send it with GET and normalize
    /// the answer.
    pub async fn simple_query(
        &self,
        cancel: &CancellationToken,
        server_url: &str,
        domain: &str,
        type_text: &str,
    ) -> Result<NormalizedResponse, DomainError> {
        let message = MessageBuilder::build_legacy_query(domain, type_text)?;
        let response = self
            .query(cancel, server_url, &message, DohMethod::Get)
            .await?;
        Ok(ResponseNormalizer::normalize(&response))
    }

    fn build_request(
        server_url: &str,
        wire: Vec<u8>,
        method: DohMethod,
    ) -> Result<Request, DomainError> {
        let mut url = Url::parse(server_url).map_err(|e| {
            DomainError::TransportError(format!("Invalid DoH server URL '{}': {}", server_url, e))
        })?;

        let mut request = match method {
            DohMethod::Get => {
                url.query_pairs_mut()
                    .append_pair("dns", &URL_SAFE_NO_PAD.encode(&wire));
                Request::new(Method::GET, url)
            }
            DohMethod::Post => {
                let mut request = Request::new(Method::POST, url);
                request
                    .headers_mut()
                    .insert(CONTENT_TYPE, HeaderValue::from_static(DNS_MESSAGE_CONTENT_TYPE));
                *request.body_mut() = Some(wire.into());
                request
            }
        };

        request
            .headers_mut()
            .insert(ACCEPT, HeaderValue::from_static(DNS_MESSAGE_CONTENT_TYPE));

        Ok(request)
    }

    async fn exchange(&self, server_url: &str, request: Request) -> Result<Message, DomainError> {
        let response = self.transport.execute(request).await?;

        let status = response.status();
        if !status.is_success() {
            return Err(DomainError::TransportError(format!(
                "DoH server {} returned HTTP {}: {}",
                server_url,
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown")
            )));
        }

        let body = response.bytes().await.map_err(|e| {
            DomainError::TransportError(format!(
                "Failed to read DoH response from {}: {}",
                server_url, e
            ))
        })?;

        debug!(url = server_url, response_len = body.len(), "DoH response received");

        ResponseParser::parse(&body)
    }
}
