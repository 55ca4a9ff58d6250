//! Client for the provider JSON resolve API (`?name=&type=`).

use crate::transport::HttpTransport;
use ferrous_doh_domain::{DomainError, NormalizedResponse};
use reqwest::header::{HeaderValue, ACCEPT};
use reqwest::{Method, Request, Url};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

pub const DNS_JSON_CONTENT_TYPE: &str = "application/dns-json";

#[derive(Clone)]
pub struct JsonApiClient {
    transport: Arc<dyn HttpTransport>,
}

impl JsonApiClient {
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self { transport }
    }

    pub async fn query(
        &self,
        cancel: &CancellationToken,
        base_url: &str,
        domain: &str,
        type_text: &str,
    ) -> Result<NormalizedResponse, DomainError> {
        let request = Self::build_request(base_url, domain, type_text)?;

        debug!(url = base_url, domain = domain, record_type = type_text, "Sending JSON API query");

        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(DomainError::Cancelled),
            result = self.exchange(base_url, request) => result,
        }
    }

    fn build_request(base_url: &str, domain: &str, type_text: &str) -> Result<Request, DomainError> {
        let mut url = Url::parse(base_url).map_err(|e| {
            DomainError::TransportError(format!("Invalid JSON API URL '{}': {}", base_url, e))
        })?;
        url.query_pairs_mut()
            .append_pair("name", domain)
            .append_pair("type", type_text);

        let mut request = Request::new(Method::GET, url);
        request
            .headers_mut()
            .insert(ACCEPT, HeaderValue::from_static(DNS_JSON_CONTENT_TYPE));
        Ok(request)
    }

    async fn exchange(
        &self,
        base_url: &str,
        request: Request,
    ) -> Result<NormalizedResponse, DomainError> {
        let response = self.transport.execute(request).await?;

        let status = response.status();
        if !status.is_success() {
            return Err(DomainError::TransportError(format!(
                "JSON API {} returned HTTP {}: {}",
                base_url,
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown")
            )));
        }

        let body = response.bytes().await.map_err(|e| {
            DomainError::TransportError(format!(
                "Failed to read JSON API response from {}: {}",
                base_url, e
            ))
        })?;

        serde_json::from_slice(&body).map_err(|e| {
            DomainError::DecodeError(format!("Malformed JSON from {}: {}", base_url, e))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_carries_name_and_type() {
        let request =
            JsonApiClient::build_request("https://dns.google.com/resolve", "example.com", "AAAA")
                .unwrap();

        assert_eq!(
            request.url().as_str(),
            "https://dns.google.com/resolve?name=example.com&type=AAAA"
        );
        assert_eq!(request.headers().get(ACCEPT).unwrap(), DNS_JSON_CONTENT_TYPE);
    }
}
