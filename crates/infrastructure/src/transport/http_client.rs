//! HTTP client construction and the plain reqwest transport.

use super::resolver::UpstreamResolver;
use super::HttpTransport;
use async_trait::async_trait;
use ferrous_doh_domain::config::HttpConfig;
use ferrous_doh_domain::DomainError;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

pub const USER_AGENT: &str = concat!("ferrous-doh/", env!("CARGO_PKG_VERSION"));

/// Build a reqwest client from the configured options.
pub fn build_client(config: &HttpConfig) -> Result<reqwest::Client, DomainError> {
    let mut builder = reqwest::Client::builder()
        .use_rustls_tls()
        .user_agent(USER_AGENT)
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .tcp_keepalive(Duration::from_secs(config.keepalive_secs))
        .pool_idle_timeout(Duration::from_secs(config.pool_idle_timeout_secs))
        .danger_accept_invalid_certs(config.insecure_skip_verify);

    if config.timeout_secs > 0 {
        builder = builder.timeout(Duration::from_secs(config.timeout_secs));
    }

    if !config.dual_stack {
        builder = builder.local_address(IpAddr::V4(Ipv4Addr::UNSPECIFIED));
    }

    if let Some(proxy) = &config.proxy {
        let proxy = reqwest::Proxy::all(proxy.as_str()).map_err(|e| {
            DomainError::ConfigError(format!("Invalid proxy '{}': {}", proxy, e))
        })?;
        builder = builder.proxy(proxy);
    }

    if let Some(addr) = &config.resolver_addr {
        let resolver_addr: SocketAddr = addr.parse().map_err(|e| {
            DomainError::ConfigError(format!("Invalid resolver address '{}': {}", addr, e))
        })?;
        let timeout = Duration::from_secs(config.connect_timeout_secs.max(1));
        builder = builder.dns_resolver(Arc::new(UpstreamResolver::new(
            resolver_addr,
            config.resolver_network,
            timeout,
        )));
        debug!(resolver = %resolver_addr, network = ?config.resolver_network, "Using custom resolver");
    }

    builder
        .build()
        .map_err(|e| DomainError::ConfigError(format!("Failed to build HTTP client: {}", e)))
}

/// Sends requests with a single reqwest client. No retries.
#[derive(Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(config: &HttpConfig) -> Result<Self, DomainError> {
        Ok(Self {
            client: build_client(config)?,
        })
    }

    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn execute(&self, request: reqwest::Request) -> Result<reqwest::Response, DomainError> {
        let url = request.url().clone();
        self.client.execute(request).await.map_err(|e| {
            let kind = if e.is_timeout() {
                "timed out"
            } else if e.is_connect() {
                "connection failed"
            } else {
                "failed"
            };
            DomainError::TransportError(format!("Request to {} {}: {}", url, kind, e))
        })
    }
}
