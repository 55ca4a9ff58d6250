//! Custom name resolution for the HTTP client.
//!
//! When a resolver address is configured, DoH server host names are looked
//! up by sending A and AAAA queries straight to that resolver over UDP or
//! TCP instead of going through the system resolver.

use super::{tcp, udp};
use crate::dns::wire::{MessageBuilder, ResponseParser};
use ferrous_doh_domain::config::ResolverNetwork;
use ferrous_doh_domain::{DomainError, RecordType};
use hickory_proto::op::{Message, MessageType};
use hickory_proto::rr::RData;
use reqwest::dns::{Addrs, Name, Resolve, Resolving};
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Debug, Clone)]
pub struct UpstreamResolver {
    resolver_addr: SocketAddr,
    network: ResolverNetwork,
    timeout: Duration,
}

impl UpstreamResolver {
    pub fn new(resolver_addr: SocketAddr, network: ResolverNetwork, timeout: Duration) -> Self {
        Self {
            resolver_addr,
            network,
            timeout,
        }
    }

    /// All IPv4 and IPv6 addresses for `host`. Port is left at 0; the HTTP
    /// client fills in the URL's port.
    pub async fn lookup(&self, host: &str) -> Result<Vec<SocketAddr>, DomainError> {
        if let Ok(ip) = host.parse::<IpAddr>() {
            return Ok(vec![SocketAddr::new(ip, 0)]);
        }

        let (v4, v6) = tokio::join!(
            self.lookup_type(host, RecordType::A),
            self.lookup_type(host, RecordType::AAAA)
        );

        let mut addrs = Vec::new();
        let mut last_error = None;
        for result in [v4, v6] {
            match result {
                Ok(mut found) => addrs.append(&mut found),
                Err(e) => last_error = Some(e),
            }
        }

        if addrs.is_empty() {
            return Err(last_error.unwrap_or_else(|| {
                DomainError::TransportError(format!(
                    "No addresses found for {} via {}",
                    host, self.resolver_addr
                ))
            }));
        }

        debug!(
            host = host,
            resolver = %self.resolver_addr,
            addresses = addrs.len(),
            "Resolved DoH server host"
        );

        Ok(addrs)
    }

    async fn lookup_type(
        &self,
        host: &str,
        record_type: RecordType,
    ) -> Result<Vec<SocketAddr>, DomainError> {
        let query = MessageBuilder::build_query(host, &record_type)?;
        let wire = MessageBuilder::to_wire(&query)?;

        let mut message = match self.network {
            ResolverNetwork::Udp => self.exchange_udp(&query, &wire).await?,
            ResolverNetwork::Tcp => self.exchange_tcp(&query, &wire).await?,
        };

        if message.truncated() && self.network == ResolverNetwork::Udp {
            debug!(host = host, "Truncated UDP answer, retrying over TCP");
            message = self.exchange_tcp(&query, &wire).await?;
        }

        Ok(message
            .answers()
            .iter()
            .filter_map(|record| match record.data() {
                RData::A(a) => Some(SocketAddr::new(IpAddr::V4(a.0), 0)),
                RData::AAAA(aaaa) => Some(SocketAddr::new(IpAddr::V6(aaaa.0), 0)),
                _ => None,
            })
            .collect())
    }

    async fn exchange_udp(&self, query: &Message, wire: &[u8]) -> Result<Message, DomainError> {
        let response = udp::exchange(self.resolver_addr, wire, self.timeout).await?;
        self.accept_reply(query, &response)
    }

    async fn exchange_tcp(&self, query: &Message, wire: &[u8]) -> Result<Message, DomainError> {
        let response = tcp::exchange(self.resolver_addr, wire, self.timeout).await?;
        self.accept_reply(query, &response)
    }

    /// Parse `response` and check it answers `query`: same ID, marked as a
    /// response, same question section.
    fn accept_reply(&self, query: &Message, response: &[u8]) -> Result<Message, DomainError> {
        let reply = ResponseParser::parse(response)?;

        if reply.id() != query.id()
            || reply.message_type() != MessageType::Response
            || reply.queries() != query.queries()
        {
            warn!(
                resolver = %self.resolver_addr,
                expected_id = query.id(),
                received_id = reply.id(),
                "Discarding reply that does not match the query"
            );
            return Err(DomainError::TransportError(format!(
                "Resolver {} sent a reply that does not match the query",
                self.resolver_addr
            )));
        }

        Ok(reply)
    }
}

impl Resolve for UpstreamResolver {
    fn resolve(&self, name: Name) -> Resolving {
        let resolver = self.clone();
        Box::pin(async move {
            let addrs = resolver.lookup(name.as_str()).await?;
            let addrs: Addrs = Box::new(addrs.into_iter());
            Ok::<_, Box<dyn std::error::Error + Send + Sync>>(addrs)
        })
    }
}
