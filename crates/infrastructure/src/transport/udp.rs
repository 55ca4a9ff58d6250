//! Plain DNS over UDP (RFC 1035 §4.2.1), used only by the custom resolver
//! to look up DoH server host names.
//!
//! Messages are sent as-is (no framing). If the response has the TC bit set
//! the caller should retry over TCP.

use ferrous_doh_domain::DomainError;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use std::time::Duration;
use tokio::net::UdpSocket;
use tracing::debug;

/// Maximum UDP DNS response size with EDNS(0)
const MAX_UDP_RESPONSE_SIZE: usize = 4096;

pub async fn exchange(
    server_addr: SocketAddr,
    message_bytes: &[u8],
    timeout: Duration,
) -> Result<Vec<u8>, DomainError> {
    let bind_addr = if server_addr.is_ipv4() {
        SocketAddr::from((Ipv4Addr::UNSPECIFIED, 0))
    } else {
        SocketAddr::from((Ipv6Addr::UNSPECIFIED, 0))
    };

    let socket = UdpSocket::bind(bind_addr).await.map_err(|e| {
        DomainError::TransportError(format!("Failed to bind UDP socket: {}", e))
    })?;

    // A connected socket only delivers datagrams from `server_addr`.
    socket.connect(server_addr).await.map_err(|e| {
        DomainError::TransportError(format!(
            "Failed to connect UDP socket to {}: {}",
            server_addr, e
        ))
    })?;

    let bytes_sent = tokio::time::timeout(timeout, socket.send(message_bytes))
        .await
        .map_err(|_| {
            DomainError::TransportError(format!("Timeout sending UDP query to {}", server_addr))
        })?
        .map_err(|e| {
            DomainError::TransportError(format!(
                "Failed to send UDP query to {}: {}",
                server_addr, e
            ))
        })?;

    debug!(server = %server_addr, bytes_sent = bytes_sent, "UDP query sent");

    let mut recv_buf = vec![0u8; MAX_UDP_RESPONSE_SIZE];

    let bytes_received = tokio::time::timeout(timeout, socket.recv(&mut recv_buf))
        .await
        .map_err(|_| {
            DomainError::TransportError(format!(
                "Timeout waiting for UDP response from {}",
                server_addr
            ))
        })?
        .map_err(|e| {
            DomainError::TransportError(format!(
                "Failed to receive UDP response from {}: {}",
                server_addr, e
            ))
        })?;

    recv_buf.truncate(bytes_received);

    debug!(server = %server_addr, bytes_received = bytes_received, "UDP response received");

    Ok(recv_buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_datagrams_from_other_peers_are_ignored() {
        let server = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let server_addr = server.local_addr().unwrap();
        let intruder = UdpSocket::bind("127.0.0.1:0").await.unwrap();

        let responder = tokio::spawn(async move {
            let mut buf = [0u8; 512];
            let (len, client) = server.recv_from(&mut buf).await.unwrap();
            intruder.send_to(b"forged", client).await.unwrap();
            tokio::time::sleep(Duration::from_millis(50)).await;
            server.send_to(&buf[..len], client).await.unwrap();
        });

        let reply = exchange(server_addr, b"\x12\x34query", Duration::from_secs(2))
            .await
            .unwrap();
        assert_eq!(reply, b"\x12\x34query");
        responder.await.unwrap();
    }

    #[tokio::test]
    async fn test_silent_server_times_out() {
        let server = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let err = exchange(
            server.local_addr().unwrap(),
            b"query",
            Duration::from_millis(50),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, DomainError::TransportError(_)));
    }
}
