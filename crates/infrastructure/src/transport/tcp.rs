//! Plain DNS over TCP with the two-byte length prefix (RFC 1035 §4.2.2).

use ferrous_doh_domain::DomainError;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::debug;

const MAX_TCP_MESSAGE_SIZE: usize = 65535;

pub async fn exchange(
    server_addr: SocketAddr,
    message_bytes: &[u8],
    timeout: Duration,
) -> Result<Vec<u8>, DomainError> {
    let mut stream = tokio::time::timeout(timeout, TcpStream::connect(server_addr))
        .await
        .map_err(|_| {
            DomainError::TransportError(format!(
                "Timeout connecting to TCP server {}",
                server_addr
            ))
        })?
        .map_err(|e| {
            DomainError::TransportError(format!(
                "Connection refused by TCP server {}: {}",
                server_addr, e
            ))
        })?;

    stream.set_nodelay(true).map_err(|e| {
        DomainError::TransportError(format!(
            "Failed to set TCP_NODELAY on {}: {}",
            server_addr, e
        ))
    })?;

    tokio::time::timeout(timeout, send_with_length_prefix(&mut stream, message_bytes))
        .await
        .map_err(|_| {
            DomainError::TransportError(format!("Timeout sending TCP query to {}", server_addr))
        })??;

    debug!(server = %server_addr, message_len = message_bytes.len(), "TCP query sent");

    let response = tokio::time::timeout(timeout, read_with_length_prefix(&mut stream))
        .await
        .map_err(|_| {
            DomainError::TransportError(format!(
                "Timeout waiting for TCP response from {}",
                server_addr
            ))
        })??;

    debug!(server = %server_addr, response_len = response.len(), "TCP response received");

    Ok(response)
}

pub(crate) async fn send_with_length_prefix<S>(
    stream: &mut S,
    message_bytes: &[u8],
) -> Result<(), DomainError>
where
    S: AsyncWriteExt + Unpin,
{
    let length = u16::try_from(message_bytes.len()).map_err(|_| {
        DomainError::EncodeError(format!(
            "DNS message too large for TCP: {} bytes",
            message_bytes.len()
        ))
    })?;

    stream.write_all(&length.to_be_bytes()).await.map_err(|e| {
        DomainError::TransportError(format!("Failed to write length prefix: {}", e))
    })?;
    stream.write_all(message_bytes).await.map_err(|e| {
        DomainError::TransportError(format!("Failed to write DNS message: {}", e))
    })?;
    stream
        .flush()
        .await
        .map_err(|e| DomainError::TransportError(format!("Failed to flush stream: {}", e)))?;

    Ok(())
}

pub(crate) async fn read_with_length_prefix<S>(stream: &mut S) -> Result<Vec<u8>, DomainError>
where
    S: AsyncReadExt + Unpin,
{
    let mut len_buf = [0u8; 2];
    stream.read_exact(&mut len_buf).await.map_err(|e| {
        DomainError::TransportError(format!("Failed to read response length: {}", e))
    })?;

    let response_len = u16::from_be_bytes(len_buf) as usize;

    if response_len > MAX_TCP_MESSAGE_SIZE {
        return Err(DomainError::DecodeError(format!(
            "Response too large: {} bytes (max {})",
            response_len, MAX_TCP_MESSAGE_SIZE
        )));
    }

    let mut response = vec![0u8; response_len];
    stream.read_exact(&mut response).await.map_err(|e| {
        DomainError::TransportError(format!("Failed to read response body: {}", e))
    })?;

    Ok(response)
}
