//! DNS Message Builder
//!
//! Constructs RFC 1035 query messages with `hickory-proto` and serializes
//! messages to wire format.

use super::record_type_map::RecordTypeMapper;
use ferrous_doh_domain::{to_fqdn, DomainError, RecordType};
use hickory_proto::op::{Message, MessageType, OpCode, Query};
use hickory_proto::rr::{DNSClass, Name};
use hickory_proto::serialize::binary::{BinEncodable, BinEncoder};
use std::str::FromStr;

/// Builds DNS query messages
pub struct MessageBuilder;

impl MessageBuilder {
    /// Build a recursive query for `domain`.
    ///
    /// The message carries:
    /// - a random 16-bit ID
    /// - the RD (Recursion Desired) flag
    /// - one question for the fully-qualified name, class ANY when the type
    ///   is ANY and IN otherwise
    pub fn build_query(domain: &str, record_type: &RecordType) -> Result<Message, DomainError> {
        if domain.trim().is_empty() {
            return Err(DomainError::EncodeError("Empty domain name".to_string()));
        }

        let fqdn = to_fqdn(domain);
        let name = Name::from_str(&fqdn).map_err(|e| {
            DomainError::EncodeError(format!("Invalid domain '{}': {}", domain, e))
        })?;

        let mut query = Query::query(name, RecordTypeMapper::to_hickory(record_type));
        query.set_query_class(if record_type.is_any() {
            DNSClass::ANY
        } else {
            DNSClass::IN
        });

        let mut message = Message::new(fastrand::u16(..), MessageType::Query, OpCode::Query);
        message.set_recursion_desired(true);
        message.add_query(query);

        Ok(message)
    }

    /// Same as [`build_query`](Self::build_query) with the type given as
    /// text (`"A"`, `"mx"`, `"TYPE65280"`).
    pub fn build_legacy_query(domain: &str, type_text: &str) -> Result<Message, DomainError> {
        let record_type = RecordType::from_str(type_text)?;
        Self::build_query(domain, &record_type)
    }

    /// Build a query and serialize it to wire format bytes
    pub fn build_query_bytes(
        domain: &str,
        record_type: &RecordType,
    ) -> Result<Vec<u8>, DomainError> {
        let message = Self::build_query(domain, record_type)?;
        Self::to_wire(&message)
    }

    /// Serialize a Message to wire format bytes
    pub fn to_wire(message: &Message) -> Result<Vec<u8>, DomainError> {
        let mut buf = Vec::with_capacity(512);
        let mut encoder = BinEncoder::new(&mut buf);

        message.emit(&mut encoder).map_err(|e| {
            DomainError::EncodeError(format!("Failed to serialize DNS message: {}", e))
        })?;

        Ok(buf)
    }
}
