use super::RecordType;
use std::sync::Arc;

/// One domain/type pair to resolve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnsQuery {
    pub domain: Arc<str>,
    pub record_type: RecordType,
}

impl DnsQuery {
    pub fn new(domain: impl Into<Arc<str>>, record_type: RecordType) -> Self {
        Self {
            domain: domain.into(),
            record_type,
        }
    }

    pub fn fqdn(&self) -> String {
        to_fqdn(&self.domain)
    }
}

/// Appends the root label when missing. `"example.com"` and
/// `"example.com."` both become `"example.com."`.
pub fn to_fqdn(domain: &str) -> String {
    let trimmed = domain.trim();
    if trimmed.ends_with('.') {
        trimmed.to_string()
    } else {
        format!("{}.", trimmed)
    }
}
