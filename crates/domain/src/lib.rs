//! Ferrous DoH Domain Layer
pub mod config;
pub mod dns_query;
pub mod dns_record;
pub mod errors;
pub mod known_servers;
pub mod response;

pub use config::{CliOverrides, Config, ConfigError, SourceApi};
pub use dns_query::{to_fqdn, DnsQuery};
pub use dns_record::RecordType;
pub use errors::DomainError;
pub use known_servers::KnownServer;
pub use response::{LabeledResult, NormalizedAnswer, NormalizedQuestion, NormalizedResponse, OutputItem};
