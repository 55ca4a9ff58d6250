use crate::known_servers::DEFAULT_SOURCES;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Which body format a source speaks.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SourceApi {
    /// RFC 8484 `application/dns-message`.
    #[default]
    Message,

    /// Legacy `application/dns-json` (`?name=&type=`).
    Json,
}

impl SourceApi {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceApi::Message => "message",
            SourceApi::Json => "json",
        }
    }
}

impl std::str::FromStr for SourceApi {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "message" | "wire" => Ok(SourceApi::Message),
            "json" => Ok(SourceApi::Json),
            _ => Err(format!("Unknown source API: {}", s)),
        }
    }
}

/// Multi-source query defaults.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct QueryConfig {
    #[serde(default = "default_record_type")]
    pub record_type: String,

    /// Provider names from the registry, or full URLs.
    #[serde(default = "default_sources")]
    pub sources: Vec<String>,

    #[serde(default)]
    pub api: SourceApi,

    /// Overall deadline in seconds, 0 disables it.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Results to collect before stopping, 0 disables the limit.
    #[serde(default = "default_limit")]
    pub limit: usize,

    /// Concurrent in-flight queries across built-in sources. Unset means
    /// the host's available parallelism.
    #[serde(default)]
    pub workers: Option<usize>,

    #[serde(default)]
    pub verbose: bool,

    #[serde(default)]
    pub labels: bool,

    #[serde(default)]
    pub joined: bool,

    #[serde(default = "default_custom_source_name")]
    pub custom_source_name: String,

    #[serde(default)]
    pub custom_source_url: Option<String>,

    #[serde(default)]
    pub custom_only: bool,
}

impl QueryConfig {
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }

    pub fn limit(&self) -> Option<usize> {
        (self.limit > 0).then_some(self.limit)
    }
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            record_type: default_record_type(),
            sources: default_sources(),
            api: SourceApi::default(),
            timeout_secs: default_timeout_secs(),
            limit: default_limit(),
            workers: None,
            verbose: false,
            labels: false,
            joined: false,
            custom_source_name: default_custom_source_name(),
            custom_source_url: None,
            custom_only: false,
        }
    }
}

fn default_record_type() -> String {
    "A".to_string()
}

fn default_sources() -> Vec<String> {
    DEFAULT_SOURCES.iter().map(|s| s.to_string()).collect()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_limit() -> usize {
    1
}

fn default_custom_source_name() -> String {
    "custom".to_string()
}
