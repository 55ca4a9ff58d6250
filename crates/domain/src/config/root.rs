use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::str::FromStr;

use super::errors::ConfigError;
use super::http::{HttpConfig, ResolverNetwork};
use super::logging::LoggingConfig;
use super::query::{QueryConfig, SourceApi};
use super::server::ServerConfig;
use super::upstream::UpstreamConfig;
use crate::RecordType;

/// Main configuration structure for Ferrous DoH
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    /// DoH endpoint listener
    #[serde(default)]
    pub server: ServerConfig,

    /// Forwarding upstreams for the endpoint
    #[serde(default)]
    pub upstream: UpstreamConfig,

    /// Multi-source query defaults
    #[serde(default)]
    pub query: QueryConfig,

    /// Outbound HTTP client
    #[serde(default)]
    pub http: HttpConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from file or use defaults
    ///
    /// Priority order:
    /// 1. Explicitly provided path
    /// 2. ferrous-doh.toml in current directory
    /// 3. /etc/ferrous-doh/config.toml
    /// 4. Default configuration
    pub fn load(path: Option<&str>, cli_overrides: CliOverrides) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = path {
            Self::from_file(path)?
        } else if std::path::Path::new("ferrous-doh.toml").exists() {
            Self::from_file("ferrous-doh.toml")?
        } else if std::path::Path::new("/etc/ferrous-doh/config.toml").exists() {
            Self::from_file("/etc/ferrous-doh/config.toml")?
        } else {
            Self::default()
        };

        config.apply_cli_overrides(cli_overrides);
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(path.to_string(), e.to_string()))?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Apply command-line overrides to configuration
    pub fn apply_cli_overrides(&mut self, overrides: CliOverrides) {
        if let Some(bind) = overrides.bind_address {
            self.server.bind_address = bind;
        }
        if let Some(port) = overrides.port {
            self.server.port = port;
        }
        if let Some(servers) = overrides.upstream_servers {
            if !servers.is_empty() {
                self.upstream.servers = servers;
            }
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }

        if let Some(record_type) = overrides.record_type {
            self.query.record_type = record_type;
        }
        if let Some(sources) = overrides.sources {
            if !sources.is_empty() {
                self.query.sources = sources;
            }
        }
        if let Some(api) = overrides.api {
            self.query.api = api;
        }
        if let Some(timeout) = overrides.timeout_secs {
            self.query.timeout_secs = timeout;
        }
        if overrides.no_timeout {
            self.query.timeout_secs = 0;
        }
        if let Some(limit) = overrides.limit {
            self.query.limit = limit;
        }
        if overrides.no_limit {
            self.query.limit = 0;
        }
        if let Some(workers) = overrides.workers {
            self.query.workers = Some(workers);
        }
        if overrides.verbose {
            self.query.verbose = true;
        }
        if overrides.labels {
            self.query.labels = true;
        }
        if overrides.joined {
            self.query.joined = true;
        }
        if let Some(name) = overrides.custom_source_name {
            self.query.custom_source_name = name;
        }
        if let Some(url) = overrides.custom_source_url {
            self.query.custom_source_url = Some(url);
        }
        if overrides.custom_only {
            self.query.custom_only = true;
        }

        if let Some(retry_max) = overrides.retry_max {
            self.http.retry_max = retry_max;
        }
        if overrides.insecure_skip_verify {
            self.http.insecure_skip_verify = true;
        }
        if let Some(addr) = overrides.resolver_addr {
            self.http.resolver_addr = Some(addr);
        }
        if let Some(network) = overrides.resolver_network {
            self.http.resolver_network = network;
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation("Server port cannot be 0".to_string()));
        }

        RecordType::from_str(&self.query.record_type)
            .map_err(|e| ConfigError::Validation(e.to_string()))?;

        if self.query.workers == Some(0) {
            return Err(ConfigError::Validation(
                "Worker count must be at least 1".to_string(),
            ));
        }

        if self.query.custom_only && self.query.custom_source_url.is_none() {
            return Err(ConfigError::Validation(
                "custom_only requires custom_source_url".to_string(),
            ));
        }

        if self.query.sources.is_empty() && self.query.custom_source_url.is_none() {
            return Err(ConfigError::Validation("No query sources configured".to_string()));
        }

        if let Some(addr) = &self.http.resolver_addr {
            SocketAddr::from_str(addr).map_err(|e| {
                ConfigError::Validation(format!("Invalid resolver address '{}': {}", addr, e))
            })?;
        }

        Ok(())
    }
}

/// Command-line overrides for configuration
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub bind_address: Option<String>,
    pub port: Option<u16>,
    pub upstream_servers: Option<Vec<String>>,
    pub log_level: Option<String>,

    pub record_type: Option<String>,
    pub sources: Option<Vec<String>>,
    pub api: Option<SourceApi>,
    pub timeout_secs: Option<u64>,
    pub no_timeout: bool,
    pub limit: Option<usize>,
    pub no_limit: bool,
    pub workers: Option<usize>,
    pub verbose: bool,
    pub labels: bool,
    pub joined: bool,
    pub custom_source_name: Option<String>,
    pub custom_source_url: Option<String>,
    pub custom_only: bool,

    pub retry_max: Option<u32>,
    pub insecure_skip_verify: bool,
    pub resolver_addr: Option<String>,
    pub resolver_network: Option<ResolverNetwork>,
}
