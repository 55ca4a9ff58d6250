use serde::{Deserialize, Serialize};

/// Network used to reach a custom resolver.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ResolverNetwork {
    #[default]
    Udp,
    Tcp,
}

impl std::str::FromStr for ResolverNetwork {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "udp" => Ok(ResolverNetwork::Udp),
            "tcp" => Ok(ResolverNetwork::Tcp),
            _ => Err(format!("Unknown resolver network: {}", s)),
        }
    }
}

/// Options for the outbound HTTP client shared by every DoH exchange.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HttpConfig {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    #[serde(default = "default_keepalive_secs")]
    pub keepalive_secs: u64,

    #[serde(default = "default_pool_idle_timeout_secs")]
    pub pool_idle_timeout_secs: u64,

    /// When false the client only connects over IPv4.
    #[serde(default = "default_true")]
    pub dual_stack: bool,

    #[serde(default)]
    pub proxy: Option<String>,

    #[serde(default)]
    pub insecure_skip_verify: bool,

    /// Extra attempts on connection errors, 429 and 5xx. 0 disables retries.
    #[serde(default = "default_retry_max")]
    pub retry_max: u32,

    /// Resolver used for DoH server host names, e.g. `8.8.8.8:53`.
    #[serde(default)]
    pub resolver_addr: Option<String>,

    #[serde(default)]
    pub resolver_network: ResolverNetwork,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            keepalive_secs: default_keepalive_secs(),
            pool_idle_timeout_secs: default_pool_idle_timeout_secs(),
            dual_stack: true,
            proxy: None,
            insecure_skip_verify: false,
            retry_max: default_retry_max(),
            resolver_addr: None,
            resolver_network: ResolverNetwork::default(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    30
}

fn default_keepalive_secs() -> u64 {
    30
}

fn default_pool_idle_timeout_secs() -> u64 {
    90
}

fn default_retry_max() -> u32 {
    10
}

fn default_true() -> bool {
    true
}
