use crate::known_servers::{CLOUDFLARE, GOOGLE, QUAD9};
use serde::{Deserialize, Serialize};

/// Ordered upstream list used by the forwarding handler. Earlier entries
/// are preferred.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UpstreamConfig {
    #[serde(default = "default_upstream_servers")]
    pub servers: Vec<String>,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            servers: default_upstream_servers(),
        }
    }
}

fn default_upstream_servers() -> Vec<String> {
    [GOOGLE, CLOUDFLARE, QUAD9]
        .iter()
        .map(|server| server.url.to_string())
        .collect()
}
