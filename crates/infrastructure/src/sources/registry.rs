use super::provider::{default_parallelism, ProviderSource};
use crate::transport::HttpTransport;
use ferrous_doh_application::ports::Source;
use ferrous_doh_domain::config::{QueryConfig, SourceApi};
use ferrous_doh_domain::{DomainError, KnownServer};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{info, warn};

/// Turns configured source names into queryable [`Source`]s.
pub struct SourceRegistry {
    transport: Arc<dyn HttpTransport>,
}

impl SourceRegistry {
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self { transport }
    }

    /// Resolve `config.sources` (registry names or `http(s)://` URLs) plus
    /// the optional custom source.
    ///
    /// Built-in sources share one limiter of `workers` permits. The custom
    /// source gets its own.
    pub fn resolve(&self, config: &QueryConfig) -> Result<Vec<Arc<dyn Source>>, DomainError> {
        let workers = config.workers.unwrap_or_else(default_parallelism);
        if workers == 0 {
            return Err(DomainError::ConfigError(
                "workers must be greater than 0".to_string(),
            ));
        }

        let mut sources: Vec<Arc<dyn Source>> = Vec::new();

        if !config.custom_only {
            let limiter = Arc::new(Semaphore::new(workers));
            for entry in &config.sources {
                if let Some(source) = self.builtin(entry, config.api) {
                    sources.push(Arc::new(source.with_limiter(limiter.clone())));
                }
            }
        }

        match &config.custom_source_url {
            Some(url) => {
                sources.push(Arc::new(ProviderSource::new(
                    config.custom_source_name.clone(),
                    url.clone(),
                    config.api,
                    self.transport.clone(),
                )));
            }
            None if config.custom_only => {
                return Err(DomainError::ConfigError(
                    "custom_only requires a custom source URL".to_string(),
                ));
            }
            None => {}
        }

        if sources.is_empty() {
            return Err(DomainError::ConfigError(
                "No usable sources configured".to_string(),
            ));
        }

        info!(
            sources = sources.len(),
            workers = workers,
            api = config.api.as_str(),
            "Sources resolved"
        );

        Ok(sources)
    }

    fn builtin(&self, entry: &str, api: SourceApi) -> Option<ProviderSource> {
        let entry = entry.trim();

        if entry.starts_with("https://") || entry.starts_with("http://") {
            return Some(ProviderSource::new(
                entry,
                entry,
                api,
                self.transport.clone(),
            ));
        }

        let Some(server) = KnownServer::lookup(entry) else {
            warn!(source = entry, "Unknown source, skipping");
            return None;
        };

        let url = match api {
            SourceApi::Message => server.url,
            SourceApi::Json => match server.json_url {
                Some(url) => url,
                None => {
                    warn!(source = server.name, "Provider has no JSON API, skipping");
                    return None;
                }
            },
        };

        Some(ProviderSource::new(
            server.name,
            url,
            api,
            self.transport.clone(),
        ))
    }
}
