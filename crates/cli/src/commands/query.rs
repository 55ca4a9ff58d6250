use crate::output::JsonLinesSink;
use ferrous_doh_application::use_cases::{QueryOptions, QuerySourcesUseCase};
use ferrous_doh_domain::{Config, RecordType};
use ferrous_doh_infrastructure::sources::SourceRegistry;
use ferrous_doh_infrastructure::transport;
use std::str::FromStr;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

pub fn query_options(config: &Config) -> anyhow::Result<QueryOptions> {
    Ok(QueryOptions {
        record_type: RecordType::from_str(&config.query.record_type)?,
        timeout: config.query.timeout(),
        limit: config.query.limit(),
        verbose: config.query.verbose,
        labels: config.query.labels,
        joined: config.query.joined,
    })
}

pub async fn run(
    config: &Config,
    domains: &[String],
    shutdown: &CancellationToken,
) -> anyhow::Result<()> {
    let options = query_options(config)?;
    options.validate(domains.len())?;

    let transport = transport::from_config(&config.http)?;
    let sources = SourceRegistry::new(transport).resolve(&config.query)?;
    let use_case = QuerySourcesUseCase::new(sources);

    let mut sink = JsonLinesSink::new(std::io::stdout());
    let summary = use_case
        .execute(domains, &options, shutdown, &mut sink)
        .await?;

    if summary.timed_out {
        warn!(
            emitted = summary.emitted,
            jobs = summary.jobs,
            "Deadline reached before all sources answered"
        );
    }

    info!(
        emitted = summary.emitted,
        jobs = summary.jobs,
        limit_reached = summary.limit_reached,
        "Query finished"
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_options_follow_config() {
        let mut config = Config::default();
        config.query.record_type = "mx".to_string();
        config.query.limit = 0;
        config.query.timeout_secs = 5;
        config.query.labels = true;

        let options = query_options(&config).unwrap();

        assert_eq!(options.record_type, RecordType::MX);
        assert_eq!(options.limit, None);
        assert_eq!(options.timeout, Some(Duration::from_secs(5)));
        assert!(options.labels);
        assert!(!options.joined);
    }

    #[test]
    fn test_bad_record_type_is_rejected() {
        let mut config = Config::default();
        config.query.record_type = "NOPE".to_string();
        assert!(query_options(&config).is_err());
    }
}
