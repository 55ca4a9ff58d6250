use ferrous_doh_domain::{CliOverrides, Config};
use tracing::info;

pub fn load_config(
    config_path: Option<&str>,
    cli_overrides: CliOverrides,
) -> anyhow::Result<Config> {
    let config = Config::load(config_path, cli_overrides)?;
    config.validate()?;

    info!(
        config_file = config_path.unwrap_or("default"),
        record_type = %config.query.record_type,
        sources = config.query.sources.len(),
        upstreams = config.upstream.servers.len(),
        "Configuration loaded"
    );

    Ok(config)
}
