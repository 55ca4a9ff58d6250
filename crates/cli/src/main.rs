use clap::Parser;
use tracing::info;

mod args;
mod bootstrap;
mod commands;
mod output;

use args::{Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = bootstrap::load_config(cli.config.as_deref(), cli.overrides())?;

    bootstrap::init_logging(&config);

    info!("Starting Ferrous DoH v{}", env!("CARGO_PKG_VERSION"));

    let shutdown = bootstrap::shutdown_token();

    match &cli.command {
        Command::Query(args) => commands::query::run(&config, &args.domains, &shutdown).await,
        Command::Serve(_) => commands::serve::run(&config, &shutdown).await,
    }
}
