use ferrous_doh_api::{create_doh_routes, DohState};
use ferrous_doh_domain::Config;
use ferrous_doh_infrastructure::doh::{DohClient, Forwarder};
use ferrous_doh_infrastructure::transport;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;

pub async fn run(config: &Config, shutdown: &CancellationToken) -> anyhow::Result<()> {
    let ip: IpAddr = config.server.bind_address.parse().map_err(|e| {
        anyhow::anyhow!("Invalid bind address '{}': {}", config.server.bind_address, e)
    })?;
    let bind_addr = SocketAddr::new(ip, config.server.port);

    let transport = transport::from_config(&config.http)?;
    let forwarder = Forwarder::new(DohClient::new(transport), config.upstream.servers.clone());
    info!(
        bind_address = %bind_addr,
        doh_url = format!("http://{}/dns-query", bind_addr),
        upstreams = ?forwarder.upstreams(),
        "Starting DoH server"
    );

    let state = DohState::new(Arc::new(forwarder)).with_shutdown(shutdown.clone());
    let app = create_doh_routes(state);

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;

    info!("DoH server started successfully");

    let shutdown = shutdown.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await?;

    info!("Server shutdown complete");
    Ok(())
}
