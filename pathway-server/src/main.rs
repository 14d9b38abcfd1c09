use std::sync::Arc;

use anyhow::Context;
use pathway_server::config::ServerConfig;
use pathway_server::source::{EquipmentClient, poll};
use pathway_server::store::SnapshotStore;
use pathway_server::web::{AppState, create_router};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ServerConfig::from_env().context("failed to load configuration")?;
    if config.app_token.is_empty() {
        warn!("ACCESSIBILITY_CLOUD_TOKEN not set. Upstream fetches will likely fail.");
    }

    let store = Arc::new(SnapshotStore::new());

    // Poll upstream in the background; routes answer 503 until the first fetch lands
    let client = EquipmentClient::new(&config).context("failed to create upstream client")?;
    tokio::spawn(poll(client, store.clone(), config.poll_interval));

    let app = create_router(AppState::new(store));

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;
    info!(addr = %config.bind_addr, "pathway feed server listening");
    info!("  GET/HEAD /feed                   - GTFS-realtime pathway closures");
    info!("  GET/HEAD /pathway_evolutions.csv - pathway closures as CSV");
    info!("  GET/HEAD /calendar_dates.csv     - calendar dates (header only)");

    axum::serve(listener, app).await?;
    Ok(())
}
