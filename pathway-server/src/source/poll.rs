//! Upstream polling loop.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

use crate::store::SnapshotStore;

use super::client::EquipmentClient;
use super::error::SourceError;

/// Fetch once and publish the result.
///
/// Returns the number of facilities published.
pub async fn poll_once(
    client: &EquipmentClient,
    store: &SnapshotStore,
) -> Result<usize, SourceError> {
    let snapshot = client.fetch().await?;
    let published = store.publish(&snapshot)?;
    Ok(published.facility_count)
}

/// Poll forever. The first fetch happens immediately.
///
/// Failures are logged and retried on the next tick; the last published
/// snapshot keeps being served meanwhile.
pub async fn poll(client: EquipmentClient, store: Arc<SnapshotStore>, interval: Duration) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    info!(interval_secs = interval.as_secs(), "polling upstream");
    loop {
        ticker.tick().await;
        if let Err(e) = poll_once(&client, &store).await {
            warn!(error = %e, "failed to refresh facility status");
        }
    }
}
