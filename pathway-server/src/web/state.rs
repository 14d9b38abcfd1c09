//! Application state for the web layer.

use std::sync::Arc;

use crate::store::SnapshotStore;

/// Shared application state.
///
/// Handlers only read from the store; the poller is its sole writer.
#[derive(Clone)]
pub struct AppState {
    /// Artifacts of the live snapshot
    pub store: Arc<SnapshotStore>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(store: Arc<SnapshotStore>) -> Self {
        Self { store }
    }
}
