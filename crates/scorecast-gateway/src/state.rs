//! Shared application state for the gateway.
//!
//! [`AppState`] holds the relay and the connection hub. The hub is also
//! the relay's [`Outbound`](scorecast_core::Outbound), so commits reach
//! `WebSocket` clients without any further wiring.

use std::sync::Arc;

use scorecast_core::ScoreRelay;

use crate::hub::ConnectionHub;

/// Shared state for the Axum application.
///
/// Wrapped in [`Arc`] and injected via Axum's `State` extractor.
#[derive(Debug)]
pub struct AppState {
    /// Match state, subscriptions, and fan-out.
    pub relay: ScoreRelay,
    /// Outbound queues of live `WebSocket` connections.
    pub hub: Arc<ConnectionHub>,
}

impl AppState {
    /// Create a new application state with no matches and no connections.
    pub fn new() -> Self {
        let hub = Arc::new(ConnectionHub::new());
        Self {
            relay: ScoreRelay::new(Arc::clone(&hub) as Arc<dyn scorecast_core::Outbound>),
            hub,
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
