//! Broadcast dispatcher: fans a committed snapshot out to subscribers.
//!
//! Delivery goes through the [`Outbound`] seam, implemented by the
//! connection gateway. Sends are best effort. A failed target is logged and
//! skipped; it never blocks or fails the other targets, and the error never
//! reaches the update's originator.

use std::sync::Arc;

use scorecast_types::{ConnectionId, Match, MatchId};

use crate::error::DeliveryError;
use crate::subscription::SubscriptionRegistry;

/// Hands a snapshot to one connection's outbound queue.
///
/// Implementations must not block: dispatch runs while the match is locked.
pub trait Outbound: Send + Sync {
    /// Queue `snapshot` for delivery to `connection`.
    fn deliver(
        &self,
        connection: ConnectionId,
        match_id: &MatchId,
        snapshot: &Arc<Match>,
    ) -> Result<(), DeliveryError>;
}

/// Outcome of one fan-out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchReport {
    /// Targets the snapshot was queued for.
    pub delivered: usize,
    /// Targets whose delivery failed.
    pub failed: usize,
}

/// Resolves subscribers and pushes snapshots through an [`Outbound`].
pub struct BroadcastDispatcher {
    outbound: Arc<dyn Outbound>,
}

impl std::fmt::Debug for BroadcastDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BroadcastDispatcher").finish_non_exhaustive()
    }
}

impl BroadcastDispatcher {
    /// A dispatcher that delivers through `outbound`.
    pub fn new(outbound: Arc<dyn Outbound>) -> Self {
        Self { outbound }
    }

    /// Send `snapshot` to every subscriber of `match_id` except the
    /// originator.
    pub fn dispatch(
        &self,
        registry: &SubscriptionRegistry,
        match_id: &MatchId,
        snapshot: &Arc<Match>,
        originator: Option<ConnectionId>,
    ) -> DispatchReport {
        let mut report = DispatchReport::default();
        for target in registry
            .subscribers_of(match_id)
            .into_iter()
            .filter(|target| Some(*target) != originator)
        {
            match self.outbound.deliver(target, match_id, snapshot) {
                Ok(()) => report.delivered = report.delivered.saturating_add(1),
                Err(e) => {
                    report.failed = report.failed.saturating_add(1);
                    tracing::debug!(
                        match_id = %match_id,
                        connection = %target,
                        error = %e,
                        "Dropped broadcast to connection"
                    );
                }
            }
        }
        report
    }
}
