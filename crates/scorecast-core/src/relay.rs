//! The relay: the operations the connection gateway calls into.
//!
//! [`ScoreRelay`] ties the pipeline together. An incoming update is
//! validated against the current snapshot, applied, committed, and fanned
//! out to subscribers, all inside the match's critical section so that
//! subscribers of one match receive snapshots in commit order.

use std::sync::Arc;

use scorecast_types::{ConnectionId, Match, MatchId, MatchStatus, MatchSummary, RawUpdate};
use validator::Validate;

use crate::apply::apply;
use crate::dispatch::{BroadcastDispatcher, DispatchReport, Outbound};
use crate::error::RelayError;
use crate::query::{MatchPage, MatchQuery};
use crate::setup::MatchSetup;
use crate::store::MatchStore;
use crate::subscription::SubscriptionRegistry;
use crate::validation::validate;

/// Match state, subscriptions, and fan-out behind one handle.
#[derive(Debug)]
pub struct ScoreRelay {
    store: MatchStore,
    registry: SubscriptionRegistry,
    dispatcher: BroadcastDispatcher,
}

impl ScoreRelay {
    /// An empty relay delivering broadcasts through `outbound`.
    pub fn new(outbound: Arc<dyn Outbound>) -> Self {
        Self {
            store: MatchStore::new(),
            registry: SubscriptionRegistry::new(),
            dispatcher: BroadcastDispatcher::new(outbound),
        }
    }

    /// The underlying match store.
    pub const fn store(&self) -> &MatchStore {
        &self.store
    }

    /// The underlying subscription registry.
    pub const fn registry(&self) -> &SubscriptionRegistry {
        &self.registry
    }

    /// Validate, apply, commit, and broadcast one score update.
    ///
    /// The originating connection is excluded from the broadcast; it gets
    /// the new snapshot as the return value instead. A rejected update
    /// leaves the match untouched and is broadcast to nobody.
    pub fn handle_incoming_update(
        &self,
        origin: ConnectionId,
        match_id: &MatchId,
        raw: &RawUpdate,
    ) -> Result<Arc<Match>, RelayError> {
        let mut report = DispatchReport::default();
        let result = self.store.commit_and_publish(
            match_id,
            |current| {
                let update = validate(current, raw)?;
                Ok::<_, RelayError>(apply(current, &update))
            },
            |next| {
                report = self
                    .dispatcher
                    .dispatch(&self.registry, match_id, next, Some(origin));
            },
        );

        match &result {
            Ok(next) => tracing::info!(
                match_id = %match_id,
                connection = %origin,
                revision = next.revision,
                delivered = report.delivered,
                failed = report.failed,
                "Committed score update"
            ),
            Err(RelayError::Rejected(e)) => tracing::info!(
                match_id = %match_id,
                connection = %origin,
                reason = %e.reason,
                detail = %e.detail,
                "Rejected score update"
            ),
            Err(e) => tracing::warn!(
                match_id = %match_id,
                connection = %origin,
                error = %e,
                "Score update failed"
            ),
        }
        result
    }

    /// Move a match to a new status, as a scorer would when play ends.
    ///
    /// Goes through the same validation and broadcast path as any other
    /// update.
    pub fn set_status(
        &self,
        origin: ConnectionId,
        match_id: &MatchId,
        status: MatchStatus,
    ) -> Result<Arc<Match>, RelayError> {
        let raw = RawUpdate {
            status: Some(status),
            ..RawUpdate::default()
        };
        self.handle_incoming_update(origin, match_id, &raw)
    }

    /// Forget a closed connection. Returns the matches it was following.
    pub fn handle_disconnect(&self, connection: ConnectionId) -> Vec<MatchId> {
        let dropped = self.registry.unsubscribe_all(connection);
        tracing::debug!(
            connection = %connection,
            subscriptions = dropped.len(),
            "Connection disconnected"
        );
        dropped
    }

    /// Subscribe a connection to a live match, returning its current
    /// snapshot.
    ///
    /// The subscription is registered before the snapshot is read, so no
    /// commit can fall between the two unseen. The connection may receive
    /// a broadcast at or after the returned revision before it handles the
    /// snapshot itself.
    pub fn subscribe(
        &self,
        connection: ConnectionId,
        match_id: &MatchId,
    ) -> Result<Arc<Match>, RelayError> {
        let added = self.registry.subscribe(connection, match_id);
        match self.store.get(match_id) {
            Ok(snapshot) => {
                tracing::debug!(match_id = %match_id, connection = %connection, "Subscribed");
                Ok(snapshot)
            }
            Err(e) => {
                if added {
                    self.registry.unsubscribe(connection, match_id);
                }
                Err(e.into())
            }
        }
    }

    /// Drop one subscription. Returns `false` if there was none.
    pub fn unsubscribe(&self, connection: ConnectionId, match_id: &MatchId) -> bool {
        self.registry.unsubscribe(connection, match_id)
    }

    /// Summaries of every live match, ordered by id.
    pub fn list_matches(&self) -> Vec<MatchSummary> {
        self.store.list().iter().map(|m| m.summary()).collect()
    }

    /// One page of match summaries, filtered by status.
    pub fn query_matches(&self, query: &MatchQuery) -> Result<MatchPage, RelayError> {
        query.validate()?;
        let summaries = self.store.list().iter().map(|m| m.summary()).collect::<Vec<_>>();
        Ok(MatchPage::build(query, summaries))
    }

    /// The latest snapshot of one match.
    pub fn get_match(&self, match_id: &MatchId) -> Result<Arc<Match>, RelayError> {
        Ok(self.store.get(match_id)?)
    }

    /// Open a new match for scoring.
    pub fn create_match(&self, setup: MatchSetup) -> Result<Arc<Match>, RelayError> {
        let snapshot = self.store.insert(setup.into_match()?)?;
        tracing::info!(
            match_id = %snapshot.id,
            title = %snapshot.title,
            match_type = ?snapshot.match_type,
            "Created match"
        );
        Ok(snapshot)
    }

    /// Close a match and drop its subscribers.
    pub fn remove_match(&self, match_id: &MatchId) -> Result<Arc<Match>, RelayError> {
        let last = self.store.remove(match_id)?;
        let dropped = self.registry.drop_match(match_id);
        tracing::info!(
            match_id = %match_id,
            revision = last.revision,
            subscribers = dropped,
            "Removed match"
        );
        Ok(last)
    }

    /// Number of live matches.
    pub fn match_count(&self) -> usize {
        self.store.len()
    }
}
