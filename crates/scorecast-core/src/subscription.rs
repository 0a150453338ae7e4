//! Subscription registry: which connections follow which matches.
//!
//! The relation is many-to-many and indexed both ways so that a broadcast
//! can resolve a match's subscribers and a disconnect can drop every
//! subscription of one connection without scanning all matches. No guard
//! on one index is held while the other is touched.

use std::collections::HashSet;

use dashmap::DashMap;
use scorecast_types::{ConnectionId, MatchId};

/// Concurrent two-way index of subscriptions.
#[derive(Debug, Default)]
pub struct SubscriptionRegistry {
    by_match: DashMap<MatchId, HashSet<ConnectionId>>,
    by_connection: DashMap<ConnectionId, HashSet<MatchId>>,
}

impl SubscriptionRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe a connection to a match. Returns `false` if it already was.
    pub fn subscribe(&self, connection: ConnectionId, match_id: &MatchId) -> bool {
        let added = self
            .by_match
            .entry(match_id.clone())
            .or_default()
            .insert(connection);
        self.by_connection
            .entry(connection)
            .or_default()
            .insert(match_id.clone());
        added
    }

    /// Drop one subscription. Returns `false` if there was none.
    pub fn unsubscribe(&self, connection: ConnectionId, match_id: &MatchId) -> bool {
        let removed = self
            .by_match
            .get_mut(match_id)
            .is_some_and(|mut subscribers| subscribers.remove(&connection));
        self.by_match.remove_if(match_id, |_, subscribers| subscribers.is_empty());

        if let Some(mut matches) = self.by_connection.get_mut(&connection) {
            matches.remove(match_id);
        }
        self.by_connection
            .remove_if(&connection, |_, matches| matches.is_empty());
        removed
    }

    /// Drop every subscription held by a connection, returning the matches
    /// it was following.
    pub fn unsubscribe_all(&self, connection: ConnectionId) -> Vec<MatchId> {
        let Some((_, matches)) = self.by_connection.remove(&connection) else {
            return Vec::new();
        };
        for match_id in &matches {
            if let Some(mut subscribers) = self.by_match.get_mut(match_id) {
                subscribers.remove(&connection);
            }
            self.by_match.remove_if(match_id, |_, subscribers| subscribers.is_empty());
        }
        let mut dropped: Vec<MatchId> = matches.into_iter().collect();
        dropped.sort();
        dropped
    }

    /// Connections currently subscribed to a match, in no particular order.
    pub fn subscribers_of(&self, match_id: &MatchId) -> Vec<ConnectionId> {
        self.by_match
            .get(match_id)
            .map(|subscribers| subscribers.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Matches a connection is subscribed to, ordered by id.
    pub fn subscriptions_of(&self, connection: ConnectionId) -> Vec<MatchId> {
        let mut matches: Vec<MatchId> = self
            .by_connection
            .get(&connection)
            .map(|matches| matches.iter().cloned().collect())
            .unwrap_or_default();
        matches.sort();
        matches
    }

    /// Forget every subscriber of a match, e.g. when it is removed.
    pub fn drop_match(&self, match_id: &MatchId) -> usize {
        let Some((_, subscribers)) = self.by_match.remove(match_id) else {
            return 0;
        };
        for connection in &subscribers {
            if let Some(mut matches) = self.by_connection.get_mut(connection) {
                matches.remove(match_id);
            }
            self.by_connection
                .remove_if(connection, |_, matches| matches.is_empty());
        }
        subscribers.len()
    }

    /// Number of matches with at least one subscriber.
    pub fn match_count(&self) -> usize {
        self.by_match.len()
    }

    /// Number of connections with at least one subscription.
    pub fn connection_count(&self) -> usize {
        self.by_connection.len()
    }
}
