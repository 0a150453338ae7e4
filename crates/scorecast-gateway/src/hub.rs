//! Per-connection outbound queues.
//!
//! Each `WebSocket` task registers with the [`ConnectionHub`] and drains
//! its own bounded channel. The relay reaches connections only through
//! the [`Outbound`] implementation here, which never blocks: a send either
//! queues immediately or fails. A connection whose queue is full misses
//! that snapshot and catches up with the next one, since every snapshot
//! carries the full match state.

use std::sync::Arc;

use dashmap::DashMap;
use scorecast_core::{DeliveryError, Outbound};
use scorecast_types::{ConnectionId, Match, MatchId};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

use crate::protocol::ServerMessage;

/// Messages a connection may have queued before further broadcasts to it
/// are skipped.
pub const OUTBOUND_CAPACITY: usize = 256;

/// Registry of live connections and their outbound queues.
#[derive(Debug, Default)]
pub struct ConnectionHub {
    senders: DashMap<ConnectionId, mpsc::Sender<ServerMessage>>,
}

impl ConnectionHub {
    /// An empty hub.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a connection and return the receiving end of its queue.
    pub fn register(&self, connection: ConnectionId) -> mpsc::Receiver<ServerMessage> {
        let (tx, rx) = mpsc::channel(OUTBOUND_CAPACITY);
        self.senders.insert(connection, tx);
        rx
    }

    /// Forget a connection. Messages still queued are dropped with it.
    pub fn unregister(&self, connection: ConnectionId) {
        self.senders.remove(&connection);
    }

    /// Queue a message for one connection.
    pub fn send(&self, connection: ConnectionId, message: ServerMessage) -> Result<(), DeliveryError> {
        let sender = self
            .senders
            .get(&connection)
            .ok_or(DeliveryError::UnknownConnection(connection))?;
        sender.try_send(message).map_err(|e| match e {
            TrySendError::Full(_) => DeliveryError::Lagging(connection),
            TrySendError::Closed(_) => DeliveryError::ConnectionClosed(connection),
        })
    }

    /// Number of registered connections.
    pub fn len(&self) -> usize {
        self.senders.len()
    }

    /// Whether no connections are registered.
    pub fn is_empty(&self) -> bool {
        self.senders.is_empty()
    }
}

impl Outbound for ConnectionHub {
    fn deliver(
        &self,
        connection: ConnectionId,
        _match_id: &MatchId,
        snapshot: &Arc<Match>,
    ) -> Result<(), DeliveryError> {
        self.send(connection, ServerMessage::match_update(Arc::clone(snapshot)))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn empty_match() -> Arc<Match> {
        let extras = serde_json::json!({
            "wides": 0, "no_balls": 0, "byes": 0, "leg_byes": 0, "penalties": 0
        });
        let json = serde_json::json!({
            "id": "m1",
            "title": "A vs B",
            "match_type": "T20",
            "status": "live",
            "overs_limit": 20,
            "team1": {"id": "a", "name": "A", "score": 0, "wickets": 0,
                      "overs": {"completed": 0, "balls": 0}, "extras": extras.clone(),
                      "run_rate": "0", "players": [], "bowlers": []},
            "team2": {"id": "b", "name": "B", "score": 0, "wickets": 0,
                      "overs": {"completed": 0, "balls": 0}, "extras": extras.clone(),
                      "run_rate": "0", "players": [], "bowlers": []},
            "current_innings": 1,
            "target": null,
            "required_run_rate": null,
            "last_ball": null,
            "current_over": [],
            "current_over_runs": 0,
            "partnership": {"runs": 0, "balls": 0},
            "partnership_start": {"score": 0, "balls": 0},
            "revision": 3
        });
        Arc::new(serde_json::from_value(json).unwrap())
    }

    #[tokio::test]
    async fn delivers_to_registered_connection() {
        let hub = ConnectionHub::new();
        let conn = ConnectionId::new();
        let mut rx = hub.register(conn);

        hub.deliver(conn, &MatchId::new("m1"), &empty_match()).unwrap();

        let msg = rx.recv().await.unwrap();
        assert!(matches!(msg, ServerMessage::MatchUpdate { revision: 3, .. }));
    }

    #[test]
    fn unknown_connection_fails() {
        let hub = ConnectionHub::new();
        let conn = ConnectionId::new();
        let result = hub.deliver(conn, &MatchId::new("m1"), &empty_match());
        assert_eq!(result, Err(DeliveryError::UnknownConnection(conn)));
    }

    #[test]
    fn dropped_receiver_fails() {
        let hub = ConnectionHub::new();
        let conn = ConnectionId::new();
        drop(hub.register(conn));
        let result = hub.deliver(conn, &MatchId::new("m1"), &empty_match());
        assert_eq!(result, Err(DeliveryError::ConnectionClosed(conn)));
    }

    #[test]
    fn full_queue_reports_lagging_and_recovers() {
        let hub = ConnectionHub::new();
        let conn = ConnectionId::new();
        let mut rx = hub.register(conn);
        let snapshot = empty_match();
        for _ in 0..OUTBOUND_CAPACITY {
            hub.deliver(conn, &MatchId::new("m1"), &snapshot).unwrap();
        }

        let result = hub.deliver(conn, &MatchId::new("m1"), &snapshot);
        assert_eq!(result, Err(DeliveryError::Lagging(conn)));

        rx.try_recv().unwrap();
        assert!(hub.deliver(conn, &MatchId::new("m1"), &snapshot).is_ok());
    }

    #[test]
    fn unregister_removes_connection() {
        let hub = ConnectionHub::new();
        let conn = ConnectionId::new();
        let _rx = hub.register(conn);
        assert_eq!(hub.len(), 1);
        hub.unregister(conn);
        assert!(hub.is_empty());
    }
}
