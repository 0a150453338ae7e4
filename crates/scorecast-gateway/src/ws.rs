//! `WebSocket` connection gateway.
//!
//! Clients connect to `GET /ws`, subscribe to matches, and optionally
//! submit score updates. Each connection gets a [`ConnectionId`] and an
//! outbound queue in the [`ConnectionHub`](crate::hub::ConnectionHub); the
//! socket task forwards queued broadcasts and answers client frames until
//! either side closes. On exit every subscription of the connection is
//! dropped.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::IntoResponse;
use scorecast_types::{ConnectionId, RawUpdate};
use tracing::{debug, warn};

use crate::protocol::{ClientMessage, ServerMessage};
use crate::state::AppState;

/// Upgrade an HTTP request to a `WebSocket` connection.
///
/// # Route
///
/// `GET /ws`
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

/// Handle the `WebSocket` lifecycle: forward broadcasts queued for this
/// connection and answer each client frame.
async fn handle_socket(mut socket: WebSocket, state: Arc<AppState>) {
    let connection = ConnectionId::new();
    let mut outbound = state.hub.register(connection);
    debug!(%connection, "WebSocket client connected");

    loop {
        tokio::select! {
            // A broadcast queued by the relay.
            queued = outbound.recv() => {
                let Some(message) = queued else {
                    debug!(%connection, "Outbound queue closed");
                    break;
                };
                if !send_message(&mut socket, &message).await {
                    debug!(%connection, "WebSocket client disconnected (send failed)");
                    break;
                }
            }
            // A frame from the client.
            incoming = socket.recv() => {
                match incoming {
                    Some(Ok(Message::Text(text))) => {
                        let reply = handle_client_frame(&state, connection, text.as_str());
                        if !send_message(&mut socket, &reply).await {
                            debug!(%connection, "WebSocket client disconnected (reply failed)");
                            break;
                        }
                    }
                    Some(Ok(Message::Ping(data))) => {
                        if socket.send(Message::Pong(data)).await.is_err() {
                            debug!(%connection, "WebSocket client disconnected (pong failed)");
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        debug!(%connection, "WebSocket client disconnected");
                        break;
                    }
                    Some(Err(e)) => {
                        debug!(%connection, "WebSocket error: {e}");
                        break;
                    }
                    Some(Ok(_)) => {
                        // Binary and pong frames carry nothing for us.
                    }
                }
            }
        }
    }

    state.hub.unregister(connection);
    state.relay.handle_disconnect(connection);
}

/// Serialize and send one server message. Returns `false` once the socket
/// is unusable.
async fn send_message(socket: &mut WebSocket, message: &ServerMessage) -> bool {
    let json = match serde_json::to_string(message) {
        Ok(j) => j,
        Err(e) => {
            warn!("Failed to serialize server message: {e}");
            return true;
        }
    };
    socket.send(Message::Text(json.into())).await.is_ok()
}

/// Parse one client text frame, run it against the relay, and build the
/// reply for the sender.
pub fn handle_client_frame(state: &AppState, connection: ConnectionId, text: &str) -> ServerMessage {
    let message: ClientMessage = match serde_json::from_str(text) {
        Ok(m) => m,
        Err(e) => {
            debug!(%connection, error = %e, "Unparseable client frame");
            return ServerMessage::invalid_message(format!("invalid message: {e}"));
        }
    };

    let match_id = message.match_id().clone();
    let result = match message {
        ClientMessage::Subscribe { match_id } => {
            state
                .relay
                .subscribe(connection, &match_id)
                .map(|snapshot| ServerMessage::Snapshot {
                    match_id,
                    revision: snapshot.revision,
                    snapshot,
                })
        }
        ClientMessage::Unsubscribe { match_id } => {
            state.relay.unsubscribe(connection, &match_id);
            Ok(ServerMessage::Unsubscribed { match_id })
        }
        ClientMessage::ScoreUpdate { match_id, update } => {
            submit(state, connection, match_id, &update)
        }
        ClientMessage::StrikerChange {
            match_id,
            player_id,
        } => {
            let update = RawUpdate {
                striker_id: Some(player_id),
                ..RawUpdate::default()
            };
            submit(state, connection, match_id, &update)
        }
        ClientMessage::BowlerChange {
            match_id,
            bowler_id,
        } => {
            let update = RawUpdate {
                bowler_id: Some(bowler_id),
                ..RawUpdate::default()
            };
            submit(state, connection, match_id, &update)
        }
        ClientMessage::StatusChange { match_id, status } => {
            let update = RawUpdate {
                status: Some(status),
                ..RawUpdate::default()
            };
            submit(state, connection, match_id, &update)
        }
    };

    result.unwrap_or_else(|e| ServerMessage::from_relay_error(Some(match_id), &e))
}

fn submit(
    state: &AppState,
    connection: ConnectionId,
    match_id: scorecast_types::MatchId,
    update: &RawUpdate,
) -> Result<ServerMessage, scorecast_core::RelayError> {
    state
        .relay
        .handle_incoming_update(connection, &match_id, update)
        .map(|snapshot| ServerMessage::Ack {
            match_id,
            revision: snapshot.revision,
            snapshot,
        })
}
