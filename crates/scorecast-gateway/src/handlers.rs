//! REST API endpoint handlers for the gateway.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/health` | Liveness plus match and connection counts |
//! | `GET` | `/api/matches` | List matches, filtered by `status`, paged by `limit`/`offset` |
//! | `GET` | `/api/matches/{id}` | Full snapshot of one match |
//! | `POST` | `/api/matches` | Open a match from a setup |
//! | `DELETE` | `/api/matches/{id}` | Close a match |
//! | `POST` | `/api/matches/{id}/updates` | Submit a score update |

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use scorecast_core::{MatchQuery, MatchSetup};
use scorecast_types::{ConnectionId, MatchId, RawUpdate};

use crate::error::GatewayError;
use crate::state::AppState;

/// Liveness check.
pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "matches": state.relay.match_count(),
        "connections": state.hub.len(),
    }))
}

/// List match summaries, ordered by id.
///
/// `limit` defaults to 10 (1..=100) and `offset` to 0. `total` counts every
/// match passing the `status` filter; `count` is the size of this page.
pub async fn list_matches(
    State(state): State<Arc<AppState>>,
    Query(query): Query<MatchQuery>,
) -> Result<impl IntoResponse, GatewayError> {
    let page = state.relay.query_matches(&query)?;
    Ok(Json(serde_json::json!({
        "count": page.matches.len(),
        "total": page.total,
        "matches": page.matches,
    })))
}

/// Return the latest snapshot of one match.
pub async fn get_match(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, GatewayError> {
    let snapshot = state.relay.get_match(&MatchId::new(id))?;
    Ok(Json(snapshot))
}

/// Open a new match.
pub async fn create_match(
    State(state): State<Arc<AppState>>,
    Json(setup): Json<MatchSetup>,
) -> Result<impl IntoResponse, GatewayError> {
    let snapshot = state.relay.create_match(setup)?;
    Ok((StatusCode::CREATED, Json(snapshot)))
}

/// Close a match. Its subscribers stop receiving updates.
pub async fn remove_match(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, GatewayError> {
    let last = state.relay.remove_match(&MatchId::new(id))?;
    Ok(Json(serde_json::json!({
        "removed": last.id,
        "revision": last.revision,
    })))
}

/// Submit a score update over HTTP.
///
/// The caller is not a `WebSocket` connection, so every subscriber of the
/// match receives the broadcast.
pub async fn submit_update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(update): Json<RawUpdate>,
) -> Result<impl IntoResponse, GatewayError> {
    let snapshot = state
        .relay
        .handle_incoming_update(ConnectionId::new(), &MatchId::new(id), &update)?;
    Ok(Json(snapshot))
}
