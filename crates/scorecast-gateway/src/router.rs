//! Axum router construction for the gateway.
//!
//! Assembles all routes (REST + `WebSocket`) into a single [`Router`]
//! with CORS enabled for the scorer dashboard and broadcast overlays.

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;
use crate::ws;

/// Build the complete Axum router for the gateway.
///
/// The router includes:
/// - `GET /health` -- liveness check
/// - `GET /ws` -- `WebSocket` subscription and scoring channel
/// - `GET /api/matches` -- list matches
/// - `POST /api/matches` -- open a match
/// - `GET /api/matches/{id}` -- single match
/// - `DELETE /api/matches/{id}` -- close a match
/// - `POST /api/matches/{id}/updates` -- submit a score update
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handlers::health))
        // WebSocket
        .route("/ws", get(ws::ws_handler))
        // REST API
        .route(
            "/api/matches",
            get(handlers::list_matches).post(handlers::create_match),
        )
        .route(
            "/api/matches/{id}",
            get(handlers::get_match).delete(handlers::remove_match),
        )
        .route("/api/matches/{id}/updates", post(handlers::submit_update))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
