//! Connection gateway for the Scorecast live score relay.
//!
//! This crate provides an Axum HTTP server that exposes:
//!
//! - **`WebSocket` endpoint** (`/ws`) where viewers subscribe to matches
//!   and scorers submit updates
//! - **REST endpoints** for listing, reading, opening, and closing matches
//!
//! # Architecture
//!
//! All match state lives in the [`ScoreRelay`](scorecast_core::ScoreRelay).
//! Each `WebSocket` connection owns a bounded outbound queue in the
//! [`ConnectionHub`]; the relay pushes committed snapshots into those
//! queues through the `Outbound` seam without ever waiting on a socket.

pub mod error;
pub mod handlers;
pub mod hub;
pub mod protocol;
pub mod router;
pub mod server;
pub mod state;
pub mod ws;

// Re-export primary types for convenience.
pub use error::GatewayError;
pub use hub::ConnectionHub;
pub use protocol::{ClientMessage, ErrorKind, ServerMessage};
pub use router::build_router;
pub use server::{ServerConfig, ServerError, start_server};
pub use state::AppState;
