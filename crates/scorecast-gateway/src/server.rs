//! Listener for the scorecast gateway.
//!
//! [`start_server`] serves the REST routes and the `/ws` upgrade on one
//! socket. Scorer and viewer sessions end when the process is interrupted.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;

use crate::router::build_router;
use crate::state::AppState;

/// Where scorers and viewers reach the relay.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Interface address, `0.0.0.0` for every interface.
    pub host: String,
    /// Port for both HTTP and `WebSocket` traffic.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: String::from("0.0.0.0"),
            port: 8080,
        }
    }
}

/// Serve the match API and live feed for `state` until `Ctrl-C`.
///
/// Each live `WebSocket` session is closed on shutdown and its match
/// subscriptions are released.
///
/// # Errors
///
/// [`ServerError::Bind`] when `host:port` does not parse or cannot be
/// bound; [`ServerError::Serve`] when accepting connections fails.
pub async fn start_server(config: &ServerConfig, state: Arc<AppState>) -> Result<(), ServerError> {
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .map_err(|e| ServerError::Bind(format!("invalid address: {e}")))?;

    let router = build_router(state);

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| ServerError::Bind(format!("bind failed on {addr}: {e}")))?;

    info!(%addr, "Gateway listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ServerError::Serve(format!("serve error: {e}")))?;

    info!("Gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for Ctrl-C; running until killed");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

/// Why the gateway could not start or stopped early.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// The listen address was malformed or already taken.
    #[error("bind error: {0}")]
    Bind(String),

    /// Accepting connections failed after startup.
    #[error("serve error: {0}")]
    Serve(String),
}
