//! Relay binary for Scorecast.
//!
//! Loads configuration, installs logging, opens the seed matches, and runs
//! the gateway until `Ctrl-C`.
//!
//! # Startup Sequence
//!
//! 1. Load configuration (`$SCORECAST_CONFIG`, else `scorecast.yaml`)
//! 2. Initialize structured logging (tracing)
//! 3. Build the relay and connection hub
//! 4. Open seed matches
//! 5. Serve HTTP and `WebSocket` traffic

mod error;
mod logging;
mod seed;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use scorecast_core::ScorecastConfig;
use scorecast_gateway::{AppState, ServerConfig};
use tracing::info;

use crate::error::AppError;

/// Environment variable naming an explicit config file.
const CONFIG_PATH_ENV: &str = "SCORECAST_CONFIG";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Load configuration.
    let config_path = std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from);
    let config = ScorecastConfig::load(config_path.as_deref())
        .map_err(AppError::from)
        .with_context(|| match &config_path {
            Some(path) => format!("loading {}", path.display()),
            None => "loading default configuration".to_owned(),
        })?;

    // 2. Initialize structured logging.
    logging::init(&config.logging).context("initializing logging")?;
    info!(
        host = %config.server.host,
        port = config.server.port,
        seed_matches = config.seed.matches.len(),
        "scorecast-server starting"
    );

    // 3. Build the relay.
    let state = Arc::new(AppState::new());

    // 4. Open seed matches.
    let opened = seed::seed_matches(&state.relay, config.seed.matches)
        .context("opening seed matches")?;
    info!(opened, "Seed matches ready");

    // 5. Serve.
    let server = ServerConfig {
        host: config.server.host,
        port: config.server.port,
    };
    scorecast_gateway::start_server(&server, state)
        .await
        .map_err(AppError::from)
        .context("running gateway")?;

    info!("scorecast-server stopped");
    Ok(())
}
