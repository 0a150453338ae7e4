//! Tracing subscriber setup.

use scorecast_core::config::{LogFormat, LoggingConfig};
use tracing_subscriber::EnvFilter;

use crate::error::AppError;

/// Install the global subscriber. `RUST_LOG` wins over the configured
/// level when set.
pub fn init(config: &LoggingConfig) -> Result<(), AppError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.level).map_err(|e| AppError::Logging {
            message: format!("invalid log level {:?}: {e}", config.level),
        })?,
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);
    let installed = match config.format {
        LogFormat::Pretty => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    installed.map_err(|e| AppError::Logging {
        message: e.to_string(),
    })
}
