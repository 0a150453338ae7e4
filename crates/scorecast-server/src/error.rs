//! Error types for the relay binary.
//!
//! [`AppError`] wraps every failure that can stop startup. `main` adds
//! context with `anyhow` before reporting it.

/// Top-level error for the relay binary.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: scorecast_core::ConfigError,
    },

    /// The tracing subscriber could not be installed.
    #[error("logging error: {message}")]
    Logging {
        /// Description of the logging failure.
        message: String,
    },

    /// A seed match could not be opened.
    #[error("seed match {match_id}: {source}")]
    Seed {
        /// Id of the offending seed entry.
        match_id: String,
        /// The underlying relay error.
        source: scorecast_core::RelayError,
    },

    /// The gateway failed to bind or serve.
    #[error("gateway error: {source}")]
    Gateway {
        /// The underlying server error.
        #[from]
        source: scorecast_gateway::ServerError,
    },
}
