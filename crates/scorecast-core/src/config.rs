//! Configuration loading and typed config structures for the relay.
//!
//! Configuration is layered with the `config` crate, later layers winning:
//!
//! 1. Built-in defaults (the `serde` defaults below)
//! 2. A YAML or TOML file, `scorecast.yaml` by default
//! 3. `SCORECAST__*` environment variables, e.g. `SCORECAST__SERVER__PORT`

use std::path::Path;

use serde::Deserialize;

use crate::setup::MatchSetup;

/// File stem looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_STEM: &str = "scorecast";

/// Prefix of environment variable overrides.
pub const ENV_PREFIX: &str = "SCORECAST";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A source could not be read, parsed, or deserialized.
    #[error("failed to load configuration: {source}")]
    Load {
        /// The underlying loader error.
        #[from]
        source: ::config::ConfigError,
    },
}

/// Top-level relay configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ScorecastConfig {
    /// HTTP and WebSocket listener.
    #[serde(default)]
    pub server: ServerSettings,

    /// Log level and output format.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Matches opened at startup.
    #[serde(default)]
    pub seed: SeedConfig,
}

impl ScorecastConfig {
    /// Load configuration from `path`, or from `scorecast.{yaml,toml}` in
    /// the working directory if present, then apply environment overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Load`] if an explicitly named file is
    /// missing, or if any source fails to parse.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let file = match path {
            Some(path) => ::config::File::from(path).required(true),
            None => ::config::File::with_name(DEFAULT_CONFIG_STEM).required(false),
        };
        let config = ::config::Config::builder()
            .add_source(file)
            .add_source(
                ::config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;
        Ok(config.try_deserialize()?)
    }

    /// Parse configuration from a YAML string, without environment
    /// overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Load`] if the string is not valid YAML or does
    /// not match the expected shape.
    pub fn parse_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config = ::config::Config::builder()
            .add_source(::config::File::from_str(yaml, ::config::FileFormat::Yaml))
            .build()?;
        Ok(config.try_deserialize()?)
    }
}

/// Listener settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServerSettings {
    /// Interface to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

/// Logging settings. `RUST_LOG` takes precedence over `level`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive, e.g. `"info"` or `"scorecast_core=debug"`.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format.
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

/// Matches to open when the relay starts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SeedConfig {
    /// One setup per match.
    #[serde(default)]
    pub matches: Vec<MatchSetup>,
}

fn default_host() -> String {
    "0.0.0.0".to_owned()
}

const fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_owned()
}
