//! Tracing setup shared by the binaries that embed the engine.
//!
//! Logs go to stderr so stdout stays free for protocol output.
//!
//! ```ignore
//! use meeting_engine::logging::{init_tracing, LogConfig, LogFormat};
//!
//! init_tracing(LogConfig::default().with_format(LogFormat::Json))?;
//! ```

use std::io;
use std::str::FromStr;

use thiserror::Error;
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Errors that can occur during tracing initialization.
#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("failed to set global tracing subscriber: {0}")]
    SetGlobalSubscriber(#[from] tracing::subscriber::SetGlobalDefaultError),

    #[error("failed to parse env filter: {0}")]
    EnvFilter(#[from] tracing_subscriber::filter::ParseError),

    #[error("unknown log format '{0}' (expected pretty, compact or json)")]
    UnknownFormat(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    #[default]
    Compact,
    Json,
}

impl FromStr for LogFormat {
    type Err = LoggingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "compact" => Ok(LogFormat::Compact),
            "json" => Ok(LogFormat::Json),
            _ => Err(LoggingError::UnknownFormat(s.to_string())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Level used when `RUST_LOG` is not set.
    pub default_level: Level,
    pub format: LogFormat,
    /// Explicit filter directive; wins over both `RUST_LOG` and `default_level`.
    pub env_filter: Option<String>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            default_level: Level::WARN,
            format: LogFormat::Compact,
            env_filter: None,
        }
    }
}

impl LogConfig {
    #[must_use]
    pub fn with_level(mut self, level: Level) -> Self {
        self.default_level = level;
        self
    }

    #[must_use]
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    #[must_use]
    pub fn with_env_filter(mut self, filter: impl Into<String>) -> Self {
        self.env_filter = Some(filter.into());
        self
    }

    fn filter(&self) -> Result<EnvFilter, LoggingError> {
        match &self.env_filter {
            Some(directive) => Ok(EnvFilter::try_new(directive)?),
            None => Ok(EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(self.default_level.as_str()))),
        }
    }
}

/// Install the global subscriber. Call once, early.
///
/// # Errors
///
/// Fails if a global subscriber is already set or the filter directive does not
/// parse.
pub fn init_tracing(config: LogConfig) -> Result<(), LoggingError> {
    let filter = config.filter()?;
    let registry = tracing_subscriber::registry().with(filter);

    match config.format {
        LogFormat::Pretty => {
            tracing::subscriber::set_global_default(
                registry.with(fmt::layer().pretty().with_writer(io::stderr)),
            )?;
        }
        LogFormat::Compact => {
            tracing::subscriber::set_global_default(
                registry.with(fmt::layer().compact().with_writer(io::stderr)),
            )?;
        }
        LogFormat::Json => {
            tracing::subscriber::set_global_default(
                registry.with(fmt::layer().json().with_writer(io::stderr)),
            )?;
        }
    }

    Ok(())
}
