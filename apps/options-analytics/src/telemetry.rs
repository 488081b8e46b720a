//! Logging setup.
//!
//! Installs a `tracing-subscriber` fmt layer behind an `EnvFilter`.
//! `RUST_LOG` takes precedence over the configured level.
//!
//! # Usage
//!
//! ```rust,ignore
//! use options_analytics::config::LoggingConfig;
//! use options_analytics::telemetry::init_logging;
//!
//! init_logging(&LoggingConfig::default())?;
//! ```

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::{LogFormat, LoggingConfig};

/// Error type for logging initialization.
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    /// The configured level is not a valid filter directive.
    #[error("invalid log filter '{directive}': {message}")]
    InvalidFilter {
        /// Offending directive.
        directive: String,
        /// Parser message.
        message: String,
    },
    /// A global subscriber was already installed.
    #[error("failed to initialize tracing subscriber: {0}")]
    SubscriberError(String),
}

/// Build the filter: `RUST_LOG` if set, otherwise the configured level.
///
/// # Errors
///
/// Returns `InvalidFilter` if the configured level does not parse.
pub fn env_filter(config: &LoggingConfig) -> Result<EnvFilter, TelemetryError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(&config.level).map_err(|e| TelemetryError::InvalidFilter {
        directive: config.level.clone(),
        message: e.to_string(),
    })
}

/// Install the global subscriber. Logs go to stderr so stdout stays
/// reserved for results.
///
/// # Errors
///
/// Returns an error if the filter is invalid or a subscriber is already set.
pub fn init_logging(config: &LoggingConfig) -> Result<(), TelemetryError> {
    let filter = env_filter(config)?;
    let registry = tracing_subscriber::registry().with(filter);

    let result = match config.format {
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .try_init(),
        LogFormat::Pretty => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .pretty()
                    .with_writer(std::io::stderr),
            )
            .try_init(),
    };

    result.map_err(|e| TelemetryError::SubscriberError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_level_rejected() {
        // Only meaningful when RUST_LOG is not overriding the level
        if std::env::var("RUST_LOG").is_ok() {
            return;
        }
        let config = LoggingConfig {
            level: "options_analytics=verbose".to_string(),
            format: LogFormat::Json,
        };
        assert!(matches!(
            env_filter(&config),
            Err(TelemetryError::InvalidFilter { .. })
        ));
    }

    #[test]
    fn test_default_level_parses() {
        assert!(env_filter(&LoggingConfig::default()).is_ok());
    }
}
