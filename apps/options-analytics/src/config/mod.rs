//! Configuration module for the analytics engine.
//!
//! YAML loading, validation and environment variable interpolation. Every
//! section is optional; an empty document yields the defaults.
//!
//! # Usage
//!
//! ```rust,ignore
//! use options_analytics::config::{Config, load_config};
//!
//! // Load from default path (config.yaml)
//! let config = load_config(None)?;
//!
//! // Load from custom path
//! let config = load_config(Some("custom/config.yaml"))?;
//!
//! println!("risk-free rate: {}", config.pricing.risk_free_rate);
//! ```

mod analysis;
mod observability;
mod pricing;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::strategy::MAX_CURVE_STEPS;

pub use analysis::AnalysisConfig;
pub use observability::{LogFormat, LoggingConfig, ObservabilityConfig};
pub use pricing::PricingConfig;

pub use crate::pricing::IvSolverConfig;
pub use crate::strategy::ParallelConfig;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        /// Path to the config file.
        path: String,
        /// The underlying IO error.
        source: std::io::Error,
    },

    /// Failed to parse YAML configuration.
    #[error("Failed to parse config YAML: {0}")]
    ParseError(#[from] serde_yaml_bw::Error),

    /// Configuration validation failed.
    #[error("Config validation failed: {0}")]
    ValidationError(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Config {
    /// Pricing defaults.
    #[serde(default)]
    pub pricing: PricingConfig,
    /// Implied volatility solver settings.
    #[serde(default)]
    pub iv_solver: IvSolverConfig,
    /// Curve sampling defaults.
    #[serde(default)]
    pub analysis: AnalysisConfig,
    /// Batch evaluation settings.
    #[serde(default)]
    pub parallel: ParallelConfig,
    /// Observability configuration.
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

// ============================================
// Configuration Loading
// ============================================

/// Load configuration from a YAML file with environment variable interpolation.
///
/// # Arguments
///
/// * `path` - Optional path to the config file. Defaults to "config.yaml".
///
/// # Errors
///
/// Returns a `ConfigError` if the file cannot be read, parsed, or validated.
pub fn load_config(path: Option<&str>) -> Result<Config, ConfigError> {
    let path = path.unwrap_or("config.yaml");

    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_string(),
        source: e,
    })?;

    load_config_from_string(&contents)
}

/// Load configuration from a YAML string (useful for testing).
///
/// # Errors
///
/// Returns a `ConfigError` if the YAML cannot be parsed or validated.
pub fn load_config_from_string(yaml: &str) -> Result<Config, ConfigError> {
    let interpolated = interpolate_env_vars(yaml);
    let config: Config = if interpolated.trim().is_empty() {
        Config::default()
    } else {
        serde_yaml_bw::from_str(&interpolated)?
    };
    validate_config(&config)?;
    Ok(config)
}

/// Interpolate environment variables in a string.
///
/// Supports both `${VAR}` and `${VAR:-default}` syntax.
#[allow(clippy::expect_used)] // Constant pattern
fn interpolate_env_vars(input: &str) -> String {
    use std::sync::OnceLock;

    static ENV_VAR_REGEX: OnceLock<regex::Regex> = OnceLock::new();

    let re = ENV_VAR_REGEX.get_or_init(|| {
        regex::Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(?::-([^}]*))?\}")
            .expect("env var regex is valid")
    });

    re.replace_all(input, |cap: &regex::Captures<'_>| {
        let default_value = cap.get(2).map_or("", |m| m.as_str());
        match std::env::var(&cap[1]) {
            Ok(v) if !v.is_empty() => v,
            _ => default_value.to_string(),
        }
    })
    .into_owned()
}

/// Validate configuration values.
fn validate_config(config: &Config) -> Result<(), ConfigError> {
    let rate = config.pricing.risk_free_rate;
    if !rate.is_finite() || !(-1.0..=1.0).contains(&rate) {
        return Err(ConfigError::ValidationError(
            "pricing.risk_free_rate must be between -1.0 and 1.0".to_string(),
        ));
    }

    let days = config.pricing.days_per_year;
    if !days.is_finite() || days <= 0.0 {
        return Err(ConfigError::ValidationError(
            "pricing.days_per_year must be positive".to_string(),
        ));
    }

    config
        .iv_solver
        .validate()
        .map_err(|e| ConfigError::ValidationError(format!("iv_solver: {e}")))?;

    let width = config.analysis.range_width;
    if !width.is_finite() || width <= 0.0 {
        return Err(ConfigError::ValidationError(
            "analysis.range_width must be positive".to_string(),
        ));
    }

    let steps = config.analysis.steps;
    if !(2..=MAX_CURVE_STEPS).contains(&steps) {
        return Err(ConfigError::ValidationError(format!(
            "analysis.steps must be between 2 and {MAX_CURVE_STEPS}, got: {steps}"
        )));
    }

    let level = &config.observability.logging.level;
    if tracing_subscriber::EnvFilter::try_new(level).is_err() {
        return Err(ConfigError::ValidationError(format!(
            "observability.logging.level is not a valid filter: {level}"
        )));
    }

    Ok(())
}
