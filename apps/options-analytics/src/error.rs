//! Error taxonomy for the analytics core.
//!
//! Two failure kinds exist and they are kept distinct:
//!
//! | Variant | Meaning |
//! |---------|---------|
//! | `InvalidParameter` | An input is outside its domain (negative spot, zero quantity, malformed range) |
//! | `NoSolution` | Inputs are individually valid but no implied volatility reproduces the target price |
//!
//! Degenerate pricing, curves without breakevens and open-ended extremes
//! are defined outputs, not errors.

use thiserror::Error;

/// Errors returned by pricing, implied volatility and payoff analysis.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalyticsError {
    /// An input is outside its valid domain.
    #[error("Invalid parameter `{name}`: {message}")]
    InvalidParameter {
        /// Name of the offending input.
        name: &'static str,
        /// What is wrong with it.
        message: String,
    },

    /// The implied volatility target cannot be reached within the search bounds.
    #[error("No valid IV solution: {reason}")]
    NoSolution {
        /// Reason no solution exists.
        reason: String,
    },
}

/// Result alias used throughout the crate.
pub type AnalyticsResult<T> = Result<T, AnalyticsError>;

impl AnalyticsError {
    /// Build an `InvalidParameter` error.
    pub fn invalid(name: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            message: message.into(),
        }
    }

    /// Build a `NoSolution` error.
    pub fn no_solution(reason: impl Into<String>) -> Self {
        Self::NoSolution {
            reason: reason.into(),
        }
    }

    /// Whether this is an `InvalidParameter` error.
    #[must_use]
    pub const fn is_invalid_parameter(&self) -> bool {
        matches!(self, Self::InvalidParameter { .. })
    }

    /// Whether this is a `NoSolution` error.
    #[must_use]
    pub const fn is_no_solution(&self) -> bool {
        matches!(self, Self::NoSolution { .. })
    }
}

/// Require a finite real.
pub(crate) fn ensure_finite(name: &'static str, value: f64) -> AnalyticsResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(AnalyticsError::invalid(
            name,
            format!("must be a finite number, got: {value}"),
        ))
    }
}

/// Require a finite, strictly positive real.
pub(crate) fn ensure_positive(name: &'static str, value: f64) -> AnalyticsResult<f64> {
    ensure_finite(name, value)?;
    if value > 0.0 {
        Ok(value)
    } else {
        Err(AnalyticsError::invalid(
            name,
            format!("must be positive, got: {value}"),
        ))
    }
}

/// Require a finite, non-negative real.
pub(crate) fn ensure_non_negative(name: &'static str, value: f64) -> AnalyticsResult<f64> {
    ensure_finite(name, value)?;
    if value >= 0.0 {
        Ok(value)
    } else {
        Err(AnalyticsError::invalid(
            name,
            format!("must not be negative, got: {value}"),
        ))
    }
}
