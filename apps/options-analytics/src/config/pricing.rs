//! Pricing defaults applied to analysis requests.

use serde::{Deserialize, Serialize};

/// Pricing model configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingConfig {
    /// Risk-free rate used when a request does not give one (annualized).
    #[serde(default = "default_risk_free_rate")]
    pub risk_free_rate: f64,
    /// Days per year for day-count conversion and per-day theta.
    #[serde(default = "default_days_per_year")]
    pub days_per_year: f64,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            risk_free_rate: default_risk_free_rate(),
            days_per_year: default_days_per_year(),
        }
    }
}

const fn default_risk_free_rate() -> f64 {
    0.05
}

const fn default_days_per_year() -> f64 {
    365.0
}

pub(crate) const fn default_true() -> bool {
    true
}
