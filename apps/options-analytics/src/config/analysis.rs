//! Curve sampling defaults for strategy analysis.

use serde::{Deserialize, Serialize};

use crate::strategy::{DEFAULT_CURVE_STEPS, DEFAULT_RANGE_WIDTH};

use super::pricing::default_true;

/// Strategy analysis configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Half-width of the default price range as a fraction of the entry spot.
    #[serde(default = "default_range_width")]
    pub range_width: f64,
    /// Sample points in the default price range.
    #[serde(default = "default_steps")]
    pub steps: usize,
    /// Add leg strikes to the sampled prices.
    #[serde(default = "default_true")]
    pub include_strikes: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            range_width: default_range_width(),
            steps: default_steps(),
            include_strikes: true,
        }
    }
}

const fn default_range_width() -> f64 {
    DEFAULT_RANGE_WIDTH
}

const fn default_steps() -> usize {
    DEFAULT_CURVE_STEPS
}
