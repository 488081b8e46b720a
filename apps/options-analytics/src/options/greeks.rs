//! Greeks value type and aggregation helpers.
//!
//! `Greeks` produced by the pricer are raw analytic derivatives: vega per
//! 1.0 volatility, theta per year and rho per 1.0 rate. Use
//! [`Greeks::to_market_convention`] for per-day theta and per-point vega/rho.

use serde::{Deserialize, Serialize};

/// Greeks for an option or a strategy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Greeks {
    /// Delta - rate of change of option price with respect to underlying price.
    pub delta: f64,
    /// Gamma - rate of change of delta with respect to underlying price.
    pub gamma: f64,
    /// Theta - rate of change of option price with respect to time.
    pub theta: f64,
    /// Vega - sensitivity to volatility.
    pub vega: f64,
    /// Rho - sensitivity to the risk-free rate.
    pub rho: f64,
}

impl Greeks {
    /// Create new Greeks.
    #[must_use]
    pub const fn new(delta: f64, gamma: f64, theta: f64, vega: f64, rho: f64) -> Self {
        Self {
            delta,
            gamma,
            theta,
            vega,
            rho,
        }
    }

    /// Create zero Greeks.
    #[must_use]
    pub const fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0, 0.0)
    }

    /// Scale Greeks by a quantity (positive for long, negative for short).
    #[must_use]
    pub fn scale(&self, quantity: f64) -> Self {
        Self {
            delta: self.delta * quantity,
            gamma: self.gamma * quantity,
            theta: self.theta * quantity,
            vega: self.vega * quantity,
            rho: self.rho * quantity,
        }
    }

    /// Add another Greeks to this one.
    #[must_use]
    pub fn add(&self, other: &Self) -> Self {
        Self {
            delta: self.delta + other.delta,
            gamma: self.gamma + other.gamma,
            theta: self.theta + other.theta,
            vega: self.vega + other.vega,
            rho: self.rho + other.rho,
        }
    }

    /// Convert to trading-desk units: theta per calendar day, vega per
    /// volatility point, rho per rate point.
    #[must_use]
    pub fn to_market_convention(&self, days_per_year: f64) -> Self {
        Self {
            delta: self.delta,
            gamma: self.gamma,
            theta: self.theta / days_per_year,
            vega: self.vega / 100.0,
            rho: self.rho / 100.0,
        }
    }
}

impl std::iter::Sum for Greeks {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::zero(), |acc, g| acc.add(&g))
    }
}
