//! Market inputs shared by every leg of a strategy.

use serde::{Deserialize, Serialize};

use crate::error::{AnalyticsResult, ensure_finite, ensure_non_negative, ensure_positive};
use crate::pricing::BlackScholesParams;

use super::leg::StrategyLeg;

/// Market state used to value legs before expiry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarketParams {
    /// Current underlying price.
    pub spot: f64,
    /// Time to expiry in years.
    pub time_to_expiry: f64,
    /// Continuously compounded risk-free rate.
    pub risk_free_rate: f64,
    /// Annualized volatility applied to every leg.
    pub volatility: f64,
}

impl MarketParams {
    /// Create market inputs.
    #[must_use]
    pub const fn new(spot: f64, time_to_expiry: f64, risk_free_rate: f64, volatility: f64) -> Self {
        Self {
            spot,
            time_to_expiry,
            risk_free_rate,
            volatility,
        }
    }

    /// Validate every input against its domain.
    pub fn validate(&self) -> AnalyticsResult<()> {
        ensure_positive("spot", self.spot)?;
        ensure_non_negative("time_to_expiry", self.time_to_expiry)?;
        ensure_finite("risk_free_rate", self.risk_free_rate)?;
        ensure_non_negative("volatility", self.volatility)?;
        Ok(())
    }

    /// Black-Scholes inputs for one leg at the current spot.
    #[must_use]
    pub const fn params_for(&self, leg: &StrategyLeg) -> BlackScholesParams {
        BlackScholesParams::new(
            self.spot,
            leg.strike,
            self.time_to_expiry,
            self.risk_free_rate,
            self.volatility,
            leg.option_type,
        )
    }
}
