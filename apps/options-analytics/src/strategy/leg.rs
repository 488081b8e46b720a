//! Strategy leg type and per-leg cash flows.

use serde::{Deserialize, Serialize};

use crate::error::{AnalyticsError, AnalyticsResult, ensure_non_negative, ensure_positive};
use crate::options::{OptionType, Side};

/// A single leg of an options strategy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrategyLeg {
    /// Call or put.
    pub option_type: OptionType,
    /// Long (bought) or short (written).
    pub side: Side,
    /// Strike price.
    pub strike: f64,
    /// Premium per contract, paid when long and received when short.
    pub premium: f64,
    /// Number of contracts.
    pub quantity: u32,
}

impl StrategyLeg {
    /// Create a validated strategy leg.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if the strike is not positive, the premium
    /// is negative or the quantity is zero.
    pub fn new(
        option_type: OptionType,
        side: Side,
        strike: f64,
        premium: f64,
        quantity: u32,
    ) -> AnalyticsResult<Self> {
        let leg = Self {
            option_type,
            side,
            strike,
            premium,
            quantity,
        };
        leg.validate()?;
        Ok(leg)
    }

    /// Check the leg invariants.
    pub fn validate(&self) -> AnalyticsResult<()> {
        ensure_positive("strike", self.strike)?;
        ensure_non_negative("premium", self.premium)?;
        if self.quantity == 0 {
            return Err(AnalyticsError::invalid("quantity", "must be at least 1"));
        }
        Ok(())
    }

    /// Quantity signed by side (positive long, negative short).
    #[must_use]
    pub fn signed_quantity(&self) -> f64 {
        self.side.sign() * f64::from(self.quantity)
    }

    /// Up-front cash flow (positive = credit, negative = debit).
    #[must_use]
    pub fn net_premium(&self) -> f64 {
        -self.premium * self.signed_quantity()
    }

    /// Profit or loss at expiry for the given underlying price, net of premium.
    #[must_use]
    pub fn payoff_at(&self, underlying: f64) -> f64 {
        let intrinsic = self.option_type.intrinsic(underlying, self.strike);
        (intrinsic - self.premium) * self.signed_quantity()
    }
}
