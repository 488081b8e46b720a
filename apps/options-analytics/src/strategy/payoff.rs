//! Payoff engine.
//!
//! Expiry profit/loss of single legs and of whole strategies, and P&L
//! curves sampled over a price range. Strategy payoff is a plain sum of leg
//! payoffs, so leg order never changes a result.

use serde::{Deserialize, Serialize};

use crate::error::{AnalyticsError, AnalyticsResult, ensure_finite, ensure_non_negative, ensure_positive};
use crate::options::OptionType;
use crate::pricing::price_unchecked;

use super::leg::StrategyLeg;
use super::market::MarketParams;

/// Half-width of the default range as a fraction of the entry spot.
pub const DEFAULT_RANGE_WIDTH: f64 = 0.5;

/// Number of sample points in the default range.
pub const DEFAULT_CURVE_STEPS: usize = 101;

/// Upper limit on the number of sample points in any range.
pub const MAX_CURVE_STEPS: usize = 100_000;

/// Underlying prices a curve is evaluated at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PriceRange {
    /// `steps` evenly spaced prices from `min` to `max` inclusive.
    Linear {
        /// Lowest price.
        min: f64,
        /// Highest price.
        max: f64,
        /// Number of sample points (2 to `MAX_CURVE_STEPS`).
        steps: usize,
    },
    /// Caller-chosen prices, strictly ascending.
    Explicit {
        /// Sample prices.
        prices: Vec<f64>,
    },
}

impl PriceRange {
    /// Evenly spaced range.
    #[must_use]
    pub const fn linear(min: f64, max: f64, steps: usize) -> Self {
        Self::Linear { min, max, steps }
    }

    /// Range of `entry * (1 ± width)`, floored at zero.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if `entry` or `width` is not positive.
    pub fn centered(entry: f64, width: f64, steps: usize) -> AnalyticsResult<Self> {
        ensure_positive("underlying_at_entry", entry)?;
        ensure_positive("range_width", width)?;
        Ok(Self::linear(
            (entry * (1.0 - width)).max(0.0),
            entry * (1.0 + width),
            steps,
        ))
    }

    /// Materialize and validate the sample prices.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` for fewer than 2 or more than
    /// `MAX_CURVE_STEPS` points, negative or non-finite prices, or prices
    /// that are not strictly ascending.
    pub fn points(&self) -> AnalyticsResult<Vec<f64>> {
        match self {
            Self::Linear { min, max, steps } => {
                let (min, max, steps) = (*min, *max, *steps);
                ensure_non_negative("price_range.min", min)?;
                ensure_finite("price_range.max", max)?;
                if max <= min {
                    return Err(AnalyticsError::invalid(
                        "price_range.max",
                        format!("must exceed min ({min}), got: {max}"),
                    ));
                }
                if !(2..=MAX_CURVE_STEPS).contains(&steps) {
                    return Err(AnalyticsError::invalid(
                        "price_range.steps",
                        format!("must be between 2 and {MAX_CURVE_STEPS}, got: {steps}"),
                    ));
                }

                let last = steps - 1;
                let step = (max - min) / last as f64;
                Ok((0..steps)
                    .map(|i| if i == last { max } else { min + step * i as f64 })
                    .collect())
            }
            Self::Explicit { prices } => {
                if !(2..=MAX_CURVE_STEPS).contains(&prices.len()) {
                    return Err(AnalyticsError::invalid(
                        "price_range.prices",
                        format!(
                            "needs between 2 and {MAX_CURVE_STEPS} prices, got: {}",
                            prices.len()
                        ),
                    ));
                }
                for price in prices {
                    ensure_non_negative("price_range.prices", *price)?;
                }
                if prices.windows(2).any(|w| w[1] <= w[0]) {
                    return Err(AnalyticsError::invalid(
                        "price_range.prices",
                        "must be strictly ascending",
                    ));
                }
                Ok(prices.clone())
            }
        }
    }
}

/// A strategy and the prices to evaluate it at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayoffParams {
    /// Strategy legs, in display order.
    pub legs: Vec<StrategyLeg>,
    /// Explicit range; `None` uses a range centred on `underlying_at_entry`.
    #[serde(default)]
    pub price_range: Option<PriceRange>,
    /// Spot when the strategy was opened.
    pub underlying_at_entry: f64,
}

impl PayoffParams {
    /// Strategy with the default range around the entry spot.
    #[must_use]
    pub fn new(legs: Vec<StrategyLeg>, underlying_at_entry: f64) -> Self {
        Self {
            legs,
            price_range: None,
            underlying_at_entry,
        }
    }

    /// Replace the price range.
    #[must_use]
    pub fn with_range(mut self, range: PriceRange) -> Self {
        self.price_range = Some(range);
        self
    }

    /// Check legs and entry spot.
    pub fn validate(&self) -> AnalyticsResult<()> {
        if self.legs.is_empty() {
            return Err(AnalyticsError::invalid("legs", "strategy has no legs"));
        }
        for leg in &self.legs {
            leg.validate()?;
        }
        ensure_positive("underlying_at_entry", self.underlying_at_entry)?;
        Ok(())
    }

    /// The configured range, or the default one around the entry spot.
    pub fn resolved_range(&self) -> AnalyticsResult<PriceRange> {
        match &self.price_range {
            Some(range) => Ok(range.clone()),
            None => PriceRange::centered(
                self.underlying_at_entry,
                DEFAULT_RANGE_WIDTH,
                DEFAULT_CURVE_STEPS,
            ),
        }
    }

    fn sample_prices(&self) -> AnalyticsResult<Vec<f64>> {
        self.validate()?;
        self.resolved_range()?.points()
    }
}

/// One sample of a P&L curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PayoffPoint {
    /// Underlying price.
    pub price: f64,
    /// Profit or loss at that price.
    pub payoff: f64,
}

/// Expiry profit/loss of one leg, net of premium and scaled by quantity.
#[must_use]
pub fn leg_payoff(leg: &StrategyLeg, underlying: f64) -> f64 {
    leg.payoff_at(underlying)
}

/// Expiry profit/loss of the whole strategy.
///
/// # Errors
///
/// Returns `InvalidParameter` for invalid legs or a negative price.
pub fn strategy_payoff(params: &PayoffParams, underlying: f64) -> AnalyticsResult<f64> {
    params.validate()?;
    ensure_non_negative("underlying_price", underlying)?;
    Ok(sum_payoff(&params.legs, underlying))
}

/// Expiry P&L at every point of the configured range.
///
/// # Errors
///
/// Returns `InvalidParameter` for invalid legs or a malformed range.
pub fn curve(params: &PayoffParams) -> AnalyticsResult<Vec<PayoffPoint>> {
    let prices = params.sample_prices()?;
    Ok(evaluate(&params.legs, prices))
}

/// Like [`curve`], with every strike inside the range added as a sample.
///
/// Expiry payoff is piecewise linear with kinks only at strikes, so
/// interpolating this curve is exact.
pub fn curve_with_strikes(params: &PayoffParams) -> AnalyticsResult<Vec<PayoffPoint>> {
    let mut prices = params.sample_prices()?;
    let (first, last) = (prices[0], prices[prices.len() - 1]);

    prices.extend(
        params
            .legs
            .iter()
            .map(|leg| leg.strike)
            .filter(|strike| (first..=last).contains(strike)),
    );
    prices.sort_by(f64::total_cmp);
    prices.dedup();

    Ok(evaluate(&params.legs, prices))
}

/// Theoretical (Black-Scholes) P&L of the position before expiry.
///
/// `market.spot` is replaced by each sample price; time, rate and volatility
/// are taken as given.
///
/// # Errors
///
/// Returns `InvalidParameter` for invalid legs, range or market inputs.
pub fn theoretical_curve(
    params: &PayoffParams,
    market: &MarketParams,
) -> AnalyticsResult<Vec<PayoffPoint>> {
    market.validate()?;
    let prices = params.sample_prices()?;

    Ok(prices
        .into_iter()
        .map(|price| PayoffPoint {
            price,
            payoff: params
                .legs
                .iter()
                .map(|leg| (theoretical_value(leg, market, price) - leg.premium) * leg.signed_quantity())
                .sum(),
        })
        .collect())
}

fn sum_payoff(legs: &[StrategyLeg], underlying: f64) -> f64 {
    legs.iter().map(|leg| leg_payoff(leg, underlying)).sum()
}

fn evaluate(legs: &[StrategyLeg], prices: Vec<f64>) -> Vec<PayoffPoint> {
    prices
        .into_iter()
        .map(|price| PayoffPoint {
            price,
            payoff: sum_payoff(legs, price),
        })
        .collect()
}

fn theoretical_value(leg: &StrategyLeg, market: &MarketParams, underlying: f64) -> f64 {
    if underlying == 0.0 {
        // Worthless call; the put is worth the discounted strike
        return match leg.option_type {
            OptionType::Call => 0.0,
            OptionType::Put => {
                leg.strike * (-market.risk_free_rate * market.time_to_expiry).exp()
            }
        };
    }
    let params = market.params_for(leg).with_spot(underlying);
    price_unchecked(&params).for_type(leg.option_type)
}
