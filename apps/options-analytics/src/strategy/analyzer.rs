//! Strategy analyzer.
//!
//! Derives breakevens, extremes, net premium and aggregate Greeks from a
//! payoff curve or a leg set.
//!
//! Extremes are taken over the sampled range only. When the payoff is still
//! moving in the extreme's direction at a range edge, the result is flagged
//! open-ended instead of being presented as a hard cap, even if the sampled
//! extreme itself sits inside the range.

use serde::{Deserialize, Serialize};

use crate::config::AnalysisConfig;
use crate::error::{AnalyticsError, AnalyticsResult};
use crate::options::Greeks;
use crate::pricing::greeks;

use super::leg::StrategyLeg;
use super::market::MarketParams;
use super::payoff::{
    PayoffParams, PayoffPoint, PriceRange, curve, curve_with_strikes, theoretical_curve,
};

/// Payoffs within this distance of zero are treated as zero.
const ZERO_EPSILON: f64 = 1e-9;

/// Which edge of the sampled range an open-ended extreme sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RangeEdge {
    /// Lowest sampled price.
    Lower,
    /// Highest sampled price.
    Upper,
    /// Both edges.
    Both,
}

/// Whether an extreme is a true cap or only the edge of the sampled range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Bound {
    /// The payoff levels off; the value is the real extreme.
    Bounded,
    /// The payoff keeps improving (or worsening) past the range edge.
    OpenEnded {
        /// Edge the payoff is still moving toward.
        edge: RangeEdge,
    },
}

/// Maximum or minimum of a payoff curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Extremum {
    /// Extreme payoff within the sampled range.
    pub value: f64,
    /// Price where it occurs; an open edge that attains it wins over
    /// interior points.
    pub price: f64,
    /// Bounded or open-ended.
    pub bound: Bound,
}

impl Extremum {
    /// Whether the payoff continues past the sampled range.
    #[must_use]
    pub const fn is_open_ended(&self) -> bool {
        matches!(self.bound, Bound::OpenEnded { .. })
    }
}

/// Full analysis of one strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyAnalysis {
    /// Up-front cash flow (positive = credit).
    pub net_premium: f64,
    /// Prices where the expiry payoff is zero, ascending.
    pub breakevens: Vec<f64>,
    /// Highest expiry payoff.
    pub max_profit: Extremum,
    /// Lowest expiry payoff (negative for a loss).
    pub max_loss: Extremum,
    /// Expiry P&L curve.
    pub curve: Vec<PayoffPoint>,
    /// Theoretical P&L before expiry, when market inputs were given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theoretical_curve: Option<Vec<PayoffPoint>>,
    /// Position Greeks, when market inputs were given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub greeks: Option<Greeks>,
}

/// Prices where the curve crosses or touches zero, ascending.
///
/// Crossings between samples are linearly interpolated. A run of exact zeros
/// reports its first and last price.
#[must_use]
pub fn breakevens(curve: &[PayoffPoint]) -> Vec<f64> {
    let mut found: Vec<f64> = Vec::new();
    let mut record = |price: f64| {
        if found.last().is_none_or(|&last| last != price) {
            found.push(price);
        }
    };

    for (i, point) in curve.iter().enumerate() {
        let sign = zero_sign(point.payoff);

        if sign == 0 {
            let prev_zero = i > 0 && zero_sign(curve[i - 1].payoff) == 0;
            let next_zero = curve.get(i + 1).is_some_and(|p| zero_sign(p.payoff) == 0);
            if !(prev_zero && next_zero) {
                record(point.price);
            }
            continue;
        }

        if i > 0 {
            let prev = &curve[i - 1];
            if zero_sign(prev.payoff) == -sign {
                let t = -prev.payoff / (point.payoff - prev.payoff);
                record(prev.price + t * (point.price - prev.price));
            }
        }
    }

    found
}

/// Highest sampled payoff.
#[must_use]
pub fn max_profit(curve: &[PayoffPoint]) -> Option<Extremum> {
    extremum(curve, 1.0)
}

/// Lowest sampled payoff.
#[must_use]
pub fn max_loss(curve: &[PayoffPoint]) -> Option<Extremum> {
    extremum(curve, -1.0)
}

/// Sum of signed premiums: long legs pay, short legs receive.
#[must_use]
pub fn net_premium(legs: &[StrategyLeg]) -> f64 {
    legs.iter().map(StrategyLeg::net_premium).sum()
}

/// Position Greeks: each leg's Black-Scholes Greeks scaled by its signed
/// quantity (short legs negated).
///
/// # Errors
///
/// Returns `InvalidParameter` for invalid legs or market inputs.
pub fn aggregate_greeks(legs: &[StrategyLeg], market: &MarketParams) -> AnalyticsResult<Greeks> {
    market.validate()?;
    legs.iter()
        .map(|leg| -> AnalyticsResult<Greeks> {
            leg.validate()?;
            Ok(greeks(&market.params_for(leg))?.scale(leg.signed_quantity()))
        })
        .sum()
}

/// Analyze a strategy: curve, breakevens, extremes, premium and, when
/// market inputs are supplied, Greeks and the theoretical curve.
///
/// Without an explicit range the curve spans `config.range_width` around
/// the entry spot in `config.steps` points.
///
/// # Errors
///
/// Returns `InvalidParameter` for invalid legs, range or market inputs.
pub fn analyze(
    params: &PayoffParams,
    market: Option<&MarketParams>,
    config: &AnalysisConfig,
) -> AnalyticsResult<StrategyAnalysis> {
    let mut params = params.clone();
    if params.price_range.is_none() {
        params.price_range = Some(PriceRange::centered(
            params.underlying_at_entry,
            config.range_width,
            config.steps,
        )?);
    }

    let expiry_curve = if config.include_strikes {
        curve_with_strikes(&params)?
    } else {
        curve(&params)?
    };

    let too_short = || AnalyticsError::invalid("price_range", "curve has no points");
    let max_profit = max_profit(&expiry_curve).ok_or_else(too_short)?;
    let max_loss = max_loss(&expiry_curve).ok_or_else(too_short)?;

    let (theoretical, position_greeks) = match market {
        Some(market) => (
            Some(theoretical_curve(&params, market)?),
            Some(aggregate_greeks(&params.legs, market)?),
        ),
        None => (None, None),
    };

    Ok(StrategyAnalysis {
        net_premium: net_premium(&params.legs),
        breakevens: breakevens(&expiry_curve),
        max_profit,
        max_loss,
        curve: expiry_curve,
        theoretical_curve: theoretical,
        greeks: position_greeks,
    })
}

fn zero_sign(value: f64) -> i8 {
    if value > ZERO_EPSILON {
        1
    } else if value < -ZERO_EPSILON {
        -1
    } else {
        0
    }
}

/// Extreme of `direction * payoff`: +1 finds the maximum, -1 the minimum.
fn extremum(curve: &[PayoffPoint], direction: f64) -> Option<Extremum> {
    let score = |p: &PayoffPoint| direction * p.payoff;

    let best = curve
        .iter()
        .reduce(|best, p| if score(p) > score(best) { p } else { best })?;
    let best_score = score(best);

    let (first, last) = (curve.first()?, curve.last()?);
    // An edge is open whenever the payoff still moves in the favoured
    // direction there, even if an interior point holds the sampled extreme.
    let edge_open = |edge: &PayoffPoint, neighbour: Option<&PayoffPoint>| {
        neighbour.is_some_and(|n| score(edge) > score(n) + ZERO_EPSILON)
    };
    let lower_open = edge_open(first, curve.get(1));
    let upper_open = curve.len() >= 2 && edge_open(last, curve.get(curve.len() - 2));
    let attains = |edge: &PayoffPoint| score(edge) >= best_score - ZERO_EPSILON;

    let edge = match (lower_open, upper_open) {
        (true, true) => Some(RangeEdge::Both),
        (true, false) => Some(RangeEdge::Lower),
        (false, true) => Some(RangeEdge::Upper),
        (false, false) => None,
    };
    let price = if lower_open && attains(first) {
        first.price
    } else if upper_open && attains(last) {
        last.price
    } else {
        best.price
    };
    let bound = edge.map_or(Bound::Bounded, |edge| Bound::OpenEnded { edge });

    Some(Extremum {
        value: best.payoff,
        price,
        bound,
    })
}
