//! Multi-leg strategy builder.
//!
//! Constructs common option strategies from strikes and premiums:
//! - Single long/short calls and puts
//! - Vertical spreads: bull call, bear call, bull put, bear put
//! - Straddles and strangles (long or short)
//! - Iron condors
//! - Call and put butterflies
//!
//! Strike ordering is checked per strategy. Payoff figures are not computed
//! here; feed the resulting legs to the analyzer.

use serde::{Deserialize, Serialize};

use crate::error::{AnalyticsError, AnalyticsResult, ensure_positive};
use crate::options::{OptionType, Side};

use super::leg::StrategyLeg;
use super::payoff::PayoffParams;

/// Type of options strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StrategyType {
    /// Single long call.
    LongCall,
    /// Single short call.
    ShortCall,
    /// Single long put.
    LongPut,
    /// Single short put.
    ShortPut,
    /// Bull Call Spread (bullish, debit).
    BullCallSpread,
    /// Bear Call Spread (bearish, credit).
    BearCallSpread,
    /// Bull Put Spread (bullish, credit).
    BullPutSpread,
    /// Bear Put Spread (bearish, debit).
    BearPutSpread,
    /// Straddle (volatility play).
    Straddle,
    /// Strangle (volatility play).
    Strangle,
    /// Iron Condor (neutral strategy).
    IronCondor,
    /// Call Butterfly.
    CallButterfly,
    /// Put Butterfly.
    PutButterfly,
    /// Custom strategy (any combination of legs).
    Custom,
}

/// A named set of legs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Strategy {
    /// Strategy type.
    pub strategy_type: StrategyType,
    /// All legs of the strategy.
    pub legs: Vec<StrategyLeg>,
}

impl Strategy {
    /// Payoff inputs for this strategy with the default range around `underlying_at_entry`.
    #[must_use]
    pub fn payoff_params(&self, underlying_at_entry: f64) -> PayoffParams {
        PayoffParams::new(self.legs.clone(), underlying_at_entry)
    }
}

/// Configuration for strategy construction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategyBuilderConfig {
    /// Contracts per leg (butterfly bodies use twice this).
    pub quantity: u32,
    /// Maximum distance between strikes, if constrained.
    pub max_width: Option<f64>,
}

impl Default for StrategyBuilderConfig {
    fn default() -> Self {
        Self {
            quantity: 1,
            max_width: None,
        }
    }
}

/// Options strategy builder.
#[derive(Debug, Clone, Default)]
pub struct StrategyBuilder {
    config: StrategyBuilderConfig,
}

impl StrategyBuilder {
    /// Create a new strategy builder.
    #[must_use]
    pub const fn new(config: StrategyBuilderConfig) -> Self {
        Self { config }
    }

    /// Build a single-option position.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` for an invalid strike, premium or quantity.
    pub fn single(
        &self,
        option_type: OptionType,
        side: Side,
        strike: f64,
        premium: f64,
    ) -> AnalyticsResult<Strategy> {
        let strategy_type = match (option_type, side) {
            (OptionType::Call, Side::Long) => StrategyType::LongCall,
            (OptionType::Call, Side::Short) => StrategyType::ShortCall,
            (OptionType::Put, Side::Long) => StrategyType::LongPut,
            (OptionType::Put, Side::Short) => StrategyType::ShortPut,
        };
        Ok(Strategy {
            strategy_type,
            legs: vec![self.leg(option_type, side, strike, premium, 1)?],
        })
    }

    /// Build a vertical spread.
    ///
    /// Bull spreads buy the lower strike, bear spreads buy the higher one.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` for a non-vertical `strategy_type`, strikes
    /// in the wrong order, or a width above the configured maximum.
    pub fn vertical_spread(
        &self,
        strategy_type: StrategyType,
        short_strike: f64,
        long_strike: f64,
        short_premium: f64,
        long_premium: f64,
    ) -> AnalyticsResult<Strategy> {
        let (option_type, long_below_short) = match strategy_type {
            StrategyType::BullCallSpread => (OptionType::Call, true),
            StrategyType::BearCallSpread => (OptionType::Call, false),
            StrategyType::BullPutSpread => (OptionType::Put, true),
            StrategyType::BearPutSpread => (OptionType::Put, false),
            _ => {
                return Err(AnalyticsError::invalid(
                    "strategy_type",
                    format!("not a vertical spread: {strategy_type:?}"),
                ));
            }
        };

        let ordered = if long_below_short {
            long_strike < short_strike
        } else {
            short_strike < long_strike
        };
        if !ordered {
            return Err(AnalyticsError::invalid(
                "long_strike",
                format!(
                    "must be {} short strike ({short_strike}) for {strategy_type:?}, got: {long_strike}",
                    if long_below_short { "below" } else { "above" }
                ),
            ));
        }
        self.check_width((long_strike - short_strike).abs())?;

        Ok(Strategy {
            strategy_type,
            legs: vec![
                self.leg(option_type, Side::Short, short_strike, short_premium, 1)?,
                self.leg(option_type, Side::Long, long_strike, long_premium, 1)?,
            ],
        })
    }

    /// Build a straddle: a call and a put at the same strike, both on `side`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` for an invalid strike or premium.
    pub fn straddle(
        &self,
        side: Side,
        strike: f64,
        call_premium: f64,
        put_premium: f64,
    ) -> AnalyticsResult<Strategy> {
        Ok(Strategy {
            strategy_type: StrategyType::Straddle,
            legs: vec![
                self.leg(OptionType::Call, side, strike, call_premium, 1)?,
                self.leg(OptionType::Put, side, strike, put_premium, 1)?,
            ],
        })
    }

    /// Build a strangle: an OTM put and an OTM call, both on `side`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` unless `put_strike < call_strike`.
    pub fn strangle(
        &self,
        side: Side,
        put_strike: f64,
        call_strike: f64,
        put_premium: f64,
        call_premium: f64,
    ) -> AnalyticsResult<Strategy> {
        if put_strike >= call_strike {
            return Err(AnalyticsError::invalid(
                "put_strike",
                format!("must be below call strike ({call_strike}), got: {put_strike}"),
            ));
        }

        Ok(Strategy {
            strategy_type: StrategyType::Strangle,
            legs: vec![
                self.leg(OptionType::Put, side, put_strike, put_premium, 1)?,
                self.leg(OptionType::Call, side, call_strike, call_premium, 1)?,
            ],
        })
    }

    /// Build an iron condor.
    ///
    /// An iron condor consists of:
    /// - Bull put spread (short put + long put `width` below)
    /// - Bear call spread (short call + long call `width` above)
    ///
    /// `premiums` is `(short_put, long_put, short_call, long_call)`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if the short put is not below the short
    /// call, the wings would sit at a non-positive strike, or the width
    /// exceeds the configured maximum.
    pub fn iron_condor(
        &self,
        short_put_strike: f64,
        short_call_strike: f64,
        width: f64,
        premiums: (f64, f64, f64, f64),
    ) -> AnalyticsResult<Strategy> {
        if short_put_strike >= short_call_strike {
            return Err(AnalyticsError::invalid(
                "short_put_strike",
                format!("must be below short call strike ({short_call_strike}), got: {short_put_strike}"),
            ));
        }
        ensure_positive("width", width)?;
        self.check_width(width)?;

        let (sp_prem, lp_prem, sc_prem, lc_prem) = premiums;

        Ok(Strategy {
            strategy_type: StrategyType::IronCondor,
            legs: vec![
                self.leg(OptionType::Put, Side::Long, short_put_strike - width, lp_prem, 1)?,
                self.leg(OptionType::Put, Side::Short, short_put_strike, sp_prem, 1)?,
                self.leg(OptionType::Call, Side::Short, short_call_strike, sc_prem, 1)?,
                self.leg(OptionType::Call, Side::Long, short_call_strike + width, lc_prem, 1)?,
            ],
        })
    }

    /// Build a long butterfly: long one lower wing, short two bodies, long
    /// one upper wing.
    ///
    /// `premiums` is `(lower, middle, upper)` per contract.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` unless `lower < middle < upper`.
    pub fn butterfly(
        &self,
        option_type: OptionType,
        strikes: (f64, f64, f64),
        premiums: (f64, f64, f64),
    ) -> AnalyticsResult<Strategy> {
        let (lower, middle, upper) = strikes;
        if !(lower < middle && middle < upper) {
            return Err(AnalyticsError::invalid(
                "strikes",
                format!("must be strictly ascending, got: ({lower}, {middle}, {upper})"),
            ));
        }
        self.check_width(middle - lower)?;
        self.check_width(upper - middle)?;

        let strategy_type = match option_type {
            OptionType::Call => StrategyType::CallButterfly,
            OptionType::Put => StrategyType::PutButterfly,
        };
        let (lower_prem, middle_prem, upper_prem) = premiums;

        Ok(Strategy {
            strategy_type,
            legs: vec![
                self.leg(option_type, Side::Long, lower, lower_prem, 1)?,
                self.leg(option_type, Side::Short, middle, middle_prem, 2)?,
                self.leg(option_type, Side::Long, upper, upper_prem, 1)?,
            ],
        })
    }

    /// Build a custom strategy from arbitrary legs.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if `legs` is empty or any leg is invalid.
    pub fn custom(&self, legs: Vec<StrategyLeg>) -> AnalyticsResult<Strategy> {
        if legs.is_empty() {
            return Err(AnalyticsError::invalid(
                "legs",
                "custom strategy requires at least one leg",
            ));
        }
        for leg in &legs {
            leg.validate()?;
        }

        Ok(Strategy {
            strategy_type: StrategyType::Custom,
            legs,
        })
    }

    fn leg(
        &self,
        option_type: OptionType,
        side: Side,
        strike: f64,
        premium: f64,
        ratio: u32,
    ) -> AnalyticsResult<StrategyLeg> {
        let quantity = self.config.quantity.checked_mul(ratio).ok_or_else(|| {
            AnalyticsError::invalid("quantity", format!("overflows at ratio {ratio}"))
        })?;
        StrategyLeg::new(option_type, side, strike, premium, quantity)
    }

    fn check_width(&self, width: f64) -> AnalyticsResult<()> {
        match self.config.max_width {
            Some(max_width) if width > max_width => Err(AnalyticsError::invalid(
                "width",
                format!("{width} exceeds max width {max_width}"),
            )),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::analyzer::{analyze, breakevens, max_loss, max_profit};
    use crate::strategy::payoff::{PriceRange, curve_with_strikes};
    use crate::config::AnalysisConfig;

    #[test]
    fn test_single_options() {
        let builder = StrategyBuilder::default();
        let strategy = builder.single(OptionType::Put, Side::Short, 100.0, 4.0).unwrap();
        assert_eq!(strategy.strategy_type, StrategyType::ShortPut);
        assert_eq!(strategy.legs.len(), 1);
        assert_eq!(strategy.legs[0].side, Side::Short);

        assert!(builder.single(OptionType::Call, Side::Long, -1.0, 4.0).is_err());
    }

    #[test]
    fn test_bull_call_spread() {
        let builder = StrategyBuilder::default();
        let strategy = builder
            .vertical_spread(StrategyType::BullCallSpread, 110.0, 100.0, 2.0, 5.0)
            .unwrap();

        assert_eq!(strategy.legs.len(), 2);
        let params = strategy
            .payoff_params(100.0)
            .with_range(PriceRange::linear(80.0, 130.0, 51));
        let analysis = analyze(&params, None, &AnalysisConfig::default()).unwrap();
        assert_eq!(analysis.net_premium, -3.0);
        assert_eq!(analysis.breakevens, vec![103.0]);
        assert_eq!(analysis.max_profit.value, 7.0);
        assert_eq!(analysis.max_loss.value, -3.0);
    }

    #[test]
    fn test_vertical_spread_strike_order() {
        let builder = StrategyBuilder::default();
        // Bull call must buy the lower strike
        let err = builder
            .vertical_spread(StrategyType::BullCallSpread, 100.0, 110.0, 5.0, 2.0)
            .unwrap_err();
        assert!(err.is_invalid_parameter());

        // Bear put buys the higher strike
        assert!(
            builder
                .vertical_spread(StrategyType::BearPutSpread, 90.0, 100.0, 1.0, 4.0)
                .is_ok()
        );
        assert!(
            builder
                .vertical_spread(StrategyType::Straddle, 90.0, 100.0, 1.0, 4.0)
                .is_err()
        );
    }

    #[test]
    fn test_width_constraint() {
        let builder = StrategyBuilder::new(StrategyBuilderConfig {
            quantity: 1,
            max_width: Some(5.0),
        });
        assert!(
            builder
                .vertical_spread(StrategyType::BullPutSpread, 100.0, 90.0, 3.0, 1.0)
                .is_err()
        );
        assert!(
            builder
                .vertical_spread(StrategyType::BullPutSpread, 100.0, 95.0, 3.0, 1.0)
                .is_ok()
        );
    }

    #[test]
    fn test_straddle() {
        let builder = StrategyBuilder::default();
        let strategy = builder.straddle(Side::Long, 100.0, 5.0, 5.0).unwrap();
        let params = strategy
            .payoff_params(100.0)
            .with_range(PriceRange::linear(50.0, 150.0, 101));
        let points = curve_with_strikes(&params).unwrap();

        assert_eq!(breakevens(&points), vec![90.0, 110.0]);
        assert!(max_profit(&points).unwrap().is_open_ended());
        assert_eq!(max_loss(&points).unwrap().value, -10.0);
    }

    #[test]
    fn test_strangle_invalid_strikes() {
        let builder = StrategyBuilder::default();
        assert!(builder.strangle(Side::Long, 105.0, 95.0, 2.0, 2.0).is_err());
        assert!(builder.strangle(Side::Short, 95.0, 105.0, 2.0, 2.0).is_ok());
    }

    #[test]
    fn test_iron_condor_construction() {
        let builder = StrategyBuilder::default();
        let strategy = builder
            .iron_condor(95.0, 105.0, 5.0, (1.5, 0.5, 1.5, 0.5))
            .unwrap();

        assert_eq!(strategy.strategy_type, StrategyType::IronCondor);
        assert_eq!(strategy.legs.len(), 4);
        let strikes: Vec<f64> = strategy.legs.iter().map(|l| l.strike).collect();
        assert_eq!(strikes, vec![90.0, 95.0, 105.0, 110.0]);

        let params = strategy
            .payoff_params(100.0)
            .with_range(PriceRange::linear(80.0, 120.0, 41));
        let analysis = analyze(&params, None, &AnalysisConfig::default()).unwrap();
        assert_eq!(analysis.net_premium, 2.0);
        assert_eq!(analysis.max_profit.value, 2.0);
        assert_eq!(analysis.max_loss.value, -3.0);
        assert!(!analysis.max_loss.is_open_ended());
        assert_eq!(analysis.breakevens, vec![93.0, 107.0]);
    }

    #[test]
    fn test_iron_condor_invalid_strikes() {
        let builder = StrategyBuilder::default();
        assert!(builder.iron_condor(105.0, 95.0, 5.0, (1.0, 0.5, 1.0, 0.5)).is_err());
        // Lower wing would land at a zero strike
        assert!(builder.iron_condor(5.0, 15.0, 5.0, (1.0, 0.5, 1.0, 0.5)).is_err());
    }

    #[test]
    fn test_butterfly() {
        let builder = StrategyBuilder::default();
        let strategy = builder
            .butterfly(OptionType::Call, (90.0, 100.0, 110.0), (12.0, 6.0, 2.0))
            .unwrap();
        assert_eq!(strategy.strategy_type, StrategyType::CallButterfly);
        assert_eq!(strategy.legs[1].quantity, 2);

        let params = strategy
            .payoff_params(100.0)
            .with_range(PriceRange::linear(80.0, 120.0, 41));
        let analysis = analyze(&params, None, &AnalysisConfig::default()).unwrap();
        assert_eq!(analysis.net_premium, -2.0);
        assert_eq!(analysis.max_profit.value, 8.0);
        assert_eq!(analysis.max_profit.price, 100.0);
        assert_eq!(analysis.breakevens, vec![92.0, 108.0]);

        assert!(
            builder
                .butterfly(OptionType::Put, (100.0, 100.0, 110.0), (1.0, 1.0, 1.0))
                .is_err()
        );
    }

    #[test]
    fn test_quantity_scales_legs() {
        let builder = StrategyBuilder::new(StrategyBuilderConfig {
            quantity: 3,
            max_width: None,
        });
        let strategy = builder
            .butterfly(OptionType::Put, (90.0, 100.0, 110.0), (1.0, 3.0, 8.0))
            .unwrap();
        let quantities: Vec<u32> = strategy.legs.iter().map(|l| l.quantity).collect();
        assert_eq!(quantities, vec![3, 6, 3]);
    }

    #[test]
    fn test_custom_strategy() {
        let builder = StrategyBuilder::default();
        let legs = vec![StrategyLeg::new(OptionType::Call, Side::Long, 100.0, 3.0, 1).unwrap()];
        assert_eq!(
            builder.custom(legs).unwrap().strategy_type,
            StrategyType::Custom
        );
    }

    #[test]
    fn test_custom_strategy_empty_legs() {
        let builder = StrategyBuilder::default();
        assert!(builder.custom(Vec::new()).unwrap_err().is_invalid_parameter());
    }
}
