//! Request/response envelope for strategy analysis.
//!
//! Requests carry legs, an optional price range and optional market inputs.
//! Missing market fields fall back to the configured pricing defaults, and
//! volatility may be implied from a quoted option instead of given directly.

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::{AnalyticsError, AnalyticsResult, ensure_non_negative};
use crate::options::{Greeks, OptionType};
use crate::pricing::{IvQuery, IvSolver};

use super::analyzer::{StrategyAnalysis, analyze};
use super::leg::StrategyLeg;
use super::market::MarketParams;
use super::payoff::{PayoffParams, PriceRange};

/// A quoted option used to imply the volatility of the whole strategy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuotedOption {
    /// Call or put.
    pub option_type: OptionType,
    /// Strike price.
    pub strike: f64,
    /// Observed option price.
    pub price: f64,
}

/// Market inputs as supplied by a caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketInputs {
    /// Current underlying price.
    pub spot: f64,
    /// Annualized volatility; implied from `implied_from` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volatility: Option<f64>,
    /// Quote to imply volatility from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub implied_from: Option<QuotedOption>,
    /// Risk-free rate; the configured default when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk_free_rate: Option<f64>,
    /// Time to expiry in years.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_to_expiry: Option<f64>,
    /// Calendar days to expiry, used when `time_to_expiry` is absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days_to_expiry: Option<f64>,
}

impl MarketInputs {
    /// Fill defaults and imply volatility if needed.
    ///
    /// Returns the market parameters and, when volatility was implied, the
    /// implied value.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if neither expiry field nor any volatility
    /// source is present, or `NoSolution` if the quote admits no volatility.
    pub fn resolve(&self, config: &Config) -> AnalyticsResult<(MarketParams, Option<f64>)> {
        let risk_free_rate = self.risk_free_rate.unwrap_or(config.pricing.risk_free_rate);

        let time_to_expiry = match (self.time_to_expiry, self.days_to_expiry) {
            (Some(years), _) => years,
            (None, Some(days)) => {
                ensure_non_negative("market.days_to_expiry", days)? / config.pricing.days_per_year
            }
            (None, None) => {
                return Err(AnalyticsError::invalid(
                    "market.time_to_expiry",
                    "either time_to_expiry or days_to_expiry is required",
                ));
            }
        };

        let (volatility, implied) = match (self.volatility, self.implied_from) {
            (Some(volatility), _) => (volatility, None),
            (None, Some(quote)) => {
                let query = IvQuery::new(
                    self.spot,
                    quote.strike,
                    time_to_expiry,
                    risk_free_rate,
                    quote.option_type,
                );
                let iv = IvSolver::new(config.iv_solver.clone()).solve(quote.price, &query)?;
                (iv, Some(iv))
            }
            (None, None) => {
                return Err(AnalyticsError::invalid(
                    "market.volatility",
                    "either volatility or implied_from is required",
                ));
            }
        };

        let market = MarketParams::new(self.spot, time_to_expiry, risk_free_rate, volatility);
        market.validate()?;
        Ok((market, implied))
    }
}

/// A strategy analysis request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    /// Strategy legs.
    pub legs: Vec<StrategyLeg>,
    /// Spot when the strategy was opened.
    pub underlying_at_entry: f64,
    /// Explicit price range; the configured default when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_range: Option<PriceRange>,
    /// Market inputs for Greeks and the theoretical curve.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market: Option<MarketInputs>,
}

impl AnalysisRequest {
    /// Payoff inputs for this request.
    #[must_use]
    pub fn payoff_params(&self) -> PayoffParams {
        PayoffParams {
            legs: self.legs.clone(),
            price_range: self.price_range.clone(),
            underlying_at_entry: self.underlying_at_entry,
        }
    }
}

/// Result of an analysis request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResponse {
    /// Payoff analysis.
    #[serde(flatten)]
    pub analysis: StrategyAnalysis,
    /// Volatility implied from the quoted option, if one was used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub implied_volatility: Option<f64>,
    /// Position Greeks in trading-desk units (theta per day, vega and rho
    /// per point).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market_greeks: Option<Greeks>,
}

/// Run one analysis request.
///
/// # Errors
///
/// Returns the first error from market resolution or analysis.
pub fn run(request: &AnalysisRequest, config: &Config) -> AnalyticsResult<AnalysisResponse> {
    let (market, implied_volatility) = match &request.market {
        Some(inputs) => {
            let (market, implied) = inputs.resolve(config)?;
            (Some(market), implied)
        }
        None => (None, None),
    };

    let analysis = analyze(&request.payoff_params(), market.as_ref(), &config.analysis)?;
    let market_greeks = analysis
        .greeks
        .map(|g| g.to_market_convention(config.pricing.days_per_year));

    Ok(AnalysisResponse {
        analysis,
        implied_volatility,
        market_greeks,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::{BlackScholesParams, price};

    const BULL_CALL_SPREAD: &str = r#"{
        "legs": [
            {"option_type": "CALL", "side": "BUY", "strike": 100.0, "premium": 5.0, "quantity": 1},
            {"option_type": "CALL", "side": "SELL", "strike": 110.0, "premium": 2.0, "quantity": 1}
        ],
        "underlying_at_entry": 100.0,
        "price_range": {"kind": "LINEAR", "min": 80.0, "max": 130.0, "steps": 51}
    }"#;

    #[test]
    fn test_request_without_market() {
        let request: AnalysisRequest = serde_json::from_str(BULL_CALL_SPREAD).unwrap();
        let response = run(&request, &Config::default()).unwrap();

        assert_eq!(response.analysis.breakevens, vec![103.0]);
        assert_eq!(response.analysis.max_profit.value, 7.0);
        assert!(response.analysis.greeks.is_none());
        assert!(response.market_greeks.is_none());

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["net_premium"], serde_json::json!(-3.0));
        assert!(json.get("greeks").is_none());
    }

    #[test]
    fn test_days_to_expiry_uses_day_count() {
        let inputs = MarketInputs {
            spot: 100.0,
            volatility: Some(0.2),
            implied_from: None,
            risk_free_rate: None,
            time_to_expiry: None,
            days_to_expiry: Some(73.0),
        };
        let (market, implied) = inputs.resolve(&Config::default()).unwrap();
        assert!((market.time_to_expiry - 0.2).abs() < 1e-12);
        assert!((market.risk_free_rate - 0.05).abs() < 1e-12);
        assert!(implied.is_none());
    }

    #[test]
    fn test_missing_expiry_rejected() {
        let inputs = MarketInputs {
            spot: 100.0,
            volatility: Some(0.2),
            implied_from: None,
            risk_free_rate: Some(0.01),
            time_to_expiry: None,
            days_to_expiry: None,
        };
        assert!(inputs.resolve(&Config::default()).unwrap_err().is_invalid_parameter());
    }

    #[test]
    fn test_volatility_implied_from_quote() {
        let quoted = price(&BlackScholesParams::new(100.0, 105.0, 0.5, 0.05, 0.3, OptionType::Call))
            .unwrap()
            .call;
        let inputs = MarketInputs {
            spot: 100.0,
            volatility: None,
            implied_from: Some(QuotedOption {
                option_type: OptionType::Call,
                strike: 105.0,
                price: quoted,
            }),
            risk_free_rate: Some(0.05),
            time_to_expiry: Some(0.5),
            days_to_expiry: None,
        };

        let (market, implied) = inputs.resolve(&Config::default()).unwrap();
        assert!((market.volatility - 0.3).abs() < 1e-6);
        assert_eq!(implied, Some(market.volatility));
    }

    #[test]
    fn test_unreachable_quote_is_no_solution() {
        let inputs = MarketInputs {
            spot: 100.0,
            volatility: None,
            implied_from: Some(QuotedOption {
                option_type: OptionType::Call,
                strike: 100.0,
                price: 150.0,
            }),
            risk_free_rate: Some(0.05),
            time_to_expiry: Some(1.0),
            days_to_expiry: None,
        };
        assert!(inputs.resolve(&Config::default()).unwrap_err().is_no_solution());
    }

    #[test]
    fn test_market_greeks_converted() {
        let mut request: AnalysisRequest = serde_json::from_str(BULL_CALL_SPREAD).unwrap();
        request.market = Some(MarketInputs {
            spot: 100.0,
            volatility: Some(0.25),
            implied_from: None,
            risk_free_rate: None,
            time_to_expiry: Some(0.25),
            days_to_expiry: None,
        });

        let response = run(&request, &Config::default()).unwrap();
        let raw = response.analysis.greeks.unwrap();
        let desk = response.market_greeks.unwrap();
        assert!((desk.theta - raw.theta / 365.0).abs() < 1e-12);
        assert!((desk.vega - raw.vega / 100.0).abs() < 1e-12);
        assert_eq!(desk.delta, raw.delta);
    }
}
