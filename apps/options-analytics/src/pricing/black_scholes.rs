//! Black-Scholes pricer for European options.
//!
//! Computes fair values for both option types from one parameter set and
//! the Greeks of the requested type. All Greeks are per contract and long
//! equivalent; side and quantity are applied by the strategy analyzer.
//!
//! # Degenerate regime
//!
//! When `time_to_expiry == 0` or `volatility == 0` the lognormal spread
//! collapses and prices equal the intrinsic value against the discounted
//! strike `K * exp(-rT)` (the plain intrinsic value when `T == 0`):
//!
//! - call delta is 1 above the discounted strike, 0 below it, 0.5 exactly at it
//! - put delta is call delta - 1
//! - gamma, theta, vega and rho are reported as 0

use serde::{Deserialize, Serialize};

use crate::error::{AnalyticsResult, ensure_finite, ensure_non_negative, ensure_positive};
use crate::options::{Greeks, OptionType};

use super::iv::IvQuery;
use super::normal::{cdf, pdf};

/// Inputs for a single Black-Scholes evaluation.
///
/// Rates and volatilities are decimal fractions (0.05 = 5%), time is in years.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlackScholesParams {
    /// Current underlying price.
    pub spot: f64,
    /// Strike price.
    pub strike: f64,
    /// Time to expiry in years.
    pub time_to_expiry: f64,
    /// Continuously compounded risk-free rate.
    pub risk_free_rate: f64,
    /// Annualized volatility.
    pub volatility: f64,
    /// Option type the Greeks are reported for.
    pub option_type: OptionType,
}

impl BlackScholesParams {
    /// Create a new parameter set.
    #[must_use]
    pub const fn new(
        spot: f64,
        strike: f64,
        time_to_expiry: f64,
        risk_free_rate: f64,
        volatility: f64,
        option_type: OptionType,
    ) -> Self {
        Self {
            spot,
            strike,
            time_to_expiry,
            risk_free_rate,
            volatility,
            option_type,
        }
    }

    /// Validate every input against its domain.
    pub fn validate(&self) -> AnalyticsResult<()> {
        ensure_positive("spot", self.spot)?;
        ensure_positive("strike", self.strike)?;
        ensure_non_negative("time_to_expiry", self.time_to_expiry)?;
        ensure_finite("risk_free_rate", self.risk_free_rate)?;
        ensure_non_negative("volatility", self.volatility)?;
        Ok(())
    }

    /// The same contract and market with the volatility removed.
    #[must_use]
    pub const fn query(&self) -> IvQuery {
        IvQuery {
            spot: self.spot,
            strike: self.strike,
            time_to_expiry: self.time_to_expiry,
            risk_free_rate: self.risk_free_rate,
            option_type: self.option_type,
        }
    }

    /// Copy with a different option type.
    #[must_use]
    pub const fn with_option_type(mut self, option_type: OptionType) -> Self {
        self.option_type = option_type;
        self
    }

    /// Copy with a different spot.
    #[must_use]
    pub const fn with_spot(mut self, spot: f64) -> Self {
        self.spot = spot;
        self
    }

    /// Zero time or volatility, or a total deviation `vol·√T` that
    /// underflows to zero and would make `d1` 0/0.
    fn is_degenerate(&self) -> bool {
        self.time_to_expiry == 0.0
            || self.volatility == 0.0
            || self.volatility * self.time_to_expiry.sqrt() == 0.0
    }

    fn discount_factor(&self) -> f64 {
        (-self.risk_free_rate * self.time_to_expiry).exp()
    }

    fn d1_d2(&self) -> (f64, f64) {
        let vol_sqrt_t = self.volatility * self.time_to_expiry.sqrt();
        let d1 = ((self.spot / self.strike).ln()
            + (self.risk_free_rate + 0.5 * self.volatility * self.volatility)
                * self.time_to_expiry)
            / vol_sqrt_t;
        (d1, d1 - vol_sqrt_t)
    }
}

/// Theoretical call and put values for one parameter set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OptionPrices {
    /// Call fair value.
    pub call: f64,
    /// Put fair value.
    pub put: f64,
}

impl OptionPrices {
    /// Value of the given option type.
    #[must_use]
    pub const fn for_type(&self, option_type: OptionType) -> f64 {
        match option_type {
            OptionType::Call => self.call,
            OptionType::Put => self.put,
        }
    }
}

/// Price a European call and put.
///
/// # Errors
///
/// Returns `InvalidParameter` when spot or strike is not positive, or when
/// volatility or time to expiry is negative.
pub fn price(params: &BlackScholesParams) -> AnalyticsResult<OptionPrices> {
    params.validate()?;
    Ok(price_unchecked(params))
}

/// Greeks of the option type named in `params`.
///
/// # Errors
///
/// Same domain checks as [`price`].
pub fn greeks(params: &BlackScholesParams) -> AnalyticsResult<Greeks> {
    params.validate()?;

    if params.is_degenerate() {
        return Ok(degenerate_greeks(params));
    }

    let s = params.spot;
    let k = params.strike;
    let t = params.time_to_expiry;
    let r = params.risk_free_rate;
    let sigma = params.volatility;

    let sqrt_t = t.sqrt();
    let (d1, d2) = params.d1_d2();
    let df = params.discount_factor();
    let pdf_d1 = pdf(d1);

    // Gamma and vega are the same for calls and puts
    let gamma = pdf_d1 / (s * sigma * sqrt_t);
    let vega = s * pdf_d1 * sqrt_t;
    let decay = -s * pdf_d1 * sigma / (2.0 * sqrt_t);

    let greeks = match params.option_type {
        OptionType::Call => Greeks::new(
            cdf(d1),
            gamma,
            decay - r * k * df * cdf(d2),
            vega,
            k * t * df * cdf(d2),
        ),
        OptionType::Put => Greeks::new(
            cdf(d1) - 1.0,
            gamma,
            decay + r * k * df * cdf(-d2),
            vega,
            -k * t * df * cdf(-d2),
        ),
    };

    Ok(greeks)
}

/// Price without validation; callers must have validated `params`.
pub(crate) fn price_unchecked(params: &BlackScholesParams) -> OptionPrices {
    let df = params.discount_factor();
    let discounted_strike = params.strike * df;

    if params.is_degenerate() {
        return OptionPrices {
            call: (params.spot - discounted_strike).max(0.0),
            put: (discounted_strike - params.spot).max(0.0),
        };
    }

    let (d1, d2) = params.d1_d2();

    // Direct formulas for both sides: parity subtraction loses digits on
    // deep in-the-money legs.
    let call = params.spot * cdf(d1) - discounted_strike * cdf(d2);
    let put = discounted_strike * cdf(-d2) - params.spot * cdf(-d1);

    OptionPrices {
        call: call.max(0.0),
        put: put.max(0.0),
    }
}

/// Vega per 1.0 volatility without validation.
pub(crate) fn vega_unchecked(params: &BlackScholesParams) -> f64 {
    if params.is_degenerate() {
        return 0.0;
    }
    let (d1, _) = params.d1_d2();
    params.spot * pdf(d1) * params.time_to_expiry.sqrt()
}

fn degenerate_greeks(params: &BlackScholesParams) -> Greeks {
    let discounted_strike = params.strike * params.discount_factor();

    let call_delta = if params.spot > discounted_strike {
        1.0
    } else if params.spot < discounted_strike {
        0.0
    } else {
        0.5
    };

    let delta = match params.option_type {
        OptionType::Call => call_delta,
        OptionType::Put => call_delta - 1.0,
    };

    Greeks::new(delta, 0.0, 0.0, 0.0, 0.0)
}
