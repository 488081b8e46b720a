//! Implied Volatility Solver
//!
//! Inverts the Black-Scholes price for volatility:
//! - Feasibility check: the target must lie between the prices at the
//!   search bounds, otherwise `NoSolution` is returned before iterating
//! - Modified Corrado-Miller: initial guess
//! - Newton-Raphson: fast convergence when vega is healthy
//! - Bisection: every step keeps a bracket, and falls back to its midpoint
//!   whenever the Newton step leaves it or vega vanishes (deep ITM/OTM)

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use tracing::{debug, trace};

use crate::error::{
    AnalyticsError, AnalyticsResult, ensure_finite, ensure_non_negative, ensure_positive,
};
use crate::options::OptionType;

use super::black_scholes::{BlackScholesParams, price_unchecked, vega_unchecked};

/// Vega below which a Newton step is not attempted.
const MIN_VEGA: f64 = 1e-12;

/// Bracket width at which the volatility is considered pinned down.
const VOL_EPSILON: f64 = 1e-14;

/// Decimal places kept by [`IvSolver::solve_decimal`].
const DECIMAL_PLACES: u32 = 10;

// ============================================================================
// Query and Configuration
// ============================================================================

/// Black-Scholes inputs without a volatility.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IvQuery {
    /// Current underlying price.
    pub spot: f64,
    /// Strike price.
    pub strike: f64,
    /// Time to expiry in years.
    pub time_to_expiry: f64,
    /// Continuously compounded risk-free rate.
    pub risk_free_rate: f64,
    /// Option type the target price refers to.
    pub option_type: OptionType,
}

impl IvQuery {
    /// Create a new query.
    #[must_use]
    pub const fn new(
        spot: f64,
        strike: f64,
        time_to_expiry: f64,
        risk_free_rate: f64,
        option_type: OptionType,
    ) -> Self {
        Self {
            spot,
            strike,
            time_to_expiry,
            risk_free_rate,
            option_type,
        }
    }

    /// Complete the query with a volatility.
    #[must_use]
    pub const fn with_volatility(&self, volatility: f64) -> BlackScholesParams {
        BlackScholesParams::new(
            self.spot,
            self.strike,
            self.time_to_expiry,
            self.risk_free_rate,
            volatility,
            self.option_type,
        )
    }

    fn validate(&self) -> AnalyticsResult<()> {
        ensure_positive("spot", self.spot)?;
        ensure_positive("strike", self.strike)?;
        ensure_non_negative("time_to_expiry", self.time_to_expiry)?;
        ensure_finite("risk_free_rate", self.risk_free_rate)?;
        Ok(())
    }

    fn price_at(&self, volatility: f64) -> f64 {
        price_unchecked(&self.with_volatility(volatility)).for_type(self.option_type)
    }
}

/// Configuration for IV solver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IvSolverConfig {
    /// Hard iteration ceiling.
    pub max_iterations: u32,
    /// Convergence tolerance (absolute price error).
    pub tolerance: f64,
    /// Lower volatility bound of the search interval.
    pub min_vol: f64,
    /// Upper volatility bound of the search interval (e.g., 5.0 = 500%).
    pub max_vol: f64,
}

impl Default for IvSolverConfig {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            tolerance: 1e-8,
            min_vol: 1e-6,
            max_vol: 5.0,
        }
    }
}

impl IvSolverConfig {
    /// Check that the search interval and tolerance are usable.
    pub fn validate(&self) -> AnalyticsResult<()> {
        if self.max_iterations == 0 {
            return Err(AnalyticsError::invalid(
                "max_iterations",
                "must be at least 1",
            ));
        }
        ensure_positive("tolerance", self.tolerance)?;
        ensure_positive("min_vol", self.min_vol)?;
        ensure_finite("max_vol", self.max_vol)?;
        if self.max_vol <= self.min_vol {
            return Err(AnalyticsError::invalid(
                "max_vol",
                format!(
                    "must exceed min_vol ({}), got: {}",
                    self.min_vol, self.max_vol
                ),
            ));
        }
        Ok(())
    }
}

// ============================================================================
// Solver
// ============================================================================

/// Implied Volatility Solver.
#[derive(Debug, Clone, Default)]
pub struct IvSolver {
    config: IvSolverConfig,
}

impl IvSolver {
    /// Create a new IV solver with the given configuration.
    #[must_use]
    pub const fn new(config: IvSolverConfig) -> Self {
        Self { config }
    }

    /// Solver configuration.
    #[must_use]
    pub const fn config(&self) -> &IvSolverConfig {
        &self.config
    }

    /// Find the volatility whose Black-Scholes price equals `target_price`.
    ///
    /// # Errors
    ///
    /// - `InvalidParameter` for a negative or non-finite target, invalid
    ///   query inputs, or an unusable solver configuration
    /// - `NoSolution` when the option is at expiry, or the target lies
    ///   outside the prices reachable within `[min_vol, max_vol]`
    pub fn solve(&self, target_price: f64, query: &IvQuery) -> AnalyticsResult<f64> {
        ensure_non_negative("target_price", target_price)?;
        query.validate()?;
        self.config.validate()?;

        if query.time_to_expiry == 0.0 {
            return Err(AnalyticsError::no_solution(
                "option is at expiry, price does not depend on volatility",
            ));
        }

        let IvSolverConfig {
            min_vol,
            max_vol,
            tolerance,
            ..
        } = self.config;

        // Verify solution exists in range
        let price_low = query.price_at(min_vol);
        let price_high = query.price_at(max_vol);

        if target_price < price_low - tolerance {
            return Err(AnalyticsError::no_solution(format!(
                "Market price ({target_price:.6}) is below minimum theoretical price ({price_low:.6})"
            )));
        }
        if target_price > price_high + tolerance {
            return Err(AnalyticsError::no_solution(format!(
                "Market price ({target_price:.6}) exceeds maximum theoretical price ({price_high:.6})"
            )));
        }
        if (target_price - price_low).abs() <= tolerance {
            return Ok(min_vol);
        }
        if (price_high - target_price).abs() <= tolerance {
            return Ok(max_vol);
        }

        let initial_guess = self.corrado_miller_guess(target_price, query);
        Ok(self.bracketed_newton(target_price, query, initial_guess))
    }

    /// Solve IV from a Decimal market price (convenience method).
    ///
    /// # Errors
    ///
    /// Same as [`IvSolver::solve`]; a price that does not fit an `f64` is
    /// an `InvalidParameter`.
    pub fn solve_decimal(&self, market_price: Decimal, query: &IvQuery) -> AnalyticsResult<Decimal> {
        let target = market_price.to_f64().ok_or_else(|| {
            AnalyticsError::invalid(
                "target_price",
                format!("{market_price} is not representable as a float"),
            )
        })?;

        let iv = self.solve(target, query)?;

        Decimal::from_f64_retain(iv)
            .map(|d| d.round_dp(DECIMAL_PLACES))
            .ok_or_else(|| AnalyticsError::no_solution(format!("{iv} is not representable as a decimal")))
    }

    /// Modified Corrado-Miller initial guess for Newton-Raphson.
    fn corrado_miller_guess(&self, market_price: f64, query: &IvQuery) -> f64 {
        let s = query.spot;
        let k = query.strike;
        let t = query.time_to_expiry;
        let df = (-query.risk_free_rate * t).exp();

        // Forward price
        let f = s / df;

        // Convert to call price if put (put-call parity)
        let call_price = match query.option_type {
            OptionType::Call => market_price,
            OptionType::Put => market_price + s - k * df,
        };

        let x = f - k;
        let y = call_price / df;

        if y <= 0.0 {
            return 0.30;
        }

        let numerator = y - 0.5 * x;
        let sqrt_term = numerator.powi(2) - (x.powi(2) / PI);

        if sqrt_term < 0.0 {
            return 0.30;
        }

        let sigma_approx = (PI / (2.0 * t)).sqrt() * (numerator + sqrt_term.sqrt()) / f;

        if sigma_approx.is_finite() {
            sigma_approx.clamp(self.config.min_vol, self.config.max_vol)
        } else {
            0.30
        }
    }

    /// Newton-Raphson inside a shrinking bisection bracket.
    ///
    /// The price is non-decreasing in volatility, so every evaluation tightens
    /// `[low, high]`. A Newton step is accepted only if it lands strictly
    /// inside the bracket.
    fn bracketed_newton(&self, market_price: f64, query: &IvQuery, initial_guess: f64) -> f64 {
        let mut low = self.config.min_vol;
        let mut high = self.config.max_vol;
        let mut sigma = initial_guess.clamp(low, high);

        for i in 0..self.config.max_iterations {
            let params = query.with_volatility(sigma);
            let error = price_unchecked(&params).for_type(query.option_type) - market_price;

            if error.abs() < self.config.tolerance {
                trace!(iterations = i + 1, sigma, "IV converged");
                return sigma;
            }

            if error > 0.0 {
                high = sigma;
            } else {
                low = sigma;
            }

            if high - low < VOL_EPSILON {
                trace!(iterations = i + 1, sigma, "IV bracket collapsed");
                return sigma;
            }

            let vega = vega_unchecked(&params);
            let newton = sigma - error / vega;

            sigma = if vega > MIN_VEGA && newton > low && newton < high {
                newton
            } else {
                trace!(iteration = i, vega, "Newton step rejected, bisecting");
                low.midpoint(high)
            };
        }

        let estimate = low.midpoint(high);
        debug!(
            max_iterations = self.config.max_iterations,
            estimate,
            bracket_width = high - low,
            "IV solver hit iteration ceiling"
        );
        estimate
    }
}

// ============================================================================
// Tests
// ============================================================================
