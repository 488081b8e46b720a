//! Closed-form option pricing.
//!
//! This module provides:
//! - Standard normal CDF/PDF primitives
//! - Black-Scholes prices and Greeks for European options
//! - Implied volatility computation (bracketed Newton-Raphson)
//!
//! # Example
//!
//! ```
//! use options_analytics::options::OptionType;
//! use options_analytics::pricing::{BlackScholesParams, IvSolver, greeks, price};
//!
//! let params = BlackScholesParams::new(100.0, 100.0, 1.0, 0.05, 0.20, OptionType::Call);
//! let prices = price(&params)?;
//! let delta = greeks(&params)?.delta;
//! assert!((prices.call - 10.45).abs() < 0.01);
//! assert!((delta - 0.637).abs() < 0.001);
//!
//! let iv = IvSolver::default().solve(prices.call, &params.query())?;
//! assert!((iv - 0.20).abs() < 1e-6);
//! # Ok::<(), options_analytics::AnalyticsError>(())
//! ```

mod black_scholes;
mod iv;
pub mod normal;

pub use black_scholes::{BlackScholesParams, OptionPrices, greeks, price};
pub(crate) use black_scholes::price_unchecked;
pub use iv::{IvQuery, IvSolver, IvSolverConfig};
