// Allow unwrap/expect in tests - tests should panic on unexpected errors
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::float_cmp,
        clippy::too_many_lines,
        clippy::needless_pass_by_value,
        clippy::items_after_statements
    )
)]

//! Options Analytics - Rust Core Library
//!
//! Pure, synchronous analytics for European options and multi-leg
//! strategies.
//!
//! # Modules
//!
//! - **pricing**: Standard normal primitives, Black-Scholes prices and
//!   Greeks, implied volatility inversion
//! - **strategy**: Legs, expiry payoff curves, breakevens, extremes,
//!   position Greeks, preset builders and batch evaluation
//! - **options**: Shared value types (`OptionType`, `Side`, `Greeks`)
//! - **config**: YAML configuration with environment interpolation
//! - **telemetry**: Logging subscriber setup for binaries
//!
//! Every computation is a pure function of its inputs. Invalid inputs are
//! reported as [`AnalyticsError::InvalidParameter`] before any arithmetic
//! runs; an unreachable implied volatility target is
//! [`AnalyticsError::NoSolution`].

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod error;
pub mod options;
pub mod pricing;
pub mod strategy;
pub mod telemetry;

pub use error::{AnalyticsError, AnalyticsResult};
pub use options::{Greeks, OptionType, Side};
pub use pricing::{BlackScholesParams, IvQuery, IvSolver, IvSolverConfig, OptionPrices};
pub use strategy::{
    AnalysisRequest, AnalysisResponse, PayoffParams, PayoffPoint, PriceRange, StrategyAnalysis,
    StrategyLeg,
};
