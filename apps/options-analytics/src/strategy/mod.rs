//! Multi-leg strategies.
//!
//! - Leg definitions and market inputs
//! - Expiry payoff and P&L curves
//! - Breakevens, extremes and position Greeks
//! - Preset strategy construction
//! - Parallel curve batches and the request envelope used by the binary

mod analyzer;
mod batch;
mod builder;
mod leg;
mod market;
mod payoff;
mod request;

pub use analyzer::{
    Bound, Extremum, RangeEdge, StrategyAnalysis, aggregate_greeks, analyze, breakevens,
    max_loss, max_profit, net_premium,
};
pub use batch::{CurveBatch, ParallelConfig};
pub use builder::{Strategy, StrategyBuilder, StrategyBuilderConfig, StrategyType};
pub use leg::StrategyLeg;
pub use market::MarketParams;
pub use payoff::{
    DEFAULT_CURVE_STEPS, DEFAULT_RANGE_WIDTH, MAX_CURVE_STEPS, PayoffParams, PayoffPoint, PriceRange, curve,
    curve_with_strikes, leg_payoff, strategy_payoff, theoretical_curve,
};
pub use request::{AnalysisRequest, AnalysisResponse, MarketInputs, QuotedOption, run};
