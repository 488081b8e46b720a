//! Option value types shared by pricing and strategy analysis.
//!
//! This module provides:
//! - Option type (call/put) and position side (long/short)
//! - The `Greeks` sensitivity vector with scaling and aggregation

mod greeks;
mod types;

pub use greeks::Greeks;
pub use types::{OptionType, Side};
