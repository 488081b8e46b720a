//! Core option types.
//!
//! Option type (call/put) and position side (long/short).

use serde::{Deserialize, Serialize};

/// Option type (call or put).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OptionType {
    /// Call option (right to buy).
    Call,
    /// Put option (right to sell).
    Put,
}

impl OptionType {
    /// Intrinsic value against the given strike.
    #[must_use]
    pub fn intrinsic(self, underlying: f64, strike: f64) -> f64 {
        match self {
            Self::Call => (underlying - strike).max(0.0),
            Self::Put => (strike - underlying).max(0.0),
        }
    }
}

impl std::fmt::Display for OptionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Call => write!(f, "Call"),
            Self::Put => write!(f, "Put"),
        }
    }
}

/// Position side for a leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Side {
    /// Long position (bought).
    #[serde(alias = "BUY")]
    Long,
    /// Short position (sold/written).
    #[serde(alias = "SELL")]
    Short,
}

impl Side {
    /// +1 for long, -1 for short.
    #[must_use]
    pub const fn sign(self) -> f64 {
        match self {
            Self::Long => 1.0,
            Self::Short => -1.0,
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Long => write!(f, "Long"),
            Self::Short => write!(f, "Short"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_option_type_display() {
        assert_eq!(format!("{}", OptionType::Call), "Call");
        assert_eq!(format!("{}", OptionType::Put), "Put");
    }

    #[test]
    fn test_intrinsic() {
        assert_eq!(OptionType::Call.intrinsic(110.0, 100.0), 10.0);
        assert_eq!(OptionType::Put.intrinsic(90.0, 100.0), 10.0);
        assert_eq!(OptionType::Call.intrinsic(90.0, 100.0), 0.0);
        assert_eq!(OptionType::Put.intrinsic(110.0, 100.0), 0.0);
    }

    #[test]
    fn test_side_serde_aliases() {
        let side: Side = serde_json::from_str("\"BUY\"").unwrap();
        assert_eq!(side, Side::Long);
        let side: Side = serde_json::from_str("\"SHORT\"").unwrap();
        assert_eq!(side, Side::Short);
        assert_eq!(serde_json::to_string(&Side::Long).unwrap(), "\"LONG\"");
        assert_eq!(Side::Short.sign(), -1.0);
    }
}
