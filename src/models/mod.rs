pub mod timestamp;
pub mod trade;
pub mod valuation;

pub use trade::{ClosedTrade, Trade};
pub use valuation::Valuation;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// PositionType
// ---------------------------------------------------------------------------

/// Directional tag of a trade. `OW`/`UW` are the historical overweight /
/// underweight tags; `LONG`/`SHORT` carry identical semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PositionType {
    #[serde(rename = "OW")]
    Overweight,
    #[serde(rename = "UW")]
    Underweight,
    #[serde(rename = "LONG")]
    Long,
    #[serde(rename = "SHORT")]
    Short,
}

impl PositionType {
    pub fn from_api_str(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "OW" => Some(PositionType::Overweight),
            "UW" => Some(PositionType::Underweight),
            "LONG" => Some(PositionType::Long),
            "SHORT" => Some(PositionType::Short),
            _ => None,
        }
    }

    /// True for positions that profit when the price falls.
    pub fn is_inverted(&self) -> bool {
        matches!(self, PositionType::Underweight | PositionType::Short)
    }

    /// Apply this direction's sign to a raw price-movement figure.
    pub fn apply_sign(&self, raw: Decimal) -> Decimal {
        if self.is_inverted() {
            -raw
        } else {
            raw
        }
    }
}

impl fmt::Display for PositionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PositionType::Overweight => write!(f, "OW"),
            PositionType::Underweight => write!(f, "UW"),
            PositionType::Long => write!(f, "LONG"),
            PositionType::Short => write!(f, "SHORT"),
        }
    }
}
