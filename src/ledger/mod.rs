pub mod new_trade;
pub mod position_ledger;

pub use new_trade::{parse_decimal, NewTrade, MAX_PRICE, MAX_SHARES};
pub use position_ledger::{Ledger, LedgerSettings, LedgerSnapshot};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::pricing::PriceError;
use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("trade not found: {0}")]
    NotFound(String),

    #[error("price unavailable: {0}")]
    PriceUnavailable(#[from] PriceError),

    #[error("storage failure: {0}")]
    Storage(#[from] StoreError),
}

// ---------------------------------------------------------------------------
// Close options
// ---------------------------------------------------------------------------

/// What to do when no manual close price is given and the live fetch fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClosePricePolicy {
    /// Fail the close; the ledger is left unchanged.
    #[default]
    Reject,
    /// Close at a price of zero.
    Zero,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown close price policy {0:?}, expected \"reject\" or \"zero\"")]
pub struct UnknownPolicy(pub String);

impl FromStr for ClosePricePolicy {
    type Err = UnknownPolicy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "reject" => Ok(ClosePricePolicy::Reject),
            "zero" => Ok(ClosePricePolicy::Zero),
            _ => Err(UnknownPolicy(s.to_string())),
        }
    }
}

impl fmt::Display for ClosePricePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClosePricePolicy::Reject => write!(f, "reject"),
            ClosePricePolicy::Zero => write!(f, "zero"),
        }
    }
}

/// How many open trades a ticker-keyed close applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CloseScope {
    /// The earliest open trade for the ticker.
    First,
    /// Every open trade for the ticker.
    All,
}
