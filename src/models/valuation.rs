use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::PositionType;

/// A trade enriched with its live price and unrealized P/L.
///
/// Every numeric field is always present. When the live price could not be
/// fetched they are zero and `error` names the failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Valuation {
    pub id: String,
    pub ticker: String,
    pub entry_price: Decimal,
    pub live_price: Decimal,
    pub shares: Decimal,
    pub unrealized_pl: Decimal,
    pub unrealized_pl_pct: Decimal,
    pub position_type: PositionType,
    pub position_amount: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Valuation {
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}
