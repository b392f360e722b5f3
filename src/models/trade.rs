use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::PositionType;
use crate::valuation::round2;

/// An open position as stored in the open ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub id: String,
    pub ticker: String,
    pub entry_price: Decimal,
    pub shares: Decimal,
    pub position_type: PositionType,
    pub position_amount: Decimal,
    #[serde(with = "super::timestamp")]
    pub start_date: DateTime<Utc>,
}

/// A realized closure. Field names for the close annotation follow the
/// existing `closed-trades.json` format (`closePrice`, `closeDate`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClosedTrade {
    #[serde(flatten)]
    pub trade: Trade,
    #[serde(rename = "closePrice", alias = "close_price")]
    pub close_price: Decimal,
    #[serde(rename = "closeDate", alias = "close_date", with = "super::timestamp")]
    pub close_date: DateTime<Utc>,
    pub closed: bool,
}

impl ClosedTrade {
    pub fn new(trade: Trade, close_price: Decimal, close_date: DateTime<Utc>) -> Self {
        Self {
            trade,
            close_price: round2(close_price),
            close_date,
            closed: true,
        }
    }

    pub fn id(&self) -> &str {
        &self.trade.id
    }
}
