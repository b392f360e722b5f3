use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde_json::{Map, Value};
use uuid::Uuid;

use super::LedgerError;
use crate::models::{PositionType, Trade};

/// Largest accepted entry or close price (1e9).
pub const MAX_PRICE: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

/// Largest accepted share count (1e12).
pub const MAX_SHARES: Decimal = Decimal::from_parts(0xD4A5_1000, 0xE8, 0, false, 0);

/// Validated fields for opening a trade.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTrade {
    pub ticker: String,
    pub entry_price: Decimal,
    pub shares: Decimal,
    pub position_type: PositionType,
    pub position_amount: Decimal,
}

impl NewTrade {
    pub fn new(
        ticker: &str,
        entry_price: Decimal,
        shares: Decimal,
        position_type: PositionType,
        position_amount: Decimal,
    ) -> Result<Self, LedgerError> {
        let ticker = ticker.trim().to_uppercase();
        if ticker.is_empty() {
            return Err(LedgerError::Validation("ticker must not be empty".into()));
        }
        if entry_price < Decimal::ZERO {
            return Err(LedgerError::Validation(format!(
                "entry_price must not be negative, got {entry_price}"
            )));
        }
        if entry_price > MAX_PRICE {
            return Err(LedgerError::Validation(format!(
                "entry_price must not exceed {MAX_PRICE}, got {entry_price}"
            )));
        }
        if shares < Decimal::ZERO {
            return Err(LedgerError::Validation(format!(
                "shares must not be negative, got {shares}"
            )));
        }
        if shares > MAX_SHARES {
            return Err(LedgerError::Validation(format!(
                "shares must not exceed {MAX_SHARES}, got {shares}"
            )));
        }

        Ok(Self {
            ticker,
            entry_price,
            shares,
            position_type,
            position_amount,
        })
    }

    /// Validate a JSON request body. Numeric fields may be JSON numbers or
    /// numeric strings.
    pub fn from_json(body: &Value) -> Result<Self, LedgerError> {
        let obj = body
            .as_object()
            .ok_or_else(|| LedgerError::Validation("expected a JSON object".into()))?;

        let ticker = required(obj, "ticker")?
            .as_str()
            .ok_or_else(|| LedgerError::Validation("ticker must be a string".into()))?;
        let entry_price = required_decimal(obj, "entry_price")?;
        let shares = required_decimal(obj, "shares")?;
        let position_type = required(obj, "position_type")?
            .as_str()
            .and_then(PositionType::from_api_str)
            .ok_or_else(|| {
                LedgerError::Validation("position_type must be one of OW, UW, LONG, SHORT".into())
            })?;
        let position_amount = required_decimal(obj, "position_amount")?;

        Self::new(ticker, entry_price, shares, position_type, position_amount)
    }

    /// Stamp with a fresh id and creation time.
    pub fn into_trade(self, start_date: DateTime<Utc>) -> Trade {
        Trade {
            id: Uuid::new_v4().to_string(),
            ticker: self.ticker,
            entry_price: self.entry_price,
            shares: self.shares,
            position_type: self.position_type,
            position_amount: self.position_amount,
            start_date,
        }
    }
}

fn required<'a>(obj: &'a Map<String, Value>, field: &str) -> Result<&'a Value, LedgerError> {
    match obj.get(field) {
        None | Some(Value::Null) => Err(LedgerError::Validation(format!(
            "missing required field: {field}"
        ))),
        Some(v) => Ok(v),
    }
}

fn required_decimal(obj: &Map<String, Value>, field: &str) -> Result<Decimal, LedgerError> {
    parse_decimal(required(obj, field)?, field)?
        .ok_or_else(|| LedgerError::Validation(format!("missing required field: {field}")))
}

/// Coerce a JSON number or numeric string into a decimal.
/// `null` and blank strings yield `None`.
pub fn parse_decimal(value: &Value, field: &str) -> Result<Option<Decimal>, LedgerError> {
    let raw = match value {
        Value::Null => return Ok(None),
        Value::Number(n) => n.to_string(),
        Value::String(s) if s.trim().is_empty() => return Ok(None),
        Value::String(s) => s.trim().to_string(),
        _ => {
            return Err(LedgerError::Validation(format!(
                "{field} must be a number"
            )))
        }
    };

    Decimal::from_str(&raw)
        .or_else(|_| Decimal::from_scientific(&raw))
        .map(Some)
        .map_err(|_| LedgerError::Validation(format!("{field} is not a number: {raw}")))
}
