use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

use super::calculator::{realized_pl, round2};
use crate::models::{ClosedTrade, Valuation};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortfolioSummary {
    pub open_trades: usize,
    pub closed_trades: usize,
    /// Sum over successfully priced open trades only.
    pub total_unrealized_pl: Decimal,
    pub unpriced_trades: usize,
    /// Sum over closed trades whose P/L fits the decimal range.
    pub total_realized_pl: Decimal,
    pub unvalued_closed_trades: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("portfolio {0} P/L total overflows")]
pub struct TotalOverflow(pub &'static str);

pub fn summarize(
    valuations: &[Valuation],
    closed: &[ClosedTrade],
) -> Result<PortfolioSummary, TotalOverflow> {
    let total_unrealized_pl = checked_total(
        valuations
            .iter()
            .filter(|v| !v.is_error())
            .map(|v| v.unrealized_pl),
    )
    .ok_or(TotalOverflow("unrealized"))?;
    let unpriced_trades = valuations.iter().filter(|v| v.is_error()).count();

    let realized: Vec<Decimal> = closed.iter().filter_map(realized_pl).collect();
    let unvalued_closed_trades = closed.len() - realized.len();
    let total_realized_pl =
        checked_total(realized.into_iter()).ok_or(TotalOverflow("realized"))?;

    Ok(PortfolioSummary {
        open_trades: valuations.len(),
        closed_trades: closed.len(),
        total_unrealized_pl: round2(total_unrealized_pl),
        unpriced_trades,
        total_realized_pl: round2(total_realized_pl),
        unvalued_closed_trades,
    })
}

fn checked_total(mut values: impl Iterator<Item = Decimal>) -> Option<Decimal> {
    values.try_fold(Decimal::ZERO, |acc, v| acc.checked_add(v))
}
