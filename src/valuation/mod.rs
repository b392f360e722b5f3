pub mod calculator;
pub mod summary;

pub use calculator::{compute_pl, failed_valuation, realized_pl, round2, valuation_at, PlFigures};
pub use summary::{summarize, PortfolioSummary, TotalOverflow};

use std::time::Duration;

use futures_util::future::join_all;
use metrics::counter;

use crate::models::{Trade, Valuation};
use crate::pricing::{fetch_price, PriceSource};

/// Price and value a single trade. A price failure becomes an error-flagged
/// record; it never escapes as an error.
pub async fn value_trade(trade: &Trade, source: &dyn PriceSource, timeout: Duration) -> Valuation {
    match fetch_price(source, &trade.ticker, timeout).await {
        Ok(price) => {
            let v = valuation_at(trade, price);
            tracing::debug!(
                trade_id = %trade.id,
                ticker = %trade.ticker,
                live = %v.live_price,
                pl = %v.unrealized_pl,
                pl_pct = %v.unrealized_pl_pct,
                "Trade valued"
            );
            v
        }
        Err(e) => failed_valuation(trade, e.to_string()),
    }
}

/// Value every trade concurrently. The result is 1:1 with `trades` and in
/// the same order.
pub async fn value_all(
    trades: &[Trade],
    source: &dyn PriceSource,
    timeout: Duration,
) -> Vec<Valuation> {
    counter!("valuations_total").increment(1);
    join_all(trades.iter().map(|t| value_trade(t, source, timeout))).await
}
