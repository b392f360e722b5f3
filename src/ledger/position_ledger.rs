use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use metrics::{counter, gauge};
use rust_decimal::Decimal;
use tokio::sync::RwLock;

use super::{ClosePricePolicy, CloseScope, LedgerError, NewTrade, MAX_PRICE};
use crate::models::{ClosedTrade, Trade, Valuation};
use crate::pricing::{fetch_price, PriceSource};
use crate::store::RecordStore;
use crate::valuation::value_all;

#[derive(Debug, Clone, Copy)]
pub struct LedgerSettings {
    pub price_timeout: Duration,
    pub close_price_policy: ClosePricePolicy,
}

impl Default for LedgerSettings {
    fn default() -> Self {
        Self {
            price_timeout: Duration::from_secs(10),
            close_price_policy: ClosePricePolicy::Reject,
        }
    }
}

/// Both collections as observed under one read lock.
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerSnapshot {
    pub open: Vec<Trade>,
    pub closed: Vec<ClosedTrade>,
}

/// The open/closed partition of trades.
///
/// Every mutation runs its read-modify-write under the write half of `lock`,
/// so readers never observe a half-applied close. Live prices are fetched
/// before the lock is taken.
#[derive(Clone)]
pub struct Ledger {
    open: Arc<dyn RecordStore<Trade>>,
    closed: Arc<dyn RecordStore<ClosedTrade>>,
    prices: Arc<dyn PriceSource>,
    settings: LedgerSettings,
    lock: Arc<RwLock<()>>,
}

impl Ledger {
    pub fn new(
        open: Arc<dyn RecordStore<Trade>>,
        closed: Arc<dyn RecordStore<ClosedTrade>>,
        prices: Arc<dyn PriceSource>,
        settings: LedgerSettings,
    ) -> Self {
        Self {
            open,
            closed,
            prices,
            settings,
            lock: Arc::new(RwLock::new(())),
        }
    }

    /// Build a ledger over existing stores and repair any trade left in both
    /// collections by an interrupted close.
    pub async fn load(
        open: Arc<dyn RecordStore<Trade>>,
        closed: Arc<dyn RecordStore<ClosedTrade>>,
        prices: Arc<dyn PriceSource>,
        settings: LedgerSettings,
    ) -> Result<Self, LedgerError> {
        let ledger = Self::new(open, closed, prices, settings);
        let repaired = ledger.reconcile().await?;
        let snapshot = ledger.snapshot().await?;
        gauge!("open_trades").set(snapshot.open.len() as f64);

        tracing::info!(
            open = snapshot.open.len(),
            closed = snapshot.closed.len(),
            repaired,
            "Ledger loaded"
        );
        Ok(ledger)
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    pub async fn list_open(&self) -> Result<Vec<Trade>, LedgerError> {
        let _guard = self.lock.read().await;
        Ok(self.open.read_all().await?)
    }

    pub async fn list_closed(&self) -> Result<Vec<ClosedTrade>, LedgerError> {
        let _guard = self.lock.read().await;
        Ok(self.closed.read_all().await?)
    }

    pub async fn snapshot(&self) -> Result<LedgerSnapshot, LedgerError> {
        let _guard = self.lock.read().await;
        Ok(LedgerSnapshot {
            open: self.open.read_all().await?,
            closed: self.closed.read_all().await?,
        })
    }

    /// Value every open trade against its live price. Per-trade price
    /// failures come back as error-flagged records.
    pub async fn valuations(&self) -> Result<Vec<Valuation>, LedgerError> {
        let trades = self.list_open().await?;
        Ok(value_all(&trades, self.prices.as_ref(), self.settings.price_timeout).await)
    }

    // -----------------------------------------------------------------------
    // Mutations
    // -----------------------------------------------------------------------

    pub async fn add(&self, new_trade: NewTrade) -> Result<Trade, LedgerError> {
        let trade = new_trade.into_trade(Utc::now());

        let _guard = self.lock.write().await;
        let mut open = self.open.read_all().await?;
        open.push(trade.clone());
        self.open.write_all(&open).await?;

        counter!("trades_opened").increment(1);
        gauge!("open_trades").set(open.len() as f64);
        tracing::info!(
            trade_id = %trade.id,
            ticker = %trade.ticker,
            entry = %trade.entry_price,
            shares = %trade.shares,
            position_type = %trade.position_type,
            "Trade opened"
        );
        Ok(trade)
    }

    /// Delete an open trade without recording a closure.
    pub async fn remove(&self, id: &str) -> Result<Trade, LedgerError> {
        let _guard = self.lock.write().await;
        let mut open = self.open.read_all().await?;
        let idx = open
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| LedgerError::NotFound(id.to_string()))?;

        let removed = open.remove(idx);
        self.open.write_all(&open).await?;

        counter!("trades_removed").increment(1);
        gauge!("open_trades").set(open.len() as f64);
        tracing::info!(trade_id = %removed.id, ticker = %removed.ticker, "Trade removed");
        Ok(removed)
    }

    /// Close one trade by id at `close_price`, or at the live price when none
    /// is given. A manual price of zero counts as not given.
    pub async fn close(
        &self,
        id: &str,
        close_price: Option<Decimal>,
    ) -> Result<ClosedTrade, LedgerError> {
        let trade = self
            .find_open(id)
            .await?
            .ok_or_else(|| LedgerError::NotFound(id.to_string()))?;

        let price = match manual_price(close_price)? {
            Some(p) => p,
            None => self.live_close_price(&trade.ticker).await?,
        };

        // The trade may have been closed or removed while the price was fetched.
        let mut closed = self
            .commit_close(price, |open| {
                open.iter().position(|t| t.id == id).into_iter().collect()
            })
            .await?;

        if closed.is_empty() {
            return Err(LedgerError::NotFound(id.to_string()));
        }
        Ok(closed.remove(0))
    }

    /// Close open trades for a ticker. Every trade removed from the open
    /// ledger gets its own closed record.
    pub async fn close_by_ticker(
        &self,
        ticker: &str,
        scope: CloseScope,
        close_price: Option<Decimal>,
    ) -> Result<Vec<ClosedTrade>, LedgerError> {
        let ticker = ticker.trim().to_uppercase();
        if ticker.is_empty() {
            return Err(LedgerError::Validation("ticker must not be empty".into()));
        }

        let has_open = self
            .list_open()
            .await?
            .iter()
            .any(|t| t.ticker.eq_ignore_ascii_case(&ticker));
        if !has_open {
            return Err(LedgerError::NotFound(ticker));
        }

        let price = match manual_price(close_price)? {
            Some(p) => p,
            None => self.live_close_price(&ticker).await?,
        };

        let closed = self
            .commit_close(price, |open| {
                let matching = open
                    .iter()
                    .enumerate()
                    .filter(|(_, t)| t.ticker.eq_ignore_ascii_case(&ticker))
                    .map(|(i, _)| i);
                match scope {
                    CloseScope::First => matching.take(1).collect(),
                    CloseScope::All => matching.collect(),
                }
            })
            .await?;

        if closed.is_empty() {
            return Err(LedgerError::NotFound(ticker));
        }
        Ok(closed)
    }

    /// Drop open trades whose id already appears in the closed ledger.
    /// Returns the number of trades dropped.
    pub async fn reconcile(&self) -> Result<usize, LedgerError> {
        let _guard = self.lock.write().await;
        let open = self.open.read_all().await?;
        let closed_ids: HashSet<String> = self
            .closed
            .read_all()
            .await?
            .into_iter()
            .map(|c| c.trade.id)
            .collect();

        let (stale, kept): (Vec<Trade>, Vec<Trade>) =
            open.into_iter().partition(|t| closed_ids.contains(&t.id));
        if stale.is_empty() {
            return Ok(0);
        }

        for t in &stale {
            tracing::warn!(
                trade_id = %t.id,
                ticker = %t.ticker,
                "Open trade already recorded as closed, dropping from open ledger"
            );
        }
        self.open.write_all(&kept).await?;
        Ok(stale.len())
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    async fn find_open(&self, id: &str) -> Result<Option<Trade>, LedgerError> {
        Ok(self.list_open().await?.into_iter().find(|t| t.id == id))
    }

    async fn live_close_price(&self, ticker: &str) -> Result<Decimal, LedgerError> {
        match fetch_price(self.prices.as_ref(), ticker, self.settings.price_timeout).await {
            Ok(price) => Ok(price),
            Err(e) => match self.settings.close_price_policy {
                ClosePricePolicy::Reject => Err(e.into()),
                ClosePricePolicy::Zero => {
                    tracing::warn!(
                        ticker = %ticker,
                        error = %e,
                        "Live price unavailable, closing at zero"
                    );
                    Ok(Decimal::ZERO)
                }
            },
        }
    }

    /// Move the trades chosen by `select` (indices into the open ledger) to
    /// the closed ledger at `price`.
    ///
    /// The closed ledger is written first. If the open ledger then fails to
    /// write, the closed ledger is restored so no id ends up in both.
    async fn commit_close<F>(&self, price: Decimal, select: F) -> Result<Vec<ClosedTrade>, LedgerError>
    where
        F: FnOnce(&[Trade]) -> Vec<usize>,
    {
        let _guard = self.lock.write().await;
        let open = self.open.read_all().await?;
        let picked: HashSet<usize> = select(&open).into_iter().collect();
        if picked.is_empty() {
            return Ok(Vec::new());
        }

        let now = Utc::now();
        let mut remaining = Vec::with_capacity(open.len());
        let mut records = Vec::with_capacity(picked.len());
        for (i, trade) in open.into_iter().enumerate() {
            if picked.contains(&i) {
                records.push(ClosedTrade::new(trade, price, now));
            } else {
                remaining.push(trade);
            }
        }

        let history = self.closed.read_all().await?;
        let mut appended = history.clone();
        appended.extend(records.iter().cloned());
        self.closed.write_all(&appended).await?;

        if let Err(e) = self.open.write_all(&remaining).await {
            if let Err(restore) = self.closed.write_all(&history).await {
                tracing::error!(
                    error = %restore,
                    "Failed to restore closed ledger after open ledger write failure"
                );
            }
            return Err(e.into());
        }

        counter!("trades_closed").increment(records.len() as u64);
        gauge!("open_trades").set(remaining.len() as f64);
        for r in &records {
            tracing::info!(
                trade_id = %r.trade.id,
                ticker = %r.trade.ticker,
                close_price = %r.close_price,
                "Trade closed"
            );
        }
        Ok(records)
    }
}

/// Validate a caller-supplied close price. Zero falls back to the live price.
fn manual_price(price: Option<Decimal>) -> Result<Option<Decimal>, LedgerError> {
    match price {
        Some(p) if p < Decimal::ZERO => Err(LedgerError::Validation(format!(
            "close_price must not be negative, got {p}"
        ))),
        Some(p) if p > MAX_PRICE => Err(LedgerError::Validation(format!(
            "close_price must not exceed {MAX_PRICE}, got {p}"
        ))),
        Some(p) if p.is_zero() => Ok(None),
        other => Ok(other),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
