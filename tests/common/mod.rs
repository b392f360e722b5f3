use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use rust_decimal::Decimal;

use tradebook::ledger::{Ledger, LedgerSettings, NewTrade};
use tradebook::models::{ClosedTrade, PositionType, Trade};
use tradebook::pricing::{PriceError, PriceSource, StaticPriceSource};
use tradebook::store::MemoryStore;

/// Price source that counts how often it was asked.
#[allow(dead_code)]
pub struct CountingSource {
    pub inner: StaticPriceSource,
    pub calls: AtomicUsize,
}

#[allow(dead_code)]
impl CountingSource {
    pub fn new(inner: StaticPriceSource) -> Self {
        Self {
            inner,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PriceSource for CountingSource {
    async fn get_price(&self, ticker: &str) -> Result<Decimal, PriceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.get_price(ticker).await
    }
}

/// Ledger over in-memory stores with the given price source.
#[allow(dead_code)]
pub fn memory_ledger(prices: Arc<dyn PriceSource>, settings: LedgerSettings) -> Ledger {
    Ledger::new(
        Arc::new(MemoryStore::<Trade>::new()),
        Arc::new(MemoryStore::<ClosedTrade>::new()),
        prices,
        settings,
    )
}

/// Sample trade fields for testing.
#[allow(dead_code)]
pub fn new_trade(ticker: &str, entry_price: Decimal, position_type: PositionType) -> NewTrade {
    NewTrade::new(
        ticker,
        entry_price,
        Decimal::from(100),
        position_type,
        Decimal::from(5),
    )
    .expect("valid test trade")
}

/// SLV at 26.75, USO at 30.00; anything else has no data.
#[allow(dead_code)]
pub fn sample_prices() -> StaticPriceSource {
    StaticPriceSource::new()
        .with_price("SLV", Decimal::new(2675, 2))
        .with_price("USO", Decimal::new(3000, 2))
}
