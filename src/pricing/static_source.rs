use std::collections::HashMap;

use async_trait::async_trait;
use rust_decimal::Decimal;

use super::{PriceError, PriceSource};

/// Fixed price table. Tickers not in the table report no data.
#[derive(Debug, Clone, Default)]
pub struct StaticPriceSource {
    prices: HashMap<String, Decimal>,
}

impl StaticPriceSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_price(mut self, ticker: &str, price: Decimal) -> Self {
        self.prices.insert(ticker.to_uppercase(), price);
        self
    }
}

#[async_trait]
impl PriceSource for StaticPriceSource {
    async fn get_price(&self, ticker: &str) -> Result<Decimal, PriceError> {
        self.prices
            .get(&ticker.to_uppercase())
            .copied()
            .ok_or_else(|| PriceError::NoData {
                ticker: ticker.to_string(),
            })
    }
}
