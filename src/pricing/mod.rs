pub mod quote_client;
pub mod static_source;

pub use quote_client::QuoteClient;
pub use static_source::StaticPriceSource;

use std::time::Duration;

use async_trait::async_trait;
use metrics::counter;
use rust_decimal::Decimal;
use thiserror::Error;

/// Why a live price could not be obtained for a ticker.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PriceError {
    #[error("no price data for {ticker}")]
    NoData { ticker: String },

    #[error("price request for {ticker} failed: {reason}")]
    Request { ticker: String, reason: String },

    #[error("price request for {ticker} timed out after {secs}s")]
    Timeout { ticker: String, secs: u64 },

    #[error("invalid price {price} for {ticker}")]
    InvalidPrice { ticker: String, price: Decimal },
}

impl PriceError {
    pub fn ticker(&self) -> &str {
        match self {
            PriceError::NoData { ticker }
            | PriceError::Request { ticker, .. }
            | PriceError::Timeout { ticker, .. }
            | PriceError::InvalidPrice { ticker, .. } => ticker,
        }
    }
}

/// A live quote provider.
#[async_trait]
pub trait PriceSource: Send + Sync {
    async fn get_price(&self, ticker: &str) -> Result<Decimal, PriceError>;
}

/// Fetch a price, bounding the call by `timeout` and rejecting non-positive
/// quotes. Failures are logged and counted here so callers can treat them
/// as data.
pub async fn fetch_price(
    source: &dyn PriceSource,
    ticker: &str,
    timeout: Duration,
) -> Result<Decimal, PriceError> {
    let result = match tokio::time::timeout(timeout, source.get_price(ticker)).await {
        Ok(Ok(price)) if price <= Decimal::ZERO => Err(PriceError::InvalidPrice {
            ticker: ticker.to_string(),
            price,
        }),
        Ok(other) => other,
        Err(_) => Err(PriceError::Timeout {
            ticker: ticker.to_string(),
            secs: timeout.as_secs(),
        }),
    };

    if let Err(ref e) = result {
        counter!("price_fetch_failures").increment(1);
        tracing::warn!(ticker = %ticker, error = %e, "Live price unavailable");
    }

    result
}
