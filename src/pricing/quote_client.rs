use async_trait::async_trait;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;

use super::{PriceError, PriceSource};

pub const DEFAULT_QUOTE_API_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";

// ---------------------------------------------------------------------------
// Chart API response
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct ChartResponse {
    pub chart: Chart,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chart {
    #[serde(default)]
    pub result: Option<Vec<ChartResult>>,
    #[serde(default)]
    pub error: Option<ChartError>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChartError {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChartResult {
    pub meta: ChartMeta,
    #[serde(default)]
    pub indicators: Option<Indicators>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartMeta {
    #[serde(default)]
    pub regular_market_price: Option<Decimal>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Indicators {
    #[serde(default)]
    pub quote: Vec<QuoteSeries>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuoteSeries {
    #[serde(default)]
    pub close: Vec<Option<Decimal>>,
}

/// Pick the latest price out of a chart response: the regular market price,
/// else the last non-null close of the day's series.
pub fn latest_price(ticker: &str, resp: &ChartResponse) -> Result<Decimal, PriceError> {
    if let Some(err) = &resp.chart.error {
        return Err(PriceError::Request {
            ticker: ticker.to_string(),
            reason: err
                .description
                .clone()
                .or_else(|| err.code.clone())
                .unwrap_or_else(|| "unknown chart error".into()),
        });
    }

    let result = resp
        .chart
        .result
        .as_ref()
        .and_then(|r| r.first())
        .ok_or_else(|| PriceError::NoData {
            ticker: ticker.to_string(),
        })?;

    if let Some(price) = result.meta.regular_market_price {
        return Ok(price);
    }

    result
        .indicators
        .as_ref()
        .and_then(|ind| ind.quote.first())
        .and_then(|q| q.close.iter().rev().find_map(|c| *c))
        .ok_or_else(|| PriceError::NoData {
            ticker: ticker.to_string(),
        })
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// HTTP client for a chart-style quote API (`{base}/{ticker}?range=1d`).
#[derive(Debug, Clone)]
pub struct QuoteClient {
    http: Client,
    base_url: String,
}

impl QuoteClient {
    pub fn new(http: Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    async fn fetch_chart(&self, ticker: &str) -> Result<ChartResponse, reqwest::Error> {
        let url = format!("{}/{}", self.base_url, ticker);
        let resp = self
            .http
            .get(&url)
            .query(&[("range", "1d"), ("interval", "1d")])
            .send()
            .await?
            .error_for_status()?;

        resp.json().await
    }
}

#[async_trait]
impl PriceSource for QuoteClient {
    async fn get_price(&self, ticker: &str) -> Result<Decimal, PriceError> {
        let chart = self
            .fetch_chart(ticker)
            .await
            .map_err(|e| PriceError::Request {
                ticker: ticker.to_string(),
                reason: e.to_string(),
            })?;

        let price = latest_price(ticker, &chart)?;
        tracing::debug!(ticker = %ticker, price = %price, "Fetched live quote");
        Ok(price)
    }
}
