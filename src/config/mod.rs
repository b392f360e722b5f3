use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::Context;

use crate::ledger::{ClosePricePolicy, LedgerSettings};
use crate::pricing::quote_client::DEFAULT_QUOTE_API_URL;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,

    // Storage
    pub data_dir: PathBuf,

    // Live quotes
    pub quote_api_url: String,
    pub price_timeout_secs: u64,

    // Ledger
    pub close_price_policy: ClosePricePolicy,

    // Bearer token for mutating routes (None → auth disabled)
    pub api_token: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let config = Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env_parse("PORT", "8080")?,

            data_dir: env::var("DATA_DIR")
                .unwrap_or_else(|_| "data".into())
                .into(),

            quote_api_url: env::var("QUOTE_API_URL")
                .unwrap_or_else(|_| DEFAULT_QUOTE_API_URL.into()),
            price_timeout_secs: env_parse("PRICE_TIMEOUT_SECS", "10")?,

            close_price_policy: env_parse("CLOSE_PRICE_ON_FAILURE", "reject")?,

            api_token: env::var("API_TOKEN").ok().filter(|t| !t.is_empty()),
        };

        anyhow::ensure!(
            config.price_timeout_secs > 0,
            "PRICE_TIMEOUT_SECS must be at least 1"
        );
        Ok(config)
    }

    pub fn ledger_settings(&self) -> LedgerSettings {
        LedgerSettings {
            price_timeout: Duration::from_secs(self.price_timeout_secs),
            close_price_policy: self.close_price_policy,
        }
    }

    /// Returns true if mutating routes require a bearer token.
    pub fn auth_enabled(&self) -> bool {
        self.api_token.is_some()
    }
}

/// Parse `key` from the environment, using `default` when it is unset or blank.
fn env_parse<T>(key: &str, default: &str) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw = env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string());
    raw.trim()
        .parse()
        .with_context(|| format!("invalid {key}: {raw:?}"))
}
