pub mod api;
pub mod config;
pub mod errors;
pub mod ledger;
pub mod metrics;
pub mod models;
pub mod pricing;
pub mod store;
pub mod valuation;

use crate::config::AppConfig;
use crate::ledger::Ledger;

#[derive(Clone)]
pub struct AppState {
    pub ledger: Ledger,
    pub config: AppConfig,
    pub metrics_handle: metrics_exporter_prometheus::PrometheusHandle,
}
