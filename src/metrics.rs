use metrics::{counter, gauge};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Install the Prometheus exporter and register all application metrics.
/// Returns a `PrometheusHandle` whose `render()` method produces the
/// text/plain Prometheus scrape payload.
pub fn init_metrics() -> anyhow::Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new().install_recorder()?;

    // Pre-register counters so they appear even before the first increment.
    counter!("trades_opened").absolute(0);
    counter!("trades_removed").absolute(0);
    counter!("trades_closed").absolute(0);
    counter!("price_fetch_failures").absolute(0);
    counter!("valuations_total").absolute(0);

    gauge!("open_trades").set(0.0);

    Ok(handle)
}

/// A handle backed by a recorder that is not installed globally.
/// Lets tests build several apps in one process.
pub fn detached_handle() -> PrometheusHandle {
    PrometheusBuilder::new().build_recorder().handle()
}
