use std::sync::Arc;
use std::time::Duration;

use tradebook::api::router::create_router;
use tradebook::config::AppConfig;
use tradebook::ledger::Ledger;
use tradebook::pricing::QuoteClient;
use tradebook::store::open_data_dir;
use tradebook::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = AppConfig::from_env()?;
    let addr = format!("{}:{}", config.host, config.port);
    let metrics_handle = tradebook::metrics::init_metrics()?;

    // --- Storage ---
    let (open_store, closed_store) = open_data_dir(&config.data_dir);
    tracing::info!(
        trades = %open_store.path().display(),
        closed = %closed_store.path().display(),
        "Using ledger files"
    );

    // --- Live quotes ---
    let http = reqwest::Client::builder()
        .user_agent(concat!("tradebook/", env!("CARGO_PKG_VERSION")))
        .timeout(Duration::from_secs(config.price_timeout_secs))
        .build()?;
    let quotes = QuoteClient::new(http, config.quote_api_url.clone());

    let ledger = Ledger::load(
        Arc::new(open_store),
        Arc::new(closed_store),
        Arc::new(quotes),
        config.ledger_settings(),
    )
    .await?;

    if config.auth_enabled() {
        tracing::info!("Bearer-token auth enabled for mutating routes");
    } else {
        tracing::warn!("API_TOKEN not set, mutating routes are unauthenticated");
    }
    tracing::info!(
        close_price_policy = %config.close_price_policy,
        price_timeout_secs = config.price_timeout_secs,
        "Ledger ready"
    );

    let state = AppState {
        ledger,
        config,
        metrics_handle,
    };
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {addr}");
    axum::serve(listener, router).await?;

    Ok(())
}

fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer())
        .init();
}
