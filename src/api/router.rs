use axum::middleware;
use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::AppState;
use super::auth::require_auth;
use super::handlers;

pub fn create_router(state: AppState) -> Router {
    // Operational routes: no authentication
    let public = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/metrics", get(handlers::metrics::render));

    // Ledger API: reads are open, mutations require a Bearer token when API_TOKEN is set
    let api = Router::new()
        .route(
            "/api/v1/trades",
            get(handlers::trades::list).post(handlers::trades::create),
        )
        .route("/api/v1/trades/:id", delete(handlers::trades::remove))
        .route("/api/v1/trades/:id/close", post(handlers::trades::close))
        .route("/api/v1/close-by-ticker", post(handlers::trades::close_by_ticker))
        .route("/api/v1/closed", get(handlers::closed::list))
        .route("/api/v1/pl", get(handlers::valuation::list))
        .route("/api/v1/summary", get(handlers::summary::summary))
        .layer(middleware::from_fn_with_state(state.clone(), require_auth));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    public
        .merge(api)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
