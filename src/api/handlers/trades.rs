use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::api::extract::{ApiJson, OptionalJson};
use crate::errors::AppError;
use crate::ledger::{parse_decimal, CloseScope, NewTrade};
use crate::models::Trade;
use crate::AppState;

#[derive(Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
}

// ---------------------------------------------------------------------------
// DTOs
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CloseRequest {
    #[serde(default)]
    pub close_price: Option<Value>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CloseByTickerRequest {
    pub ticker: String,
    pub scope: CloseScope,
    #[serde(default)]
    pub close_price: Option<Value>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/trades: open trades
pub async fn list(State(state): State<AppState>) -> Result<Json<ApiResponse<Vec<Trade>>>, AppError> {
    let trades = state.ledger.list_open().await?;
    Ok(Json(ApiResponse::ok(trades)))
}

/// POST /api/v1/trades: open a trade
pub async fn create(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<Value>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let new_trade = NewTrade::from_json(&body)?;
    let trade = state.ledger.add(new_trade).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "status": "success", "added": trade })),
    ))
}

/// DELETE /api/v1/trades/:id: discard an open trade without closing it
pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let removed = state.ledger.remove(&id).await?;
    Ok(Json(json!({ "status": "success", "deleted": removed.id })))
}

/// POST /api/v1/trades/:id/close: close at the given or live price
pub async fn close(
    State(state): State<AppState>,
    Path(id): Path<String>,
    OptionalJson(body): OptionalJson<CloseRequest>,
) -> Result<Json<Value>, AppError> {
    let manual_price = match body.and_then(|b| b.close_price) {
        Some(v) => parse_decimal(&v, "close_price")?,
        None => None,
    };

    let closed = state.ledger.close(&id, manual_price).await?;
    Ok(Json(json!({
        "status": "success",
        "closed": closed.id(),
        "price": closed.close_price,
    })))
}

/// POST /api/v1/close-by-ticker: close the first or all open trades for a ticker
pub async fn close_by_ticker(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<CloseByTickerRequest>,
) -> Result<Json<Value>, AppError> {
    let manual_price = match &body.close_price {
        Some(v) => parse_decimal(v, "close_price")?,
        None => None,
    };

    let closed = state
        .ledger
        .close_by_ticker(&body.ticker, body.scope, manual_price)
        .await?;

    let ids: Vec<&str> = closed.iter().map(|c| c.id()).collect();
    let price = closed.first().map(|c| c.close_price);
    Ok(Json(json!({
        "status": "success",
        "closed": ids,
        "price": price,
    })))
}
