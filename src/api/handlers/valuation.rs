use axum::extract::State;
use axum::Json;

use crate::errors::AppError;
use crate::models::Valuation;
use crate::AppState;

use super::trades::ApiResponse;

/// GET /api/v1/pl: unrealized P/L for every open trade, in ledger order.
/// Trades whose price could not be fetched carry an `error` field.
pub async fn list(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<Valuation>>>, AppError> {
    let valuations = state.ledger.valuations().await?;
    Ok(Json(ApiResponse::ok(valuations)))
}
