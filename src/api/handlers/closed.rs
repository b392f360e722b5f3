use axum::extract::State;
use axum::Json;

use crate::errors::AppError;
use crate::models::ClosedTrade;
use crate::AppState;

use super::trades::ApiResponse;

/// GET /api/v1/closed: closed trade history, oldest first
pub async fn list(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<ClosedTrade>>>, AppError> {
    let closed = state.ledger.list_closed().await?;
    Ok(Json(ApiResponse::ok(closed)))
}
