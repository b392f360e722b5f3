use axum::extract::State;
use axum::Json;

use crate::errors::AppError;
use crate::valuation::{summarize, PortfolioSummary};
use crate::AppState;

/// GET /api/v1/summary: open/closed counts with unrealized and realized totals
pub async fn summary(State(state): State<AppState>) -> Result<Json<PortfolioSummary>, AppError> {
    let valuations = state.ledger.valuations().await?;
    let closed = state.ledger.list_closed().await?;
    let summary = summarize(&valuations, &closed).map_err(anyhow::Error::from)?;
    Ok(Json(summary))
}
