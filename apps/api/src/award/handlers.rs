use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use crate::award::advisor::{compare_proposals, ComparisonOutcome};
use crate::errors::AppError;
use crate::models::award::ComparisonRow;
use crate::rfp::handlers::fetch_rfp;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct CompareResponse {
    pub comparison_id: Uuid,
    pub rfp_id: Uuid,
    #[serde(flatten)]
    pub outcome: ComparisonOutcome,
}

/// POST /api/v1/rfps/:id/compare
///
/// Scores all proposals for an RFP via the LLM and persists the outcome.
pub async fn handle_compare(
    State(state): State<AppState>,
    Path(rfp_id): Path<Uuid>,
) -> Result<Json<CompareResponse>, AppError> {
    let rfp = fetch_rfp(&state.db, rfp_id).await?;
    let (row, outcome) = compare_proposals(&state.db, &state.llm, &rfp).await?;

    Ok(Json(CompareResponse {
        comparison_id: row.id,
        rfp_id: rfp.id,
        outcome,
    }))
}

/// GET /api/v1/rfps/:id/comparison
///
/// Returns the most recent stored comparison for an RFP.
pub async fn handle_get_comparison(
    State(state): State<AppState>,
    Path(rfp_id): Path<Uuid>,
) -> Result<Json<ComparisonRow>, AppError> {
    fetch_rfp(&state.db, rfp_id).await?;

    let comparison = sqlx::query_as::<_, ComparisonRow>(
        "SELECT * FROM comparisons WHERE rfp_id = $1 ORDER BY created_at DESC LIMIT 1",
    )
    .bind(rfp_id)
    .fetch_optional(&state.db)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("No comparison on file for RFP {rfp_id}")))?;

    Ok(Json(comparison))
}
