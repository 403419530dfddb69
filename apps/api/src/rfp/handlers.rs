use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::rfp::RfpRow;
use crate::rfp::intake::create_rfp_from_text;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateRfpRequest {
    pub text: String,
}

/// POST /api/v1/rfps
///
/// Creates an RFP from a free-text procurement request via the intake LLM call.
pub async fn handle_create_rfp(
    State(state): State<AppState>,
    Json(request): Json<CreateRfpRequest>,
) -> Result<Json<RfpRow>, AppError> {
    if request.text.trim().is_empty() {
        return Err(AppError::Validation("text cannot be empty".to_string()));
    }

    let rfp = create_rfp_from_text(&state.db, &state.llm, &request.text).await?;
    Ok(Json(rfp))
}

/// GET /api/v1/rfps
///
/// Lists all RFPs, newest first.
pub async fn handle_list_rfps(
    State(state): State<AppState>,
) -> Result<Json<Vec<RfpRow>>, AppError> {
    let rfps = sqlx::query_as::<_, RfpRow>("SELECT * FROM rfps ORDER BY created_at DESC")
        .fetch_all(&state.db)
        .await?;
    Ok(Json(rfps))
}

/// GET /api/v1/rfps/:id
pub async fn handle_get_rfp(
    State(state): State<AppState>,
    Path(rfp_id): Path<Uuid>,
) -> Result<Json<RfpRow>, AppError> {
    let rfp = fetch_rfp(&state.db, rfp_id).await?;
    Ok(Json(rfp))
}

/// Loads an RFP or returns a 404. Shared with the dispatch, proposals, and
/// award handlers.
pub async fn fetch_rfp(pool: &sqlx::PgPool, rfp_id: Uuid) -> Result<RfpRow, AppError> {
    sqlx::query_as::<_, RfpRow>("SELECT * FROM rfps WHERE id = $1")
        .bind(rfp_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("RFP {rfp_id} not found")))
}
