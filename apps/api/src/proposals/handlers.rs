use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::proposal::{ProposalRow, ProposalWithVendorRow};
use crate::proposals::ingest::ingest_reply;
use crate::rfp::handlers::fetch_rfp;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SubmitResponseRequest {
    pub vendor_id: Uuid,
    #[serde(default)]
    pub subject: String,
    pub body: String,
}

/// POST /api/v1/rfps/:id/responses
///
/// Ingests a vendor's reply email: the body is parsed by the LLM and stored
/// as that vendor's proposal for the RFP.
pub async fn handle_submit_response(
    State(state): State<AppState>,
    Path(rfp_id): Path<Uuid>,
    Json(request): Json<SubmitResponseRequest>,
) -> Result<Json<ProposalRow>, AppError> {
    if request.body.trim().is_empty() {
        return Err(AppError::Validation("body cannot be empty".to_string()));
    }

    // Both sides of the pair must exist before we spend an LLM call
    fetch_rfp(&state.db, rfp_id).await?;
    let vendor_exists: Option<Uuid> = sqlx::query_scalar("SELECT id FROM vendors WHERE id = $1")
        .bind(request.vendor_id)
        .fetch_optional(&state.db)
        .await?;
    if vendor_exists.is_none() {
        return Err(AppError::NotFound(format!(
            "Vendor {} not found",
            request.vendor_id
        )));
    }

    let proposal = ingest_reply(
        &state.db,
        &state.llm,
        rfp_id,
        request.vendor_id,
        &request.subject,
        &request.body,
    )
    .await?;

    Ok(Json(proposal))
}

/// GET /api/v1/rfps/:id/responses
///
/// Lists all proposals received for an RFP, vendor names included.
pub async fn handle_list_responses(
    State(state): State<AppState>,
    Path(rfp_id): Path<Uuid>,
) -> Result<Json<Vec<ProposalWithVendorRow>>, AppError> {
    fetch_rfp(&state.db, rfp_id).await?;

    let proposals = sqlx::query_as::<_, ProposalWithVendorRow>(
        r#"
        SELECT p.*, v.name AS vendor_name
        FROM proposals p
        JOIN vendors v ON v.id = p.vendor_id
        WHERE p.rfp_id = $1
        ORDER BY p.created_at ASC
        "#,
    )
    .bind(rfp_id)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(proposals))
}
