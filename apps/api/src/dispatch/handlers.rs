use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::dispatch::outreach::{send_to_vendors, DispatchOutcome, DispatchStatus};
use crate::errors::AppError;
use crate::models::dispatch::DispatchRow;
use crate::models::vendor::VendorRow;
use crate::rfp::handlers::fetch_rfp;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SendRfpRequest {
    pub vendor_ids: Vec<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct SendRfpResponse {
    pub rfp_id: Uuid,
    pub requested: usize,
    pub sent: usize,
    pub failed: usize,
    pub outcomes: Vec<DispatchOutcome>,
}

/// POST /api/v1/rfps/:id/send
///
/// Emails the RFP to the named vendors, one at a time. Each attempt is
/// recorded as a dispatch row; the response summarizes what went out.
pub async fn handle_send_rfp(
    State(state): State<AppState>,
    Path(rfp_id): Path<Uuid>,
    Json(request): Json<SendRfpRequest>,
) -> Result<Json<SendRfpResponse>, AppError> {
    let mut vendor_ids = request.vendor_ids;
    vendor_ids.sort();
    vendor_ids.dedup();
    if vendor_ids.is_empty() {
        return Err(AppError::Validation(
            "vendor_ids cannot be empty".to_string(),
        ));
    }

    let rfp = fetch_rfp(&state.db, rfp_id).await?;

    let vendors = sqlx::query_as::<_, VendorRow>("SELECT * FROM vendors WHERE id = ANY($1)")
        .bind(&vendor_ids)
        .fetch_all(&state.db)
        .await?;

    if vendors.len() != vendor_ids.len() {
        let found: Vec<Uuid> = vendors.iter().map(|v| v.id).collect();
        let missing: Vec<String> = vendor_ids
            .iter()
            .filter(|id| !found.contains(id))
            .map(|id| id.to_string())
            .collect();
        return Err(AppError::NotFound(format!(
            "Unknown vendor ids: {}",
            missing.join(", ")
        )));
    }

    let outcomes = send_to_vendors(state.mailer.as_ref(), &rfp, &vendors).await;

    for outcome in &outcomes {
        sqlx::query(
            r#"
            INSERT INTO dispatches (id, rfp_id, vendor_id, status, error)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(rfp.id)
        .bind(outcome.vendor_id)
        .bind(outcome.status.as_str())
        .bind(outcome.error.as_deref())
        .execute(&state.db)
        .await?;
    }

    let sent = outcomes
        .iter()
        .filter(|o| o.status == DispatchStatus::Sent)
        .count();
    let failed = outcomes.len() - sent;

    // Nothing went out at all — the relay itself is in trouble, surface it.
    // Per-vendor outcomes are already on the dispatch log.
    if sent == 0 {
        return Err(AppError::Mail(format!(
            "all {} sends failed for RFP {}",
            outcomes.len(),
            rfp.id
        )));
    }

    if rfp.status == "open" {
        sqlx::query("UPDATE rfps SET status = 'sent' WHERE id = $1")
            .bind(rfp.id)
            .execute(&state.db)
            .await?;
    }

    Ok(Json(SendRfpResponse {
        rfp_id: rfp.id,
        requested: outcomes.len(),
        sent,
        failed,
        outcomes,
    }))
}

/// GET /api/v1/rfps/:id/dispatches
///
/// Returns the send log for an RFP, oldest first.
pub async fn handle_list_dispatches(
    State(state): State<AppState>,
    Path(rfp_id): Path<Uuid>,
) -> Result<Json<Vec<DispatchRow>>, AppError> {
    fetch_rfp(&state.db, rfp_id).await?;

    let dispatches = sqlx::query_as::<_, DispatchRow>(
        "SELECT * FROM dispatches WHERE rfp_id = $1 ORDER BY created_at ASC",
    )
    .bind(rfp_id)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(dispatches))
}
