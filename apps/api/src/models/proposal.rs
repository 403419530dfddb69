use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// A parsed vendor reply for one (rfp, vendor) pair. Resubmission replaces
/// the previous parse, so at most one row exists per pair.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ProposalRow {
    pub id: Uuid,
    pub rfp_id: Uuid,
    pub vendor_id: Uuid,
    pub subject: String,
    pub raw_body: String,
    /// Quoted line items as a JSONB array of `ProposalItem`.
    pub items: Value,
    pub total: f64,
    pub currency: String,
    pub delivery_days: i32,
    pub warranty_months: i32,
    pub payment_terms: String,
    /// Model's estimate of how fully the reply answers the request, in [0, 1].
    pub completeness_score: f64,
    pub created_at: DateTime<Utc>,
}

/// A single quoted line item, embedded in the proposal row as JSONB.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProposalItem {
    pub description: String,
    pub quantity: u32,
    pub unit_price: f64,
    pub total_price: f64,
}

/// Proposal joined with the vendor's display name, for listings and the
/// comparison prompt.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ProposalWithVendorRow {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub proposal: ProposalRow,
    pub vendor_name: String,
}
