use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// Persisted outcome of a comparison run over an RFP's proposals.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ComparisonRow {
    pub id: Uuid,
    pub rfp_id: Uuid,
    /// Per-vendor score cards as a JSONB array of `VendorScore`.
    pub scores: Value,
    pub recommended_vendor: String,
    pub reason: String,
    pub created_at: DateTime<Utc>,
}
