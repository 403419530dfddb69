use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One row per attempted send of an RFP to a vendor.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DispatchRow {
    pub id: Uuid,
    pub rfp_id: Uuid,
    pub vendor_id: Uuid,
    /// "sent" | "failed"
    pub status: String,
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
}
