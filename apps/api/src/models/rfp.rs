use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RfpRow {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub budget: f64,
    pub currency: String,
    pub delivery_days: i32,
    pub payment_terms: String,
    pub warranty_months: i32,
    /// Requested line items as a JSONB array of `RfpItem`.
    pub items: Value,
    /// The original free-text intake the buyer submitted.
    pub raw_text: String,
    /// "open" on creation, "sent" once dispatched to at least one vendor.
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// A single requested line item, embedded in the RFP row as JSONB.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RfpItem {
    pub category: String,
    pub description: String,
    pub quantity: u32,
    /// Free-form key/value specs extracted by the model (e.g. {"ram": "16GB"}).
    #[serde(default)]
    pub specs: Value,
}

impl RfpRow {
    /// Decodes the JSONB items column. Rows written by intake always hold a
    /// valid array; anything else decodes to empty.
    pub fn line_items(&self) -> Vec<RfpItem> {
        serde_json::from_value(self.items.clone()).unwrap_or_default()
    }
}
