//! RFP intake — turns free-text procurement requests into persisted RFPs.
//!
//! Flow: intake prompt → LLM structuring → normalization → INSERT.

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::llm_client::{LlmClient, TEMPERATURE_EXTRACT};
use crate::models::rfp::{RfpItem, RfpRow};
use crate::rfp::prompts::{RFP_INTAKE_PROMPT, RFP_INTAKE_SYSTEM};

/// Structured RFP as returned by the intake LLM call, before normalization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuredRfp {
    pub title: String,
    pub description: String,
    pub budget: f64,
    #[serde(default)]
    pub currency: String,
    pub delivery_days: i32,
    pub payment_terms: String,
    pub warranty_months: i32,
    #[serde(default)]
    pub items: Vec<RfpItem>,
}

/// Runs the full intake pipeline and persists the result.
pub async fn create_rfp_from_text(
    pool: &PgPool,
    llm: &LlmClient,
    raw_text: &str,
) -> Result<RfpRow, AppError> {
    let prompt = RFP_INTAKE_PROMPT.replace("{raw_text}", raw_text);
    let structured: StructuredRfp = llm
        .call_json(&prompt, RFP_INTAKE_SYSTEM, TEMPERATURE_EXTRACT)
        .await
        .map_err(|e| AppError::Llm(format!("RFP structuring failed: {e}")))?;

    let structured = normalize(structured)?;

    let items = serde_json::to_value(&structured.items)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize items: {e}")))?;

    let rfp = sqlx::query_as::<_, RfpRow>(
        r#"
        INSERT INTO rfps
            (id, title, description, budget, currency, delivery_days,
             payment_terms, warranty_months, items, raw_text, status)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, 'open')
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&structured.title)
    .bind(&structured.description)
    .bind(structured.budget)
    .bind(&structured.currency)
    .bind(structured.delivery_days)
    .bind(&structured.payment_terms)
    .bind(structured.warranty_months)
    .bind(&items)
    .bind(raw_text)
    .fetch_one(pool)
    .await?;

    info!(
        "Created RFP {} ({} items, budget {} {})",
        rfp.id,
        structured.items.len(),
        rfp.budget,
        rfp.currency
    );

    Ok(rfp)
}

/// Checks the model's output and fills gaps the prompt allows for.
/// Rejects outright nonsense; defaults a missing currency to USD.
fn normalize(mut rfp: StructuredRfp) -> Result<StructuredRfp, AppError> {
    if rfp.title.trim().is_empty() {
        return Err(AppError::Llm(
            "Structured RFP has an empty title".to_string(),
        ));
    }
    if rfp.budget < 0.0 {
        return Err(AppError::Llm(format!(
            "Structured RFP has a negative budget: {}",
            rfp.budget
        )));
    }
    if rfp.delivery_days < 0 || rfp.warranty_months < 0 {
        return Err(AppError::Llm(
            "Structured RFP has negative delivery or warranty terms".to_string(),
        ));
    }

    let currency = rfp.currency.trim();
    rfp.currency = if currency.is_empty() {
        "USD".to_string()
    } else {
        currency.to_uppercase()
    };

    // Zero-quantity items are extraction noise, not requests
    rfp.items.retain(|item| item.quantity > 0);

    Ok(rfp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_rfp() -> StructuredRfp {
        StructuredRfp {
            title: "Office laptops and monitors".to_string(),
            description: "20 laptops with 16GB RAM and 15 27-inch monitors".to_string(),
            budget: 50_000.0,
            currency: "usd".to_string(),
            delivery_days: 30,
            payment_terms: "net 30".to_string(),
            warranty_months: 12,
            items: vec![RfpItem {
                category: "hardware".to_string(),
                description: "Laptop with 16GB RAM".to_string(),
                quantity: 20,
                specs: json!({"ram": "16GB"}),
            }],
        }
    }

    #[test]
    fn test_structured_rfp_deserializes_from_llm_shape() {
        let json = r#"{
            "title": "Office laptops and monitors",
            "description": "20 laptops with 16GB RAM and 15 monitors 27 inch",
            "budget": 50000,
            "currency": "USD",
            "delivery_days": 30,
            "payment_terms": "net 30",
            "warranty_months": 12,
            "items": [
                {
                    "category": "hardware",
                    "description": "Laptop with 16GB RAM",
                    "quantity": 20,
                    "specs": {"ram": "16GB"}
                },
                {
                    "category": "hardware",
                    "description": "27 inch monitor",
                    "quantity": 15,
                    "specs": {"size": "27 inch"}
                }
            ]
        }"#;

        let parsed: StructuredRfp = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.title, "Office laptops and monitors");
        assert_eq!(parsed.items.len(), 2);
        assert_eq!(parsed.items[0].quantity, 20);
        assert!((parsed.budget - 50_000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_structured_rfp_tolerates_missing_items_and_currency() {
        let json = r#"{
            "title": "Cleaning service",
            "description": "Weekly office cleaning",
            "budget": 0,
            "delivery_days": 0,
            "payment_terms": "monthly",
            "warranty_months": 0
        }"#;
        let parsed: StructuredRfp = serde_json::from_str(json).unwrap();
        assert!(parsed.items.is_empty());
        assert!(parsed.currency.is_empty());
    }

    #[test]
    fn test_normalize_uppercases_currency() {
        let rfp = normalize(sample_rfp()).unwrap();
        assert_eq!(rfp.currency, "USD");
    }

    #[test]
    fn test_normalize_defaults_blank_currency_to_usd() {
        let mut rfp = sample_rfp();
        rfp.currency = "  ".to_string();
        let rfp = normalize(rfp).unwrap();
        assert_eq!(rfp.currency, "USD");
    }

    #[test]
    fn test_normalize_rejects_empty_title() {
        let mut rfp = sample_rfp();
        rfp.title = "   ".to_string();
        assert!(normalize(rfp).is_err());
    }

    #[test]
    fn test_normalize_rejects_negative_budget() {
        let mut rfp = sample_rfp();
        rfp.budget = -1.0;
        assert!(normalize(rfp).is_err());
    }

    #[test]
    fn test_normalize_drops_zero_quantity_items() {
        let mut rfp = sample_rfp();
        rfp.items.push(RfpItem {
            category: "hardware".to_string(),
            description: "Phantom item".to_string(),
            quantity: 0,
            specs: json!({}),
        });
        let rfp = normalize(rfp).unwrap();
        assert_eq!(rfp.items.len(), 1);
    }
}
