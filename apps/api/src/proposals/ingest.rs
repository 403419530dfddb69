//! Proposal ingest — parses a vendor's reply into a structured proposal and
//! persists it under the (rfp, vendor) pair.
//!
//! Replies arrive through the API rather than a mailbox: the buyer pastes the
//! vendor's email into the responses endpoint.

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::llm_client::{LlmClient, TEMPERATURE_EXTRACT};
use crate::models::proposal::{ProposalItem, ProposalRow};
use crate::proposals::prompts::{PROPOSAL_PARSE_PROMPT, PROPOSAL_PARSE_SYSTEM};

/// Structured proposal as returned by the reply-parsing LLM call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedProposal {
    #[serde(default)]
    pub items: Vec<ProposalItem>,
    pub total: f64,
    #[serde(default)]
    pub currency: String,
    pub delivery_days: i32,
    pub warranty_months: i32,
    pub payment_terms: String,
    pub completeness_score: f64,
}

/// Parses a vendor reply with the LLM and normalizes the result.
pub async fn parse_reply(
    llm: &LlmClient,
    subject: &str,
    body: &str,
) -> Result<ParsedProposal, AppError> {
    let prompt = PROPOSAL_PARSE_PROMPT
        .replace("{subject}", subject)
        .replace("{body}", body);
    let parsed: ParsedProposal = llm
        .call_json(&prompt, PROPOSAL_PARSE_SYSTEM, TEMPERATURE_EXTRACT)
        .await
        .map_err(|e| AppError::Llm(format!("Proposal parsing failed: {e}")))?;

    normalize(parsed)
}

/// Full ingest pipeline: parse the reply, then upsert the proposal row.
/// A vendor resubmitting replaces their previous proposal for the RFP.
pub async fn ingest_reply(
    pool: &PgPool,
    llm: &LlmClient,
    rfp_id: Uuid,
    vendor_id: Uuid,
    subject: &str,
    body: &str,
) -> Result<ProposalRow, AppError> {
    let parsed = parse_reply(llm, subject, body).await?;

    let items = serde_json::to_value(&parsed.items)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize items: {e}")))?;

    let proposal = sqlx::query_as::<_, ProposalRow>(
        r#"
        INSERT INTO proposals
            (id, rfp_id, vendor_id, subject, raw_body, items, total, currency,
             delivery_days, warranty_months, payment_terms, completeness_score)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
        ON CONFLICT (rfp_id, vendor_id) DO UPDATE SET
            subject = EXCLUDED.subject,
            raw_body = EXCLUDED.raw_body,
            items = EXCLUDED.items,
            total = EXCLUDED.total,
            currency = EXCLUDED.currency,
            delivery_days = EXCLUDED.delivery_days,
            warranty_months = EXCLUDED.warranty_months,
            payment_terms = EXCLUDED.payment_terms,
            completeness_score = EXCLUDED.completeness_score
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(rfp_id)
    .bind(vendor_id)
    .bind(subject)
    .bind(body)
    .bind(&items)
    .bind(parsed.total)
    .bind(&parsed.currency)
    .bind(parsed.delivery_days)
    .bind(parsed.warranty_months)
    .bind(&parsed.payment_terms)
    .bind(parsed.completeness_score)
    .fetch_one(pool)
    .await?;

    info!(
        "Ingested proposal from vendor {} for RFP {}: total {} {}, completeness {:.2}",
        vendor_id, rfp_id, proposal.total, proposal.currency, proposal.completeness_score
    );

    Ok(proposal)
}

/// Clamps model output into the ranges the rest of the system assumes.
fn normalize(mut parsed: ParsedProposal) -> Result<ParsedProposal, AppError> {
    if parsed.total < 0.0 {
        return Err(AppError::Llm(format!(
            "Parsed proposal has a negative total: {}",
            parsed.total
        )));
    }
    if parsed.delivery_days < 0 || parsed.warranty_months < 0 {
        return Err(AppError::Llm(
            "Parsed proposal has negative delivery or warranty terms".to_string(),
        ));
    }

    parsed.completeness_score = parsed.completeness_score.clamp(0.0, 1.0);

    let currency = parsed.currency.trim();
    parsed.currency = if currency.is_empty() {
        "USD".to_string()
    } else {
        currency.to_uppercase()
    };

    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_parsed() -> ParsedProposal {
        ParsedProposal {
            items: vec![ProposalItem {
                description: "Laptop with 16GB RAM".to_string(),
                quantity: 20,
                unit_price: 1_200.0,
                total_price: 24_000.0,
            }],
            total: 24_000.0,
            currency: "usd".to_string(),
            delivery_days: 21,
            warranty_months: 24,
            payment_terms: "net 45".to_string(),
            completeness_score: 0.9,
        }
    }

    #[test]
    fn test_parsed_proposal_deserializes_from_llm_shape() {
        let json = r#"{
            "items": [
                {
                    "description": "Laptop with 16GB RAM",
                    "quantity": 20,
                    "unit_price": 1200,
                    "total_price": 24000
                }
            ],
            "total": 24000,
            "currency": "USD",
            "delivery_days": 21,
            "warranty_months": 24,
            "payment_terms": "net 45",
            "completeness_score": 0.9
        }"#;
        let parsed: ParsedProposal = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.items.len(), 1);
        assert_eq!(parsed.items[0].quantity, 20);
        assert!((parsed.total - 24_000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_parsed_proposal_tolerates_missing_items() {
        let json = r#"{
            "total": 5000,
            "currency": "EUR",
            "delivery_days": 14,
            "warranty_months": 12,
            "payment_terms": "on delivery",
            "completeness_score": 0.4
        }"#;
        let parsed: ParsedProposal = serde_json::from_str(json).unwrap();
        assert!(parsed.items.is_empty());
    }

    #[test]
    fn test_normalize_clamps_completeness_above_one() {
        let mut parsed = sample_parsed();
        // Models sometimes answer on a 0-10 scale despite the prompt
        parsed.completeness_score = 9.0;
        let parsed = normalize(parsed).unwrap();
        assert!((parsed.completeness_score - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_normalize_clamps_negative_completeness() {
        let mut parsed = sample_parsed();
        parsed.completeness_score = -0.5;
        let parsed = normalize(parsed).unwrap();
        assert_eq!(parsed.completeness_score, 0.0);
    }

    #[test]
    fn test_normalize_uppercases_currency() {
        let parsed = normalize(sample_parsed()).unwrap();
        assert_eq!(parsed.currency, "USD");
    }

    #[test]
    fn test_normalize_rejects_negative_total() {
        let mut parsed = sample_parsed();
        parsed.total = -100.0;
        assert!(normalize(parsed).is_err());
    }
}
