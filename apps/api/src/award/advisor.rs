//! Award advisor — orchestrates the comparison LLM call.
//!
//! Flow: load proposals → render RFP summary + one block per vendor →
//! LLM compare (retried if the model scores vendors that don't exist) →
//! clamp scores → persist comparison row.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;

use crate::award::prompts::{COMPARE_PROMPT, COMPARE_SYSTEM};
use crate::errors::AppError;
use crate::llm_client::{LlmClient, TEMPERATURE_COMPARE};
use crate::models::award::ComparisonRow;
use crate::models::proposal::ProposalWithVendorRow;
use crate::models::rfp::RfpRow;

/// Max LLM retries when the model scores or recommends unknown vendors.
const MAX_COMPARE_RETRIES: u32 = 2;

/// Per-vendor score card from the comparison LLM call. All dimension scores
/// are on a 0-10 scale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VendorScore {
    pub vendor_name: String,
    pub price_score: f64,
    pub delivery_score: f64,
    pub warranty_score: f64,
    pub terms_score: f64,
    pub completeness_score: f64,
    pub total_score: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    pub vendor_name: String,
    pub reason: String,
}

/// Full structured output of the comparison call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonOutcome {
    pub scores: Vec<VendorScore>,
    pub recommendation: Recommendation,
}

/// Runs the comparison pipeline for an RFP and persists the outcome.
pub async fn compare_proposals(
    pool: &PgPool,
    llm: &LlmClient,
    rfp: &RfpRow,
) -> Result<(ComparisonRow, ComparisonOutcome), AppError> {
    let proposals = sqlx::query_as::<_, ProposalWithVendorRow>(
        r#"
        SELECT p.*, v.name AS vendor_name
        FROM proposals p
        JOIN vendors v ON v.id = p.vendor_id
        WHERE p.rfp_id = $1
        ORDER BY p.created_at ASC
        "#,
    )
    .bind(rfp.id)
    .fetch_all(pool)
    .await?;

    if proposals.is_empty() {
        return Err(AppError::Validation(format!(
            "RFP {} has no proposals to compare",
            rfp.id
        )));
    }

    let outcome = call_llm_with_retry(llm, rfp, &proposals).await?;
    let outcome = clamp_scores(outcome);

    let scores_value = serde_json::to_value(&outcome.scores)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize scores: {e}")))?;

    let row = sqlx::query_as::<_, ComparisonRow>(
        r#"
        INSERT INTO comparisons (id, rfp_id, scores, recommended_vendor, reason)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(rfp.id)
    .bind(&scores_value)
    .bind(&outcome.recommendation.vendor_name)
    .bind(&outcome.recommendation.reason)
    .fetch_one(pool)
    .await?;

    info!(
        "Compared {} proposals for RFP {}: recommended '{}'",
        outcome.scores.len(),
        rfp.id,
        outcome.recommendation.vendor_name
    );

    Ok((row, outcome))
}

/// Calls the comparison LLM. Retries up to MAX_COMPARE_RETRIES times if the
/// output references vendors that submitted no proposal.
async fn call_llm_with_retry(
    llm: &LlmClient,
    rfp: &RfpRow,
    proposals: &[ProposalWithVendorRow],
) -> Result<ComparisonOutcome, AppError> {
    let prompt = build_compare_prompt(rfp, proposals);

    for attempt in 0..=MAX_COMPARE_RETRIES {
        let outcome: ComparisonOutcome = llm
            .call_json(&prompt, COMPARE_SYSTEM, TEMPERATURE_COMPARE)
            .await
            .map_err(|e| AppError::Llm(format!("Comparison LLM call failed: {e}")))?;

        match validate_outcome(&outcome, proposals) {
            Ok(()) => return Ok(outcome),
            Err(reason) => warn!(
                "Comparison attempt {}/{}: {reason} — retrying",
                attempt + 1,
                MAX_COMPARE_RETRIES + 1
            ),
        }
    }

    Err(AppError::Llm(format!(
        "Comparison failed after {} attempts: output consistently referenced \
         vendors with no proposal on file",
        MAX_COMPARE_RETRIES + 1
    )))
}

/// Builds the comparison prompt from the RFP constraints and one block per
/// vendor proposal.
pub fn build_compare_prompt(rfp: &RfpRow, proposals: &[ProposalWithVendorRow]) -> String {
    let rfp_summary = format!(
        "Budget {} {}, max delivery {} days, min warranty {} months, payment terms {}.",
        rfp.budget, rfp.currency, rfp.delivery_days, rfp.warranty_months, rfp.payment_terms
    );

    let blocks: Vec<String> = proposals
        .iter()
        .enumerate()
        .map(|(i, p)| {
            format!(
                "Vendor {} ({}):\n  Total: {} {}\n  Delivery: {} days\n  Warranty: {} months\n  Terms: {}\n  Completeness: {:.2}",
                i + 1,
                p.vendor_name,
                p.proposal.total,
                p.proposal.currency,
                p.proposal.delivery_days,
                p.proposal.warranty_months,
                p.proposal.payment_terms,
                p.proposal.completeness_score,
            )
        })
        .collect();

    COMPARE_PROMPT
        .replace("{rfp_summary}", &rfp_summary)
        .replace("{proposals}", &blocks.join("\n\n"))
}

/// Every scored vendor and the recommended vendor must match a proposal on
/// file, and every proposal must be scored.
fn validate_outcome(
    outcome: &ComparisonOutcome,
    proposals: &[ProposalWithVendorRow],
) -> Result<(), String> {
    let known: HashSet<&str> = proposals.iter().map(|p| p.vendor_name.as_str()).collect();

    for score in &outcome.scores {
        if !known.contains(score.vendor_name.as_str()) {
            return Err(format!(
                "scored unknown vendor '{}'",
                score.vendor_name
            ));
        }
    }

    let scored: HashSet<&str> = outcome
        .scores
        .iter()
        .map(|s| s.vendor_name.as_str())
        .collect();
    if let Some(missing) = known.iter().find(|name| !scored.contains(*name)) {
        return Err(format!("vendor '{missing}' was not scored"));
    }

    if !known.contains(outcome.recommendation.vendor_name.as_str()) {
        return Err(format!(
            "recommended unknown vendor '{}'",
            outcome.recommendation.vendor_name
        ));
    }

    Ok(())
}

/// Clamps all dimension scores to [0, 10] and recomputes totals so the
/// stored card is internally consistent even when the model's sums are not.
fn clamp_scores(mut outcome: ComparisonOutcome) -> ComparisonOutcome {
    for score in &mut outcome.scores {
        score.price_score = score.price_score.clamp(0.0, 10.0);
        score.delivery_score = score.delivery_score.clamp(0.0, 10.0);
        score.warranty_score = score.warranty_score.clamp(0.0, 10.0);
        score.terms_score = score.terms_score.clamp(0.0, 10.0);
        score.completeness_score = score.completeness_score.clamp(0.0, 10.0);
        score.total_score = score.price_score
            + score.delivery_score
            + score.warranty_score
            + score.terms_score
            + score.completeness_score;
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;

    fn sample_rfp() -> RfpRow {
        RfpRow {
            id: Uuid::new_v4(),
            title: "Office laptops".to_string(),
            description: "20 laptops".to_string(),
            budget: 50_000.0,
            currency: "USD".to_string(),
            delivery_days: 30,
            payment_terms: "net 30".to_string(),
            warranty_months: 12,
            items: json!([]),
            raw_text: "I need 20 laptops".to_string(),
            status: "sent".to_string(),
            created_at: Utc::now(),
        }
    }

    fn proposal_from(vendor_name: &str, total: f64) -> ProposalWithVendorRow {
        ProposalWithVendorRow {
            proposal: crate::models::proposal::ProposalRow {
                id: Uuid::new_v4(),
                rfp_id: Uuid::new_v4(),
                vendor_id: Uuid::new_v4(),
                subject: "Re: RFP".to_string(),
                raw_body: "Our quote".to_string(),
                items: json!([]),
                total,
                currency: "USD".to_string(),
                delivery_days: 21,
                warranty_months: 24,
                payment_terms: "net 45".to_string(),
                completeness_score: 0.9,
                created_at: Utc::now(),
            },
            vendor_name: vendor_name.to_string(),
        }
    }

    fn score_for(vendor_name: &str) -> VendorScore {
        VendorScore {
            vendor_name: vendor_name.to_string(),
            price_score: 8.0,
            delivery_score: 7.0,
            warranty_score: 9.0,
            terms_score: 6.0,
            completeness_score: 9.0,
            total_score: 39.0,
        }
    }

    #[test]
    fn test_comparison_outcome_deserializes_from_llm_shape() {
        let json = r#"{
            "scores": [
                {
                    "vendor_name": "Acme Supply",
                    "price_score": 8,
                    "delivery_score": 7,
                    "warranty_score": 9,
                    "terms_score": 6,
                    "completeness_score": 9,
                    "total_score": 39
                }
            ],
            "recommendation": {
                "vendor_name": "Acme Supply",
                "reason": "Lowest total within budget and strongest warranty."
            }
        }"#;
        let outcome: ComparisonOutcome = serde_json::from_str(json).unwrap();
        assert_eq!(outcome.scores.len(), 1);
        assert_eq!(outcome.recommendation.vendor_name, "Acme Supply");
    }

    #[test]
    fn test_build_compare_prompt_contains_rfp_and_vendor_blocks() {
        let proposals = vec![
            proposal_from("Acme Supply", 24_000.0),
            proposal_from("Globex", 26_500.0),
        ];
        let prompt = build_compare_prompt(&sample_rfp(), &proposals);

        assert!(prompt.contains("Budget 50000 USD"));
        assert!(prompt.contains("Vendor 1 (Acme Supply):"));
        assert!(prompt.contains("Vendor 2 (Globex):"));
        assert!(prompt.contains("Total: 24000 USD"));
        assert!(prompt.contains("Warranty: 24 months"));
    }

    #[test]
    fn test_validate_outcome_accepts_matching_names() {
        let proposals = vec![proposal_from("Acme Supply", 24_000.0)];
        let outcome = ComparisonOutcome {
            scores: vec![score_for("Acme Supply")],
            recommendation: Recommendation {
                vendor_name: "Acme Supply".to_string(),
                reason: "Best value".to_string(),
            },
        };
        assert!(validate_outcome(&outcome, &proposals).is_ok());
    }

    #[test]
    fn test_validate_outcome_rejects_unknown_scored_vendor() {
        let proposals = vec![proposal_from("Acme Supply", 24_000.0)];
        let outcome = ComparisonOutcome {
            scores: vec![score_for("Acme Supply"), score_for("Imaginary Corp")],
            recommendation: Recommendation {
                vendor_name: "Acme Supply".to_string(),
                reason: "Best value".to_string(),
            },
        };
        let err = validate_outcome(&outcome, &proposals).unwrap_err();
        assert!(err.contains("Imaginary Corp"));
    }

    #[test]
    fn test_validate_outcome_rejects_unscored_vendor() {
        let proposals = vec![
            proposal_from("Acme Supply", 24_000.0),
            proposal_from("Globex", 26_500.0),
        ];
        let outcome = ComparisonOutcome {
            scores: vec![score_for("Acme Supply")],
            recommendation: Recommendation {
                vendor_name: "Acme Supply".to_string(),
                reason: "Best value".to_string(),
            },
        };
        let err = validate_outcome(&outcome, &proposals).unwrap_err();
        assert!(err.contains("Globex"));
    }

    #[test]
    fn test_validate_outcome_rejects_unknown_recommendation() {
        let proposals = vec![proposal_from("Acme Supply", 24_000.0)];
        let outcome = ComparisonOutcome {
            scores: vec![score_for("Acme Supply")],
            recommendation: Recommendation {
                vendor_name: "Imaginary Corp".to_string(),
                reason: "Best value".to_string(),
            },
        };
        assert!(validate_outcome(&outcome, &proposals).is_err());
    }

    #[test]
    fn test_clamp_scores_caps_dimensions_and_recomputes_total() {
        let outcome = ComparisonOutcome {
            scores: vec![VendorScore {
                vendor_name: "Acme Supply".to_string(),
                price_score: 15.0,
                delivery_score: -2.0,
                warranty_score: 9.0,
                terms_score: 6.0,
                completeness_score: 9.0,
                total_score: 999.0,
            }],
            recommendation: Recommendation {
                vendor_name: "Acme Supply".to_string(),
                reason: "Best value".to_string(),
            },
        };
        let clamped = clamp_scores(outcome);
        let score = &clamped.scores[0];
        assert_eq!(score.price_score, 10.0);
        assert_eq!(score.delivery_score, 0.0);
        assert!((score.total_score - 34.0).abs() < f64::EPSILON);
    }
}
