//! Outreach — renders the RFP as a plain-text email and walks the vendor
//! list sequentially. Sends are fire-and-forget: a failure is recorded and
//! the loop moves on to the next vendor.

use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::dispatch::mailer::Mailer;
use crate::models::rfp::RfpRow;
use crate::models::vendor::VendorRow;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchStatus {
    Sent,
    Failed,
}

impl DispatchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DispatchStatus::Sent => "sent",
            DispatchStatus::Failed => "failed",
        }
    }
}

/// Outcome of one send attempt.
#[derive(Debug, Clone, Serialize)]
pub struct DispatchOutcome {
    pub vendor_id: Uuid,
    pub vendor_name: String,
    pub status: DispatchStatus,
    pub error: Option<String>,
}

/// Sends the RFP to each vendor in turn. Never short-circuits: every vendor
/// gets an attempt and an outcome, in input order.
pub async fn send_to_vendors(
    mailer: &dyn Mailer,
    rfp: &RfpRow,
    vendors: &[VendorRow],
) -> Vec<DispatchOutcome> {
    let subject = build_subject(rfp);
    let body = render_rfp_email(rfp);

    let mut outcomes = Vec::with_capacity(vendors.len());
    for vendor in vendors {
        match mailer.send(&vendor.email, &subject, &body).await {
            Ok(()) => {
                info!("Sent RFP {} to vendor {} <{}>", rfp.id, vendor.name, vendor.email);
                outcomes.push(DispatchOutcome {
                    vendor_id: vendor.id,
                    vendor_name: vendor.name.clone(),
                    status: DispatchStatus::Sent,
                    error: None,
                });
            }
            Err(e) => {
                warn!(
                    "Failed to send RFP {} to vendor {} <{}>: {e}",
                    rfp.id, vendor.name, vendor.email
                );
                outcomes.push(DispatchOutcome {
                    vendor_id: vendor.id,
                    vendor_name: vendor.name.clone(),
                    status: DispatchStatus::Failed,
                    error: Some(e.to_string()),
                });
            }
        }
    }
    outcomes
}

pub fn build_subject(rfp: &RfpRow) -> String {
    format!("Request for Proposal: {}", rfp.title)
}

/// Renders the RFP as the plain-text body vendors receive.
pub fn render_rfp_email(rfp: &RfpRow) -> String {
    let mut body = format!("Request for Proposal: {}\n\n{}\n\n", rfp.title, rfp.description);

    body.push_str(&format!("Budget: {} {}\n", rfp.budget, rfp.currency));
    if rfp.delivery_days > 0 {
        body.push_str(&format!("Delivery: within {} days\n", rfp.delivery_days));
    }
    if rfp.warranty_months > 0 {
        body.push_str(&format!(
            "Warranty: at least {} months\n",
            rfp.warranty_months
        ));
    }
    body.push_str(&format!("Payment terms: {}\n", rfp.payment_terms));

    let items = rfp.line_items();
    if !items.is_empty() {
        body.push_str("\nRequested items:\n");
        for item in &items {
            body.push_str(&format!(
                "  - {} x {} ({})\n",
                item.quantity, item.description, item.category
            ));
        }
    }

    body.push_str(
        "\nPlease reply with your itemized quotation including total price, \
         delivery time, warranty, and payment terms.\n",
    );
    body
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::mailer::MailError;
    use async_trait::async_trait;
    use chrono::Utc;
    use serde_json::json;
    use std::sync::Mutex;

    /// Records sends and fails for addresses on its deny list.
    struct StubMailer {
        deny: Vec<String>,
        sent_to: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl Mailer for StubMailer {
        async fn send(&self, to: &str, _subject: &str, _body: &str) -> Result<(), MailError> {
            if self.deny.iter().any(|d| d == to) {
                return Err(MailError::Transport("connection refused".to_string()));
            }
            self.sent_to.lock().unwrap().push(to.to_string());
            Ok(())
        }
    }

    fn sample_rfp() -> RfpRow {
        RfpRow {
            id: Uuid::new_v4(),
            title: "Office laptops".to_string(),
            description: "20 laptops with 16GB RAM".to_string(),
            budget: 50_000.0,
            currency: "USD".to_string(),
            delivery_days: 30,
            payment_terms: "net 30".to_string(),
            warranty_months: 12,
            items: json!([
                {"category": "hardware", "description": "Laptop with 16GB RAM", "quantity": 20, "specs": {}}
            ]),
            raw_text: "I need 20 laptops".to_string(),
            status: "open".to_string(),
            created_at: Utc::now(),
        }
    }

    fn vendor(name: &str, email: &str) -> VendorRow {
        VendorRow {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: email.to_string(),
            phone: None,
            company: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_build_subject_includes_title() {
        let subject = build_subject(&sample_rfp());
        assert_eq!(subject, "Request for Proposal: Office laptops");
    }

    #[test]
    fn test_render_rfp_email_includes_terms_and_items() {
        let body = render_rfp_email(&sample_rfp());
        assert!(body.contains("Budget: 50000 USD"));
        assert!(body.contains("Delivery: within 30 days"));
        assert!(body.contains("Warranty: at least 12 months"));
        assert!(body.contains("Payment terms: net 30"));
        assert!(body.contains("20 x Laptop with 16GB RAM (hardware)"));
    }

    #[test]
    fn test_render_rfp_email_omits_zero_terms() {
        let mut rfp = sample_rfp();
        rfp.delivery_days = 0;
        rfp.warranty_months = 0;
        let body = render_rfp_email(&rfp);
        assert!(!body.contains("Delivery:"));
        assert!(!body.contains("Warranty:"));
    }

    #[tokio::test]
    async fn test_send_to_vendors_continues_past_failure() {
        let mailer = StubMailer {
            deny: vec!["down@acme.com".to_string()],
            sent_to: Mutex::new(Vec::new()),
        };
        let vendors = vec![
            vendor("First", "first@acme.com"),
            vendor("Down", "down@acme.com"),
            vendor("Last", "last@acme.com"),
        ];

        let outcomes = send_to_vendors(&mailer, &sample_rfp(), &vendors).await;

        assert_eq!(outcomes.len(), 3);
        assert_eq!(outcomes[0].status, DispatchStatus::Sent);
        assert_eq!(outcomes[1].status, DispatchStatus::Failed);
        assert!(outcomes[1].error.as_deref().unwrap().contains("connection refused"));
        assert_eq!(outcomes[2].status, DispatchStatus::Sent);

        // Delivery order matches vendor order
        let sent = mailer.sent_to.lock().unwrap();
        assert_eq!(*sent, vec!["first@acme.com", "last@acme.com"]);
    }

    #[tokio::test]
    async fn test_send_to_vendors_empty_list_is_noop() {
        let mailer = StubMailer {
            deny: vec![],
            sent_to: Mutex::new(Vec::new()),
        };
        let outcomes = send_to_vendors(&mailer, &sample_rfp(), &[]).await;
        assert!(outcomes.is_empty());
    }
}
