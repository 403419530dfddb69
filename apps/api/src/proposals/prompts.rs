// Vendor reply parsing LLM prompt templates.

pub const PROPOSAL_PARSE_SYSTEM: &str = "\
You are a procurement assistant. \
Extract a structured commercial proposal from a vendor's reply email. \
You MUST respond with valid JSON only — no markdown fences, no explanations. \
Extract only figures the vendor actually quoted — never invent prices or terms.";

pub const PROPOSAL_PARSE_PROMPT: &str = r#"Extract a structured commercial proposal from this vendor email.

SUBJECT:
{subject}

BODY:
{body}

OUTPUT SCHEMA (return exactly this structure):
{
  "items": [
    {
      "description": "string",
      "quantity": number,
      "unit_price": number,
      "total_price": number
    }
  ],
  "total": number,
  "currency": "string",
  "delivery_days": number,
  "warranty_months": number,
  "payment_terms": "string",
  "completeness_score": number
}

RULES:
1. "total" is the grand total the vendor quoted; sum the items if no grand
   total is stated.
2. "currency" is the ISO code used in the email, "USD" if none is named.
3. "delivery_days" and "warranty_months" are 0 when the email is silent.
4. "completeness_score" is between 0 and 1: how fully the reply covers
   price, delivery, warranty, and payment terms.
5. Return ONLY the JSON object — nothing else, no code fences."#;
