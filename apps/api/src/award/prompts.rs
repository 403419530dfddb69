// Comparison/recommendation LLM prompt templates.

pub const COMPARE_SYSTEM: &str = "\
You are a procurement advisor. \
Score vendor proposals against the buyer's RFP and recommend a winner. \
You MUST respond with valid JSON only — no markdown fences, no explanations. \
Use ONLY the vendor names given in the prompt, spelled exactly as given.";

/// Comparison prompt template. Replace `{rfp_summary}` and `{proposals}`
/// before sending.
pub const COMPARE_PROMPT: &str = r#"Compare the following vendor proposals against the buyer's RFP.

RFP:
{rfp_summary}

VENDOR PROPOSALS:
{proposals}

Score each vendor 0-10 on price, delivery, warranty, terms, and completeness.
Then recommend the best vendor and explain why.

OUTPUT SCHEMA (return exactly this structure):
{
  "scores": [
    {
      "vendor_name": "string",
      "price_score": number,
      "delivery_score": number,
      "warranty_score": number,
      "terms_score": number,
      "completeness_score": number,
      "total_score": number
    }
  ],
  "recommendation": {
    "vendor_name": "string",
    "reason": "string"
  }
}

RULES:
1. Score EVERY vendor listed above, and no one else.
2. "vendor_name" must match the names above exactly.
3. "total_score" is the sum of the five dimension scores.
4. Ground the reason in the quoted figures — price vs budget, delivery vs
   deadline, warranty vs minimum.
5. Return ONLY the JSON object — nothing else, no code fences."#;
