// RFP intake LLM prompt templates.
// All prompts for the rfp module are defined here.

pub const RFP_INTAKE_SYSTEM: &str = "\
You are a procurement assistant. \
Convert free-text purchasing requests into structured JSON. \
You MUST respond with valid JSON only — no markdown fences, no explanations. \
Extract only what the buyer actually asked for — never invent items, \
quantities, or budget figures that are not in the text.";

pub const RFP_INTAKE_PROMPT: &str = r#"Convert the following procurement request into a structured JSON object.

INPUT TEXT:
{raw_text}

OUTPUT SCHEMA (return exactly this structure):
{
  "title": "string",
  "description": "string",
  "budget": number,
  "currency": "USD",
  "delivery_days": number,
  "payment_terms": "string",
  "warranty_months": number,
  "items": [
    {
      "category": "string",
      "description": "string",
      "quantity": number,
      "specs": {}
    }
  ]
}

RULES:
1. "title" is a short name for the purchase (e.g. "Office laptops and monitors").
2. "budget" is the total budget as a number, 0 if the text names none.
3. "currency" is the ISO code from the text, "USD" if none is named.
4. "delivery_days" and "warranty_months" are 0 when the text is silent.
5. One item per distinct thing requested; put measurable attributes
   (RAM, screen size, capacity) into "specs" as key/value strings.
6. Return ONLY the JSON object — nothing else, no code fences."#;
