use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::domain::errors::ExtractionError;
use crate::domain::extraction::ParsedOrder;
use crate::domain::ports::OrderExtractor;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

impl From<reqwest::Error> for ExtractionError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ExtractionError::Timeout
        } else {
            ExtractionError::Transport(e.to_string())
        }
    }
}

// ── Wire format ──────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

pub fn build_prompt(text: &str) -> String {
    format!(
        "Extract order details from the following text.\n\
         If a value is missing, use an empty string or 0.\n\
         Text: \"{}\"",
        text
    )
}

/// Request body for `generateContent`, asking for JSON matching the order
/// fields.
pub fn build_request(text: &str) -> Value {
    json!({
        "contents": [
            { "role": "user", "parts": [ { "text": build_prompt(text) } ] }
        ],
        "generationConfig": {
            "responseMimeType": "application/json",
            "responseSchema": {
                "type": "OBJECT",
                "properties": {
                    "customerName": { "type": "STRING", "description": "Full name of the customer" },
                    "phoneNumber": { "type": "STRING", "description": "Phone number formatted nicely" },
                    "items": { "type": "STRING", "description": "Summary of items ordered, e.g. '2x Cookies'" },
                    "totalPrice": { "type": "NUMBER", "description": "Total price of the order in numbers only" },
                    "notes": { "type": "STRING", "description": "Any special instructions or delivery notes" }
                },
                "required": ["customerName", "items", "totalPrice"]
            }
        }
    })
}

/// Interpret a `generateContent` response body.
///
/// An empty body, no candidates, or blank generated text is "no result".
/// A body that is not the expected envelope, or generated text that does not
/// match the order schema, is an error.
pub fn parse_generate_content(body: &str) -> Result<Option<ParsedOrder>, ExtractionError> {
    if body.trim().is_empty() {
        return Ok(None);
    }
    let response: GenerateContentResponse =
        serde_json::from_str(body).map_err(|e| ExtractionError::Malformed(e.to_string()))?;

    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|content| content.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Ok(None);
    }
    ParsedOrder::from_json(&text).map(Some)
}

// ── Client ───────────────────────────────────────────────────────────────────

pub struct GeminiExtractor {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl GeminiExtractor {
    pub fn new(
        base_url: &str,
        model: &str,
        api_key: String,
        timeout: Duration,
    ) -> Result<Self, ExtractionError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        let endpoint = format!(
            "{}/v1beta/models/{}:generateContent",
            base_url.trim_end_matches('/'),
            model
        );
        Ok(Self {
            client,
            endpoint,
            api_key,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl OrderExtractor for GeminiExtractor {
    async fn extract(&self, text: &str) -> Result<Option<ParsedOrder>, ExtractionError> {
        let response = self
            .client
            .post(&self.endpoint)
            .header("x-goog-api-key", &self.api_key)
            .json(&build_request(text))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(ExtractionError::Status {
                status: status.as_u16(),
                body,
            });
        }
        parse_generate_content(&body)
    }
}

/// Stand-in used when no API key is configured.
pub struct DisabledExtractor;

#[async_trait]
impl OrderExtractor for DisabledExtractor {
    async fn extract(&self, _text: &str) -> Result<Option<ParsedOrder>, ExtractionError> {
        Err(ExtractionError::NotConfigured)
    }
}
