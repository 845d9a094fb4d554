//! OpenAI chat-completions extractor adapter
//!
//! Sends the transcript, the cycle timestamp and the fixed category
//! list to a chat model with an instruction to answer as a JSON object
//! with exactly the keys {dateTime, itemName, amount, currency,
//! category}. An answer that fails schema validation downgrades to the
//! all-default draft; only transport and auth failures are errors.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::application::ports::{ExpenseExtractor, ExtractionError};
use crate::domain::ledger::{Category, ExpenseDraft};

/// OpenAI API base URL
const API_BASE_URL: &str = "https://api.openai.com";

/// Sampling temperature for extraction
const TEMPERATURE: f32 = 0.2;

/// Token cap for the model's answer
const MAX_TOKENS: u32 = 300;

/// System role content for the extraction conversation
const SYSTEM_INSTRUCTION: &str = "You are a helpful accounting assistant.";

/// The five keys the model's answer must carry
const REQUIRED_KEYS: [&str; 5] = ["dateTime", "itemName", "amount", "currency", "category"];

// Request types for the chat completions API

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

// Response types for the chat completions API

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Option<Vec<ChatChoice>>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: Option<ChatChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

/// Build the extraction instruction for one transcript.
///
/// The category list steers the model; nothing downstream enforces
/// that the answer is a member.
pub fn build_instruction(transcript: &str, now: NaiveDateTime, categories: &[Category]) -> String {
    let category_list = categories
        .iter()
        .map(|c| c.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        r#"You are a bookkeeping assistant extracting an expense record from the user's spoken words. Answer with ONLY a JSON object in this shape:
{{
  "dateTime": "YYYY-MM-DD HH:mm:ss",
  "itemName": "...",
  "amount": 0,
  "currency": "...",
  "category": "..."
}}
The user said: "{transcript}"
Use {now} as the dateTime and pick the category from: {category_list}."#,
        transcript = transcript,
        now = now.format("%Y-%m-%d %H:%M:%S"),
        category_list = category_list,
    )
}

/// Validate the model's answer against the expected shape.
///
/// Requires a JSON object carrying all five keys, with string values
/// for the text fields and a number (or numeric string) for amount.
/// Returns None on any deviation so the caller can fall back.
fn parse_draft(answer: &str) -> Option<ExpenseDraft> {
    let value: serde_json::Value = serde_json::from_str(answer.trim()).ok()?;
    let obj = value.as_object()?;

    if !REQUIRED_KEYS.iter().all(|k| obj.contains_key(*k)) {
        return None;
    }

    let amount = coerce_amount(&obj["amount"])?;

    Some(ExpenseDraft {
        date_time: obj["dateTime"].as_str()?.to_string(),
        item_name: obj["itemName"].as_str()?.to_string(),
        amount,
        currency: obj["currency"].as_str()?.to_string(),
        category: obj["category"].as_str()?.to_string(),
    })
}

/// Coerce the amount field to f64: a JSON number, or a string that
/// parses as one
fn coerce_amount(value: &serde_json::Value) -> Option<f64> {
    match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// OpenAI chat-completions extractor
pub struct OpenAiExtractor {
    api_key: String,
    model: String,
    base_url: String,
    client: reqwest::Client,
}

impl OpenAiExtractor {
    /// Create a new extractor with the given API key and model
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            base_url: API_BASE_URL.to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Create an extractor against a custom endpoint (used in tests)
    pub fn with_base_url(
        api_key: impl Into<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            base_url: base_url.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Build the API URL
    fn api_url(&self) -> String {
        format!("{}/v1/chat/completions", self.base_url)
    }

    /// Build the request body
    fn build_request(
        &self,
        transcript: &str,
        now: NaiveDateTime,
        categories: &[Category],
    ) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: SYSTEM_INSTRUCTION.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: build_instruction(transcript, now, categories),
                },
            ],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        }
    }

    /// Extract the answer text from the response
    fn extract_answer(response: &ChatCompletionResponse) -> Option<String> {
        let content = response
            .choices
            .as_ref()?
            .first()?
            .message
            .as_ref()?
            .content
            .as_deref()?;

        Some(content.trim().to_string())
    }
}

#[async_trait]
impl ExpenseExtractor for OpenAiExtractor {
    async fn extract(
        &self,
        transcript: &str,
        now: NaiveDateTime,
        categories: &[Category],
    ) -> Result<ExpenseDraft, ExtractionError> {
        let url = self.api_url();
        let body = self.build_request(transcript, now, categories);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ExtractionError::RequestFailed(e.to_string()))?;

        let status = response.status();

        // Handle HTTP errors
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(ExtractionError::InvalidApiKey);
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(ExtractionError::RateLimited);
        }

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ExtractionError::ApiError(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        // Parse response
        let response: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| ExtractionError::ParseError(e.to_string()))?;

        // Check for API error in response body
        if let Some(error) = response.error {
            return Err(ExtractionError::ApiError(error.message));
        }

        // A missing or malformed answer falls back to the default
        // draft rather than failing the cycle
        let draft = Self::extract_answer(&response)
            .and_then(|answer| parse_draft(&answer))
            .unwrap_or_default();

        Ok(draft)
    }
}
