//! Expense extraction port interface

use async_trait::async_trait;
use chrono::NaiveDateTime;
use thiserror::Error;

use crate::domain::ledger::{Category, ExpenseDraft};

/// Extraction errors.
///
/// These cover transport and auth failures only. A model answer that
/// fails to parse as the expected JSON shape is NOT an error: the
/// extractor downgrades it to the all-default draft.
#[derive(Debug, Clone, Error)]
pub enum ExtractionError {
    #[error("Invalid API key")]
    InvalidApiKey,

    #[error("Rate limit exceeded. Please try again later.")]
    RateLimited,

    #[error("API request failed: {0}")]
    RequestFailed(String),

    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    #[error("API error: {0}")]
    ApiError(String),
}

/// Port for turning a transcript into a structured expense draft
#[async_trait]
pub trait ExpenseExtractor: Send + Sync {
    /// Extract an expense draft from a transcript.
    ///
    /// # Arguments
    /// * `transcript` - The recognized speech text
    /// * `now` - Timestamp for this cycle, captured fresh by the caller
    /// * `categories` - The fixed enumeration rendered into the
    ///   instruction to steer the model
    ///
    /// # Returns
    /// The extracted draft, or the all-default draft when the model's
    /// answer does not validate against the expected shape
    async fn extract(
        &self,
        transcript: &str,
        now: NaiveDateTime,
        categories: &[Category],
    ) -> Result<ExpenseDraft, ExtractionError>;
}
