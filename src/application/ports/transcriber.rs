//! Transcription port interface

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::recording::AudioClip;

/// Transcription errors
#[derive(Debug, Clone, Error)]
pub enum TranscriptionError {
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

/// Port for speech-to-text transcription
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribe an audio clip to text.
    ///
    /// # Returns
    /// The trimmed transcript, or an EMPTY string when nothing was
    /// recognized. Transport and auth failures are errors; an empty
    /// recognition result is not.
    async fn transcribe(&self, clip: &AudioClip) -> Result<String, TranscriptionError>;
}
