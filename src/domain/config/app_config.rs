//! Application configuration value object

use serde::{Deserialize, Serialize};

/// Default capture/WAV sample rate in Hz
pub const DEFAULT_SAMPLE_RATE: u32 = 16_000;

/// Default recognition language tag
pub const DEFAULT_LANGUAGE: &str = "ja-JP";

/// Default extraction model
pub const DEFAULT_LLM_MODEL: &str = "gpt-3.5-turbo";

/// Application configuration.
/// All fields are optional to support partial configs and merging.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub stt_api_key: Option<String>,
    pub llm_api_key: Option<String>,
    pub language: Option<String>,
    pub llm_model: Option<String>,
    pub sample_rate: Option<u32>,
    pub db_path: Option<String>,
    pub wav_path: Option<String>,
}

impl AppConfig {
    /// Create config with default values
    pub fn defaults() -> Self {
        Self {
            stt_api_key: None,
            llm_api_key: None,
            language: Some(DEFAULT_LANGUAGE.to_string()),
            llm_model: Some(DEFAULT_LLM_MODEL.to_string()),
            sample_rate: Some(DEFAULT_SAMPLE_RATE),
            db_path: Some("records.db".to_string()),
            wav_path: Some("recorded.wav".to_string()),
        }
    }

    /// Create an empty config (all None)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Merge this config with another, where other takes precedence.
    /// Only non-None values from other will override this.
    pub fn merge(self, other: Self) -> Self {
        Self {
            stt_api_key: other.stt_api_key.or(self.stt_api_key),
            llm_api_key: other.llm_api_key.or(self.llm_api_key),
            language: other.language.or(self.language),
            llm_model: other.llm_model.or(self.llm_model),
            sample_rate: other.sample_rate.or(self.sample_rate),
            db_path: other.db_path.or(self.db_path),
            wav_path: other.wav_path.or(self.wav_path),
        }
    }

    /// Get the language tag, or the default if not set
    pub fn language_or_default(&self) -> &str {
        self.language.as_deref().unwrap_or(DEFAULT_LANGUAGE)
    }

    /// Get the extraction model, or the default if not set
    pub fn llm_model_or_default(&self) -> &str {
        self.llm_model.as_deref().unwrap_or(DEFAULT_LLM_MODEL)
    }

    /// Get the sample rate, or the default if not set
    pub fn sample_rate_or_default(&self) -> u32 {
        self.sample_rate.unwrap_or(DEFAULT_SAMPLE_RATE)
    }

    /// Get the ledger database path, or "records.db" if not set
    pub fn db_path_or_default(&self) -> &str {
        self.db_path.as_deref().unwrap_or("records.db")
    }

    /// Get the session WAV path, or "recorded.wav" if not set
    pub fn wav_path_or_default(&self) -> &str {
        self.wav_path.as_deref().unwrap_or("recorded.wav")
    }
}
