//! Google Cloud Speech-to-Text transcriber adapter

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::application::ports::{Transcriber, TranscriptionError};
use crate::domain::recording::AudioClip;

/// Google Cloud Speech API base URL
const API_BASE_URL: &str = "https://speech.googleapis.com";

/// Audio encoding sent for mono 16-bit PCM WAV clips
const ENCODING: &str = "LINEAR16";

// Request types for the Speech API

#[derive(Debug, Serialize)]
struct RecognizeRequest {
    config: RecognitionConfig,
    audio: RecognitionAudio,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RecognitionConfig {
    encoding: String,
    sample_rate_hertz: u32,
    language_code: String,
}

#[derive(Debug, Serialize)]
struct RecognitionAudio {
    content: String,
}

// Response types for the Speech API

#[derive(Debug, Deserialize)]
struct RecognizeResponse {
    results: Option<Vec<SpeechRecognitionResult>>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct SpeechRecognitionResult {
    alternatives: Option<Vec<SpeechRecognitionAlternative>>,
}

#[derive(Debug, Deserialize)]
struct SpeechRecognitionAlternative {
    transcript: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

/// Google Cloud Speech-to-Text transcriber
pub struct GoogleSttTranscriber {
    api_key: String,
    language: String,
    base_url: String,
    client: reqwest::Client,
}

impl GoogleSttTranscriber {
    /// Create a new transcriber with the given API key and language tag
    pub fn new(api_key: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            language: language.into(),
            base_url: API_BASE_URL.to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Create a transcriber against a custom endpoint (used in tests)
    pub fn with_base_url(
        api_key: impl Into<String>,
        language: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            language: language.into(),
            base_url: base_url.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Build the API URL
    fn api_url(&self) -> String {
        format!("{}/v1/speech:recognize?key={}", self.base_url, self.api_key)
    }

    /// Build the request body
    fn build_request(&self, clip: &AudioClip) -> RecognizeRequest {
        RecognizeRequest {
            config: RecognitionConfig {
                encoding: ENCODING.to_string(),
                sample_rate_hertz: clip.sample_rate_hz(),
                language_code: self.language.clone(),
            },
            audio: RecognitionAudio {
                content: clip.to_base64(),
            },
        }
    }

    /// Concatenate every result's top alternative transcript.
    /// An absent or empty result list means nothing was recognized.
    fn extract_transcript(response: &RecognizeResponse) -> String {
        let Some(results) = response.results.as_ref() else {
            return String::new();
        };

        let transcript: String = results
            .iter()
            .filter_map(|r| r.alternatives.as_ref()?.first()?.transcript.as_deref())
            .collect();

        transcript.trim().to_string()
    }
}

#[async_trait]
impl Transcriber for GoogleSttTranscriber {
    async fn transcribe(&self, clip: &AudioClip) -> Result<String, TranscriptionError> {
        let url = self.api_url();
        let body = self.build_request(clip);

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| TranscriptionError::RequestFailed(e.to_string()))?;

        let status = response.status();

        // Handle HTTP errors
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(TranscriptionError::InvalidApiKey);
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(TranscriptionError::RateLimited);
        }

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(TranscriptionError::ApiError(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        // Parse response
        let response: RecognizeResponse = response
            .json()
            .await
            .map_err(|e| TranscriptionError::ParseError(e.to_string()))?;

        // Check for API error in response body
        if let Some(error) = response.error {
            return Err(TranscriptionError::ApiError(error.message));
        }

        // An empty transcript is a valid outcome, not an error
        Ok(Self::extract_transcript(&response))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_clip() -> AudioClip {
        AudioClip::new(vec![1, 2, 3], 16_000)
    }

    #[test]
    fn build_request_has_correct_structure() {
        let transcriber = GoogleSttTranscriber::new("test-key", "ja-JP");
        let request = transcriber.build_request(&test_clip());

        assert_eq!(request.config.encoding, "LINEAR16");
        assert_eq!(request.config.sample_rate_hertz, 16_000);
        assert_eq!(request.config.language_code, "ja-JP");
        assert!(!request.audio.content.is_empty());
    }

    #[test]
    fn api_url_contains_key() {
        let transcriber = GoogleSttTranscriber::new("test-api-key", "ja-JP");
        let url = transcriber.api_url();

        assert!(url.contains("speech:recognize"));
        assert!(url.contains("test-api-key"));
    }

    #[test]
    fn request_serializes_with_camel_case_keys() {
        let transcriber = GoogleSttTranscriber::new("k", "en-US");
        let json = serde_json::to_value(transcriber.build_request(&test_clip())).unwrap();

        assert_eq!(json["config"]["sampleRateHertz"], 16_000);
        assert_eq!(json["config"]["languageCode"], "en-US");
        assert!(json["audio"]["content"].is_string());
    }

    #[test]
    fn extract_transcript_concatenates_top_alternatives() {
        let response = RecognizeResponse {
            results: Some(vec![
                SpeechRecognitionResult {
                    alternatives: Some(vec![
                        SpeechRecognitionAlternative {
                            transcript: Some("lunch, ".to_string()),
                        },
                        SpeechRecognitionAlternative {
                            transcript: Some("brunch, ".to_string()),
                        },
                    ]),
                },
                SpeechRecognitionResult {
                    alternatives: Some(vec![SpeechRecognitionAlternative {
                        transcript: Some("1200 yen".to_string()),
                    }]),
                },
            ]),
            error: None,
        };

        assert_eq!(
            GoogleSttTranscriber::extract_transcript(&response),
            "lunch, 1200 yen"
        );
    }

    #[test]
    fn extract_transcript_empty_when_no_results() {
        let response = RecognizeResponse {
            results: None,
            error: None,
        };
        assert_eq!(GoogleSttTranscriber::extract_transcript(&response), "");

        let response = RecognizeResponse {
            results: Some(vec![]),
            error: None,
        };
        assert_eq!(GoogleSttTranscriber::extract_transcript(&response), "");
    }

    #[test]
    fn extract_transcript_trims_whitespace() {
        let response = RecognizeResponse {
            results: Some(vec![SpeechRecognitionResult {
                alternatives: Some(vec![SpeechRecognitionAlternative {
                    transcript: Some("  coffee 300 yen  ".to_string()),
                }]),
            }]),
            error: None,
        };

        assert_eq!(
            GoogleSttTranscriber::extract_transcript(&response),
            "coffee 300 yen"
        );
    }
}
