//! Recording port interface

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::recording::AudioClip;

/// Recording errors
#[derive(Debug, Clone, Error)]
pub enum RecordingError {
    #[error("Failed to start recording: {0}")]
    StartFailed(String),

    #[error("Recording already in progress")]
    AlreadyRecording,

    #[error("No recording in progress")]
    NotRecording,

    #[error("Recording failed: {0}")]
    RecordingFailed(String),

    #[error("Failed to flush recording: {0}")]
    FlushFailed(String),

    #[error("No audio device available")]
    NoAudioDevice,
}

/// Port for signal-controlled microphone capture.
///
/// One session at a time: `start` while a session is active fails with
/// `AlreadyRecording`.
#[async_trait]
pub trait VoiceRecorder: Send + Sync {
    /// Start a capture session.
    async fn start(&self) -> Result<(), RecordingError>;

    /// Stop the session and flush the buffered audio to a WAV clip.
    ///
    /// # Returns
    /// The flushed clip or an error
    async fn stop(&self) -> Result<AudioClip, RecordingError>;

    /// Stop the session and discard the buffered audio.
    async fn cancel(&self) -> Result<(), RecordingError>;

    /// Check if a session is active
    fn is_recording(&self) -> bool;
}
