//! Capture cycle use case
//!
//! One cycle runs from stopping a recording through inserting (or
//! skipping) one ledger record: flush WAV -> transcribe -> extract ->
//! insert.

use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;

use crate::domain::ledger::{ExpenseRecord, ALL_CATEGORIES};
use crate::domain::recording::{InvalidStateTransition, RecordingSession, SessionState};

use super::ports::{
    ExpenseExtractor, ExtractionError, LedgerStore, RecordingError, StorageError, Transcriber,
    TranscriptionError, VoiceRecorder,
};

/// Errors from the capture cycle use case
#[derive(Debug, Error)]
pub enum CycleError {
    #[error("Recording failed: {0}")]
    Recording(#[from] RecordingError),

    #[error("Transcription failed: {0}")]
    Transcription(#[from] TranscriptionError),

    #[error("Extraction failed: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("Storage failed: {0}")]
    Storage(#[from] StorageError),

    #[error("Invalid state transition: {0}")]
    InvalidState(#[from] InvalidStateTransition),
}

/// Outcome of one completed cycle
#[derive(Debug, Clone, PartialEq)]
pub enum CycleOutcome {
    /// The pipeline produced and stored a record (possibly all-default
    /// when extraction fell back)
    Recorded(ExpenseRecord),
    /// The transcriber recognized nothing; no record was created
    NothingRecognized,
}

/// Capture cycle use case.
///
/// Drives one microphone session through the whole pipeline. Exactly
/// one session can be active; `begin` while recording is rejected by
/// the session state machine.
pub struct CaptureCycleUseCase<R, T, E, L>
where
    R: VoiceRecorder,
    T: Transcriber,
    E: ExpenseExtractor,
    L: LedgerStore,
{
    recorder: R,
    transcriber: T,
    extractor: E,
    ledger: L,
    session: Arc<Mutex<RecordingSession>>,
}

impl<R, T, E, L> CaptureCycleUseCase<R, T, E, L>
where
    R: VoiceRecorder,
    T: Transcriber,
    E: ExpenseExtractor,
    L: LedgerStore,
{
    /// Create a new use case instance
    pub fn new(recorder: R, transcriber: T, extractor: E, ledger: L) -> Self {
        Self {
            recorder,
            transcriber,
            extractor,
            ledger,
            session: Arc::new(Mutex::new(RecordingSession::new())),
        }
    }

    /// Get the current session state
    pub async fn state(&self) -> SessionState {
        self.session.lock().await.state()
    }

    /// Borrow the ledger for read-side operations
    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    /// Start a capture session (IDLE -> RECORDING)
    pub async fn begin(&self) -> Result<(), CycleError> {
        {
            let mut session = self.session.lock().await;
            session.begin()?;
        }

        if let Err(e) = self.recorder.start().await {
            // Roll the state machine back so a later begin can succeed
            let mut session = self.session.lock().await;
            let _ = session.cancel();
            return Err(e.into());
        }

        Ok(())
    }

    /// Stop the session and run the rest of the pipeline.
    ///
    /// The timestamp handed to the extractor is captured here, fresh
    /// per cycle. Errors from any step abort the cycle without a
    /// partial insert; the session always returns to idle.
    pub async fn finish(&self) -> Result<CycleOutcome, CycleError> {
        {
            let mut session = self.session.lock().await;
            session.stop()?;
        }

        let outcome = self.run_pipeline().await;

        {
            let mut session = self.session.lock().await;
            let _ = session.flush_complete();
        }

        outcome
    }

    /// Cancel the active session without transcribing
    pub async fn abort(&self) -> Result<(), CycleError> {
        {
            let mut session = self.session.lock().await;
            session.cancel()?;
        }
        self.recorder.cancel().await?;
        Ok(())
    }

    async fn run_pipeline(&self) -> Result<CycleOutcome, CycleError> {
        let clip = self.recorder.stop().await?;

        let transcript = self.transcriber.transcribe(&clip).await?;
        if transcript.is_empty() {
            return Ok(CycleOutcome::NothingRecognized);
        }

        let now = chrono::Local::now().naive_local();
        let draft = self
            .extractor
            .extract(&transcript, now, ALL_CATEGORIES)
            .await?;

        // No validation gate: an all-default draft is stored as-is
        let record = self.ledger.insert(&draft)?;

        Ok(CycleOutcome::Recorded(record))
    }
}
