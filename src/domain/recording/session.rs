//! Recording session state machine

use std::fmt;
use thiserror::Error;

/// Recording session states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SessionState {
    #[default]
    Idle,
    Recording,
    Stopping,
}

impl SessionState {
    /// Get the string representation
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Recording => "recording",
            Self::Stopping => "stopping",
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error when an invalid state transition is attempted
#[derive(Debug, Clone, Error)]
#[error("Invalid state transition: cannot {action} while in {current_state} state")]
pub struct InvalidStateTransition {
    pub current_state: SessionState,
    pub action: String,
}

/// Recording session entity.
/// Manages state transitions for one microphone capture lifecycle.
///
/// State machine:
///   IDLE -> RECORDING (begin)
///   RECORDING -> STOPPING (stop)
///   RECORDING -> IDLE (cancel)
///   STOPPING -> IDLE (flush_complete)
///
/// Starting a second session while one is active is rejected, never
/// queued.
#[derive(Debug, Default)]
pub struct RecordingSession {
    state: SessionState,
}

impl RecordingSession {
    /// Create a new session in idle state
    pub fn new() -> Self {
        Self {
            state: SessionState::Idle,
        }
    }

    /// Get the current state
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Check if currently idle
    pub fn is_idle(&self) -> bool {
        self.state == SessionState::Idle
    }

    /// Check if currently recording
    pub fn is_recording(&self) -> bool {
        self.state == SessionState::Recording
    }

    /// Transition from IDLE to RECORDING
    pub fn begin(&mut self) -> Result<(), InvalidStateTransition> {
        if self.state != SessionState::Idle {
            return Err(InvalidStateTransition {
                current_state: self.state,
                action: "begin recording".to_string(),
            });
        }
        self.state = SessionState::Recording;
        Ok(())
    }

    /// Transition from RECORDING to STOPPING
    pub fn stop(&mut self) -> Result<(), InvalidStateTransition> {
        if self.state != SessionState::Recording {
            return Err(InvalidStateTransition {
                current_state: self.state,
                action: "stop recording".to_string(),
            });
        }
        self.state = SessionState::Stopping;
        Ok(())
    }

    /// Transition from RECORDING to IDLE (discard without flushing)
    pub fn cancel(&mut self) -> Result<(), InvalidStateTransition> {
        if self.state != SessionState::Recording {
            return Err(InvalidStateTransition {
                current_state: self.state,
                action: "cancel recording".to_string(),
            });
        }
        self.state = SessionState::Idle;
        Ok(())
    }

    /// Transition from STOPPING to IDLE once the flush has completed
    pub fn flush_complete(&mut self) -> Result<(), InvalidStateTransition> {
        if self.state != SessionState::Stopping {
            return Err(InvalidStateTransition {
                current_state: self.state,
                action: "complete flush".to_string(),
            });
        }
        self.state = SessionState::Idle;
        Ok(())
    }
}
