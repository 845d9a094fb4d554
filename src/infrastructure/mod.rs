//! Infrastructure layer - Adapter implementations
//!
//! Contains concrete implementations of the port interfaces,
//! integrating with external systems: the microphone, the Google
//! Speech API, the OpenAI API, SQLite and the config file.

pub mod config;
pub mod extraction;
pub mod ledger;
pub mod recording;
pub mod transcription;

// Re-export adapters
pub use config::XdgConfigStore;
pub use extraction::OpenAiExtractor;
pub use ledger::SqliteLedger;
pub use recording::CpalVoiceRecorder;
pub use transcription::GoogleSttTranscriber;
