//! Transcription infrastructure module

mod google_stt;

pub use google_stt::GoogleSttTranscriber;
