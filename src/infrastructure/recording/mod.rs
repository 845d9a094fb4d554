//! Recording infrastructure module
//!
//! Microphone capture via cpal with each session flushed to a mono
//! 16-bit PCM WAV file.

mod cpal_recorder;
mod wav;

pub use cpal_recorder::CpalVoiceRecorder;
pub use wav::{encode_wav, EncodingError};
