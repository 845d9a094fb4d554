//! Audio clip value object

/// Value object representing one flushed recording ready for
/// transcription: a mono 16-bit PCM WAV container plus its sample rate.
#[derive(Debug, Clone)]
pub struct AudioClip {
    data: Vec<u8>,
    sample_rate_hz: u32,
}

impl AudioClip {
    /// Create an AudioClip from WAV container bytes
    pub fn new(data: Vec<u8>, sample_rate_hz: u32) -> Self {
        Self {
            data,
            sample_rate_hz,
        }
    }

    /// Get the WAV container bytes
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Consume and return the WAV container bytes
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Get the sample rate in Hz
    pub fn sample_rate_hz(&self) -> u32 {
        self.sample_rate_hz
    }

    /// Get the size in bytes
    pub fn size_bytes(&self) -> usize {
        self.data.len()
    }

    /// Get human-readable size
    pub fn human_readable_size(&self) -> String {
        let bytes = self.size_bytes();
        if bytes < 1024 {
            format!("{} B", bytes)
        } else if bytes < 1024 * 1024 {
            format!("{:.1} KB", bytes as f64 / 1024.0)
        } else {
            format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
        }
    }

    /// Encode the audio data as base64
    pub fn to_base64(&self) -> String {
        use base64::Engine;
        base64::engine::general_purpose::STANDARD.encode(&self.data)
    }
}
