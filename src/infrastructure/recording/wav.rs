//! WAV encoding for flushed recordings
//!
//! Settings match the capture pipeline: mono, 16-bit PCM, at the
//! configured sample rate.

use std::io::Cursor;

use hound::{SampleFormat, WavSpec, WavWriter};
use thiserror::Error;

/// WAV encoding errors
#[derive(Debug, Clone, Error)]
pub enum EncodingError {
    #[error("Failed to create WAV writer: {0}")]
    Create(String),

    #[error("Failed to write WAV samples: {0}")]
    Write(String),

    #[error("Failed to finalize WAV container: {0}")]
    Finalize(String),
}

/// Encode mono 16-bit PCM samples into an in-memory WAV container
pub fn encode_wav(samples: &[i16], sample_rate: u32) -> Result<Vec<u8>, EncodingError> {
    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer =
            WavWriter::new(&mut cursor, spec).map_err(|e| EncodingError::Create(e.to_string()))?;
        for &sample in samples {
            writer
                .write_sample(sample)
                .map_err(|e| EncodingError::Write(e.to_string()))?;
        }
        writer
            .finalize()
            .map_err(|e| EncodingError::Finalize(e.to_string()))?;
    }

    Ok(cursor.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_produces_riff_header() {
        let bytes = encode_wav(&[0i16; 160], 16_000).unwrap();
        assert_eq!(&bytes[0..4], b"RIFF");
        assert_eq!(&bytes[8..12], b"WAVE");
    }

    #[test]
    fn encode_size_matches_sample_count() {
        let bytes = encode_wav(&[0i16; 160], 16_000).unwrap();
        // 44-byte canonical header plus two bytes per sample
        assert_eq!(bytes.len(), 44 + 160 * 2);
    }

    #[test]
    fn encode_round_trips_samples() {
        let samples: Vec<i16> = (0..100).map(|i| (i * 100) as i16).collect();
        let bytes = encode_wav(&samples, 16_000).unwrap();

        let reader = hound::WavReader::new(Cursor::new(bytes)).unwrap();
        let spec = reader.spec();
        assert_eq!(spec.channels, 1);
        assert_eq!(spec.sample_rate, 16_000);
        assert_eq!(spec.bits_per_sample, 16);

        let decoded: Vec<i16> = reader.into_samples().map(|s| s.unwrap()).collect();
        assert_eq!(decoded, samples);
    }

    #[test]
    fn encode_empty_buffer() {
        let bytes = encode_wav(&[], 16_000).unwrap();
        assert_eq!(bytes.len(), 44);
    }

    #[test]
    fn encode_honors_sample_rate() {
        let bytes = encode_wav(&[0i16; 10], 48_000).unwrap();
        let reader = hound::WavReader::new(Cursor::new(bytes)).unwrap();
        assert_eq!(reader.spec().sample_rate, 48_000);
    }
}
