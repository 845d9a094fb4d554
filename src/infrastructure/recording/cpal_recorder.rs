//! Cross-platform microphone recorder using cpal
//!
//! Captures mono 16-bit PCM (resampling from the device rate when
//! needed) and flushes each session to a fresh WAV file. The capture
//! worker is a dedicated thread controlled through channels: a stop
//! message ends the capture loop and a completion channel hands the
//! buffered samples back, so termination is observed rather than
//! polled.

use std::path::PathBuf;
use std::sync::mpsc;
use std::sync::{Arc, Mutex as StdMutex};

use async_trait::async_trait;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{SampleFormat, SampleRate, StreamConfig};
use rubato::{FftFixedIn, Resampler};

use super::wav::encode_wav;
use crate::application::ports::{RecordingError, VoiceRecorder};
use crate::domain::recording::AudioClip;

/// Command sent to the capture worker to end its loop
enum StopCommand {
    /// Hand the buffered samples back for flushing
    Flush,
    /// Drop the buffer and exit
    Discard,
}

/// Samples the worker hands back on flush, at the device rate
struct CapturedAudio {
    samples: Vec<i16>,
    sample_rate: u32,
}

/// Channel ends held while a worker is live
struct WorkerHandle {
    stop_tx: mpsc::Sender<StopCommand>,
    done_rx: mpsc::Receiver<CapturedAudio>,
}

/// Microphone recorder backed by cpal.
///
/// The cpal stream is owned entirely by the worker thread (streams are
/// not Send); the struct only holds the control channels.
pub struct CpalVoiceRecorder {
    target_sample_rate: u32,
    wav_path: PathBuf,
    worker: StdMutex<Option<WorkerHandle>>,
}

impl CpalVoiceRecorder {
    /// Create a recorder flushing WAV files at the given rate and path
    pub fn new(target_sample_rate: u32, wav_path: impl Into<PathBuf>) -> Self {
        Self {
            target_sample_rate,
            wav_path: wav_path.into(),
            worker: StdMutex::new(None),
        }
    }

    /// Get the default input device
    fn get_input_device() -> Result<cpal::Device, RecordingError> {
        let host = cpal::default_host();
        host.default_input_device()
            .ok_or(RecordingError::NoAudioDevice)
    }

    /// Get a suitable input configuration, preferring mono at the
    /// target rate
    fn get_input_config(
        device: &cpal::Device,
        target_rate: u32,
    ) -> Result<(StreamConfig, SampleFormat), RecordingError> {
        let supported_configs = device
            .supported_input_configs()
            .map_err(|e| RecordingError::StartFailed(format!("Failed to get configs: {}", e)))?;

        let mut best_config: Option<cpal::SupportedStreamConfigRange> = None;

        for config in supported_configs {
            // Only consider i16 or f32 formats
            if config.sample_format() != SampleFormat::I16
                && config.sample_format() != SampleFormat::F32
            {
                continue;
            }

            let includes_target = config.min_sample_rate().0 <= target_rate
                && config.max_sample_rate().0 >= target_rate;

            let is_better = match &best_config {
                None => true,
                Some(current) => {
                    let fewer_channels = config.channels() < current.channels();
                    let better_rate = includes_target && current.min_sample_rate().0 > target_rate;
                    fewer_channels || better_rate
                }
            };
            if is_better {
                best_config = Some(config);
            }
        }

        let config_range = best_config.ok_or(RecordingError::StartFailed(
            "No suitable config found".into(),
        ))?;

        let sample_rate = if config_range.min_sample_rate().0 <= target_rate
            && config_range.max_sample_rate().0 >= target_rate
        {
            SampleRate(target_rate)
        } else {
            config_range.min_sample_rate()
        };

        let sample_format = config_range.sample_format();
        let config = StreamConfig {
            channels: config_range.channels(),
            sample_rate,
            buffer_size: cpal::BufferSize::Default,
        };

        Ok((config, sample_format))
    }

    /// Mix interleaved multi-channel samples down to mono
    fn mix_to_mono(samples: &[i16], channels: u16) -> Vec<i16> {
        if channels == 1 {
            return samples.to_vec();
        }

        samples
            .chunks(channels as usize)
            .map(|chunk| {
                let sum: i32 = chunk.iter().map(|&s| s as i32).sum();
                (sum / channels as i32) as i16
            })
            .collect()
    }

    /// Resample mono audio from the device rate to the target rate
    fn resample(
        samples: &[i16],
        source_rate: u32,
        target_rate: u32,
    ) -> Result<Vec<i16>, RecordingError> {
        if source_rate == target_rate {
            return Ok(samples.to_vec());
        }

        let samples_f32: Vec<f32> = samples.iter().map(|&s| s as f32 / 32768.0).collect();

        let ratio = target_rate as f64 / source_rate as f64;
        let output_len = (samples_f32.len() as f64 * ratio).ceil() as usize;

        let mut resampler = FftFixedIn::<f32>::new(
            source_rate as usize,
            target_rate as usize,
            1024, // Chunk size
            2,    // Sub-chunks
            1,    // Mono
        )
        .map_err(|e| RecordingError::FlushFailed(format!("Resampler init failed: {}", e)))?;

        let mut output = Vec::with_capacity(output_len);
        let mut input_pos = 0;

        while input_pos < samples_f32.len() {
            let frames_needed = resampler.input_frames_next();
            let end_pos = (input_pos + frames_needed).min(samples_f32.len());
            let chunk: Vec<Vec<f32>> = vec![samples_f32[input_pos..end_pos].to_vec()];

            // Pad the tail chunk if the input ran out
            let chunk = if chunk[0].len() < frames_needed {
                let mut padded = chunk[0].clone();
                padded.resize(frames_needed, 0.0);
                vec![padded]
            } else {
                chunk
            };

            let resampled = resampler
                .process(&chunk, None)
                .map_err(|e| RecordingError::FlushFailed(format!("Resampling failed: {}", e)))?;

            output.extend(resampled[0].iter().map(|&s| (s * 32767.0) as i16));
            input_pos = end_pos;
        }

        output.truncate(output_len);

        Ok(output)
    }

    /// Flush step: resample, encode WAV, overwrite the session file
    fn flush(
        captured: CapturedAudio,
        target_rate: u32,
        wav_path: &std::path::Path,
    ) -> Result<AudioClip, RecordingError> {
        if captured.samples.is_empty() {
            return Err(RecordingError::FlushFailed(
                "No audio data captured".to_string(),
            ));
        }

        let resampled = Self::resample(&captured.samples, captured.sample_rate, target_rate)?;

        let wav_bytes = encode_wav(&resampled, target_rate)
            .map_err(|e| RecordingError::FlushFailed(format!("WAV encoding failed: {}", e)))?;

        std::fs::write(wav_path, &wav_bytes)
            .map_err(|e| RecordingError::FlushFailed(format!("Failed to write WAV: {}", e)))?;

        Ok(AudioClip::new(wav_bytes, target_rate))
    }

    /// Capture worker body: open the stream, append chunks until a
    /// stop command arrives, then hand the buffer back on flush.
    fn run_worker(
        target_rate: u32,
        ready_tx: mpsc::Sender<Result<(), RecordingError>>,
        stop_rx: mpsc::Receiver<StopCommand>,
        done_tx: mpsc::Sender<CapturedAudio>,
    ) {
        let device = match Self::get_input_device() {
            Ok(d) => d,
            Err(e) => {
                let _ = ready_tx.send(Err(e));
                return;
            }
        };

        let (config, sample_format) = match Self::get_input_config(&device, target_rate) {
            Ok(c) => c,
            Err(e) => {
                let _ = ready_tx.send(Err(e));
                return;
            }
        };

        let sample_rate = config.sample_rate.0;
        let channels = config.channels;

        let buffer: Arc<StdMutex<Vec<i16>>> = Arc::new(StdMutex::new(Vec::new()));

        let stream_result = match sample_format {
            SampleFormat::I16 => {
                let buffer = Arc::clone(&buffer);
                device.build_input_stream(
                    &config,
                    move |data: &[i16], _: &cpal::InputCallbackInfo| {
                        let mono = CpalVoiceRecorder::mix_to_mono(data, channels);
                        if let Ok(mut buffer) = buffer.lock() {
                            buffer.extend_from_slice(&mono);
                        }
                    },
                    |err| eprintln!("Audio stream error: {}", err),
                    None,
                )
            }

            SampleFormat::F32 => {
                let buffer = Arc::clone(&buffer);
                device.build_input_stream(
                    &config,
                    move |data: &[f32], _: &cpal::InputCallbackInfo| {
                        let i16_data: Vec<i16> =
                            data.iter().map(|&s| (s * 32767.0) as i16).collect();
                        let mono = CpalVoiceRecorder::mix_to_mono(&i16_data, channels);
                        if let Ok(mut buffer) = buffer.lock() {
                            buffer.extend_from_slice(&mono);
                        }
                    },
                    |err| eprintln!("Audio stream error: {}", err),
                    None,
                )
            }

            _ => {
                let _ = ready_tx.send(Err(RecordingError::StartFailed(
                    "Unsupported sample format".into(),
                )));
                return;
            }
        };

        let stream = match stream_result {
            Ok(s) => s,
            Err(e) => {
                let _ = ready_tx.send(Err(RecordingError::StartFailed(e.to_string())));
                return;
            }
        };

        if let Err(e) = stream.play() {
            let _ = ready_tx.send(Err(RecordingError::StartFailed(e.to_string())));
            return;
        }

        let _ = ready_tx.send(Ok(()));

        // Block until told to stop; a dropped sender counts as discard
        let command = stop_rx.recv().unwrap_or(StopCommand::Discard);
        drop(stream);

        if let StopCommand::Flush = command {
            let samples = {
                let mut buffer = buffer.lock().unwrap_or_else(|e| e.into_inner());
                std::mem::take(&mut *buffer)
            };
            let _ = done_tx.send(CapturedAudio {
                samples,
                sample_rate,
            });
        }
    }
}

#[async_trait]
impl VoiceRecorder for CpalVoiceRecorder {
    async fn start(&self) -> Result<(), RecordingError> {
        {
            let worker = self
                .worker
                .lock()
                .unwrap_or_else(|e| e.into_inner());
            if worker.is_some() {
                return Err(RecordingError::AlreadyRecording);
            }
        }

        let (ready_tx, ready_rx) = mpsc::channel();
        let (stop_tx, stop_rx) = mpsc::channel();
        let (done_tx, done_rx) = mpsc::channel();

        let target_rate = self.target_sample_rate;
        std::thread::spawn(move || {
            Self::run_worker(target_rate, ready_tx, stop_rx, done_tx);
        });

        // Wait for the stream to actually start (or fail) before
        // reporting success
        let ready = tokio::task::spawn_blocking(move || ready_rx.recv())
            .await
            .map_err(|e| RecordingError::StartFailed(format!("Task join error: {}", e)))?
            .map_err(|_| RecordingError::StartFailed("Capture worker exited".into()))?;
        ready?;

        let mut worker = self.worker.lock().unwrap_or_else(|e| e.into_inner());
        *worker = Some(WorkerHandle { stop_tx, done_rx });

        Ok(())
    }

    async fn stop(&self) -> Result<AudioClip, RecordingError> {
        let handle = {
            let mut worker = self.worker.lock().unwrap_or_else(|e| e.into_inner());
            worker.take().ok_or(RecordingError::NotRecording)?
        };

        handle
            .stop_tx
            .send(StopCommand::Flush)
            .map_err(|_| RecordingError::RecordingFailed("Capture worker is gone".into()))?;

        let target_rate = self.target_sample_rate;
        let wav_path = self.wav_path.clone();

        // Flush is CPU-bound (resample + encode); keep it off the
        // async threads
        tokio::task::spawn_blocking(move || {
            let captured = handle
                .done_rx
                .recv()
                .map_err(|_| RecordingError::RecordingFailed("Capture worker is gone".into()))?;
            Self::flush(captured, target_rate, &wav_path)
        })
        .await
        .map_err(|e| RecordingError::RecordingFailed(format!("Task join error: {}", e)))?
    }

    async fn cancel(&self) -> Result<(), RecordingError> {
        let handle = {
            let mut worker = self.worker.lock().unwrap_or_else(|e| e.into_inner());
            worker.take().ok_or(RecordingError::NotRecording)?
        };

        // Worker drops the buffer and exits; nothing comes back
        let _ = handle.stop_tx.send(StopCommand::Discard);
        Ok(())
    }

    fn is_recording(&self) -> bool {
        self.worker
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mix_to_mono_single_channel() {
        let mono = vec![100i16, 200, 300];
        let result = CpalVoiceRecorder::mix_to_mono(&mono, 1);
        assert_eq!(result, mono);
    }

    #[test]
    fn mix_to_mono_two_channels() {
        let stereo = vec![100i16, 200, 300, 400];
        let result = CpalVoiceRecorder::mix_to_mono(&stereo, 2);
        assert_eq!(result, vec![150, 350]); // Average of each pair
    }

    #[test]
    fn resample_same_rate_is_identity() {
        let samples = vec![1i16, 2, 3, 4];
        let result = CpalVoiceRecorder::resample(&samples, 16_000, 16_000).unwrap();
        assert_eq!(result, samples);
    }

    #[test]
    fn resample_halves_length() {
        let samples = vec![0i16; 32_000];
        let result = CpalVoiceRecorder::resample(&samples, 32_000, 16_000).unwrap();
        assert_eq!(result.len(), 16_000);
    }

    #[test]
    fn recorder_default_state() {
        let recorder = CpalVoiceRecorder::new(16_000, "recorded.wav");
        assert!(!recorder.is_recording());
    }

    #[tokio::test]
    async fn stop_without_start_fails() {
        let recorder = CpalVoiceRecorder::new(16_000, "recorded.wav");
        let err = recorder.stop().await.unwrap_err();
        assert!(matches!(err, RecordingError::NotRecording));
    }

    #[tokio::test]
    async fn cancel_without_start_fails() {
        let recorder = CpalVoiceRecorder::new(16_000, "recorded.wav");
        let err = recorder.cancel().await.unwrap_err();
        assert!(matches!(err, RecordingError::NotRecording));
    }
}
