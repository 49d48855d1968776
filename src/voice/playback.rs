//! Audio playback to speakers
//!
//! Clips are played at their native sample rate; the output stream is
//! configured per clip rather than at a fixed rate, since the synthesis
//! service returns 44.1 kHz MP3 by default.

use std::io::Cursor;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, SampleRate, StreamConfig};

use crate::{Error, Result};

/// Playback seam: decodes and plays one encoded audio file, blocking the
/// turn until the clip finishes
#[async_trait]
pub trait Play: Send {
    /// Play an encoded (MP3) audio file to completion
    ///
    /// # Errors
    ///
    /// Returns error if decoding or playback fails
    async fn play_file(&mut self, path: &Path) -> Result<()>;
}

/// An audio clip decoded to f32 samples at its native sample rate
#[derive(Clone, Debug)]
pub struct DecodedAudio {
    /// Mono samples in [-1.0, 1.0]
    pub samples: Vec<f32>,
    /// Rate the samples were encoded at
    pub sample_rate: u32,
}

/// Plays audio to the default output device
pub struct AudioPlayback {
    device: Device,
}

impl AudioPlayback {
    /// Create a new audio playback instance
    ///
    /// # Errors
    ///
    /// Returns error if no output device is available
    pub fn new() -> Result<Self> {
        let host = cpal::default_host();

        let device = host
            .default_output_device()
            .ok_or_else(|| Error::Audio("no output device available".to_string()))?;

        tracing::debug!(
            device = device.name().unwrap_or_default(),
            "audio playback initialized"
        );

        Ok(Self { device })
    }

    /// Play raw f32 samples at the given rate
    ///
    /// # Errors
    ///
    /// Returns error if playback fails
    pub async fn play(&mut self, samples: Vec<f32>, sample_rate: u32) -> Result<()> {
        self.play_clip(DecodedAudio {
            samples,
            sample_rate,
        })
        .await
    }

    /// Play audio from MP3 bytes at the rate they were encoded at
    ///
    /// # Errors
    ///
    /// Returns error if decoding or playback fails
    pub async fn play_mp3(&mut self, mp3_data: &[u8]) -> Result<()> {
        let clip = decode_mp3(mp3_data)?;
        self.play_clip(clip).await
    }

    /// Pick an output configuration matching the clip's sample rate,
    /// preferring mono with a stereo fallback
    fn output_config(&self, sample_rate: u32) -> Result<StreamConfig> {
        let supported = self
            .device
            .supported_output_configs()
            .map_err(|e| Error::Audio(e.to_string()))?
            .find(|c| {
                c.channels() == 1
                    && c.min_sample_rate() <= SampleRate(sample_rate)
                    && c.max_sample_rate() >= SampleRate(sample_rate)
            })
            .or_else(|| {
                self.device.supported_output_configs().ok()?.find(|c| {
                    c.channels() == 2
                        && c.min_sample_rate() <= SampleRate(sample_rate)
                        && c.max_sample_rate() >= SampleRate(sample_rate)
                })
            })
            .ok_or_else(|| {
                Error::Audio(format!("no suitable output config for {sample_rate} Hz"))
            })?;

        Ok(supported.with_sample_rate(SampleRate(sample_rate)).config())
    }

    /// Play one decoded clip to completion. The stream itself is not
    /// `Send`, so the blocking poll loop runs on a dedicated thread.
    async fn play_clip(&self, clip: DecodedAudio) -> Result<()> {
        if clip.samples.is_empty() {
            return Ok(());
        }

        let config = self.output_config(clip.sample_rate)?;

        tokio::task::spawn_blocking(move || play_samples_blocking(&config, &clip))
            .await
            .map_err(|e| Error::Audio(format!("playback task failed: {e}")))?
    }
}

#[async_trait]
impl Play for AudioPlayback {
    async fn play_file(&mut self, path: &Path) -> Result<()> {
        let data = std::fs::read(path)?;
        self.play_mp3(&data).await
    }
}

/// Feed samples to a fresh output stream and wait for the clip to finish
fn play_samples_blocking(config: &StreamConfig, clip: &DecodedAudio) -> Result<()> {
    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or_else(|| Error::Audio("no output device".to_string()))?;

    let channels = config.channels as usize;

    let sample_count = clip.samples.len();
    let samples = Arc::new(clip.samples.clone());
    let position = Arc::new(Mutex::new(0usize));
    let finished = Arc::new(Mutex::new(false));
    let finished_clone = Arc::clone(&finished);

    let samples_clone = Arc::clone(&samples);
    let position_clone = Arc::clone(&position);

    let stream = device
        .build_output_stream(
            config,
            move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                let Ok(mut pos) = position_clone.lock() else {
                    return;
                };

                for frame in data.chunks_mut(channels) {
                    let sample = if *pos < samples_clone.len() {
                        samples_clone[*pos]
                    } else {
                        if let Ok(mut done) = finished_clone.lock() {
                            *done = true;
                        }
                        0.0
                    };

                    for out in frame.iter_mut() {
                        *out = sample;
                    }

                    if *pos < samples_clone.len() {
                        *pos += 1;
                    }
                }
            },
            |err| {
                tracing::error!(error = %err, "audio playback error");
            },
            None,
        )
        .map_err(|e| Error::Audio(e.to_string()))?;

    stream.play().map_err(|e| Error::Audio(e.to_string()))?;

    // Poll for completion, bounded by the clip's own duration
    let timeout = completion_timeout(sample_count, clip.sample_rate);
    let start = std::time::Instant::now();

    loop {
        let done = finished.lock().map(|f| *f).unwrap_or(true);
        if done || start.elapsed() > timeout {
            break;
        }
        std::thread::sleep(Duration::from_millis(50));
    }

    // Small delay to ensure audio finishes
    std::thread::sleep(Duration::from_millis(100));

    drop(stream);
    tracing::debug!(samples = sample_count, rate = clip.sample_rate, "playback complete");

    Ok(())
}

/// Watchdog for the completion poll: the clip's duration at its native
/// rate plus a small margin
fn completion_timeout(sample_count: usize, sample_rate: u32) -> Duration {
    let duration_ms = (sample_count as u64 * 1000) / u64::from(sample_rate);
    Duration::from_millis(duration_ms + 500)
}

/// Decode MP3 bytes to mono f32 samples, keeping the stream's sample rate
///
/// # Errors
///
/// Returns error if the data is malformed or contains no frames
pub fn decode_mp3(mp3_data: &[u8]) -> Result<DecodedAudio> {
    let mut decoder = minimp3::Decoder::new(Cursor::new(mp3_data));
    let mut samples = Vec::new();
    let mut sample_rate = None;

    loop {
        match decoder.next_frame() {
            Ok(frame) => {
                if sample_rate.is_none() {
                    #[allow(clippy::cast_sign_loss)]
                    let rate = frame.sample_rate as u32;
                    sample_rate = Some(rate);
                }

                // Convert i16 samples to f32 and handle stereo to mono
                let frame_samples: Vec<f32> = if frame.channels == 2 {
                    // Stereo: average channels
                    frame
                        .data
                        .chunks(2)
                        .map(|chunk| {
                            let left = f32::from(chunk[0]) / 32768.0;
                            let right =
                                f32::from(chunk.get(1).copied().unwrap_or(chunk[0])) / 32768.0;
                            f32::midpoint(left, right)
                        })
                        .collect()
                } else {
                    // Mono
                    frame.data.iter().map(|&s| f32::from(s) / 32768.0).collect()
                };

                samples.extend(frame_samples);
            }
            Err(minimp3::Error::Eof) => break,
            Err(e) => return Err(Error::Audio(format!("MP3 decode error: {e}"))),
        }
    }

    let sample_rate =
        sample_rate.ok_or_else(|| Error::Audio("MP3 stream contained no frames".to_string()))?;

    Ok(DecodedAudio {
        samples,
        sample_rate,
    })
}
