//! Local audio I/O
//!
//! Fixed-duration microphone capture and blocking speaker playback. The
//! remote STT/TTS calls live in `stt.rs` and `tts.rs`.

mod capture;
mod playback;

pub use capture::{AudioCapture, SAMPLE_RATE, samples_to_wav, write_wav_tempfile};
pub use playback::{AudioPlayback, DecodedAudio, Play, decode_mp3};
