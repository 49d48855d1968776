//! DeviMitra - voice-driven conversational assistant
//!
//! Records microphone audio, transcribes it with AssemblyAI, generates a
//! reply with Gemini, and speaks it with ElevenLabs, in a loop, in one of
//! three selectable languages (English, Hindi, Tamil).
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                     Terminal                          │
//! │        language menu │ transcript echoes │ AI text    │
//! └────────────────────┬─────────────────────────────────┘
//!                      │
//! ┌────────────────────▼─────────────────────────────────┐
//! │                     Session                           │
//! │   capture → transcribe → generate → synthesize/play   │
//! └────────────────────┬─────────────────────────────────┘
//!                      │
//! ┌────────────────────▼─────────────────────────────────┐
//! │               Remote services                         │
//! │     AssemblyAI  │  Gemini  │  ElevenLabs              │
//! └──────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod generation;
pub mod history;
pub mod language;
pub mod session;
pub mod stt;
pub mod tts;
pub mod voice;

pub use config::Config;
pub use error::{Error, Result};
pub use generation::{Generate, GeminiGenerator};
pub use history::{ConversationHistory, HISTORY_WINDOW, build_prompt};
pub use language::{Language, LanguageProfile, MenuChoice, TranscriptRoute};
pub use session::Session;
pub use stt::{AssemblyAiTranscriber, ManualTranscriber, Transcribe};
pub use tts::{ElevenLabsSynthesizer, Synthesize};
