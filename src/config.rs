//! Configuration management for DeviMitra
//!
//! All three service credentials are required; validation collects every
//! missing variable so the user sees the full list at once.

use std::env;
use std::time::Duration;

use crate::{Error, Result};

/// Environment variable holding the `AssemblyAI` credential
pub const ASSEMBLYAI_API_KEY: &str = "ASSEMBLYAI_API_KEY";

/// Environment variable holding the Gemini credential
pub const GEMINI_API_KEY: &str = "GEMINI_API_KEY";

/// Environment variable holding the `ElevenLabs` credential
pub const ELEVENLABS_API_KEY: &str = "ELEVENLABS_API_KEY";

/// Gemini model used for response generation
pub const GENERATION_MODEL: &str = "gemini-2.0-flash";

/// ElevenLabs voice identity ("Devi")
pub const TTS_VOICE_ID: &str = "MF4J4IDTRo0AxOO4dpFR";

/// ElevenLabs model; must render all three supported languages
pub const TTS_MODEL: &str = "eleven_multilingual_v2";

/// DeviMitra configuration
#[derive(Clone)]
pub struct Config {
    /// AssemblyAI transcription credential
    pub assemblyai_api_key: String,

    /// Gemini generation credential
    pub gemini_api_key: String,

    /// ElevenLabs synthesis credential
    pub elevenlabs_api_key: String,

    /// Generation model identifier
    pub generation_model: String,

    /// TTS voice identifier
    pub tts_voice: String,

    /// TTS model identifier
    pub tts_model: String,

    /// Maximum length of one recorded utterance
    pub record_duration: Duration,
}

impl Config {
    /// Load configuration from the environment (and an optional `.env` file)
    ///
    /// # Errors
    ///
    /// Returns a configuration error naming every missing credential
    pub fn from_env(record_secs: u64) -> Result<Self> {
        // A missing .env file is fine; real environment variables still apply
        let _ = dotenvy::dotenv();

        let mut missing = Vec::new();
        let mut require = |name: &'static str| match env::var(name) {
            Ok(value) if !value.trim().is_empty() => value,
            _ => {
                missing.push(name);
                String::new()
            }
        };

        let assemblyai_api_key = require(ASSEMBLYAI_API_KEY);
        let gemini_api_key = require(GEMINI_API_KEY);
        let elevenlabs_api_key = require(ELEVENLABS_API_KEY);

        if !missing.is_empty() {
            return Err(Error::Config(format!(
                "missing API keys: {}",
                missing.join(", ")
            )));
        }

        Ok(Self {
            assemblyai_api_key,
            gemini_api_key,
            elevenlabs_api_key,
            generation_model: GENERATION_MODEL.to_string(),
            tts_voice: TTS_VOICE_ID.to_string(),
            tts_model: TTS_MODEL.to_string(),
            record_duration: Duration::from_secs(record_secs),
        })
    }
}

// Credentials stay out of Debug output
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("generation_model", &self.generation_model)
            .field("tts_voice", &self.tts_voice)
            .field("tts_model", &self.tts_model)
            .field("record_duration", &self.record_duration)
            .finish_non_exhaustive()
    }
}
