//! Text-to-speech processing via ElevenLabs

use async_trait::async_trait;
use futures::StreamExt;

use crate::{Error, Result};

/// Remote voice-synthesis service seam
#[async_trait]
pub trait Synthesize: Send + Sync {
    /// Synthesize text to encoded audio
    ///
    /// # Returns
    ///
    /// Audio bytes (MP3 format)
    ///
    /// # Errors
    ///
    /// Returns error if synthesis fails
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>>;
}

/// Synthesizes speech with ElevenLabs
pub struct ElevenLabsSynthesizer {
    client: reqwest::Client,
    api_key: String,
    voice: String,
    model: String,
}

impl ElevenLabsSynthesizer {
    /// Create a new synthesizer
    ///
    /// # Arguments
    ///
    /// * `voice_id` - fixed voice identity
    /// * `model` - must support all configured languages
    ///
    /// # Errors
    ///
    /// Returns error if the API key is missing
    pub fn new(api_key: String, voice_id: String, model: String) -> Result<Self> {
        if api_key.is_empty() {
            return Err(Error::Config(
                "ElevenLabs API key required for TTS".to_string(),
            ));
        }

        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
            voice: voice_id,
            model,
        })
    }
}

#[async_trait]
impl Synthesize for ElevenLabsSynthesizer {
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>> {
        #[derive(serde::Serialize)]
        struct ElevenLabsRequest<'a> {
            text: &'a str,
            model_id: &'a str,
        }

        tracing::debug!(text_chars = text.len(), voice = %self.voice, "starting synthesis");

        let url = format!(
            "https://api.elevenlabs.io/v1/text-to-speech/{}",
            self.voice
        );

        let request = ElevenLabsRequest {
            text,
            model_id: &self.model,
        };

        let response = self
            .client
            .post(&url)
            .header("xi-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "ElevenLabs API error");
            return Err(Error::Tts(format!("ElevenLabs TTS error {status}: {body}")));
        }

        // The body arrives chunked; keep only non-empty chunks
        let mut audio = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            if !chunk.is_empty() {
                audio.extend_from_slice(&chunk);
            }
        }

        tracing::info!(audio_bytes = audio.len(), "synthesis complete");
        Ok(audio)
    }
}
