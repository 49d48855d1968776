//! Speech-to-text processing
//!
//! English and Hindi go through AssemblyAI; Tamil is typed by the user
//! (see [`crate::language::TranscriptRoute`]).

use std::io::BufRead;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::{Error, Result};

const ASSEMBLYAI_API_BASE: &str = "https://api.assemblyai.com/v2";

/// Delay between transcript status polls
const POLL_INTERVAL: Duration = Duration::from_millis(1500);

/// Source of transcripts for one session
#[async_trait]
pub trait Transcribe: Send + Sync {
    /// Produce a transcript for one recorded utterance
    ///
    /// # Arguments
    ///
    /// * `audio` - WAV audio bytes
    /// * `language_code` - transcription-service language tag (e.g. `en_us`)
    ///
    /// # Errors
    ///
    /// Returns error if transcription fails
    async fn transcribe(&self, audio: &[u8], language_code: &str) -> Result<String>;
}

#[derive(serde::Deserialize)]
struct UploadResponse {
    upload_url: String,
}

#[derive(serde::Serialize)]
struct TranscriptRequest<'a> {
    audio_url: &'a str,
    language_code: &'a str,
}

#[derive(serde::Deserialize)]
struct TranscriptResponse {
    id: String,
    status: String,
    text: Option<String>,
    error: Option<String>,
}

/// Transcribes speech via the AssemblyAI REST API
pub struct AssemblyAiTranscriber {
    client: reqwest::Client,
    api_key: String,
}

impl AssemblyAiTranscriber {
    /// Create a new transcriber
    ///
    /// # Errors
    ///
    /// Returns error if the API key is missing
    pub fn new(api_key: String) -> Result<Self> {
        if api_key.is_empty() {
            return Err(Error::Config(
                "AssemblyAI API key required for transcription".to_string(),
            ));
        }

        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
        })
    }

    /// Upload raw audio bytes; AssemblyAI returns a private URL for them
    async fn upload(&self, audio: &[u8]) -> Result<String> {
        let response = self
            .client
            .post(format!("{ASSEMBLYAI_API_BASE}/upload"))
            .header("Authorization", &self.api_key)
            .body(audio.to_vec())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "AssemblyAI upload error");
            return Err(Error::Stt(format!("upload error {status}: {body}")));
        }

        let result: UploadResponse = response.json().await?;
        Ok(result.upload_url)
    }

    /// Create a transcript job for previously uploaded audio
    async fn create_transcript(&self, audio_url: &str, language_code: &str) -> Result<String> {
        let request = TranscriptRequest {
            audio_url,
            language_code,
        };

        let response = self
            .client
            .post(format!("{ASSEMBLYAI_API_BASE}/transcript"))
            .header("Authorization", &self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "AssemblyAI transcript error");
            return Err(Error::Stt(format!("transcript error {status}: {body}")));
        }

        let job: TranscriptResponse = response.json().await?;
        Ok(job.id)
    }

    /// Poll a transcript job until it completes or fails
    async fn await_transcript(&self, id: &str) -> Result<String> {
        loop {
            tokio::time::sleep(POLL_INTERVAL).await;

            let response = self
                .client
                .get(format!("{ASSEMBLYAI_API_BASE}/transcript/{id}"))
                .header("Authorization", &self.api_key)
                .send()
                .await?;

            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(Error::Stt(format!("poll error {status}: {body}")));
            }

            let job: TranscriptResponse = response.json().await?;
            tracing::debug!(id = %job.id, status = %job.status, "transcript status");

            match job.status.as_str() {
                "completed" => return Ok(job.text.unwrap_or_default()),
                "error" => {
                    let detail = job
                        .error
                        .unwrap_or_else(|| "unknown transcription failure".to_string());
                    return Err(Error::Stt(detail));
                }
                _ => {} // queued / processing
            }
        }
    }
}

#[async_trait]
impl Transcribe for AssemblyAiTranscriber {
    async fn transcribe(&self, audio: &[u8], language_code: &str) -> Result<String> {
        tracing::debug!(
            audio_bytes = audio.len(),
            language = language_code,
            "starting transcription"
        );

        let audio_url = self.upload(audio).await?;
        let id = self.create_transcript(&audio_url, language_code).await?;
        let text = self.await_transcript(&id).await?;

        tracing::info!(transcript = %text, "transcription complete");
        Ok(text)
    }
}

/// Manual transcript entry: ignores the recorded audio and reads a typed
/// line from the user instead. Used for Tamil, where remote recognition is
/// not reliable enough to ship.
pub struct ManualTranscriber<R> {
    input: Mutex<R>,
}

impl ManualTranscriber<std::io::BufReader<std::io::Stdin>> {
    /// Create a manual transcriber reading from stdin
    #[must_use]
    pub fn new() -> Self {
        Self::from_reader(std::io::BufReader::new(std::io::stdin()))
    }
}

impl Default for ManualTranscriber<std::io::BufReader<std::io::Stdin>> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: BufRead + Send> ManualTranscriber<R> {
    /// Create a manual transcriber reading from an arbitrary source
    #[must_use]
    pub const fn from_reader(input: R) -> Self {
        Self {
            input: Mutex::new(input),
        }
    }
}

#[async_trait]
impl<R: BufRead + Send> Transcribe for ManualTranscriber<R> {
    async fn transcribe(&self, _audio: &[u8], _language_code: &str) -> Result<String> {
        println!("Warning: Tamil transcription is limited. Please type your input instead.");
        print!("Type your input in Tamil: ");
        use std::io::Write;
        std::io::stdout().flush()?;

        let mut line = String::new();
        self.input
            .lock()
            .map_err(|_| Error::Stt("manual input source poisoned".to_string()))?
            .read_line(&mut line)?;

        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[tokio::test]
    async fn manual_transcriber_returns_typed_text_unchanged() {
        let transcriber = ManualTranscriber::from_reader(Cursor::new("வணக்கம் நண்பரே\n"));

        let text = transcriber.transcribe(&[1, 2, 3], "ta").await.unwrap();

        assert_eq!(text, "வணக்கம் நண்பரே");
    }

    #[tokio::test]
    async fn manual_transcriber_ignores_audio_content() {
        let transcriber = ManualTranscriber::from_reader(Cursor::new("typed\n"));

        let empty = transcriber.transcribe(&[], "ta").await.unwrap();
        assert_eq!(empty, "typed");
    }
}
