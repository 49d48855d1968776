//! Conversation session: the listen → transcribe → generate → speak loop
//!
//! Every per-turn failure is absorbed here: a transcription failure skips
//! the turn, a generation failure substitutes the localized fallback, and a
//! synthesis failure continues with text only. Only losing the audio device
//! ends the session.

use std::io::Write;
use std::time::Duration;

use crate::generation::Generate;
use crate::history::{self, ConversationHistory};
use crate::language::Language;
use crate::stt::Transcribe;
use crate::tts::Synthesize;
use crate::voice::{AudioCapture, Play, SAMPLE_RATE, write_wav_tempfile};
use crate::Result;

/// One conversation in a single fixed language
pub struct Session {
    language: Language,
    history: ConversationHistory,
    transcriber: Box<dyn Transcribe>,
    generator: Box<dyn Generate>,
    synthesizer: Box<dyn Synthesize>,
    playback: Box<dyn Play>,
    record_duration: Duration,
}

impl Session {
    /// Create a session with an empty history
    #[must_use]
    pub fn new(
        language: Language,
        transcriber: Box<dyn Transcribe>,
        generator: Box<dyn Generate>,
        synthesizer: Box<dyn Synthesize>,
        playback: Box<dyn Play>,
        record_duration: Duration,
    ) -> Self {
        Self {
            language,
            history: ConversationHistory::new(),
            transcriber,
            generator,
            synthesizer,
            playback,
            record_duration,
        }
    }

    /// The session's fixed language
    #[must_use]
    pub const fn language(&self) -> Language {
        self.language
    }

    /// The conversation so far
    #[must_use]
    pub const fn history(&self) -> &ConversationHistory {
        &self.history
    }

    /// Run the conversation loop until the capture device fails.
    ///
    /// The greeting is spoken first; each iteration then records one
    /// utterance and runs a full turn. Interruption is handled by the
    /// caller racing this future against ctrl-c.
    ///
    /// # Errors
    ///
    /// Returns error if the microphone cannot be recorded from
    pub async fn run(&mut self, capture: &mut AudioCapture) -> Result<()> {
        let greeting = self.language.profile().greeting;
        self.speak(greeting).await;

        loop {
            println!("\n{}", self.language.profile().listening);
            let samples = capture.record(self.record_duration).await?;
            self.turn(&samples).await;
        }
    }

    /// Run one full turn for an already recorded utterance
    pub async fn turn(&mut self, samples: &[f32]) {
        let Some(transcript) = self.transcript_for(samples).await else {
            return;
        };
        if transcript.trim().is_empty() {
            return;
        }

        println!("{}", self.language.you_said(&transcript));

        let reply = self.respond(&transcript).await;
        self.speak(&reply).await;
    }

    /// Obtain a transcript for the recorded samples, or `None` to skip the
    /// turn. The WAV artifact lives only as long as this call.
    async fn transcript_for(&mut self, samples: &[f32]) -> Option<String> {
        let result = async {
            let wav_file = write_wav_tempfile(samples, SAMPLE_RATE)?;
            let audio = std::fs::read(wav_file.path())?;
            let code = self.language.profile().code;
            self.transcriber.transcribe(&audio, code).await
            // wav_file drops here, success or failure
        }
        .await;

        match result {
            Ok(text) => Some(text),
            Err(e) => {
                tracing::error!(error = %e, "transcription failed, skipping turn");
                None
            }
        }
    }

    /// Generate a reply for one transcript.
    ///
    /// The user entry is recorded unconditionally; the AI entry only on
    /// success. A failed call yields the language's fixed error message,
    /// which is then spoken like any other reply.
    pub async fn respond(&mut self, transcript: &str) -> String {
        let profile = self.language.profile();

        self.history.push_user(transcript);
        let prompt = history::build_prompt(&self.history, transcript, profile.prompt);

        match self.generator.generate(&prompt).await {
            Ok(reply) => {
                self.history.push_ai(&reply);
                reply
            }
            Err(e) => {
                tracing::error!(error = %e, "response generation failed");
                profile.error.to_string()
            }
        }
    }

    /// Synthesize and play `text`; the reply text is printed whether or not
    /// audio was produced
    pub async fn speak(&mut self, text: &str) {
        if let Err(e) = self.speak_audio(text).await {
            tracing::warn!(error = %e, "speech synthesis failed, continuing without audio");
        }
        println!("AI: {text}");
    }

    /// Synthesis path: fetch audio bytes, stage them in a uniquely-named
    /// temporary file, and play it back. The file is deleted when the
    /// handle drops, on success and failure alike.
    async fn speak_audio(&mut self, text: &str) -> Result<()> {
        let audio = self.synthesizer.synthesize(text).await?;

        let mut file = tempfile::Builder::new()
            .prefix("devimitra-tts-")
            .suffix(".mp3")
            .tempfile()?;
        file.write_all(&audio)?;
        file.flush()?;

        self.playback.play_file(file.path()).await
    }
}
