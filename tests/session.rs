//! Session loop tests with scripted service fakes
//!
//! Exercises the orchestration without audio hardware or network access.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use devimitra::voice::{Play, SAMPLE_RATE, write_wav_tempfile};
use devimitra::{
    Error, Generate, Language, ManualTranscriber, Result, Session, Synthesize, Transcribe,
};

/// Remote transcription fake returning a fixed transcript
struct FixedTranscriber(&'static str);

#[async_trait]
impl Transcribe for FixedTranscriber {
    async fn transcribe(&self, _audio: &[u8], _language_code: &str) -> Result<String> {
        Ok(self.0.to_string())
    }
}

/// Transcription fake that always fails
struct FailingTranscriber;

#[async_trait]
impl Transcribe for FailingTranscriber {
    async fn transcribe(&self, _audio: &[u8], _language_code: &str) -> Result<String> {
        Err(Error::Stt("service unavailable".to_string()))
    }
}

/// Generation fake recording every submitted prompt
struct CapturingGenerator {
    prompts: Arc<Mutex<Vec<String>>>,
    reply: &'static str,
}

#[async_trait]
impl Generate for CapturingGenerator {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok(self.reply.to_string())
    }
}

/// Generation fake that always fails
struct FailingGenerator;

#[async_trait]
impl Generate for FailingGenerator {
    async fn generate(&self, _prompt: &str) -> Result<String> {
        Err(Error::Generation("service unavailable".to_string()))
    }
}

/// Synthesis fake returning fixed bytes
struct FixedSynthesizer(Vec<u8>);

#[async_trait]
impl Synthesize for FixedSynthesizer {
    async fn synthesize(&self, _text: &str) -> Result<Vec<u8>> {
        Ok(self.0.clone())
    }
}

/// Synthesis fake that always fails
struct FailingSynthesizer;

#[async_trait]
impl Synthesize for FailingSynthesizer {
    async fn synthesize(&self, _text: &str) -> Result<Vec<u8>> {
        Err(Error::Tts("service unavailable".to_string()))
    }
}

/// Playback fake recording each staged file and whether it existed at play
/// time
#[derive(Clone, Default)]
struct RecordingPlayer {
    played: Arc<Mutex<Vec<(PathBuf, bool)>>>,
}

#[async_trait]
impl Play for RecordingPlayer {
    async fn play_file(&mut self, path: &Path) -> Result<()> {
        self.played
            .lock()
            .unwrap()
            .push((path.to_path_buf(), path.exists()));
        Ok(())
    }
}

fn session_with(
    language: Language,
    transcriber: Box<dyn Transcribe>,
    generator: Box<dyn Generate>,
    synthesizer: Box<dyn Synthesize>,
    playback: Box<dyn Play>,
) -> Session {
    Session::new(
        language,
        transcriber,
        generator,
        synthesizer,
        playback,
        Duration::from_secs(5),
    )
}

#[tokio::test]
async fn generation_prompt_window_holds_only_last_five_entries() {
    let prompts = Arc::new(Mutex::new(Vec::new()));
    let mut session = session_with(
        Language::English,
        Box::new(FixedTranscriber("unused")),
        Box::new(CapturingGenerator {
            prompts: Arc::clone(&prompts),
            reply: "ok",
        }),
        Box::new(FixedSynthesizer(vec![0u8; 4])),
        Box::new(RecordingPlayer::default()),
    );

    // 6 turns = 12 history entries, well past the window
    for i in 0..6 {
        session.respond(&format!("m{i}")).await;
    }
    assert_eq!(session.history().len(), 12);

    let prompts = prompts.lock().unwrap();
    let last = prompts.last().unwrap();

    // Only the 5 most recent entries at submission time appear
    assert!(last.starts_with(
        "Conversation history: User: m3 | AI: ok | User: m4 | AI: ok | User: m5"
    ));
    assert!(!last.contains("m0"));
    assert!(!last.contains("m1"));
    assert!(!last.contains("m2"));
    assert!(last.contains("Latest user input: m5"));
}

#[tokio::test]
async fn generation_failure_returns_localized_error_without_ai_entry() {
    let mut session = session_with(
        Language::Hindi,
        Box::new(FixedTranscriber("unused")),
        Box::new(FailingGenerator),
        Box::new(FixedSynthesizer(vec![0u8; 4])),
        Box::new(RecordingPlayer::default()),
    );

    let reply = session.respond("नमस्ते").await;

    assert_eq!(reply, Language::Hindi.profile().error);
    assert_eq!(session.history().entries(), &["User: नमस्ते"]);
}

#[tokio::test]
async fn full_turn_records_history_and_cleans_up_synthesis_artifact() {
    let player = RecordingPlayer::default();
    let played = Arc::clone(&player.played);
    let prompts = Arc::new(Mutex::new(Vec::new()));

    let mut session = session_with(
        Language::English,
        Box::new(FixedTranscriber("What is the weather")),
        Box::new(CapturingGenerator {
            prompts,
            reply: "I don't have weather data",
        }),
        Box::new(FixedSynthesizer(b"not-really-mp3".to_vec())),
        Box::new(player),
    );

    let samples = vec![0.0f32; SAMPLE_RATE as usize];
    session.turn(&samples).await;

    assert_eq!(
        session.history().entries(),
        &[
            "User: What is the weather",
            "AI: I don't have weather data"
        ]
    );

    let played = played.lock().unwrap();
    assert_eq!(played.len(), 1);
    let (path, existed_during_play) = &played[0];
    assert!(*existed_during_play, "staged audio file missing at play time");
    assert!(
        !path.exists(),
        "synthesis artifact must be deleted once the turn ends"
    );
}

#[tokio::test]
async fn transcription_failure_skips_turn_silently() {
    let player = RecordingPlayer::default();
    let played = Arc::clone(&player.played);

    let mut session = session_with(
        Language::English,
        Box::new(FailingTranscriber),
        Box::new(FailingGenerator),
        Box::new(FailingSynthesizer),
        Box::new(player),
    );

    session.turn(&[0.0f32; 64]).await;

    assert!(session.history().is_empty());
    assert!(played.lock().unwrap().is_empty());
}

#[tokio::test]
async fn empty_transcript_skips_turn() {
    let mut session = session_with(
        Language::English,
        Box::new(FixedTranscriber("   ")),
        Box::new(FailingGenerator),
        Box::new(FailingSynthesizer),
        Box::new(RecordingPlayer::default()),
    );

    session.turn(&[0.0f32; 64]).await;

    assert!(session.history().is_empty());
}

#[tokio::test]
async fn synthesis_failure_keeps_turn_and_history() {
    let prompts = Arc::new(Mutex::new(Vec::new()));
    let mut session = session_with(
        Language::English,
        Box::new(FixedTranscriber("hello")),
        Box::new(CapturingGenerator {
            prompts,
            reply: "hi there",
        }),
        Box::new(FailingSynthesizer),
        Box::new(RecordingPlayer::default()),
    );

    session.turn(&[0.0f32; 64]).await;

    // Reply text survives even though no audio was produced
    assert_eq!(
        session.history().entries(),
        &["User: hello", "AI: hi there"]
    );
}

#[tokio::test]
async fn tamil_turn_uses_typed_text_verbatim() {
    let prompts = Arc::new(Mutex::new(Vec::new()));
    let mut session = session_with(
        Language::Tamil,
        Box::new(ManualTranscriber::from_reader(std::io::Cursor::new(
            "வணக்கம் நண்பரே\n",
        ))),
        Box::new(CapturingGenerator {
            prompts: Arc::clone(&prompts),
            reply: "பதில்",
        }),
        Box::new(FixedSynthesizer(vec![0u8; 4])),
        Box::new(RecordingPlayer::default()),
    );

    // Audio content is irrelevant on the manual route
    session.turn(&[0.5f32; 128]).await;

    assert_eq!(
        session.history().entries(),
        &["User: வணக்கம் நண்பரே", "AI: பதில்"]
    );
    assert!(prompts.lock().unwrap()[0].contains("வணக்கம் நண்பரே"));
}

#[test]
fn recorded_wav_artifact_is_deleted_on_drop() {
    let samples = vec![0.1f32; 1600];
    let file = write_wav_tempfile(&samples, SAMPLE_RATE).unwrap();
    let path = file.path().to_path_buf();

    assert!(path.exists());
    let header = std::fs::read(&path).unwrap();
    assert_eq!(&header[0..4], b"RIFF");
    assert_eq!(&header[8..12], b"WAVE");

    drop(file);
    assert!(!path.exists(), "capture artifact must not outlive its turn");
}
