use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use devimitra::voice::{AudioCapture, AudioPlayback};
use devimitra::{
    AssemblyAiTranscriber, Config, ElevenLabsSynthesizer, Error, GeminiGenerator, Language,
    ManualTranscriber, MenuChoice, Session, Transcribe, TranscriptRoute,
};

/// DeviMitra - voice assistant for English, Hindi, and Tamil
#[derive(Parser)]
#[command(name = "devimitra", version, about)]
struct Cli {
    /// Maximum utterance length in seconds
    #[arg(long, env = "DEVIMITRA_RECORD_SECS", default_value = "5")]
    duration: u64,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Test microphone input
    TestMic {
        /// Duration in seconds
        #[arg(short, long, default_value = "5")]
        duration: u64,
    },
    /// Test speaker output
    TestSpeaker,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 => "warn,devimitra=warn",
        1 => "info,devimitra=info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("fatal: {e}");
            ExitCode::FAILURE
        }
    }
}

#[allow(clippy::future_not_send)]
async fn run(cli: Cli) -> anyhow::Result<()> {
    // Handle subcommands
    if let Some(cmd) = cli.command {
        return match cmd {
            Command::TestMic { duration } => test_mic(duration).await,
            Command::TestSpeaker => test_speaker().await,
        };
    }

    // Credentials are checked before any interaction; a missing key is
    // reported by name and the process exits normally
    let config = match Config::from_env(cli.duration) {
        Ok(config) => config,
        Err(e) => {
            println!("Configuration error: {e}");
            println!(
                "Set {}, {}, and {} in your environment or .env file.",
                devimitra::config::ASSEMBLYAI_API_KEY,
                devimitra::config::GEMINI_API_KEY,
                devimitra::config::ELEVENLABS_API_KEY,
            );
            return Ok(());
        }
    };
    tracing::debug!(?config, "loaded configuration");

    let language = match devimitra::language::select_language()? {
        MenuChoice::Language(language) => language,
        MenuChoice::Exit => {
            println!("Exiting the application.");
            return Ok(());
        }
    };

    let transcriber = transcriber_for(language, &config)?;
    let generator = GeminiGenerator::new(
        config.gemini_api_key.clone(),
        config.generation_model.clone(),
    )?;
    let synthesizer = ElevenLabsSynthesizer::new(
        config.elevenlabs_api_key.clone(),
        config.tts_voice.clone(),
        config.tts_model.clone(),
    )?;

    let mut capture = AudioCapture::new()?;
    let playback = AudioPlayback::new()?;

    let mut session = Session::new(
        language,
        transcriber,
        Box::new(generator),
        Box::new(synthesizer),
        Box::new(playback),
        config.record_duration,
    );

    tracing::info!(language = ?language, "starting conversation loop");

    // Ctrl-c is the only way out of the loop; it ends the session with the
    // localized farewell
    tokio::select! {
        result = session.run(&mut capture) => result?,
        _ = tokio::signal::ctrl_c() => {
            println!("\n{}", language.profile().farewell);
        }
    }

    Ok(())
}

/// Pick the transcript source for the selected language
fn transcriber_for(language: Language, config: &Config) -> Result<Box<dyn Transcribe>, Error> {
    match language.transcript_route() {
        TranscriptRoute::Remote => Ok(Box::new(AssemblyAiTranscriber::new(
            config.assemblyai_api_key.clone(),
        )?)),
        TranscriptRoute::Manual => Ok(Box::new(ManualTranscriber::new())),
    }
}

/// Test microphone input
#[allow(clippy::future_not_send)]
async fn test_mic(duration: u64) -> anyhow::Result<()> {
    println!("Testing microphone for {duration} seconds...");
    println!("Speak into your microphone!\n");

    let mut capture = AudioCapture::new()?;
    let sample_rate = capture.sample_rate();
    println!("Sample rate: {sample_rate} Hz");

    let samples = capture.record(Duration::from_secs(duration)).await?;
    let energy = calculate_rms(&samples);
    let peak = samples.iter().map(|s| s.abs()).fold(0.0f32, f32::max);

    println!("Captured {} samples", samples.len());
    println!("RMS: {energy:.4} | Peak: {peak:.4}");

    println!("\n---");
    println!("If RMS is above 0, your mic is working!");
    println!("If RMS stayed near 0, check:");
    println!("  1. Is your mic plugged in?");
    println!("  2. Run: pactl info | grep 'Default Source'");
    println!("  3. Run: arecord -l (to list devices)");

    Ok(())
}

/// Calculate RMS energy
#[allow(clippy::cast_precision_loss)]
fn calculate_rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum_squares: f32 = samples.iter().map(|s| s * s).sum();
    (sum_squares / samples.len() as f32).sqrt()
}

/// Test speaker output with a sine wave
async fn test_speaker() -> anyhow::Result<()> {
    const TONE_SAMPLE_RATE: u32 = 24000;

    println!("Testing speaker output...");
    println!("You should hear a 440Hz tone for 2 seconds\n");

    let mut playback = AudioPlayback::new()?;

    // Generate 2 seconds of 440Hz sine wave
    let frequency = 440.0_f32;
    let duration_secs = 2.0_f32;

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    let num_samples = (TONE_SAMPLE_RATE as f32 * duration_secs) as usize;

    #[allow(clippy::cast_precision_loss)]
    let samples: Vec<f32> = (0..num_samples)
        .map(|i| {
            let t = i as f32 / TONE_SAMPLE_RATE as f32;
            (2.0 * std::f32::consts::PI * frequency * t).sin() * 0.3 // 30% volume
        })
        .collect();

    playback.play(samples, TONE_SAMPLE_RATE).await?;

    println!("\n---");
    println!("If you heard the tone, your speakers are working!");
    println!("If you didn't hear anything, check:");
    println!("  1. Run: pactl info | grep 'Default Sink'");
    println!("  2. Try: pavucontrol (to check output levels)");

    Ok(())
}
