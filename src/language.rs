//! Supported languages and their fixed text profiles
//!
//! Exactly one language is active for the whole session; every user-facing
//! string and the transcription language hint come from its profile.

use dialoguer::Input;

use crate::Result;

/// A supported conversation language
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Language {
    English,
    Hindi,
    Tamil,
}

/// Fixed per-language bundle: transcription code, generation instruction,
/// and the five user-facing message templates
#[derive(Debug)]
pub struct LanguageProfile {
    /// Transcription-service language tag
    pub code: &'static str,
    /// Instruction appended to every generation request
    pub prompt: &'static str,
    /// Shown before each recording starts
    pub listening: &'static str,
    /// Echo template; `{transcript}` is replaced with the user's words
    pub you_said: &'static str,
    /// Spoken once at session start
    pub greeting: &'static str,
    /// Returned (and spoken) when generation fails
    pub error: &'static str,
    /// Printed when the session is interrupted
    pub farewell: &'static str,
}

/// How transcripts are obtained for a language
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TranscriptRoute {
    /// Submit recorded audio to the remote transcription service
    Remote,
    /// Ask the user to type what they said
    Manual,
}

static ENGLISH: LanguageProfile = LanguageProfile {
    code: "en_us",
    prompt: "Provide a helpful and concise response in English.",
    listening: "Listening... (Speak now)",
    you_said: "You said: {transcript}",
    greeting: "Hello! I am DeviMitra, your AI assistant. How can I help you today?",
    error: "I'm having trouble generating a response right now.",
    farewell: "Conversation ended.",
};

static HINDI: LanguageProfile = LanguageProfile {
    code: "hi",
    prompt: "Provide a helpful and concise response in Hindi.",
    listening: "सुन रही हूँ... (अब बोलें)",
    you_said: "आपने कहा: {transcript}",
    greeting: "नमस्ते! मैं देवीमित्रा हूँ, आपकी AI सहायक। आज मैं आपकी कैसे मदद कर सकती हूँ?",
    error: "मुझे अभी जवाब देने में समस्या हो रही है।",
    farewell: "बातचीत समाप्त हुई।",
};

static TAMIL: LanguageProfile = LanguageProfile {
    code: "ta",
    prompt: "Provide a helpful and concise response in Tamil.",
    listening: "கேட்கிறேன்... (இப்போது பேசுங்கள்)",
    you_said: "நீங்கள் சொன்னீர்கள்: {transcript}",
    greeting: "வணக்கம்! நான் DeviMitra, உங்கள் AI உதவியாளர்। நான் உங்களுக்கு இன்று எப்படி உதவ முடியும்?",
    error: "எனக்கு இப்போது பதில் அளிப்பதில் சிக்கல் உள்ளது।",
    farewell: "உரையாடல் முடிந்தது।",
};

impl Language {
    /// All supported languages, in menu order
    pub const ALL: [Self; 3] = [Self::English, Self::Hindi, Self::Tamil];

    /// The fixed profile for this language
    #[must_use]
    pub const fn profile(self) -> &'static LanguageProfile {
        match self {
            Self::English => &ENGLISH,
            Self::Hindi => &HINDI,
            Self::Tamil => &TAMIL,
        }
    }

    /// Transcript routing policy.
    ///
    /// Tamil bypasses the remote service entirely: recognition quality was
    /// judged too poor to ship, so the user types their input instead. This
    /// is a deliberate per-language policy, not an error fallback.
    #[must_use]
    pub const fn transcript_route(self) -> TranscriptRoute {
        match self {
            Self::English | Self::Hindi => TranscriptRoute::Remote,
            Self::Tamil => TranscriptRoute::Manual,
        }
    }

    /// Render the "you said" echo line for a transcript
    #[must_use]
    pub fn you_said(self, transcript: &str) -> String {
        self.profile().you_said.replace("{transcript}", transcript)
    }
}

/// Outcome of the startup language menu
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuChoice {
    /// A language was selected
    Language(Language),
    /// The user chose to exit
    Exit,
}

/// Parse one menu entry; `None` means re-prompt
#[must_use]
pub fn parse_menu_choice(input: &str) -> Option<MenuChoice> {
    match input.trim() {
        "1" => Some(MenuChoice::Language(Language::English)),
        "2" => Some(MenuChoice::Language(Language::Hindi)),
        "3" => Some(MenuChoice::Language(Language::Tamil)),
        "4" => Some(MenuChoice::Exit),
        _ => None,
    }
}

/// Present the numbered language menu until a valid choice is entered
///
/// # Errors
///
/// Returns an error if reading from the terminal fails
pub fn select_language() -> Result<MenuChoice> {
    loop {
        println!("\n--- DeviMitra Language Selection ---");
        println!("1. English");
        println!("2. हिन्दी (Hindi)");
        println!("3. தமிழ் (Tamil)");
        println!("4. Exit");

        let input: String = Input::new()
            .with_prompt("Enter your choice (1-4)")
            .allow_empty(true)
            .interact_text()?;

        match parse_menu_choice(&input) {
            Some(choice) => return Ok(choice),
            None => println!("Invalid choice. Please enter a number between 1 and 4."),
        }
    }
}
