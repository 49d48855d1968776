//! Language table and menu tests

use devimitra::language::parse_menu_choice;
use devimitra::{Language, MenuChoice, TranscriptRoute};

#[test]
fn all_profiles_have_nonempty_messages() {
    for language in Language::ALL {
        let profile = language.profile();

        assert!(!profile.listening.is_empty(), "{language:?} listening");
        assert!(!profile.you_said.is_empty(), "{language:?} you_said");
        assert!(!profile.greeting.is_empty(), "{language:?} greeting");
        assert!(!profile.error.is_empty(), "{language:?} error");
        assert!(!profile.farewell.is_empty(), "{language:?} farewell");
        assert!(!profile.prompt.is_empty(), "{language:?} prompt");
    }
}

#[test]
fn transcription_codes_match_documented_values() {
    assert_eq!(Language::English.profile().code, "en_us");
    assert_eq!(Language::Hindi.profile().code, "hi");
    assert_eq!(Language::Tamil.profile().code, "ta");
}

#[test]
fn tamil_routes_to_manual_entry() {
    // Deliberate policy branch, keyed on the language and nothing else
    assert_eq!(Language::Tamil.transcript_route(), TranscriptRoute::Manual);
    assert_eq!(Language::English.transcript_route(), TranscriptRoute::Remote);
    assert_eq!(Language::Hindi.transcript_route(), TranscriptRoute::Remote);
}

#[test]
fn you_said_substitutes_transcript() {
    let line = Language::English.you_said("hello there");
    assert_eq!(line, "You said: hello there");

    let hindi = Language::Hindi.you_said("नमस्ते");
    assert!(hindi.contains("नमस्ते"));
    assert!(!hindi.contains("{transcript}"));
}

#[test]
fn menu_accepts_valid_choices() {
    assert_eq!(
        parse_menu_choice("1"),
        Some(MenuChoice::Language(Language::English))
    );
    assert_eq!(
        parse_menu_choice("2"),
        Some(MenuChoice::Language(Language::Hindi))
    );
    assert_eq!(
        parse_menu_choice("3"),
        Some(MenuChoice::Language(Language::Tamil))
    );
    assert_eq!(parse_menu_choice("4"), Some(MenuChoice::Exit));
}

#[test]
fn menu_rejects_invalid_input() {
    assert_eq!(parse_menu_choice(""), None);
    assert_eq!(parse_menu_choice("0"), None);
    assert_eq!(parse_menu_choice("5"), None);
    assert_eq!(parse_menu_choice("english"), None);
    assert_eq!(parse_menu_choice("1 2"), None);
}

#[test]
fn menu_trims_whitespace() {
    assert_eq!(
        parse_menu_choice("  1  "),
        Some(MenuChoice::Language(Language::English))
    );
    assert_eq!(parse_menu_choice("4\n"), Some(MenuChoice::Exit));
}
