//! Rolling conversation history
//!
//! Append-only within a session; only the last [`HISTORY_WINDOW`] entries
//! feed each generation request. Nothing is persisted.

/// Number of history entries included in a generation prompt
pub const HISTORY_WINDOW: usize = 5;

/// Tagged turn records ("User: …" / "AI: …"), oldest first
#[derive(Clone, Debug, Default)]
pub struct ConversationHistory {
    entries: Vec<String>,
}

impl ConversationHistory {
    /// Create an empty history
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Record what the user said
    pub fn push_user(&mut self, text: &str) {
        self.entries.push(format!("User: {text}"));
    }

    /// Record what the assistant replied
    pub fn push_ai(&mut self, text: &str) {
        self.entries.push(format!("AI: {text}"));
    }

    /// All entries, oldest first
    #[must_use]
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// The most recent entries that feed a generation prompt, oldest first
    #[must_use]
    pub fn window(&self) -> &[String] {
        let start = self.entries.len().saturating_sub(HISTORY_WINDOW);
        &self.entries[start..]
    }

    /// Total number of recorded entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no turns have been recorded yet
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Assemble the generation prompt: windowed history joined by ` | `, the
/// latest input, and the language's instruction suffix
#[must_use]
pub fn build_prompt(history: &ConversationHistory, user_input: &str, instruction: &str) -> String {
    format!(
        "Conversation history: {}\n\nLatest user input: {user_input}\n{instruction}",
        history.window().join(" | ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_caps_at_five_entries() {
        let mut history = ConversationHistory::new();
        for i in 0..8 {
            history.push_user(&format!("message {i}"));
        }

        assert_eq!(history.len(), 8);
        assert_eq!(history.window().len(), HISTORY_WINDOW);
        assert_eq!(history.window()[0], "User: message 3");
        assert_eq!(history.window()[4], "User: message 7");
    }

    #[test]
    fn window_returns_everything_when_short() {
        let mut history = ConversationHistory::new();
        history.push_user("hi");
        history.push_ai("hello");

        assert_eq!(history.window(), &["User: hi", "AI: hello"]);
    }

    #[test]
    fn prompt_contains_window_input_and_instruction() {
        let mut history = ConversationHistory::new();
        history.push_user("hi");
        history.push_ai("hello");

        let prompt = build_prompt(&history, "how are you", "Respond in English.");

        assert!(prompt.starts_with("Conversation history: User: hi | AI: hello"));
        assert!(prompt.contains("Latest user input: how are you"));
        assert!(prompt.ends_with("Respond in English."));
    }
}
