//! Trigger vocabulary for starting conversations.

/// The set of greeting words that start a new conversation.
///
/// Matching is whole-message: the trimmed text must equal one of the
/// words, compared case-insensitively. A greeting buried inside a longer
/// sentence does not trigger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerVocabulary {
    words: Vec<String>,
}

impl TriggerVocabulary {
    pub fn new(words: Vec<String>) -> Self {
        Self { words }
    }

    /// True when the message text is exactly one of the trigger words.
    pub fn matches(&self, text: &str) -> bool {
        let text = text.trim();
        self.words.iter().any(|w| w.eq_ignore_ascii_case(text))
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }
}

impl Default for TriggerVocabulary {
    fn default() -> Self {
        Self::new(vec!["hi".to_string(), "hello".to_string()])
    }
}
