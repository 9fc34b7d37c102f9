//! Captured answer fields for one conversation.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// The fixed set of fields the intake dialog captures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKey {
    Kind,
    Group,
    Filename,
}

impl FieldKey {
    /// Stable string form used in artifact rendering and error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKey::Kind => "kind",
            FieldKey::Group => "group",
            FieldKey::Filename => "filename",
        }
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Per-conversation cache of captured field values.
///
/// Each conversation engine owns exactly one store; nothing outside the
/// engine can read or write it, so concurrent conversations can never see
/// each other's answers. The store lives only as long as its conversation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerStore {
    values: HashMap<FieldKey, String>,
}

impl AnswerStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a captured value, replacing any previous value for the key.
    pub fn insert(&mut self, key: FieldKey, value: impl Into<String>) {
        self.values.insert(key, value.into());
    }

    /// Returns the captured value for a key, if any.
    pub fn get(&self, key: FieldKey) -> Option<&str> {
        self.values.get(&key).map(String::as_str)
    }

    /// Number of captured fields.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True if nothing has been captured yet.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
