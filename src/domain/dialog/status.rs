//! Conversation lifecycle status.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::StateMachine;

/// Status of one conversation engine instance.
///
/// A conversation starts `Running` and ends in exactly one of the two
/// terminal states: `Completed` when the user confirms the proposed name,
/// `Cancelled` when the user starts over or the conversation is cut short
/// externally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversationStatus {
    Running,
    Completed,
    Cancelled,
}

impl ConversationStatus {
    /// True while the dialog still expects replies.
    pub fn is_running(&self) -> bool {
        matches!(self, ConversationStatus::Running)
    }
}

impl StateMachine for ConversationStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use ConversationStatus::*;
        matches!((self, target), (Running, Completed) | (Running, Cancelled))
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use ConversationStatus::*;
        match self {
            Running => vec![Completed, Cancelled],
            Completed | Cancelled => vec![],
        }
    }
}

impl fmt::Display for ConversationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ConversationStatus::Running => "running",
            ConversationStatus::Completed => "completed",
            ConversationStatus::Cancelled => "cancelled",
        };
        write!(f, "{}", s)
    }
}
