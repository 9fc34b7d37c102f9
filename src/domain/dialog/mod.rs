//! Dialog domain module.
//!
//! Models the scripted intake conversation: the fixed step sequence,
//! per-conversation answer capture, the rendered name proposal, and the
//! engine that turns inbound replies into outbound messages. Everything
//! here is I/O-free; delivery lives in the application layer.

mod answers;
mod artifact;
mod engine;
mod script;
mod status;

pub use answers::{AnswerStore, FieldKey};
pub use artifact::{render, Artifact};
pub use engine::{ConversationEngine, EngineError, Outbound, Turn};
pub use script::{
    confirm_prompt, intake_script, proposal_prompt, sanitize_identifier, Choice, DialogPolicy,
    DialogStep, PromptSpec, CANCELLED_NOTICE, CHOICE_REJECTION_NOTICE, COMPLETED_ACK,
    CONFIRM_QUESTION, CONFIRM_VALUE, OPENING_LINE, PROPOSAL_LEAD_IN, RETRY_VALUE,
};
pub use status::ConversationStatus;
