//! Foundation module - Shared domain primitives.
//!
//! Contains the identifiers, error types, and state machine trait that
//! form the vocabulary of the Namesmith domain.

mod errors;
mod ids;
mod state_machine;

pub use errors::ValidationError;
pub use ids::{ChannelId, ConversationId, Credential, TeamId, UserId};
pub use state_machine::StateMachine;
