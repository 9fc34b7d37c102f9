//! Messaging domain module.
//!
//! Normalized inbound messages, the addressing taxonomy, and the trigger
//! vocabulary that decides which messages start a conversation.

mod message;
mod trigger;

pub use message::{AddressKind, InboundMessage};
pub use trigger::TriggerVocabulary;
