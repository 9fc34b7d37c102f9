//! Chat transport adapters.
//!
//! `SlackChatTransport` talks to the Slack Web API; `InMemoryChatTransport`
//! records traffic for tests.

mod in_memory;
mod slack;

pub use in_memory::{ConnectScript, InMemoryChatTransport, SentBody, SentMessage};
pub use slack::{SlackChatTransport, SlackTransportConfig, PROMPT_CALLBACK_ID};
