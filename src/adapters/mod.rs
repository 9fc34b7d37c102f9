//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `chat` - Slack Web API transport, plus an in-memory test transport
//! - `http` - Webhook endpoints the platform delivers into
//! - `storage` - Installation persistence (JSON file, in-memory)

pub mod chat;
pub mod http;
pub mod storage;

pub use chat::{InMemoryChatTransport, SlackChatTransport, SlackTransportConfig};
pub use http::{slack_webhook_router, SlackRequestVerifier, SlackWebhookState};
pub use storage::{InMemoryInstallationStore, JsonFileInstallationStore};
