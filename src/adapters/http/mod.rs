//! HTTP adapters - the webhook surface the messaging platform calls.

mod signature;
pub mod slack;

// Re-export key types for convenience
pub use signature::{SignatureError, SlackRequestVerifier};
pub use slack::slack_webhook_router;
pub use slack::SlackWebhookState;
