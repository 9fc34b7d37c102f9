//! Route configuration for the Slack webhook endpoints.

use axum::routing::{get, post};
use axum::Router;

use super::handlers::{
    health, receive_event, receive_interaction, register_installation, SlackWebhookState,
};

/// Creates the webhook router.
///
/// Routes:
/// - `POST /slack/events` - Events API deliveries
/// - `POST /slack/interactions` - Button press payloads
/// - `POST /installations` - Installation provisioning
/// - `GET /healthz` - Liveness check
pub fn slack_webhook_router() -> Router<SlackWebhookState> {
    Router::new()
        .route("/slack/events", post(receive_event))
        .route("/slack/interactions", post(receive_interaction))
        .route("/installations", post(register_installation))
        .route("/healthz", get(health))
}
