//! HTTP adapter for the Slack webhook surface.

mod dto;
mod handlers;
mod routes;

pub use dto::{
    ChallengeResponse, ErrorResponse, EventEnvelope, HealthResponse, InstallationResponse,
    InteractionPayload, MessageEvent, RegisterInstallationRequest,
};
pub use handlers::SlackWebhookState;
pub use routes::slack_webhook_router;
