//! HTTP DTOs for the Slack webhook endpoints.
//!
//! These types mirror the platform's wire shapes, keeping the webhook
//! surface decoupled from domain types. Fields the handlers never read are
//! left out; serde ignores unknown fields by default.

use serde::{Deserialize, Serialize};

// ════════════════════════════════════════════════════════════════════════════
// Event API payloads
// ════════════════════════════════════════════════════════════════════════════

/// Outer envelope of every Events API delivery.
#[derive(Debug, Deserialize)]
pub struct EventEnvelope {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub challenge: Option<String>,
    #[serde(default)]
    pub team_id: Option<String>,
    #[serde(default)]
    pub event: Option<MessageEvent>,
    #[serde(default)]
    pub authorizations: Vec<Authorization>,
}

/// Identifies the app installation the event was delivered for. The
/// `user_id` is the bot's own user, used to recognize mentions.
#[derive(Debug, Deserialize)]
pub struct Authorization {
    pub user_id: String,
}

/// Inner message event.
#[derive(Debug, Deserialize)]
pub struct MessageEvent {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub subtype: Option<String>,
    #[serde(default)]
    pub bot_id: Option<String>,
    #[serde(default)]
    pub channel: Option<String>,
    #[serde(default)]
    pub channel_type: Option<String>,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
}

impl MessageEvent {
    /// True for events that are not plain user chatter: the bot's own
    /// echoes and subtyped events such as edits, deletions, and joins.
    pub fn is_noise(&self) -> bool {
        self.bot_id.is_some() || self.subtype.is_some()
    }
}

/// Challenge echo for `url_verification` handshakes.
#[derive(Debug, Serialize, Deserialize)]
pub struct ChallengeResponse {
    pub challenge: String,
}

// ════════════════════════════════════════════════════════════════════════════
// Interaction payloads
// ════════════════════════════════════════════════════════════════════════════

/// Decoded `payload` field of an interaction POST.
#[derive(Debug, Deserialize)]
pub struct InteractionPayload {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub callback_id: Option<String>,
    #[serde(default)]
    pub actions: Vec<InteractionAction>,
    pub team: IdField,
    pub channel: IdField,
    pub user: IdField,
}

/// One pressed button.
#[derive(Debug, Deserialize)]
pub struct InteractionAction {
    #[serde(default)]
    pub value: Option<String>,
}

/// Object carrying only an `id`, as in `"team": {"id": "T123"}`.
#[derive(Debug, Deserialize)]
pub struct IdField {
    pub id: String,
}

// ════════════════════════════════════════════════════════════════════════════
// Installation endpoint
// ════════════════════════════════════════════════════════════════════════════

/// Request to register a completed workspace installation.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterInstallationRequest {
    pub team_id: String,
    pub bot_token: String,
    pub installer_user_id: String,
}

/// Response for a recorded installation.
#[derive(Debug, Clone, Serialize)]
pub struct InstallationResponse {
    pub team_id: String,
    pub message: String,
}

/// Error response body.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Health check response.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_envelope_deserializes_direct_message() {
        let raw = r#"{
            "type": "event_callback",
            "team_id": "T061EG9R6",
            "authorizations": [{"user_id": "U0BOT", "is_bot": true}],
            "event": {
                "type": "message",
                "channel": "D024BE91L",
                "channel_type": "im",
                "user": "U2147483697",
                "text": "hello",
                "ts": "1355517523.000005"
            }
        }"#;

        let envelope: EventEnvelope = serde_json::from_str(raw).unwrap();
        assert_eq!(envelope.kind, "event_callback");
        assert_eq!(envelope.team_id.as_deref(), Some("T061EG9R6"));
        assert_eq!(envelope.authorizations[0].user_id, "U0BOT");

        let event = envelope.event.unwrap();
        assert_eq!(event.kind, "message");
        assert_eq!(event.channel_type.as_deref(), Some("im"));
        assert_eq!(event.text.as_deref(), Some("hello"));
        assert!(!event.is_noise());
    }

    #[test]
    fn event_envelope_tolerates_missing_optional_fields() {
        let raw = r#"{"type": "url_verification", "challenge": "3eZbrw1a"}"#;

        let envelope: EventEnvelope = serde_json::from_str(raw).unwrap();
        assert_eq!(envelope.kind, "url_verification");
        assert_eq!(envelope.challenge.as_deref(), Some("3eZbrw1a"));
        assert!(envelope.event.is_none());
        assert!(envelope.authorizations.is_empty());
    }

    #[test]
    fn bot_echoes_and_subtypes_are_noise() {
        let echo: MessageEvent = serde_json::from_str(
            r#"{"type": "message", "bot_id": "B123", "text": "Hi, let's get started!"}"#,
        )
        .unwrap();
        assert!(echo.is_noise());

        let edit: MessageEvent = serde_json::from_str(
            r#"{"type": "message", "subtype": "message_changed"}"#,
        )
        .unwrap();
        assert!(edit.is_noise());
    }

    #[test]
    fn interaction_payload_deserializes_button_press() {
        let raw = r#"{
            "type": "interactive_message",
            "callback_id": "namesmith_prompt",
            "actions": [{"name": "tmp", "type": "button", "value": "TMP"}],
            "team": {"id": "T47563693", "domain": "example"},
            "channel": {"id": "C065W1189", "name": "forgotten-works"},
            "user": {"id": "U045VRZFT", "name": "brautigan"}
        }"#;

        let payload: InteractionPayload = serde_json::from_str(raw).unwrap();
        assert_eq!(payload.kind, "interactive_message");
        assert_eq!(payload.callback_id.as_deref(), Some("namesmith_prompt"));
        assert_eq!(payload.team.id, "T47563693");
        assert_eq!(payload.channel.id, "C065W1189");
        assert_eq!(payload.user.id, "U045VRZFT");
        assert_eq!(payload.actions[0].value.as_deref(), Some("TMP"));
    }
}
