//! HTTP handlers for the Slack webhook endpoints.
//!
//! Each handler reads the raw body so signature verification can run over
//! the exact bytes the platform signed, then translates the payload into a
//! `TransportEvent` and forwards it to the single consumer loop. Deliveries
//! the bot cannot act on (noise, unknown teams, foreign callbacks) are
//! acknowledged with 200 so the platform does not retry them.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use secrecy::{ExposeSecret, SecretString};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};
use url::form_urlencoded;

use crate::adapters::chat::PROMPT_CALLBACK_ID;
use crate::adapters::http::signature::{constant_time_compare, SlackRequestVerifier};
use crate::domain::foundation::{ChannelId, Credential, TeamId, UserId};
use crate::domain::messaging::{AddressKind, InboundMessage};
use crate::ports::{InstallationStore, TeamInstallation, TransportEvent};

use super::dto::{
    ChallengeResponse, ErrorResponse, EventEnvelope, HealthResponse, InstallationResponse,
    InteractionPayload, RegisterInstallationRequest,
};

const TIMESTAMP_HEADER: &str = "x-slack-request-timestamp";
const SIGNATURE_HEADER: &str = "x-slack-signature";

/// Shared state for the webhook handlers.
#[derive(Clone)]
pub struct SlackWebhookState {
    events: mpsc::Sender<TransportEvent>,
    store: Arc<dyn InstallationStore>,
    verifier: Option<Arc<SlackRequestVerifier>>,
    install_secret: SecretString,
}

impl SlackWebhookState {
    /// Creates webhook state.
    ///
    /// When `verifier` is `None` requests are accepted unsigned; production
    /// configuration always supplies one. `install_secret` authorizes the
    /// installation provisioning endpoint.
    pub fn new(
        events: mpsc::Sender<TransportEvent>,
        store: Arc<dyn InstallationStore>,
        verifier: Option<Arc<SlackRequestVerifier>>,
        install_secret: SecretString,
    ) -> Self {
        Self {
            events,
            store,
            verifier,
            install_secret,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Event webhook
// ════════════════════════════════════════════════════════════════════════════

/// POST /slack/events
///
/// Receives Events API deliveries: the one-time `url_verification`
/// handshake and `event_callback` envelopes carrying message events.
pub async fn receive_event(
    State(state): State<SlackWebhookState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if let Err(response) = verify_request(&state, &headers, &body) {
        return response;
    }

    let envelope: EventEnvelope = match serde_json::from_slice(&body) {
        Ok(envelope) => envelope,
        Err(err) => {
            debug!(error = %err, "unparseable event envelope");
            return bad_request("malformed event envelope");
        }
    };

    match envelope.kind.as_str() {
        "url_verification" => match envelope.challenge {
            Some(challenge) => {
                (StatusCode::OK, Json(ChallengeResponse { challenge })).into_response()
            }
            None => bad_request("url_verification without challenge"),
        },
        "event_callback" => handle_event_callback(&state, envelope).await,
        other => {
            debug!(kind = other, "ignoring unrecognized envelope");
            StatusCode::OK.into_response()
        }
    }
}

async fn handle_event_callback(state: &SlackWebhookState, envelope: EventEnvelope) -> Response {
    let Some(event) = envelope.event else {
        return StatusCode::OK.into_response();
    };
    if event.kind != "message" {
        // app_mention deliveries duplicate the channel message event
        debug!(kind = %event.kind, "ignoring non-message event");
        return StatusCode::OK.into_response();
    }
    if event.is_noise() {
        return StatusCode::OK.into_response();
    }

    let (Some(channel), Some(user), Some(text)) = (event.channel, event.user, event.text) else {
        return StatusCode::OK.into_response();
    };
    let Some(team_id) = envelope.team_id else {
        return StatusCode::OK.into_response();
    };

    let installation = match lookup_installation(state, &team_id).await {
        Ok(installation) => installation,
        Err(response) => return response,
    };

    let bot_user = envelope
        .authorizations
        .first()
        .map(|auth| auth.user_id.as_str());
    let (address, text) = classify(event.channel_type.as_deref(), &text, bot_user);

    let (Ok(channel), Ok(user)) = (ChannelId::new(channel), UserId::new(user)) else {
        return StatusCode::OK.into_response();
    };

    forward(
        state,
        TransportEvent::Inbound(InboundMessage {
            credential: installation.credential,
            channel,
            user,
            text,
            address,
        }),
    )
    .await
}

// ════════════════════════════════════════════════════════════════════════════
// Interaction webhook
// ════════════════════════════════════════════════════════════════════════════

/// POST /slack/interactions
///
/// Receives button presses. The platform sends these form-encoded with the
/// JSON payload in a `payload` field; the pressed button's value becomes
/// the reply text of an interactive inbound message.
pub async fn receive_interaction(
    State(state): State<SlackWebhookState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if let Err(response) = verify_request(&state, &headers, &body) {
        return response;
    }

    let Some(raw_payload) = form_urlencoded::parse(&body)
        .find(|(key, _)| key == "payload")
        .map(|(_, value)| value.into_owned())
    else {
        return bad_request("missing payload field");
    };

    let payload: InteractionPayload = match serde_json::from_str(&raw_payload) {
        Ok(payload) => payload,
        Err(err) => {
            debug!(error = %err, "unparseable interaction payload");
            return bad_request("malformed interaction payload");
        }
    };
    debug!(kind = %payload.kind, "received interaction");

    if payload.callback_id.as_deref() != Some(PROMPT_CALLBACK_ID) {
        debug!(callback_id = ?payload.callback_id, "ignoring foreign interaction callback");
        return StatusCode::OK.into_response();
    }

    let Some(value) = payload
        .actions
        .into_iter()
        .next()
        .and_then(|action| action.value)
    else {
        return StatusCode::OK.into_response();
    };

    let installation = match lookup_installation(&state, &payload.team.id).await {
        Ok(installation) => installation,
        Err(response) => return response,
    };

    let (Ok(channel), Ok(user)) = (
        ChannelId::new(payload.channel.id),
        UserId::new(payload.user.id),
    ) else {
        return StatusCode::OK.into_response();
    };

    forward(
        &state,
        TransportEvent::Inbound(InboundMessage {
            credential: installation.credential,
            channel,
            user,
            text: value,
            address: AddressKind::Interactive,
        }),
    )
    .await
}

// ════════════════════════════════════════════════════════════════════════════
// Installation endpoint
// ════════════════════════════════════════════════════════════════════════════

/// POST /installations
///
/// Records a completed workspace installation and asks the running service
/// to open a session for it. Authorized by the app's client secret as a
/// bearer token.
pub async fn register_installation(
    State(state): State<SlackWebhookState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let authorized = bearer_token(&headers)
        .map(|token| {
            constant_time_compare(
                token.as_bytes(),
                state.install_secret.expose_secret().as_bytes(),
            )
        })
        .unwrap_or(false);
    if !authorized {
        warn!("rejected installation request with missing or wrong credentials");
        return (
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse {
                error: "invalid credentials".to_string(),
            }),
        )
            .into_response();
    }

    let request: RegisterInstallationRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(err) => {
            debug!(error = %err, "unparseable installation request");
            return bad_request("malformed installation request");
        }
    };

    let team = match TeamId::new(request.team_id) {
        Ok(team) => team,
        Err(err) => return bad_request(&err.to_string()),
    };
    let credential = match Credential::new(request.bot_token) {
        Ok(credential) => credential,
        Err(err) => return bad_request(&err.to_string()),
    };
    let installer = match UserId::new(request.installer_user_id) {
        Ok(installer) => installer,
        Err(err) => return bad_request(&err.to_string()),
    };

    let installation = TeamInstallation {
        team: team.clone(),
        credential: credential.clone(),
        installer: installer.clone(),
        had_active_bot: true,
    };
    if let Err(err) = state.store.record_installation(installation).await {
        error!(error = %err, %team, "failed to persist installation");
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: "failed to persist installation".to_string(),
            }),
        )
            .into_response();
    }
    info!(%team, %installer, "recorded new installation");

    let event = TransportEvent::NewInstallation {
        team: team.clone(),
        credential,
        installer,
    };
    if state.events.send(event).await.is_err() {
        error!("event loop receiver dropped, installation recorded but not activated");
        return StatusCode::SERVICE_UNAVAILABLE.into_response();
    }

    (
        StatusCode::CREATED,
        Json(InstallationResponse {
            team_id: team.to_string(),
            message: "installation recorded".to_string(),
        }),
    )
        .into_response()
}

// ════════════════════════════════════════════════════════════════════════════
// Health check
// ════════════════════════════════════════════════════════════════════════════

/// GET /healthz
pub async fn health() -> Response {
    (StatusCode::OK, Json(HealthResponse { status: "ok" })).into_response()
}

// ════════════════════════════════════════════════════════════════════════════
// Shared helpers
// ════════════════════════════════════════════════════════════════════════════

fn verify_request(
    state: &SlackWebhookState,
    headers: &HeaderMap,
    body: &[u8],
) -> Result<(), Response> {
    let Some(verifier) = &state.verifier else {
        return Ok(());
    };

    let timestamp = header_value(headers, TIMESTAMP_HEADER);
    let signature = header_value(headers, SIGNATURE_HEADER);
    let (Some(timestamp), Some(signature)) = (timestamp, signature) else {
        warn!("webhook request missing signature headers");
        return Err(unauthorized());
    };

    verifier.verify(timestamp, signature, body).map_err(|err| {
        warn!(error = %err, "webhook signature verification failed");
        unauthorized()
    })
}

async fn lookup_installation(
    state: &SlackWebhookState,
    team_id: &str,
) -> Result<TeamInstallation, Response> {
    let team = match TeamId::new(team_id) {
        Ok(team) => team,
        Err(_) => return Err(StatusCode::OK.into_response()),
    };
    match state.store.find_by_team(&team).await {
        Ok(Some(installation)) => Ok(installation),
        Ok(None) => {
            warn!(%team, "delivery for unknown team, dropping");
            Err(StatusCode::OK.into_response())
        }
        Err(err) => {
            error!(error = %err, %team, "installation lookup failed");
            Err(StatusCode::INTERNAL_SERVER_ERROR.into_response())
        }
    }
}

async fn forward(state: &SlackWebhookState, event: TransportEvent) -> Response {
    if state.events.send(event).await.is_err() {
        error!("event loop receiver dropped, cannot accept deliveries");
        return StatusCode::SERVICE_UNAVAILABLE.into_response();
    }
    StatusCode::OK.into_response()
}

/// Classifies a message event into an address kind, stripping bot-mention
/// markup from the text so trigger matching sees plain words.
fn classify(
    channel_type: Option<&str>,
    raw_text: &str,
    bot_user: Option<&str>,
) -> (AddressKind, String) {
    if channel_type == Some("im") {
        return (AddressKind::DirectMessage, raw_text.trim().to_string());
    }
    if let Some(bot_user) = bot_user {
        let token = format!("<@{}>", bot_user);
        if raw_text.trim_start().starts_with(&token) {
            return (
                AddressKind::DirectMention,
                strip_mention_token(raw_text, &token),
            );
        }
        if raw_text.contains(&token) {
            return (AddressKind::Mention, strip_mention_token(raw_text, &token));
        }
    }
    (AddressKind::Ambient, raw_text.trim().to_string())
}

/// Removes every occurrence of the bot's mention token, plus any leading
/// colon left over from `<@bot>: hello` phrasing.
fn strip_mention_token(text: &str, token: &str) -> String {
    let stripped = text.replace(token, "");
    let stripped = stripped.trim_start();
    let stripped = stripped.strip_prefix(':').unwrap_or(stripped);
    stripped.trim().to_string()
}

fn header_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(ErrorResponse {
            error: "invalid signature".to_string(),
        }),
    )
        .into_response()
}

fn bad_request(message: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    const BOT: &str = "U0BOT";

    // ───────────────────────────────────────────────────────────────
    // Address classification
    // ───────────────────────────────────────────────────────────────

    #[test]
    fn im_channel_classifies_as_direct_message() {
        let (address, text) = classify(Some("im"), " hello ", Some(BOT));
        assert_eq!(address, AddressKind::DirectMessage);
        assert_eq!(text, "hello");
    }

    #[test]
    fn leading_mention_classifies_as_direct_mention() {
        let (address, text) = classify(Some("channel"), "<@U0BOT> hi", Some(BOT));
        assert_eq!(address, AddressKind::DirectMention);
        assert_eq!(text, "hi");
    }

    #[test]
    fn leading_mention_with_colon_is_stripped() {
        let (address, text) = classify(Some("channel"), "<@U0BOT>: hello", Some(BOT));
        assert_eq!(address, AddressKind::DirectMention);
        assert_eq!(text, "hello");
    }

    #[test]
    fn embedded_mention_classifies_as_mention() {
        let (address, text) = classify(Some("channel"), "hi <@U0BOT>", Some(BOT));
        assert_eq!(address, AddressKind::Mention);
        assert_eq!(text, "hi");
    }

    #[test]
    fn channel_chatter_without_mention_is_ambient() {
        let (address, text) = classify(Some("channel"), "hello there, how are you", Some(BOT));
        assert_eq!(address, AddressKind::Ambient);
        assert_eq!(text, "hello there, how are you");
    }

    #[test]
    fn unknown_bot_user_falls_back_to_ambient() {
        let (address, _) = classify(Some("channel"), "<@U0BOT> hi", None);
        assert_eq!(address, AddressKind::Ambient);
    }

    #[test]
    fn mention_of_another_user_is_ambient() {
        let (address, text) = classify(Some("channel"), "<@U0OTHER> hi", Some(BOT));
        assert_eq!(address, AddressKind::Ambient);
        assert_eq!(text, "<@U0OTHER> hi");
    }

    // ───────────────────────────────────────────────────────────────
    // Header helpers
    // ───────────────────────────────────────────────────────────────

    #[test]
    fn bearer_token_extracts_value() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer shhh"),
        );
        assert_eq!(bearer_token(&headers), Some("shhh"));
    }

    #[test]
    fn bearer_token_rejects_other_schemes() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Basic dXNlcjpwYXNz"),
        );
        assert_eq!(bearer_token(&headers), None);
    }

    #[test]
    fn bearer_token_missing_header() {
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }
}
