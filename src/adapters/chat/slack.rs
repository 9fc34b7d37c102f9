//! Slack Web API implementation of the chat transport port.
//!
//! Every operation maps onto one Web API method: `auth.test` to open a
//! session, `chat.postMessage` to deliver text and prompts, and
//! `conversations.open` to resolve a direct-message channel. Prompts with
//! choices are rendered as legacy attachment buttons so replies come back
//! through the interaction webhook with the chosen value.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::dialog::PromptSpec;
use crate::domain::foundation::{ChannelId, Credential, TeamId, UserId};
use crate::ports::{ChatTransport, ConnectionHandle, TransportError};

/// Callback id stamped on every button prompt so the interaction webhook
/// can recognize replies that belong to this bot.
pub const PROMPT_CALLBACK_ID: &str = "namesmith_prompt";

const DEFAULT_API_BASE_URL: &str = "https://slack.com/api";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for the Slack Web API transport.
#[derive(Debug, Clone)]
pub struct SlackTransportConfig {
    /// Base URL for Web API calls. Overridable for tests and proxies.
    pub api_base_url: String,
    /// Timeout applied to every request.
    pub timeout: Duration,
}

impl SlackTransportConfig {
    /// Creates a config pointing at the public Slack API.
    pub fn new() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Overrides the API base URL.
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    /// Overrides the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for SlackTransportConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Chat transport backed by the Slack Web API over HTTPS.
#[derive(Debug, Clone)]
pub struct SlackChatTransport {
    config: SlackTransportConfig,
    client: Client,
}

impl SlackChatTransport {
    /// Creates a new transport with the given configuration.
    pub fn new(config: SlackTransportConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("Failed to create HTTP client");
        Self { config, client }
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/{}", self.config.api_base_url.trim_end_matches('/'), method)
    }

    /// Calls one Web API method and decodes its envelope.
    ///
    /// Slack wraps every response in `{"ok": bool, ...}` and reports
    /// failures as `{"ok": false, "error": "..."}` with HTTP 200, so both
    /// the status line and the envelope flag are checked.
    async fn call<T: DeserializeOwned>(
        &self,
        credential: &Credential,
        method: &str,
        body: &impl Serialize,
    ) -> Result<T, TransportError> {
        let response = self
            .client
            .post(self.method_url(method))
            .bearer_auth(credential.as_str())
            .json(body)
            .send()
            .await
            .map_err(|err| TransportError::Network(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(TransportError::RequestFailed {
                method: method.to_string(),
                reason: format!("HTTP {}: {}", status, error_body),
            });
        }

        let envelope: serde_json::Value = response
            .json()
            .await
            .map_err(|err| TransportError::Network(err.to_string()))?;

        if !envelope["ok"].as_bool().unwrap_or(false) {
            let reason = envelope["error"]
                .as_str()
                .unwrap_or("unknown_error")
                .to_string();
            return Err(TransportError::RequestFailed {
                method: method.to_string(),
                reason,
            });
        }

        serde_json::from_value(envelope).map_err(|err| TransportError::RequestFailed {
            method: method.to_string(),
            reason: format!("unexpected response shape: {}", err),
        })
    }

    async fn post_message(
        &self,
        credential: &Credential,
        request: &PostMessageRequest,
    ) -> Result<(), TransportError> {
        let response: PostMessageResponse =
            self.call(credential, "chat.postMessage", request).await?;
        debug!(
            channel = %request.channel,
            ts = response.ts.as_deref().unwrap_or("-"),
            "posted message"
        );
        Ok(())
    }
}

#[async_trait]
impl ChatTransport for SlackChatTransport {
    async fn open_connection(
        &self,
        credential: &Credential,
    ) -> Result<ConnectionHandle, TransportError> {
        let identity: AuthTestResponse = self
            .call(credential, "auth.test", &serde_json::json!({}))
            .await
            .map_err(|err| match err {
                TransportError::RequestFailed { reason, .. } => {
                    TransportError::ConnectionFailed(reason)
                }
                other => other,
            })?;

        let team = TeamId::new(identity.team_id)
            .map_err(|err| TransportError::ConnectionFailed(err.to_string()))?;
        let bot_user = UserId::new(identity.user_id)
            .map_err(|err| TransportError::ConnectionFailed(err.to_string()))?;

        debug!(%team, %bot_user, "authenticated session credential");
        Ok(ConnectionHandle {
            credential: credential.clone(),
            team,
            bot_user,
            opened_at: Utc::now(),
        })
    }

    async fn send_text(
        &self,
        credential: &Credential,
        channel: &ChannelId,
        text: &str,
    ) -> Result<(), TransportError> {
        let request = PostMessageRequest {
            channel: channel.as_str().to_string(),
            text: text.to_string(),
            attachments: Vec::new(),
        };
        self.post_message(credential, &request).await
    }

    async fn send_prompt(
        &self,
        credential: &Credential,
        channel: &ChannelId,
        prompt: &PromptSpec,
    ) -> Result<(), TransportError> {
        let request = prompt_to_request(channel, prompt);
        self.post_message(credential, &request).await
    }

    async fn open_direct_channel(
        &self,
        credential: &Credential,
        user: &UserId,
    ) -> Result<ChannelId, TransportError> {
        let request = OpenChannelRequest {
            users: user.as_str().to_string(),
        };
        let response: OpenChannelResponse =
            self.call(credential, "conversations.open", &request).await?;
        ChannelId::new(response.channel.id).map_err(|err| TransportError::RequestFailed {
            method: "conversations.open".to_string(),
            reason: err.to_string(),
        })
    }
}

/// Maps a prompt onto a `chat.postMessage` body.
///
/// Choices become one attachment of buttons; a hint rides along as a
/// second, plain attachment under the question.
fn prompt_to_request(channel: &ChannelId, prompt: &PromptSpec) -> PostMessageRequest {
    let mut attachments = Vec::new();

    if prompt.has_choices() {
        let actions = prompt
            .choices
            .iter()
            .map(|choice| AttachmentAction {
                name: choice.value.to_ascii_lowercase(),
                text: choice.label.clone(),
                action_type: "button".to_string(),
                value: choice.value.clone(),
            })
            .collect();
        attachments.push(Attachment {
            fallback: prompt.text.clone(),
            text: None,
            callback_id: Some(PROMPT_CALLBACK_ID.to_string()),
            attachment_type: Some("default".to_string()),
            actions,
        });
    }

    if let Some(hint) = &prompt.hint {
        attachments.push(Attachment {
            fallback: hint.clone(),
            text: Some(hint.clone()),
            callback_id: None,
            attachment_type: None,
            actions: Vec::new(),
        });
    }

    PostMessageRequest {
        channel: channel.as_str().to_string(),
        text: prompt.text.clone(),
        attachments,
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Wire types
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Serialize)]
struct PostMessageRequest {
    channel: String,
    text: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    attachments: Vec<Attachment>,
}

#[derive(Debug, Serialize)]
struct Attachment {
    fallback: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    callback_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    attachment_type: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    actions: Vec<AttachmentAction>,
}

#[derive(Debug, Serialize)]
struct AttachmentAction {
    name: String,
    text: String,
    #[serde(rename = "type")]
    action_type: String,
    value: String,
}

#[derive(Debug, Deserialize)]
struct PostMessageResponse {
    #[serde(default)]
    ts: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AuthTestResponse {
    team_id: String,
    user_id: String,
}

#[derive(Debug, Serialize)]
struct OpenChannelRequest {
    users: String,
}

#[derive(Debug, Deserialize)]
struct OpenChannelResponse {
    channel: OpenedChannel,
}

#[derive(Debug, Deserialize)]
struct OpenedChannel {
    id: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::dialog::Choice;

    fn transport() -> SlackChatTransport {
        SlackChatTransport::new(SlackTransportConfig::new())
    }

    #[test]
    fn method_url_joins_base_and_method() {
        let transport = transport();
        assert_eq!(
            transport.method_url("auth.test"),
            "https://slack.com/api/auth.test"
        );
    }

    #[test]
    fn method_url_tolerates_trailing_slash() {
        let config = SlackTransportConfig::new().with_api_base_url("http://localhost:9999/");
        let transport = SlackChatTransport::new(config);
        assert_eq!(
            transport.method_url("chat.postMessage"),
            "http://localhost:9999/chat.postMessage"
        );
    }

    #[test]
    fn config_builder_overrides_timeout() {
        let config = SlackTransportConfig::new().with_timeout(Duration::from_secs(5));
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn choice_prompt_serializes_as_button_attachment() {
        let channel = ChannelId::new("C123").unwrap();
        let prompt = PromptSpec {
            text: "What kind of file is it?".to_string(),
            hint: None,
            choices: vec![
                Choice::new("Template", "TMP"),
                Choice::new("Record", "RCD"),
            ],
        };

        let body = serde_json::to_value(prompt_to_request(&channel, &prompt)).unwrap();

        assert_eq!(body["channel"], "C123");
        assert_eq!(body["text"], "What kind of file is it?");
        let attachments = body["attachments"].as_array().unwrap();
        assert_eq!(attachments.len(), 1);
        assert_eq!(attachments[0]["callback_id"], PROMPT_CALLBACK_ID);
        assert_eq!(attachments[0]["attachment_type"], "default");
        let actions = attachments[0]["actions"].as_array().unwrap();
        assert_eq!(actions.len(), 2);
        assert_eq!(
            actions[0],
            serde_json::json!({
                "name": "tmp",
                "text": "Template",
                "type": "button",
                "value": "TMP"
            })
        );
    }

    #[test]
    fn hint_rides_as_second_attachment() {
        let channel = ChannelId::new("C123").unwrap();
        let prompt = PromptSpec {
            text: "What kind of file is it?".to_string(),
            hint: Some("Here is a brief overview of the two.".to_string()),
            choices: vec![Choice::new("Template", "TMP")],
        };

        let body = serde_json::to_value(prompt_to_request(&channel, &prompt)).unwrap();

        let attachments = body["attachments"].as_array().unwrap();
        assert_eq!(attachments.len(), 2);
        assert_eq!(attachments[1]["text"], "Here is a brief overview of the two.");
        assert!(attachments[1].get("callback_id").is_none());
        assert!(attachments[1].get("actions").is_none());
    }

    #[test]
    fn free_text_prompt_omits_attachments() {
        let channel = ChannelId::new("D42").unwrap();
        let prompt = PromptSpec {
            text: "Enter a descriptive file name".to_string(),
            hint: None,
            choices: Vec::new(),
        };

        let body = serde_json::to_value(prompt_to_request(&channel, &prompt)).unwrap();

        assert!(body.get("attachments").is_none());
    }
}
