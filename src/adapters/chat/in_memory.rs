//! In-Memory Chat Transport Adapter
//!
//! Records every outbound message and serves scripted connection
//! outcomes. Useful for testing and development.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::domain::dialog::PromptSpec;
use crate::domain::foundation::{ChannelId, Credential, TeamId, UserId};
use crate::ports::{ChatTransport, ConnectionHandle, TransportError};

/// Scripted outcome for an `open_connection` call.
#[derive(Debug, Clone)]
pub enum ConnectScript {
    /// Connection succeeds with this identity.
    Accept { team: TeamId, bot_user: UserId },
    /// Connection fails with this reason.
    Reject(String),
    /// Connection never resolves. Exercises caller-side timeouts.
    Hang,
}

/// One message captured by the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub credential: Credential,
    pub channel: ChannelId,
    pub body: SentBody,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SentBody {
    Text(String),
    Prompt(PromptSpec),
}

impl SentMessage {
    /// The visible message text, for plain messages and prompts alike.
    pub fn text(&self) -> &str {
        match &self.body {
            SentBody::Text(text) => text,
            SentBody::Prompt(prompt) => &prompt.text,
        }
    }

    /// True for prompts carrying at least one button.
    pub fn has_choices(&self) -> bool {
        matches!(&self.body, SentBody::Prompt(prompt) if prompt.has_choices())
    }
}

/// In-memory transport double.
///
/// Connections must be scripted ahead of time with [`script_connect`];
/// an unscripted credential fails to connect. Direct channels open
/// deterministically as `D<user>`.
///
/// [`script_connect`]: InMemoryChatTransport::script_connect
#[derive(Debug, Clone, Default)]
pub struct InMemoryChatTransport {
    connects: Arc<RwLock<HashMap<Credential, ConnectScript>>>,
    connect_attempts: Arc<RwLock<Vec<Credential>>>,
    sent: Arc<RwLock<Vec<SentMessage>>>,
}

impl InMemoryChatTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scripts the outcome of connecting with a credential.
    pub async fn script_connect(&self, credential: Credential, script: ConnectScript) {
        self.connects.write().await.insert(credential, script);
    }

    /// Everything sent so far, in send order.
    pub async fn sent(&self) -> Vec<SentMessage> {
        self.sent.read().await.clone()
    }

    /// Messages sent to one channel, in send order.
    pub async fn sent_to(&self, channel: &ChannelId) -> Vec<SentMessage> {
        self.sent
            .read()
            .await
            .iter()
            .filter(|m| m.channel == *channel)
            .cloned()
            .collect()
    }

    /// Number of messages whose visible text contains `needle`.
    pub async fn count_containing(&self, needle: &str) -> usize {
        self.sent
            .read()
            .await
            .iter()
            .filter(|m| m.text().contains(needle))
            .count()
    }

    /// Total `open_connection` calls observed.
    pub async fn connect_attempts(&self) -> usize {
        self.connect_attempts.read().await.len()
    }

    /// `open_connection` calls observed for one credential.
    pub async fn connect_attempts_for(&self, credential: &Credential) -> usize {
        self.connect_attempts
            .read()
            .await
            .iter()
            .filter(|c| *c == credential)
            .count()
    }

    /// Clear all captured data (useful for tests).
    pub async fn clear(&self) {
        self.connect_attempts.write().await.clear();
        self.sent.write().await.clear();
    }
}

#[async_trait]
impl ChatTransport for InMemoryChatTransport {
    async fn open_connection(
        &self,
        credential: &Credential,
    ) -> Result<ConnectionHandle, TransportError> {
        self.connect_attempts.write().await.push(credential.clone());
        let script = self.connects.read().await.get(credential).cloned();
        match script {
            Some(ConnectScript::Accept { team, bot_user }) => Ok(ConnectionHandle {
                credential: credential.clone(),
                team,
                bot_user,
                opened_at: Utc::now(),
            }),
            Some(ConnectScript::Reject(reason)) => Err(TransportError::ConnectionFailed(reason)),
            Some(ConnectScript::Hang) => std::future::pending().await,
            None => Err(TransportError::ConnectionFailed(format!(
                "no scripted connection for {}",
                credential
            ))),
        }
    }

    async fn send_text(
        &self,
        credential: &Credential,
        channel: &ChannelId,
        text: &str,
    ) -> Result<(), TransportError> {
        self.sent.write().await.push(SentMessage {
            credential: credential.clone(),
            channel: channel.clone(),
            body: SentBody::Text(text.to_string()),
        });
        Ok(())
    }

    async fn send_prompt(
        &self,
        credential: &Credential,
        channel: &ChannelId,
        prompt: &PromptSpec,
    ) -> Result<(), TransportError> {
        self.sent.write().await.push(SentMessage {
            credential: credential.clone(),
            channel: channel.clone(),
            body: SentBody::Prompt(prompt.clone()),
        });
        Ok(())
    }

    async fn open_direct_channel(
        &self,
        _credential: &Credential,
        user: &UserId,
    ) -> Result<ChannelId, TransportError> {
        ChannelId::new(format!("D{}", user.as_str())).map_err(|e| TransportError::RequestFailed {
            method: "conversations.open".to_string(),
            reason: e.to_string(),
        })
    }
}
