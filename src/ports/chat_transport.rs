//! ChatTransport port - Interface to the messaging platform.
//!
//! The transport owns everything platform-specific: authenticating a
//! credential into a live session, delivering text and prompts, and
//! opening direct channels. The application layer consumes it through
//! this trait, so conversations run identically against the real
//! platform and the in-memory test transport.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::domain::foundation::{ChannelId, Credential, TeamId, UserId};
use crate::domain::dialog::PromptSpec;
use crate::domain::messaging::InboundMessage;

/// A live authenticated session with the platform.
///
/// Produced by [`ChatTransport::open_connection`] and held by the
/// session registry for the lifetime of the connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionHandle {
    /// Credential the session authenticated with.
    pub credential: Credential,
    /// Workspace the credential belongs to.
    pub team: TeamId,
    /// The bot's own user identity in that workspace.
    pub bot_user: UserId,
    /// When the session was opened.
    pub opened_at: DateTime<Utc>,
}

/// Events the transport surfaces to the application layer.
#[derive(Debug, Clone)]
pub enum TransportEvent {
    /// A session finished connecting.
    Opened { credential: Credential },
    /// A session dropped. `recoverable` distinguishes a transient drop
    /// the transport will retry from a terminal close.
    Closed {
        credential: Credential,
        recoverable: bool,
    },
    /// A message arrived on a connected session.
    Inbound(InboundMessage),
    /// A workspace completed installation and should be connected.
    NewInstallation {
        team: TeamId,
        credential: Credential,
        installer: UserId,
    },
}

/// Errors surfaced by transport operations.
///
/// Reasons are carried as strings so the port stays independent of any
/// particular HTTP client's error types.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("failed to open connection: {0}")]
    ConnectionFailed(String),

    #[error("platform call '{method}' failed: {reason}")]
    RequestFailed { method: String, reason: String },

    #[error("network error: {0}")]
    Network(String),
}

/// Port for sending to and connecting with the messaging platform.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Authenticates the credential and opens a live session.
    ///
    /// # Errors
    ///
    /// - `ConnectionFailed` if the platform rejects the credential
    /// - `Network` if the platform cannot be reached
    async fn open_connection(
        &self,
        credential: &Credential,
    ) -> Result<ConnectionHandle, TransportError>;

    /// Sends a plain text message to a channel.
    async fn send_text(
        &self,
        credential: &Credential,
        channel: &ChannelId,
        text: &str,
    ) -> Result<(), TransportError>;

    /// Sends a prompt, rendering its choices as interactive buttons
    /// where the platform supports them.
    async fn send_prompt(
        &self,
        credential: &Credential,
        channel: &ChannelId,
        prompt: &PromptSpec,
    ) -> Result<(), TransportError>;

    /// Opens (or finds) the one-on-one channel with a user.
    async fn open_direct_channel(
        &self,
        credential: &Credential,
        user: &UserId,
    ) -> Result<ChannelId, TransportError>;
}
