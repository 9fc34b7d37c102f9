//! Inbound message model.
//!
//! Adapters normalize platform payloads into [`InboundMessage`] before
//! routing. The address kind records how the bot was addressed, which
//! decides whether the message may start a conversation.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{ChannelId, Credential, UserId};

/// How an inbound message addressed the bot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddressKind {
    /// Sent in a one-on-one channel with the bot.
    DirectMessage,
    /// A channel message that opens by naming the bot.
    DirectMention,
    /// A channel message that names the bot somewhere in its body.
    Mention,
    /// A button press or other interactive reply.
    Interactive,
    /// A channel message that does not name the bot at all.
    Ambient,
}

impl AddressKind {
    /// True when a message addressed this way may start a new
    /// conversation. Interactive and ambient messages never do; they
    /// only feed conversations that already exist.
    pub fn can_trigger(&self) -> bool {
        matches!(
            self,
            Self::DirectMessage | Self::DirectMention | Self::Mention
        )
    }
}

/// A platform message normalized for routing.
///
/// The credential identifies which connected workspace session received
/// the message, so replies go out through the same session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    /// Session the message arrived on.
    pub credential: Credential,
    /// Channel the message was posted in.
    pub channel: ChannelId,
    /// Author of the message.
    pub user: UserId,
    /// Message text, with any bot-mention markup already stripped.
    pub text: String,
    /// How the bot was addressed.
    pub address: AddressKind,
}
