//! Conversation directory - routes replies to their running conversation.
//!
//! Each active conversation occupies one slot keyed by session, channel,
//! and user. Claiming a slot yields the receiving end of a reply channel;
//! the directory keeps the sending end and forwards inbound text through
//! it. A user gets at most one conversation per channel at a time.

use std::collections::HashMap;

use tokio::sync::{mpsc, RwLock};

use crate::domain::foundation::{ChannelId, Credential, UserId};

/// Buffer size for each conversation's reply channel. Replies arrive at
/// human typing speed, so a small buffer is plenty.
const REPLY_CHANNEL_CAPACITY: usize = 16;

/// Identifies one conversation slot: a user, in a channel, on a session.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConversationKey {
    pub credential: Credential,
    pub channel: ChannelId,
    pub user: UserId,
}

/// Tracks which conversations are live and owns their reply senders.
///
/// # Thread Safety
///
/// Uses `RwLock` since deliveries (reads) vastly outnumber claims and
/// releases (writes). A claim's occupancy check and insert happen under
/// one write lock, so two racing triggers start exactly one conversation.
pub struct ConversationDirectory {
    active: RwLock<HashMap<ConversationKey, mpsc::Sender<String>>>,
}

impl ConversationDirectory {
    pub fn new() -> Self {
        Self {
            active: RwLock::new(HashMap::new()),
        }
    }

    /// Claims the slot for a new conversation.
    ///
    /// Returns the reply receiver on success, or `None` when a live
    /// conversation already holds the slot. A slot whose receiver has
    /// been dropped counts as free and is reclaimed.
    pub async fn claim(&self, key: ConversationKey) -> Option<mpsc::Receiver<String>> {
        let mut active = self.active.write().await;
        if let Some(existing) = active.get(&key) {
            if !existing.is_closed() {
                return None;
            }
        }
        let (tx, rx) = mpsc::channel(REPLY_CHANNEL_CAPACITY);
        active.insert(key, tx);
        Some(rx)
    }

    /// Forwards reply text to the conversation holding this slot.
    ///
    /// Returns `false` when no live conversation holds the slot, leaving
    /// the caller free to treat the text as a potential trigger.
    pub async fn deliver(&self, key: &ConversationKey, text: String) -> bool {
        let sender = {
            let active = self.active.read().await;
            match active.get(key) {
                Some(sender) if !sender.is_closed() => sender.clone(),
                _ => return false,
            }
        };
        sender.send(text).await.is_ok()
    }

    /// Releases a finished conversation's slot.
    ///
    /// Only removes the entry if its receiver is gone, so a slot that
    /// was already reclaimed by a newer conversation is left alone.
    pub async fn release(&self, key: &ConversationKey) {
        let mut active = self.active.write().await;
        if let Some(existing) = active.get(key) {
            if existing.is_closed() {
                active.remove(key);
            }
        }
    }

    /// Drops every conversation slot for a credential, used when its
    /// session closes for good. Dropping the senders wakes each runner
    /// with a closed channel, which finalizes the conversation.
    pub async fn cancel_team(&self, credential: &Credential) -> usize {
        let mut active = self.active.write().await;
        let before = active.len();
        active.retain(|key, _| key.credential != *credential);
        before - active.len()
    }

    /// Number of tracked conversation slots.
    pub async fn count(&self) -> usize {
        self.active.read().await.len()
    }
}

impl Default for ConversationDirectory {
    fn default() -> Self {
        Self::new()
    }
}
