//! Messaging platform clients.
//!
//! [`ChatClient`] is everything the bot needs from a chat platform: verify
//! its credential, resolve a channel, send a document or plain text, and
//! delete a previously sent message. [`DiscordClient`] implements it over the
//! Discord REST API.

mod discord;

pub use discord::{DEFAULT_API_BASE, DiscordClient, DiscordConfig};

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::document::NotificationDocument;
use crate::Result;

/// Platform channel identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChannelId(pub u64);

/// Platform message identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(pub u64);

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Reference to a message that has been posted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageHandle {
    pub channel_id: ChannelId,
    pub message_id: MessageId,
}

impl fmt::Display for MessageHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.channel_id, self.message_id)
    }
}

/// Chat platform operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Verify the credential and return the name of the authenticated user.
    async fn current_user(&self) -> Result<String>;

    /// Confirm that `channel_id` exists and is visible to the bot.
    async fn resolve_channel(&self, channel_id: ChannelId) -> Result<ChannelId>;

    /// Post a structured document.
    async fn send_document(
        &self,
        channel_id: ChannelId,
        doc: &NotificationDocument,
    ) -> Result<MessageHandle>;

    /// Post a plain text message.
    async fn send_text(&self, channel_id: ChannelId, text: &str) -> Result<MessageHandle>;

    /// Delete a message. Deleting a message that no longer exists succeeds.
    async fn delete_message(&self, handle: &MessageHandle) -> Result<()>;
}
