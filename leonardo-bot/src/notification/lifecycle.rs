//! Single live notification management.
//!
//! The main channel always shows at most one plan message. A new document is
//! posted first and only then is its predecessor deleted, so there is a short
//! window with both messages visible but never one with neither.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use super::bounded;
use super::channels::{ChannelId, ChatClient, MessageHandle};
use super::document::NotificationDocument;
use crate::{Error, Result};

/// Owner of the currently posted plan message.
pub struct MessageLifecycle {
    client: Arc<dyn ChatClient>,
    channel_id: ChannelId,
    timeout: Duration,
    current: Option<MessageHandle>,
}

impl MessageLifecycle {
    /// Create a lifecycle manager for `channel_id` with no live message.
    ///
    /// `timeout` bounds every send and delete call.
    pub fn new(client: Arc<dyn ChatClient>, channel_id: ChannelId, timeout: Duration) -> Self {
        Self {
            client,
            channel_id,
            timeout,
            current: None,
        }
    }

    /// The live message, if one has been published.
    pub fn current(&self) -> Option<&MessageHandle> {
        self.current.as_ref()
    }

    /// Publish `doc` as the new live message.
    ///
    /// Fails with [`Error::Notify`] when sending fails, in which case the
    /// previous message stays live. Once the send succeeded the predecessor
    /// is deleted; a failed delete is logged and the new message is adopted
    /// regardless.
    pub async fn publish(&mut self, doc: &NotificationDocument) -> Result<MessageHandle> {
        let handle = bounded(
            self.timeout,
            "sending plan notification",
            Error::Notify,
            self.client.send_document(self.channel_id, doc),
        )
        .await?;

        if let Some(previous) = self.current.take() {
            self.retire(&previous).await;
        }

        info!(message = %handle, "Published plan notification");
        self.current = Some(handle);
        Ok(handle)
    }

    async fn retire(&self, previous: &MessageHandle) {
        let result = bounded(
            self.timeout,
            "deleting previous notification",
            Error::Notify,
            self.client.delete_message(previous),
        )
        .await;

        if let Err(e) = result {
            warn!(message = %previous, error = %e, "Previous notification left behind");
        }
    }
}
