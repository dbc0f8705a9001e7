//! Best-effort failure reporting to the error channel.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error};

use super::bounded;
use super::channels::{ChannelId, ChatClient, MessageHandle};
use crate::{Error, Result};

/// Sends failure descriptions to the error channel.
///
/// Reporting never fails from the caller's point of view: if the channel
/// cannot be resolved or the message cannot be sent, the problem is written
/// to the local log and dropped.
pub struct ErrorReporter {
    client: Arc<dyn ChatClient>,
    channel_id: ChannelId,
    timeout: Duration,
}

impl ErrorReporter {
    pub fn new(client: Arc<dyn ChatClient>, channel_id: ChannelId, timeout: Duration) -> Self {
        Self {
            client,
            channel_id,
            timeout,
        }
    }

    /// Report `message` to the error channel.
    pub async fn report(&self, message: &str) {
        match self.try_report(message).await {
            Ok(handle) => debug!(message = %handle, "Error report delivered"),
            Err(e) => error!(
                channel = %self.channel_id,
                report = %message,
                error = %e,
                "Could not send error report"
            ),
        }
    }

    async fn try_report(&self, message: &str) -> Result<MessageHandle> {
        let channel = bounded(
            self.timeout,
            "resolving error channel",
            Error::ErrorReport,
            self.client.resolve_channel(self.channel_id),
        )
        .await?;

        bounded(
            self.timeout,
            "sending error report",
            Error::ErrorReport,
            self.client.send_text(channel, message),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notification::channels::{MessageId, MockChatClient};
    use mockall::predicate::eq;

    const ERRORS: ChannelId = ChannelId(20);

    fn reporter(client: MockChatClient) -> ErrorReporter {
        ErrorReporter::new(Arc::new(client), ERRORS, Duration::from_secs(5))
    }

    #[tokio::test]
    async fn test_report_resolves_then_sends() {
        let mut client = MockChatClient::new();
        client
            .expect_resolve_channel()
            .with(eq(ERRORS))
            .times(1)
            .returning(Ok);
        client
            .expect_send_text()
            .withf(|channel, text| *channel == ERRORS && text == "Fetch error: boom")
            .times(1)
            .returning(|channel, _| {
                Ok(MessageHandle {
                    channel_id: channel,
                    message_id: MessageId(1),
                })
            });

        reporter(client).report("Fetch error: boom").await;
    }

    #[tokio::test]
    async fn test_unresolved_channel_is_swallowed() {
        let mut client = MockChatClient::new();
        client
            .expect_resolve_channel()
            .times(1)
            .returning(|_| Err(Error::discord("resolve channel failed: 404 Not Found")));
        client.expect_send_text().never();

        reporter(client).report("Fetch error: boom").await;
    }

    #[tokio::test]
    async fn test_send_failure_is_swallowed() {
        let mut client = MockChatClient::new();
        client.expect_resolve_channel().returning(Ok);
        client
            .expect_send_text()
            .times(2)
            .returning(|_, _| Err(Error::discord("send message failed: 403 Forbidden")));

        let reporter = reporter(client);
        let err = reporter.try_report("Fetch error: boom").await.unwrap_err();
        assert!(matches!(err, Error::ErrorReport(_)), "unexpected error: {err:?}");

        reporter.report("Fetch error: boom").await;
    }
}
