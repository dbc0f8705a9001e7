//! Notification delivery.
//!
//! - [`render`] turns a plan snapshot into a [`NotificationDocument`]
//! - [`channels`] holds the chat platform seam and its Discord client
//! - [`MessageLifecycle`] keeps exactly one live plan message in the main channel
//! - [`ErrorReporter`] forwards failures to the error channel, best effort

pub mod channels;
pub mod document;
pub mod lifecycle;
pub mod render;
pub mod reporter;

pub use channels::{ChannelId, ChatClient, DiscordClient, DiscordConfig, MessageHandle, MessageId};
pub use document::{EmbedField, NotificationDocument};
pub use lifecycle::MessageLifecycle;
pub use render::render;
pub use reporter::ErrorReporter;

use std::future::Future;
use std::time::Duration;

use crate::{Error, Result};

/// Run a chat client call with a deadline.
///
/// Failures and timeouts are both rewrapped with `classify`, so callers see a
/// single error kind per concern (`Notify` for the main channel, `ErrorReport`
/// for the error channel).
pub(crate) async fn bounded<T>(
    timeout: Duration,
    action: &str,
    classify: fn(String) -> Error,
    call: impl Future<Output = Result<T>>,
) -> Result<T> {
    match tokio::time::timeout(timeout, call).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(classify(format!("{action}: {e}"))),
        Err(_) => Err(classify(format!("{action}: timed out after {timeout:?}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_bounded_passes_value_through() {
        let value = bounded(Duration::from_secs(1), "op", Error::Notify, async { Ok(5) })
            .await
            .unwrap();
        assert_eq!(value, 5);
    }

    #[tokio::test]
    async fn test_bounded_reclassifies_errors() {
        let err = bounded::<()>(Duration::from_secs(1), "send", Error::Notify, async {
            Err(Error::discord("403 Forbidden"))
        })
        .await
        .unwrap_err();

        let Error::Notify(msg) = &err else {
            panic!("expected notify error, got {err:?}");
        };
        assert!(msg.contains("send"));
        assert!(msg.contains("403"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_bounded_times_out() {
        let err = bounded::<()>(Duration::from_secs(2), "send", Error::ErrorReport, async {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(())
        })
        .await
        .unwrap_err();

        assert!(matches!(err, Error::ErrorReport(ref msg) if msg.contains("timed out")));
    }
}
