//! Plan retrieval.
//!
//! [`PlanSource`] is the seam the scheduler fetches through. The HTTP
//! implementation performs a single unauthenticated GET per call and never
//! retries; the next scheduler tick is the retry.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;
use url::Url;

use super::PlanSnapshot;
use crate::utils::text::truncate_chars;
use crate::{Error, Result};

/// Longest slice of an error response body quoted in a fetch error.
const ERROR_BODY_PREVIEW: usize = 200;

/// Source of plan snapshots.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PlanSource: Send + Sync {
    /// Retrieve and decode the current plan.
    ///
    /// Fails with [`Error::Fetch`] on transport, status or timeout failures
    /// and with [`Error::Parse`] when the body is not a plan document.
    async fn fetch(&self) -> Result<PlanSnapshot>;
}

/// Plan source backed by the JSON API.
pub struct HttpPlanSource {
    client: Client,
    url: Url,
    timeout: Duration,
}

impl HttpPlanSource {
    /// Create a new HTTP plan source.
    ///
    /// `timeout` bounds the whole request, body included.
    pub fn new(client: Client, url: Url, timeout: Duration) -> Self {
        Self {
            client,
            url,
            timeout,
        }
    }

    async fn fetch_inner(&self) -> Result<PlanSnapshot> {
        let response = self
            .client
            .get(self.url.clone())
            .send()
            .await
            .map_err(|e| Error::fetch(format!("request to {} failed: {}", self.url, e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::fetch(format!(
                "{} returned {}: {}",
                self.url,
                status,
                truncate_chars(body.trim(), ERROR_BODY_PREVIEW)
            )));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| Error::fetch(format!("reading body from {} failed: {}", self.url, e)))?;

        serde_json::from_slice(&body).map_err(|e| Error::parse(e.to_string()))
    }
}

#[async_trait]
impl PlanSource for HttpPlanSource {
    async fn fetch(&self) -> Result<PlanSnapshot> {
        let start = Instant::now();

        let snapshot = tokio::time::timeout(self.timeout, self.fetch_inner())
            .await
            .map_err(|_| {
                Error::fetch(format!(
                    "request to {} timed out after {:?}",
                    self.url, self.timeout
                ))
            })??;

        debug!(
            infos = snapshot.infos.len(),
            entries = snapshot.data.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Fetched plan"
        );
        Ok(snapshot)
    }
}
