//! The poll / diff / notify loop.
//!
//! Each tick fetches the plan, compares it with the baseline (the last plan
//! that was successfully published) and, on a change, publishes a fresh
//! notification that replaces the previous one. Failures end the tick, get
//! forwarded to the error channel and leave the baseline untouched, so the
//! next tick compares against the same reference point again.

use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::Error;
use crate::notification::{ErrorReporter, MessageHandle, MessageLifecycle, render};
use crate::plan::{PlanSnapshot, PlanSource, has_changed};

/// Result of a single tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// The plan matches the baseline; nothing was sent.
    Unchanged,
    /// A new notification went live and the baseline advanced.
    Published(MessageHandle),
    /// Fetching or publishing failed and was reported.
    Failed,
}

/// Drives the plan watch loop.
pub struct Scheduler<S> {
    source: S,
    lifecycle: MessageLifecycle,
    reporter: ErrorReporter,
    interval: Duration,
    baseline: Option<PlanSnapshot>,
    ticks: u64,
}

impl<S: PlanSource> Scheduler<S> {
    /// Create a scheduler with an empty baseline.
    pub fn new(
        source: S,
        lifecycle: MessageLifecycle,
        reporter: ErrorReporter,
        interval: Duration,
    ) -> Self {
        Self {
            source,
            lifecycle,
            reporter,
            interval,
            baseline: None,
            ticks: 0,
        }
    }

    /// The last successfully published plan.
    pub fn baseline(&self) -> Option<&PlanSnapshot> {
        self.baseline.as_ref()
    }

    pub fn lifecycle(&self) -> &MessageLifecycle {
        &self.lifecycle
    }

    /// Run one fetch / compare / publish iteration.
    pub async fn tick(&mut self) -> TickOutcome {
        self.ticks += 1;

        let snapshot = match self.source.fetch().await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(tick = self.ticks, error = %e, "Failed to retrieve plan");
                self.reporter.report(&failure_report(&e)).await;
                return TickOutcome::Failed;
            }
        };

        if !has_changed(self.baseline.as_ref(), &snapshot) {
            info!(tick = self.ticks, "No change found in the plan");
            return TickOutcome::Unchanged;
        }

        info!(
            tick = self.ticks,
            infos = snapshot.infos.len(),
            entries = snapshot.data.len(),
            "Plan changed"
        );

        let doc = render(&snapshot);
        match self.lifecycle.publish(&doc).await {
            Ok(handle) => {
                // Baseline and live message advance together.
                self.baseline = Some(snapshot);
                TickOutcome::Published(handle)
            }
            Err(e) => {
                warn!(tick = self.ticks, error = %e, "Failed to publish plan notification");
                self.reporter.report(&failure_report(&e)).await;
                TickOutcome::Failed
            }
        }
    }

    /// Tick forever, waiting `interval` between ticks.
    ///
    /// `shutdown` is only observed while waiting, so an in-flight tick always
    /// completes before the loop returns.
    pub async fn run(mut self, shutdown: CancellationToken) {
        info!(interval = ?self.interval, "Watching substitution plan");

        loop {
            let outcome = self.tick().await;
            debug!(tick = self.ticks, ?outcome, "Tick finished");

            tokio::select! {
                _ = shutdown.cancelled() => {
                    info!(ticks = self.ticks, "Plan watch loop shutting down");
                    break;
                }
                _ = tokio::time::sleep(self.interval) => {}
            }
        }
    }
}

/// Text posted to the error channel for a failed tick.
fn failure_report(error: &Error) -> String {
    if error.is_source_error() {
        format!("Failed to retrieve the plan from the API: {error}")
    } else {
        format!("Failed to publish the plan notification: {error}")
    }
}
