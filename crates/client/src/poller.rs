//! Result acquisition by polling the job status endpoint.
//!
//! [`poll_until_complete`] fetches a status snapshot, interprets it and
//! sleeps for [`PollConfig::interval`] until the job finishes. The loop
//! can be bounded by an attempt count, a deadline, or both; without
//! either it runs until the job finishes or `cancel` is triggered.

use std::time::Duration;

use reportrun_core::{interpret, JobOutcome, JobTicket};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::api::ReportingApi;
use crate::error::RunError;

/// Tunable parameters for the status polling loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollConfig {
    /// Delay between two status fetches.
    pub interval: Duration,
    /// Give up after this many fetches.
    pub max_attempts: Option<u32>,
    /// Give up once this much time has passed since the first fetch.
    pub deadline: Option<Duration>,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            max_attempts: None,
            deadline: None,
        }
    }
}

impl PollConfig {
    /// `true` when either bound has been reached.
    pub fn exhausted(&self, attempts: u32, elapsed: Duration) -> bool {
        self.max_attempts.is_some_and(|max| attempts >= max)
            || self.deadline.is_some_and(|deadline| elapsed >= deadline)
    }
}

/// Poll the job status until the job finishes.
///
/// A failed fetch aborts the loop with [`RunError::Poll`]; it is not
/// retried.
pub async fn poll_until_complete(
    api: &ReportingApi,
    ticket: &JobTicket,
    config: &PollConfig,
    cancel: &CancellationToken,
) -> Result<JobOutcome, RunError> {
    let started = Instant::now();
    let mut attempts = 0u32;

    loop {
        attempts += 1;

        let snapshot = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::info!(ticket = %ticket, "Polling cancelled");
                return Err(RunError::Cancelled);
            }
            result = api.fetch_status(ticket) => result.map_err(RunError::Poll)?,
        };

        if let Some(outcome) = interpret(api.service_url(), ticket, &snapshot) {
            tracing::info!(ticket = %ticket, attempts, "Job finished");
            return Ok(outcome);
        }

        let elapsed = started.elapsed();
        if config.exhausted(attempts, elapsed) {
            tracing::warn!(
                ticket = %ticket,
                attempts,
                ?elapsed,
                "Giving up on job status polling",
            );
            return Err(RunError::Timeout { attempts, elapsed });
        }

        tracing::debug!(ticket = %ticket, attempts, "Job still running");

        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::info!(ticket = %ticket, "Polling cancelled");
                return Err(RunError::Cancelled);
            }
            _ = tokio::time::sleep(config.interval) => {}
        }
    }
}
