//! Chooses how a job's result is acquired.

use std::fmt;

use reportrun_core::{JobOutcome, JobTicket};
use tokio_util::sync::CancellationToken;

use crate::api::ReportingApi;
use crate::error::RunError;
use crate::poller::{poll_until_complete, PollConfig};
use crate::subscriber::subscribe_until_complete;

/// How to wait for a submitted job to finish.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ResultStrategy {
    /// Repeatedly fetch the status endpoint.
    Polling,
    /// Hold one WebSocket subscription open.
    #[default]
    Subscription,
}

impl fmt::Display for ResultStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Polling => "polling",
            Self::Subscription => "subscription",
        })
    }
}

/// Wait for the job behind `ticket` to finish using `strategy`.
///
/// Takes ownership of the ticket; it is not reused once a result has
/// been acquired.
pub async fn watch_result(
    api: &ReportingApi,
    ticket: JobTicket,
    strategy: ResultStrategy,
    poll: &PollConfig,
    cancel: &CancellationToken,
) -> Result<JobOutcome, RunError> {
    tracing::debug!(ticket = %ticket, %strategy, "Waiting for job result");

    match strategy {
        ResultStrategy::Polling => poll_until_complete(api, &ticket, poll, cancel).await,
        ResultStrategy::Subscription => {
            subscribe_until_complete(api.service_url(), &ticket, cancel).await
        }
    }
}
