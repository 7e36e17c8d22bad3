//! Job status snapshots and their interpretation.
//!
//! The service reports progress as a list of events tagged by a `$type`
//! field, both from `GET /job/artifacts` and over the push connection.
//! A job is finished once a `JobQuit` event is present; it produced an
//! artifact if a `JobResult` event is present as well.

use serde::{Deserialize, Deserializer};

use crate::types::JobTicket;
use crate::urls;

/// One observation of a job's status events.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct JobStatusSnapshot {
    /// Events in the order the service sent them. A missing or `null`
    /// list is treated as empty.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub results: Vec<JobStatusEvent>,
}

/// A single status event.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "$type")]
pub enum JobStatusEvent {
    /// The job produced an artifact, retrievable by `tag`.
    #[serde(rename_all = "camelCase")]
    JobResult {
        tag: String,
        #[serde(default)]
        content_type: Option<String>,
        #[serde(default)]
        length: Option<u64>,
    },

    /// The job has stopped running.
    JobQuit {
        #[serde(default)]
        kind: Option<String>,
    },

    /// Any event kind this client does not act on.
    #[serde(other)]
    Unknown,
}

/// Terminal result of a job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutcome {
    /// The job finished and its artifact can be downloaded from `url`.
    ArtifactReady { url: String },
    /// The job finished without an artifact; `logs_url` points at the
    /// service's diagnostic log for the ticket.
    Failed { logs_url: String },
}

impl JobStatusSnapshot {
    /// `true` once any `JobQuit` event has been observed.
    pub fn has_quit(&self) -> bool {
        self.results
            .iter()
            .any(|event| matches!(event, JobStatusEvent::JobQuit { .. }))
    }

    /// Tag of the first `JobResult` event, if any.
    pub fn result_tag(&self) -> Option<&str> {
        self.results.iter().find_map(|event| match event {
            JobStatusEvent::JobResult { tag, .. } => Some(tag.as_str()),
            _ => None,
        })
    }
}

/// Decide whether a snapshot represents a finished job.
///
/// Returns `None` while the job is still running. Event order within the
/// snapshot does not matter and unknown events are ignored.
pub fn interpret(
    service_url: &str,
    ticket: &JobTicket,
    snapshot: &JobStatusSnapshot,
) -> Option<JobOutcome> {
    if !snapshot.has_quit() {
        return None;
    }

    Some(match snapshot.result_tag() {
        Some(tag) => JobOutcome::ArtifactReady {
            url: urls::artifact_url(service_url, ticket, tag),
        },
        None => JobOutcome::Failed {
            logs_url: urls::logs_url(service_url, ticket),
        },
    })
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
