//! Error types for the reporting client.
//!
//! Each I/O layer has its own error enum; [`RunError`] aggregates them
//! into one variant per stage of a job run so callers can tell where a
//! run stopped.

use std::time::Duration;

/// Errors from a single request/response exchange with the portal or
/// the reporting service.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The HTTP request itself failed (network, DNS, TLS, decoding, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The server returned a non-2xx status code.
    #[error("Server returned HTTP {status}: {body}")]
    Status {
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The response body did not contain an expected field.
    #[error("Response is missing `{0}`")]
    MissingField(&'static str),
}

/// Errors from resolving a portal item.
#[derive(Debug, thiserror::Error)]
pub enum PortalError {
    #[error(transparent)]
    Http(#[from] ApiError),

    /// The portal answered with an error payload; the message is the
    /// portal's own.
    #[error("{0}")]
    Item(String),
}

/// Errors from the push subscription.
#[derive(Debug, thiserror::Error)]
pub enum SubscriptionError {
    /// Failed to establish the WebSocket connection.
    #[error("Failed to connect to {url}: {source}")]
    Connect {
        url: String,
        #[source]
        source: tokio_tungstenite::tungstenite::Error,
    },

    /// The connection failed after it was established.
    #[error("WebSocket receive error: {0}")]
    Receive(#[source] tokio_tungstenite::tungstenite::Error),

    /// A pushed message was not a valid status snapshot.
    #[error("Failed to decode status message: {0}")]
    Decode(#[from] serde_json::Error),

    /// The service closed the connection before the job finished.
    #[error("Connection closed before the job finished")]
    ClosedWithoutOutcome,
}

/// Errors from an end-to-end job run.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("Error retrieving portal item: {0}")]
    ItemResolution(String),

    #[error("Failed to obtain a reporting token: {0}")]
    TokenExchange(#[source] ApiError),

    #[error("Job submission failed: {0}")]
    Submission(#[source] ApiError),

    #[error("Failed to fetch job status: {0}")]
    Poll(#[source] ApiError),

    #[error("Job subscription failed: {0}")]
    Subscription(#[from] SubscriptionError),

    /// The job finished without producing an artifact.
    #[error("Report job failed to produce an artifact. See the logs for more details: {logs_url}")]
    JobFailed { logs_url: String },

    /// The poll budget ran out before the job finished.
    #[error("Job did not finish after {attempts} status checks ({}ms)", .elapsed.as_millis())]
    Timeout { attempts: u32, elapsed: Duration },

    #[error("Job run cancelled")]
    Cancelled,
}

impl From<PortalError> for RunError {
    fn from(err: PortalError) -> Self {
        Self::ItemResolution(err.to_string())
    }
}
