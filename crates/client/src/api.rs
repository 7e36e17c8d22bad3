//! REST client for the reporting service HTTP endpoints.
//!
//! Wraps job submission, status retrieval and token exchange using
//! [`reqwest`]. The service wraps most replies in a
//! `{"response": {...}}` envelope.

use reportrun_core::{urls, JobStatusSnapshot, JobSubmission, JobTicket};
use serde::Deserialize;

use crate::error::ApiError;

/// HTTP client for a single reporting service.
#[derive(Debug, Clone)]
pub struct ReportingApi {
    client: reqwest::Client,
    service_url: String,
}

/// `{"response": {...}}` wrapper used by the job and auth endpoints.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    response: Option<T>,
}

#[derive(Debug, Deserialize)]
struct TicketResponse {
    ticket: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    token: Option<String>,
}

impl ReportingApi {
    /// Create a client for the service rooted at `service_url`, e.g.
    /// `https://apps.geocortex.com/reporting/service`.
    pub fn new(service_url: String) -> Self {
        Self::with_client(reqwest::Client::new(), service_url)
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, service_url: String) -> Self {
        Self {
            client,
            service_url,
        }
    }

    pub fn service_url(&self) -> &str {
        &self.service_url
    }

    /// Start a job.
    ///
    /// Sends `POST /job/run` with the submission as the JSON body. A
    /// bearer `Authorization` header is attached only when `token` is
    /// given.
    pub async fn submit_job(
        &self,
        submission: &JobSubmission,
        token: Option<&str>,
    ) -> Result<JobTicket, ApiError> {
        let mut request = self
            .client
            .post(urls::run_url(&self.service_url))
            .json(submission);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }

        let envelope: Envelope<TicketResponse> = parse_response(request.send().await?).await?;
        let ticket = envelope
            .response
            .and_then(|r| r.ticket)
            .ok_or(ApiError::MissingField("response.ticket"))?;

        tracing::info!(
            item_id = %submission.template.item_id,
            ticket = %ticket,
            "Job submitted",
        );
        Ok(JobTicket::new(ticket))
    }

    /// Fetch the current status snapshot of a job.
    ///
    /// Sends `GET /job/artifacts?ticket={ticket}`.
    pub async fn fetch_status(&self, ticket: &JobTicket) -> Result<JobStatusSnapshot, ApiError> {
        let response = self
            .client
            .get(urls::status_url(&self.service_url, ticket))
            .send()
            .await?;

        parse_response(response).await
    }

    /// Exchange a portal token for a short-lived reporting token.
    ///
    /// Sends `POST /auth/token/run` with `{"accessToken": token}`.
    pub async fn exchange_token(&self, portal_token: &str) -> Result<String, ApiError> {
        let response = self
            .client
            .post(urls::token_url(&self.service_url))
            .json(&serde_json::json!({ "accessToken": portal_token }))
            .send()
            .await?;

        let envelope: Envelope<TokenResponse> = parse_response(response).await?;
        envelope
            .response
            .and_then(|r| r.token)
            .ok_or(ApiError::MissingField("response.token"))
    }
}

// ---- response helpers ----

/// Ensure the response has a success status code. Returns the response
/// unchanged on success, or an [`ApiError::Status`] carrying the status
/// and body text on failure.
pub(crate) async fn ensure_success(
    response: reqwest::Response,
) -> Result<reqwest::Response, ApiError> {
    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_string());
        return Err(ApiError::Status {
            status: status.as_u16(),
            body,
        });
    }
    Ok(response)
}

/// Parse a successful JSON response body into the expected type.
pub(crate) async fn parse_response<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, ApiError> {
    let response = ensure_success(response).await?;
    Ok(response.json::<T>().await?)
}
