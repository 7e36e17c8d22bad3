//! End-to-end job execution.
//!
//! [`JobRunner::run`] walks a job through its stages (resolve the
//! template item, acquire a token, submit, await the result) and returns
//! the artifact URL. Each call owns its ticket and connections, so one
//! runner can serve any number of concurrent calls.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use reportrun_core::{build_submission, urls, JobOptions, JobOutcome};
use tokio_util::sync::CancellationToken;

use crate::api::ReportingApi;
use crate::config::RunnerConfig;
use crate::error::RunError;
use crate::portal::{ItemResolver, PortalClient};
use crate::token::{HttpTokenExchanger, TokenExchanger};
use crate::watcher::{watch_result, ResultStrategy};

/// Stages of a job run, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStage {
    ResolvingItem,
    AcquiringToken,
    Submitting,
    AwaitingResult,
}

impl fmt::Display for RunStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::ResolvingItem => "resolving_item",
            Self::AcquiringToken => "acquiring_token",
            Self::Submitting => "submitting",
            Self::AwaitingResult => "awaiting_result",
        })
    }
}

/// A single job run request.
#[derive(Debug, Clone, Default)]
pub struct RunRequest {
    /// Portal item id of the report or print template.
    pub item_id: String,
    /// Overrides [`RunnerConfig::portal_url`].
    pub portal_url: Option<String>,
    /// Portal token for secured items.
    pub token: Option<String>,
    pub options: JobOptions,
    pub strategy: ResultStrategy,
    /// Overrides [`RunnerConfig::service_root`] as the fallback service.
    pub service_root: Option<String>,
}

impl RunRequest {
    pub fn new(item_id: impl Into<String>) -> Self {
        Self {
            item_id: item_id.into(),
            ..Default::default()
        }
    }
}

/// Runs reporting and printing jobs end to end.
pub struct JobRunner {
    config: RunnerConfig,
    http: reqwest::Client,
    resolver: Arc<dyn ItemResolver>,
    tokens: Arc<dyn TokenExchanger>,
}

impl JobRunner {
    /// Create a runner that talks to the portal and service over HTTP.
    pub fn new(config: RunnerConfig) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self::with_collaborators(
            config,
            http.clone(),
            Arc::new(PortalClient::new(http.clone())),
            Arc::new(HttpTokenExchanger::new(http)),
        ))
    }

    /// Create a runner with custom item resolution and token exchange.
    pub fn with_collaborators(
        config: RunnerConfig,
        http: reqwest::Client,
        resolver: Arc<dyn ItemResolver>,
        tokens: Arc<dyn TokenExchanger>,
    ) -> Self {
        Self {
            config,
            http,
            resolver,
            tokens,
        }
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// Run a job and return the URL of its artifact.
    ///
    /// Yields exactly one artifact URL or one error. Cancelling `cancel`
    /// stops the run at its current suspension point with
    /// [`RunError::Cancelled`].
    pub async fn run(
        &self,
        request: RunRequest,
        cancel: &CancellationToken,
    ) -> Result<String, RunError> {
        let item_id = request.item_id.as_str();
        let portal_url = urls::normalize_portal_url(
            request.portal_url.as_deref().unwrap_or(&self.config.portal_url),
        )
        .to_string();
        let caller_token = request.token.as_deref().filter(|t| !t.is_empty());

        // ---- resolve the template item ----
        enter(item_id, RunStage::ResolvingItem);
        let item = cancellable(
            cancel,
            self.resolver.resolve(item_id, &portal_url, caller_token),
        )
        .await??;

        // ---- acquire a reporting token ----
        enter(item_id, RunStage::AcquiringToken);
        let service_root = request
            .service_root
            .as_deref()
            .unwrap_or(&self.config.service_root);
        let service_url = urls::service_url_from_item(item.url.as_deref(), service_root);

        let service_token = match caller_token {
            Some(token) if !item.is_public() => Some(
                cancellable(cancel, self.tokens.exchange(token, &service_url))
                    .await?
                    .map_err(RunError::TokenExchange)?,
            ),
            _ => None,
        };

        // ---- submit ----
        enter(item_id, RunStage::Submitting);
        let submission = build_submission(item_id, &portal_url, &request.options);
        let api = ReportingApi::with_client(self.http.clone(), service_url);
        let ticket = cancellable(cancel, api.submit_job(&submission, service_token.as_deref()))
            .await?
            .map_err(RunError::Submission)?;

        // ---- await the result ----
        enter(item_id, RunStage::AwaitingResult);
        let outcome =
            watch_result(&api, ticket, request.strategy, &self.config.poll, cancel).await?;

        match outcome {
            JobOutcome::ArtifactReady { url } => {
                tracing::info!(item_id, artifact_url = %url, "Job completed");
                Ok(url)
            }
            JobOutcome::Failed { logs_url } => {
                tracing::error!(item_id, logs_url = %logs_url, "Job finished without an artifact");
                Err(RunError::JobFailed { logs_url })
            }
        }
    }
}

fn enter(item_id: &str, stage: RunStage) {
    tracing::debug!(item_id, %stage, "Job run stage");
}

/// Await `fut` unless `cancel` fires first.
async fn cancellable<F: Future>(
    cancel: &CancellationToken,
    fut: F,
) -> Result<F::Output, RunError> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(RunError::Cancelled),
        output = fut => Ok(output),
    }
}
