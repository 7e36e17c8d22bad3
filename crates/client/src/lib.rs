//! Reporting service client.
//!
//! Submits report and print jobs to a reporting service and waits for
//! their artifacts, either by polling the status endpoint or over a
//! WebSocket subscription. [`JobRunner`] ties item resolution, token
//! exchange, submission and result acquisition into one call.

pub mod api;
pub mod config;
pub mod error;
pub mod poller;
pub mod portal;
pub mod runner;
pub mod subscriber;
pub mod token;
pub mod watcher;

pub use api::ReportingApi;
pub use config::RunnerConfig;
pub use error::{ApiError, PortalError, RunError, SubscriptionError};
pub use poller::PollConfig;
pub use portal::{ItemResolver, PortalClient, PortalItem};
pub use runner::{JobRunner, RunRequest, RunStage};
pub use token::{HttpTokenExchanger, TokenExchanger};
pub use watcher::ResultStrategy;
