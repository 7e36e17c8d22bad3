use std::time::Duration;

use reportrun_core::urls::{DEFAULT_PORTAL_URL, DEFAULT_SERVICE_ROOT};

use crate::poller::PollConfig;

/// Default HTTP request timeout in seconds.
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Job runner configuration.
///
/// All fields have defaults that target the hosted service and the
/// public ArcGIS portal. Per-call values in a
/// [`RunRequest`](crate::runner::RunRequest) take precedence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunnerConfig {
    /// Service root used when a portal item carries no URL.
    pub service_root: String,
    /// Portal used when a request names none.
    pub portal_url: String,
    pub poll: PollConfig,
    /// Timeout applied to every HTTP request.
    pub request_timeout: Duration,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            service_root: DEFAULT_SERVICE_ROOT.to_string(),
            portal_url: DEFAULT_PORTAL_URL.to_string(),
            poll: PollConfig::default(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }
}

impl RunnerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                 | Default                                  |
    /// |-------------------------|------------------------------------------|
    /// | `REPORTING_SERVICE_URL` | `https://apps.geocortex.com/reporting`   |
    /// | `PORTAL_URL`            | `https://www.arcgis.com`                 |
    /// | `POLL_INTERVAL_MS`      | `1000`                                   |
    /// | `POLL_MAX_ATTEMPTS`     | unbounded                                |
    /// | `POLL_DEADLINE_SECS`    | unbounded                                |
    /// | `REQUEST_TIMEOUT_SECS`  | `30`                                     |
    ///
    /// Values that fail to parse fall back to the default.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let parsed = |key: &str| non_empty(key).and_then(|v| v.trim().parse::<u64>().ok());

        let poll = PollConfig {
            interval: parsed("POLL_INTERVAL_MS")
                .map(Duration::from_millis)
                .unwrap_or(defaults.poll.interval),
            max_attempts: parsed("POLL_MAX_ATTEMPTS").and_then(|v| u32::try_from(v).ok()),
            deadline: parsed("POLL_DEADLINE_SECS").map(Duration::from_secs),
        };

        Self {
            service_root: non_empty("REPORTING_SERVICE_URL").unwrap_or(defaults.service_root),
            portal_url: non_empty("PORTAL_URL").unwrap_or(defaults.portal_url),
            poll,
            request_timeout: parsed("REQUEST_TIMEOUT_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.request_timeout),
        }
    }
}
