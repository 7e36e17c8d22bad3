//! `reportrun-cli` library crate.
//!
//! Command-line argument model for the `reportrun` binary. Kept in a
//! library so argument parsing can be tested without running a job.

use clap::Parser;
use reportrun_client::{ResultStrategy, RunRequest};
use reportrun_core::{JobOptions, ParameterValue};

/// Run a reporting or printing job and print the artifact URL.
#[derive(Debug, Parser)]
#[command(name = "reportrun", version)]
pub struct Cli {
    /// Portal item id of the report or print template
    pub item_id: String,

    /// Job parameter as NAME=VALUE; VALUE is read as JSON when it parses,
    /// otherwise as a string. Repeatable; order is preserved.
    #[arg(long = "param", short = 'p', value_parser = parse_param)]
    pub params: Vec<(String, ParameterValue)>,

    /// Culture used for localisation, e.g. fr-CA
    #[arg(long)]
    pub culture: Option<String>,

    /// Rendering resolution for map prints
    #[arg(long)]
    pub dpi: Option<u32>,

    /// Title of the produced artifact
    #[arg(long)]
    pub title: Option<String>,

    /// Portal access token for secured items
    #[arg(long, env = "PORTAL_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Portal URL (default: PORTAL_URL or https://www.arcgis.com)
    #[arg(long)]
    pub portal_url: Option<String>,

    /// Service root used when the item carries none
    #[arg(long)]
    pub service_url: Option<String>,

    /// Poll the status endpoint instead of subscribing over WebSocket
    #[arg(long)]
    pub poll: bool,
}

/// Errors from parsing a `--param` argument.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ParamError {
    #[error("expected NAME=VALUE, got `{0}`")]
    MissingSeparator(String),

    #[error("parameter name must not be empty")]
    EmptyName,
}

/// Parse `NAME=VALUE` into a named parameter.
pub fn parse_param(raw: &str) -> Result<(String, ParameterValue), ParamError> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| ParamError::MissingSeparator(raw.to_string()))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(ParamError::EmptyName);
    }

    let value = match serde_json::from_str::<serde_json::Value>(value) {
        Ok(json) => ParameterValue::from(json),
        Err(_) => ParameterValue::from(value),
    };
    Ok((name.to_string(), value))
}

impl Cli {
    /// Convert the parsed arguments into a run request.
    ///
    /// A parameter given twice keeps its first position and its last value.
    pub fn into_request(self) -> RunRequest {
        let mut options = JobOptions {
            culture: self.culture,
            dpi: self.dpi,
            title: self.title,
            ..Default::default()
        };
        options.parameters.extend(self.params);

        RunRequest {
            item_id: self.item_id,
            portal_url: self.portal_url,
            token: self.token,
            options,
            strategy: if self.poll {
                ResultStrategy::Polling
            } else {
                ResultStrategy::Subscription
            },
            service_root: self.service_url,
        }
    }
}
