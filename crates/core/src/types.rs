use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque handle the reporting service returns for a started job.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobTicket(String);

impl JobTicket {
    pub fn new(ticket: impl Into<String>) -> Self {
        Self(ticket.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Portal access level that never requires a reporting token.
pub const ACCESS_PUBLIC: &str = "public";
