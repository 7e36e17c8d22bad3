//! Portal item lookup.
//!
//! Report and print templates are stored as portal items. The item tells
//! the client where the reporting service lives and whether the caller's
//! token has to be exchanged before a job can be submitted.

use async_trait::async_trait;
use reportrun_core::types::ACCESS_PUBLIC;
use reportrun_core::urls;
use serde::Deserialize;

use crate::api::parse_response;
use crate::error::{ApiError, PortalError};

/// The fields of a portal item the job runner uses.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PortalItem {
    /// Sharing level, e.g. `public`, `org` or `private`.
    #[serde(default)]
    pub access: Option<String>,
    /// Reporting service root registered on the item.
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

impl PortalItem {
    pub fn is_public(&self) -> bool {
        self.access.as_deref() == Some(ACCESS_PUBLIC)
    }
}

/// Resolves template items by id.
#[async_trait]
pub trait ItemResolver: Send + Sync {
    async fn resolve(
        &self,
        item_id: &str,
        portal_url: &str,
        token: Option<&str>,
    ) -> Result<PortalItem, PortalError>;
}

/// [`ItemResolver`] backed by the portal sharing REST API.
#[derive(Debug, Clone, Default)]
pub struct PortalClient {
    client: reqwest::Client,
}

impl PortalClient {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ItemResolver for PortalClient {
    /// Sends `GET {portal}/sharing/rest/content/items/{id}?f=json`, adding
    /// `token` as a query parameter when given.
    ///
    /// The portal reports a missing or inaccessible item with a 200 and an
    /// `{"error": {"message": ...}}` body, surfaced as
    /// [`PortalError::Item`].
    async fn resolve(
        &self,
        item_id: &str,
        portal_url: &str,
        token: Option<&str>,
    ) -> Result<PortalItem, PortalError> {
        let mut request = self
            .client
            .get(urls::portal_item_url(portal_url, item_id))
            .query(&[("f", "json")]);
        if let Some(token) = token {
            request = request.query(&[("token", token)]);
        }

        let response = request.send().await.map_err(ApiError::from)?;
        let body: serde_json::Value = parse_response(response).await?;

        if let Some(error) = body.get("error") {
            let message = error
                .get("message")
                .and_then(serde_json::Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| error.to_string());
            tracing::warn!(item_id, message = %message, "Portal rejected item lookup");
            return Err(PortalError::Item(message));
        }

        let item: PortalItem = serde_json::from_value(body)
            .map_err(|e| PortalError::Item(format!("Malformed portal item: {e}")))?;

        tracing::debug!(
            item_id,
            access = item.access.as_deref().unwrap_or("unknown"),
            "Resolved portal item",
        );
        Ok(item)
    }
}
