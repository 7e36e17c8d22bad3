//! URL derivation for the portal and the reporting service.
//!
//! Every address the client talks to is derived here from a base URL so
//! the wire layout lives in one place.

use crate::types::JobTicket;

/// Hosted reporting service root, used when a portal item carries no URL.
pub const DEFAULT_SERVICE_ROOT: &str = "https://apps.geocortex.com/reporting";

/// Public ArcGIS portal, used when the caller names no portal.
pub const DEFAULT_PORTAL_URL: &str = "https://www.arcgis.com";

/// Derive the service base URL from a portal item's `url` field.
///
/// Falls back to `fallback_root` when the item URL is missing or empty.
/// Surrounding slashes are trimmed before `/service` is appended.
pub fn service_url_from_item(item_url: Option<&str>, fallback_root: &str) -> String {
    let root = match item_url {
        Some(url) if !url.trim().is_empty() => url,
        _ => fallback_root,
    };
    format!("{}/service", root.trim().trim_matches('/'))
}

/// Normalise a portal URL (no trailing slash).
pub fn normalize_portal_url(portal_url: &str) -> &str {
    portal_url.trim().trim_end_matches('/')
}

/// Swap the transport scheme of a service URL for its WebSocket equivalent.
///
/// `https` maps to `wss` and `http` to `ws`; anything else is returned
/// unchanged.
pub fn push_url(service_url: &str) -> String {
    if let Some(rest) = service_url.strip_prefix("https://") {
        format!("wss://{rest}")
    } else if let Some(rest) = service_url.strip_prefix("http://") {
        format!("ws://{rest}")
    } else {
        service_url.to_string()
    }
}

/// `{portal}/sharing/rest/content/items/{item_id}`
pub fn portal_item_url(portal_url: &str, item_id: &str) -> String {
    format!(
        "{}/sharing/rest/content/items/{item_id}",
        normalize_portal_url(portal_url)
    )
}

/// `{service}/job/run`
pub fn run_url(service_url: &str) -> String {
    format!("{service_url}/job/run")
}

/// `{service}/auth/token/run`
pub fn token_url(service_url: &str) -> String {
    format!("{service_url}/auth/token/run")
}

/// `{service}/job/artifacts?ticket={ticket}`; also the push address once
/// passed through [`push_url`].
pub fn status_url(service_url: &str, ticket: &JobTicket) -> String {
    format!("{service_url}/job/artifacts?ticket={ticket}")
}

/// `{service}/job/result?ticket={ticket}&tag={tag}`
pub fn artifact_url(service_url: &str, ticket: &JobTicket, tag: &str) -> String {
    format!("{service_url}/job/result?ticket={ticket}&tag={tag}")
}

/// `{service}/job/logs?ticket={ticket}`
pub fn logs_url(service_url: &str, ticket: &JobTicket) -> String {
    format!("{service_url}/job/logs?ticket={ticket}")
}
