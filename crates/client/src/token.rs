//! Reporting token exchange.

use async_trait::async_trait;

use crate::api::ReportingApi;
use crate::error::ApiError;

/// Trades a portal token for a short-lived reporting service token.
#[async_trait]
pub trait TokenExchanger: Send + Sync {
    async fn exchange(&self, portal_token: &str, service_url: &str) -> Result<String, ApiError>;
}

/// [`TokenExchanger`] that calls the service's `/auth/token/run` endpoint.
#[derive(Debug, Clone, Default)]
pub struct HttpTokenExchanger {
    client: reqwest::Client,
}

impl HttpTokenExchanger {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl TokenExchanger for HttpTokenExchanger {
    async fn exchange(&self, portal_token: &str, service_url: &str) -> Result<String, ApiError> {
        ReportingApi::with_client(self.client.clone(), service_url.to_string())
            .exchange_token(portal_token)
            .await
    }
}
