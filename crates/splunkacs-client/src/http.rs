//! `reqwest` implementation of [`AcsApi`].

use std::fmt;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use splunkacs_core::{HecToken, HecTokenSpec, Index, IndexPatch, IndexSpec, ResourceName, StackStatus};

use crate::api::AcsApi;
use crate::config::ResolvedConfig;
use crate::error::{AcsError, Result};

/// HTTP client for one ACS deployment.
#[derive(Clone)]
pub struct HttpAcsClient {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

impl HttpAcsClient {
    /// Build a client from resolved configuration.
    ///
    /// # Errors
    ///
    /// Returns `AcsError::Client` if the HTTP client cannot be created.
    pub fn new(config: &ResolvedConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(AcsError::Client)?;

        Ok(Self::with_client(client, config))
    }

    /// Build a client around an existing `reqwest::Client`.
    #[must_use]
    pub fn with_client(client: reqwest::Client, config: &ResolvedConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.clone(),
            token: config.token.clone(),
        }
    }

    fn hec_tokens_url(&self) -> String {
        format!("{}/inputs/http-event-collectors", self.base_url)
    }

    fn hec_token_url(&self, name: &ResourceName) -> String {
        format!("{}/{name}", self.hec_tokens_url())
    }

    fn indexes_url(&self) -> String {
        format!("{}/indexes", self.base_url)
    }

    fn index_url(&self, name: &ResourceName) -> String {
        format!("{}/{name}", self.indexes_url())
    }

    /// Send a request, turning transport failures and non-2xx answers into errors.
    async fn send(&self, request: reqwest::RequestBuilder, url: &str) -> Result<reqwest::Response> {
        let response = request
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|source| AcsError::Http {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let (code, message) = match serde_json::from_str::<ErrorResponse>(&body) {
            Ok(err) => (err.code, err.message),
            Err(_) => (
                None,
                status
                    .canonical_reason()
                    .map_or_else(|| format!("status {status}"), str::to_string),
            ),
        };

        tracing::debug!(
            url = %url,
            status = status.as_u16(),
            code = ?code,
            message = %message,
            "ACS request failed"
        );

        Err(AcsError::Api {
            status: status.as_u16(),
            code,
            message,
        })
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response, url: &str) -> Result<T> {
        let body = response.text().await.map_err(|source| AcsError::Http {
            url: url.to_string(),
            source,
        })?;
        serde_json::from_str(&body).map_err(|source| AcsError::Decode { source })
    }
}

impl fmt::Debug for HttpAcsClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpAcsClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

/// Error body returned by ACS.
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    code: Option<String>,
    message: String,
}

/// `GET inputs/http-event-collectors/{name}` response.
#[derive(Debug, Deserialize)]
struct HecTokenEnvelope {
    #[serde(rename = "http-event-collector")]
    http_event_collector: HecToken,
}

/// `GET status` response.
#[derive(Debug, Deserialize)]
struct StatusEnvelope {
    infrastructure: StackStatus,
}

#[async_trait]
impl AcsApi for HttpAcsClient {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn create_hec_token(&self, spec: &HecTokenSpec) -> Result<()> {
        let url = self.hec_tokens_url();
        self.send(self.client.post(&url).json(spec), &url).await?;
        tracing::debug!(hec_token = %spec.name, "Created HEC token");
        Ok(())
    }

    async fn get_hec_token(&self, name: &ResourceName) -> Result<HecToken> {
        let url = self.hec_token_url(name);
        let response = self.send(self.client.get(&url), &url).await?;
        let envelope: HecTokenEnvelope = Self::decode(response, &url).await?;
        Ok(envelope.http_event_collector)
    }

    async fn update_hec_token(&self, spec: &HecTokenSpec) -> Result<()> {
        let url = self.hec_token_url(&spec.name);
        self.send(self.client.put(&url).json(spec), &url).await?;
        tracing::debug!(hec_token = %spec.name, "Updated HEC token");
        Ok(())
    }

    async fn delete_hec_token(&self, name: &ResourceName) -> Result<()> {
        let url = self.hec_token_url(name);
        self.send(self.client.delete(&url), &url).await?;
        tracing::debug!(hec_token = %name, "Deleted HEC token");
        Ok(())
    }

    async fn create_index(&self, spec: &IndexSpec) -> Result<()> {
        let url = self.indexes_url();
        self.send(self.client.post(&url).json(spec), &url).await?;
        tracing::debug!(index = %spec.name, "Created index");
        Ok(())
    }

    async fn get_index(&self, name: &ResourceName) -> Result<Index> {
        let url = self.index_url(name);
        let response = self.send(self.client.get(&url), &url).await?;
        Self::decode(response, &url).await
    }

    async fn update_index(&self, name: &ResourceName, patch: &IndexPatch) -> Result<()> {
        let url = self.index_url(name);
        self.send(self.client.patch(&url).json(patch), &url).await?;
        tracing::debug!(index = %name, "Updated index");
        Ok(())
    }

    async fn delete_index(&self, name: &ResourceName) -> Result<()> {
        let url = self.index_url(name);
        self.send(self.client.delete(&url), &url).await?;
        tracing::debug!(index = %name, "Deleted index");
        Ok(())
    }

    async fn get_stack_status(&self) -> Result<StackStatus> {
        let url = format!("{}/status", self.base_url);
        let response = self.send(self.client.get(&url), &url).await?;
        let envelope: StatusEnvelope = Self::decode(response, &url).await?;
        Ok(envelope.infrastructure)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn config() -> ResolvedConfig {
        ResolvedConfig {
            deployment_name: "acme".to_string(),
            token: "secret-token".to_string(),
            base_url: "https://admin.splunk.com/acme/adminconfig/v2".to_string(),
            request_timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(5),
        }
    }

    #[test]
    fn http_client_creation() {
        let client = HttpAcsClient::new(&config()).unwrap();
        assert_eq!(
            client.base_url(),
            "https://admin.splunk.com/acme/adminconfig/v2"
        );
        let debug = format!("{client:?}");
        assert!(debug.contains("HttpAcsClient"));
        assert!(!debug.contains("secret-token"));
    }

    #[test]
    fn resource_urls() {
        let client = HttpAcsClient::new(&config()).unwrap();
        let name = ResourceName::new("web_logs").unwrap();
        assert_eq!(
            client.index_url(&name),
            "https://admin.splunk.com/acme/adminconfig/v2/indexes/web_logs"
        );
        assert_eq!(
            client.hec_token_url(&name),
            "https://admin.splunk.com/acme/adminconfig/v2/inputs/http-event-collectors/web_logs"
        );
    }
}
