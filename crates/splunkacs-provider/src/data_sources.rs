//! Read-only lookups.

use std::sync::Arc;

use serde::Serialize;
use splunkacs_client::AcsApi;
use splunkacs_core::{HecToken, Index, ResourceName, StackStatus};

use crate::error::{Action, ProviderError, Result};
use crate::hec_token::HEC_TOKEN;
use crate::index::INDEX;

/// Looks up a HEC token by name.
pub struct HecTokenDataSource<C: AcsApi + ?Sized> {
    client: Arc<C>,
}

impl<C: AcsApi + ?Sized> HecTokenDataSource<C> {
    /// Create a data source.
    #[must_use]
    pub const fn new(client: Arc<C>) -> Self {
        Self { client }
    }

    /// Fetch the token.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::Api` if the token cannot be read.
    pub async fn read(&self, name: &ResourceName) -> Result<HecToken> {
        self.client
            .get_hec_token(name)
            .await
            .map_err(|source| ProviderError::api(Action::Read, HEC_TOKEN, source))
    }
}

/// Looks up an index by name.
pub struct IndexDataSource<C: AcsApi + ?Sized> {
    client: Arc<C>,
}

impl<C: AcsApi + ?Sized> IndexDataSource<C> {
    /// Create a data source.
    #[must_use]
    pub const fn new(client: Arc<C>) -> Self {
        Self { client }
    }

    /// Fetch the index.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::Api` if the index cannot be read.
    pub async fn read(&self, name: &ResourceName) -> Result<Index> {
        self.client
            .get_index(name)
            .await
            .map_err(|source| ProviderError::api(Action::Read, INDEX, source))
    }
}

/// Stack status, identified by the API root it was read from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StackStatusState {
    /// The ACS API root.
    pub id: String,
    /// Stack type and version.
    #[serde(flatten)]
    pub status: StackStatus,
}

/// Reports the type and version of the deployment's stack.
pub struct StackStatusDataSource<C: AcsApi + ?Sized> {
    client: Arc<C>,
}

impl<C: AcsApi + ?Sized> StackStatusDataSource<C> {
    /// Create a data source.
    #[must_use]
    pub const fn new(client: Arc<C>) -> Self {
        Self { client }
    }

    /// Fetch the stack status.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::Api` if the status cannot be read.
    pub async fn read(&self) -> Result<StackStatusState> {
        let status = self
            .client
            .get_stack_status()
            .await
            .map_err(|source| ProviderError::api(Action::Read, "Stack Status", source))?;

        Ok(StackStatusState {
            id: self.client.base_url().to_string(),
            status,
        })
    }
}

#[cfg(test)]
mod tests {
    use splunkacs_client::MockAcsClient;
    use splunkacs_core::HecTokenSpec;

    use super::*;

    #[tokio::test]
    async fn stack_status_uses_api_root_as_id() {
        let mock = Arc::new(MockAcsClient::new().with_stack_status(StackStatus {
            stack_type: "victoria".to_string(),
            version: "9.1.2308.203".to_string(),
        }));

        let state = StackStatusDataSource::new(mock).read().await.unwrap();

        assert_eq!(state.id, MockAcsClient::BASE_URL);
        assert_eq!(state.status.stack_type, "victoria");

        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["stackVersion"], "9.1.2308.203");
        assert_eq!(json["id"], MockAcsClient::BASE_URL);
    }

    #[tokio::test]
    async fn stack_status_error() {
        let mock = Arc::new(MockAcsClient::new());
        let err = StackStatusDataSource::new(mock).read().await.unwrap_err();
        assert!(err
            .to_string()
            .starts_with("Unexpected error while reading Stack Status"));
    }

    #[tokio::test]
    async fn lookups_by_name() {
        let mock = Arc::new(MockAcsClient::new());
        let name = ResourceName::new("ci-token").unwrap();
        mock.insert_hec_token(HecToken::new(HecTokenSpec::new(name.clone(), "main"), "t"));

        let token = HecTokenDataSource::new(Arc::clone(&mock))
            .read(&name)
            .await
            .unwrap();
        assert_eq!(token.spec.default_index, "main");

        let err = IndexDataSource::new(mock).read(&name).await.unwrap_err();
        assert!(err.is_not_found());
    }
}
