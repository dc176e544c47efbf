//! Provider entry point.
//!
//! [`AcsProvider`] resolves configuration once, builds one client, and hands
//! out resource handlers and data sources that share it.

use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;
use splunkacs_client::{AcsApi, AcsConfig, HttpAcsClient};

use crate::data_sources::{HecTokenDataSource, IndexDataSource, StackStatusDataSource};
use crate::error::{ProviderError, Result};
use crate::hec_token::HecTokenResource;
use crate::index::IndexResource;
use crate::policy::{WaitBudgets, WaitPolicy};

/// Full provider configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProviderConfig {
    /// ACS connection settings.
    #[serde(flatten)]
    pub acs: AcsConfig,

    /// Convergence wait budgets.
    #[serde(default)]
    pub wait: WaitPolicy,
}

impl ProviderConfig {
    /// Load a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::ConfigFile` if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let config_error = |reason: String| ProviderError::ConfigFile {
            path: path.display().to_string(),
            reason,
        };

        let raw = std::fs::read_to_string(path).map_err(|e| config_error(e.to_string()))?;
        serde_json::from_str(&raw).map_err(|e| config_error(e.to_string()))
    }
}

/// Configured access to one ACS deployment.
pub struct AcsProvider<C: AcsApi + ?Sized = HttpAcsClient> {
    client: Arc<C>,
    budgets: WaitBudgets,
}

impl AcsProvider<HttpAcsClient> {
    /// Resolve `config` against the environment and build an HTTP client.
    ///
    /// # Errors
    ///
    /// Returns an error if the deployment name or token is missing, a wait
    /// budget is invalid, or the HTTP client cannot be built.
    pub fn configure(config: ProviderConfig) -> Result<Self> {
        Self::configure_with(config, |key| std::env::var(key).ok())
    }

    /// Like [`configure`](Self::configure), with `lookup` in place of the
    /// process environment.
    ///
    /// # Errors
    ///
    /// See [`configure`](Self::configure).
    pub fn configure_with<F>(config: ProviderConfig, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let budgets = config.wait.budgets()?;
        let resolved = config.acs.resolve_with(lookup)?;
        let client = HttpAcsClient::new(&resolved).map_err(ProviderError::Client)?;

        tracing::debug!(
            deployment = %resolved.deployment_name,
            base_url = %resolved.base_url,
            "Configured ACS client"
        );

        Ok(Self {
            client: Arc::new(client),
            budgets,
        })
    }
}

impl<C: AcsApi + ?Sized> AcsProvider<C> {
    /// Wrap an existing client.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::Policy` if a wait budget is invalid.
    pub fn with_client(client: Arc<C>, policy: &WaitPolicy) -> Result<Self> {
        Ok(Self {
            client,
            budgets: policy.budgets()?,
        })
    }

    /// The shared client.
    #[must_use]
    pub fn client(&self) -> &C {
        &self.client
    }

    /// Validated wait budgets.
    #[must_use]
    pub const fn budgets(&self) -> &WaitBudgets {
        &self.budgets
    }

    /// HEC token handler.
    #[must_use]
    pub fn hec_tokens(&self) -> HecTokenResource<C> {
        HecTokenResource::new(
            Arc::clone(&self.client),
            self.budgets.hec_token_create,
            self.budgets.hec_token_update,
        )
    }

    /// Index handler.
    #[must_use]
    pub fn indexes(&self) -> IndexResource<C> {
        IndexResource::new(Arc::clone(&self.client), self.budgets.index)
    }

    /// HEC token lookup.
    #[must_use]
    pub fn hec_token_data_source(&self) -> HecTokenDataSource<C> {
        HecTokenDataSource::new(Arc::clone(&self.client))
    }

    /// Index lookup.
    #[must_use]
    pub fn index_data_source(&self) -> IndexDataSource<C> {
        IndexDataSource::new(Arc::clone(&self.client))
    }

    /// Stack status lookup.
    #[must_use]
    pub fn stack_status_data_source(&self) -> StackStatusDataSource<C> {
        StackStatusDataSource::new(Arc::clone(&self.client))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use splunkacs_client::{ConfigError, MockAcsClient, AUTH_TOKEN_ENV, DEPLOYMENT_NAME_ENV};
    use splunkacs_core::{IndexDataType, IndexSpec, ResourceName};
    use splunkacs_reconcile::BudgetError;
    use tokio_util::sync::CancellationToken;

    use super::*;
    use crate::policy::BudgetConfig;

    #[test]
    fn configure_from_environment() {
        let provider = AcsProvider::configure_with(ProviderConfig::default(), |key| match key {
            DEPLOYMENT_NAME_ENV => Some("acme".to_string()),
            AUTH_TOKEN_ENV => Some("secret".to_string()),
            _ => None,
        })
        .unwrap();

        assert_eq!(
            provider.client().base_url(),
            "https://admin.splunk.com/acme/adminconfig/v2"
        );
        assert_eq!(provider.budgets().hec_token_update.max_attempts(), 10);
    }

    #[test]
    fn configure_reports_missing_token() {
        let config = ProviderConfig {
            acs: AcsConfig {
                deployment_name: Some("acme".to_string()),
                ..AcsConfig::default()
            },
            ..ProviderConfig::default()
        };

        let err = AcsProvider::configure_with(config, |_| None).err().unwrap();
        assert!(matches!(
            err,
            ProviderError::Config(ConfigError::Missing { field: "token", .. })
        ));
    }

    #[test]
    fn invalid_policy_rejected() {
        let policy = WaitPolicy {
            hec_token_create: BudgetConfig {
                max_attempts: 0,
                interval_seconds: 1,
            },
            ..WaitPolicy::default()
        };
        let err = AcsProvider::with_client(Arc::new(MockAcsClient::new()), &policy)
            .err()
            .unwrap();
        assert!(matches!(err, ProviderError::Policy(BudgetError::ZeroAttempts)));
    }

    #[test]
    fn loads_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"deployment_name": "acme", "wait": {{"index": {{"max_attempts": 5, "interval_seconds": 2}}}}}}"#
        )
        .unwrap();

        let config = ProviderConfig::from_file(file.path()).unwrap();
        assert_eq!(config.acs.deployment_name.as_deref(), Some("acme"));
        assert_eq!(config.wait.index.max_attempts, 5);
        assert_eq!(config.wait.hec_token_update.max_attempts, 10);
    }

    #[test]
    fn bad_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        let err = ProviderConfig::from_file(file.path()).unwrap_err();
        assert!(matches!(err, ProviderError::ConfigFile { .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn handlers_share_client() {
        let mock = Arc::new(MockAcsClient::new());
        let provider = AcsProvider::with_client(Arc::clone(&mock), &WaitPolicy::default()).unwrap();
        let spec = IndexSpec {
            name: ResourceName::new("metrics").unwrap(),
            data_type: IndexDataType::Metric,
            searchable_days: 30,
            max_data_size_mb: 0,
        };

        provider
            .indexes()
            .create(&spec, &CancellationToken::new())
            .await
            .unwrap();

        let index = provider.index_data_source().read(&spec.name).await.unwrap();
        assert_eq!(index.spec, spec);
        assert!(mock.stored_index(&spec.name).is_some());
    }
}
