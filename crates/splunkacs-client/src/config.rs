//! ACS client configuration.
//!
//! Explicit values win; unset values fall back to the `SPLUNK_DEPLOYMENT_NAME`
//! and `SPLUNK_AUTH_TOKEN` environment variables.

use std::fmt;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

/// Environment variable holding the deployment (stack) name.
pub const DEPLOYMENT_NAME_ENV: &str = "SPLUNK_DEPLOYMENT_NAME";

/// Environment variable holding the ACS bearer token.
pub const AUTH_TOKEN_ENV: &str = "SPLUNK_AUTH_TOKEN";

/// Public ACS endpoint.
pub const DEFAULT_ACS_HOST: &str = "https://admin.splunk.com";

/// Unresolved client configuration, as given by the user.
#[derive(Clone, Deserialize)]
pub struct AcsConfig {
    /// Splunk Cloud deployment (stack) name.
    #[serde(default)]
    pub deployment_name: Option<String>,

    /// ACS authentication token.
    #[serde(default)]
    pub token: Option<String>,

    /// ACS host override, e.g. for a proxy.
    #[serde(default)]
    pub base_url: Option<String>,

    /// Request timeout in seconds.
    #[serde(default = "AcsConfig::default_request_timeout")]
    pub request_timeout_seconds: u64,

    /// Connect timeout in seconds.
    #[serde(default = "AcsConfig::default_connect_timeout")]
    pub connect_timeout_seconds: u64,
}

impl AcsConfig {
    const fn default_request_timeout() -> u64 {
        30
    }

    const fn default_connect_timeout() -> u64 {
        5
    }

    /// Resolve against the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the deployment name or token is missing or empty.
    pub fn resolve(self) -> Result<ResolvedConfig, ConfigError> {
        self.resolve_with(|key| std::env::var(key).ok())
    }

    /// Resolve using `lookup` in place of the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the deployment name or token is missing or empty.
    pub fn resolve_with<F>(self, lookup: F) -> Result<ResolvedConfig, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let deployment_name = required(
            self.deployment_name,
            "deployment_name",
            DEPLOYMENT_NAME_ENV,
            &lookup,
        )?;
        let token = required(self.token, "token", AUTH_TOKEN_ENV, &lookup)?;

        let host = self
            .base_url
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| DEFAULT_ACS_HOST.to_string());
        let base_url = format!(
            "{}/{deployment_name}/adminconfig/v2",
            host.trim_end_matches('/')
        );

        Ok(ResolvedConfig {
            deployment_name,
            token,
            base_url,
            request_timeout: Duration::from_secs(self.request_timeout_seconds),
            connect_timeout: Duration::from_secs(self.connect_timeout_seconds),
        })
    }
}

impl Default for AcsConfig {
    fn default() -> Self {
        Self {
            deployment_name: None,
            token: None,
            base_url: None,
            request_timeout_seconds: Self::default_request_timeout(),
            connect_timeout_seconds: Self::default_connect_timeout(),
        }
    }
}

impl fmt::Debug for AcsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AcsConfig")
            .field("deployment_name", &self.deployment_name)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("request_timeout_seconds", &self.request_timeout_seconds)
            .field("connect_timeout_seconds", &self.connect_timeout_seconds)
            .finish()
    }
}

fn required<F>(
    explicit: Option<String>,
    field: &'static str,
    env_var: &'static str,
    lookup: &F,
) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match explicit.or_else(|| lookup(env_var)) {
        None => Err(ConfigError::Missing { field, env_var }),
        Some(value) if value.trim().is_empty() => Err(ConfigError::Empty { field, env_var }),
        Some(value) => Ok(value),
    }
}

/// Complete client configuration.
#[derive(Clone)]
pub struct ResolvedConfig {
    /// Splunk Cloud deployment (stack) name.
    pub deployment_name: String,
    /// ACS authentication token.
    pub token: String,
    /// API root, e.g. `https://admin.splunk.com/acme/adminconfig/v2`.
    pub base_url: String,
    /// Request timeout.
    pub request_timeout: Duration,
    /// Connect timeout.
    pub connect_timeout: Duration,
}

impl fmt::Debug for ResolvedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedConfig")
            .field("deployment_name", &self.deployment_name)
            .field("token", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("request_timeout", &self.request_timeout)
            .field("connect_timeout", &self.connect_timeout)
            .finish()
    }
}

/// A required setting could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Neither the explicit value nor the environment variable is set.
    #[error("missing {field}: set it in the configuration or use the {env_var} environment variable")]
    Missing {
        /// Configuration field name.
        field: &'static str,
        /// Environment variable consulted as fallback.
        env_var: &'static str,
    },

    /// The value is set but empty.
    #[error("empty {field}: the value set in the configuration or in {env_var} must not be empty")]
    Empty {
        /// Configuration field name.
        field: &'static str,
        /// Environment variable consulted as fallback.
        env_var: &'static str,
    },
}
