//! HTTP client for the Splunk Cloud Admin Config Service (ACS).
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐     ┌──────────────────┐
//! │  resource        │────▶│     AcsApi       │
//! │  handlers        │     │     (trait)      │
//! └──────────────────┘     └────────┬─────────┘
//!                                   │
//!                 ┌─────────────────┴─────────────────┐
//!        ┌────────▼─────────┐              ┌──────────▼───────┐
//!        │  HttpAcsClient   │              │  MockAcsClient   │
//!        │  (reqwest)       │              │  (test-utils)    │
//!        └────────┬─────────┘              └──────────────────┘
//!                 │ HTTPS, bearer token
//!        ┌────────▼─────────┐
//!        │ admin.splunk.com │
//!        └──────────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use splunkacs_client::{AcsApi, AcsConfig, HttpAcsClient};
//! use splunkacs_core::ResourceName;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! // Reads SPLUNK_DEPLOYMENT_NAME and SPLUNK_AUTH_TOKEN.
//! let config = AcsConfig::default().resolve()?;
//! let client = HttpAcsClient::new(&config)?;
//!
//! let index = client.get_index(&ResourceName::new("main")?).await?;
//! println!("{} keeps data for {} days", index.name(), index.spec.searchable_days);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod api;
pub mod config;
pub mod error;
pub mod http;

#[cfg(any(test, feature = "test-utils"))]
pub mod mock;

pub use api::{fetch_outcome, AcsApi};
pub use config::{AcsConfig, ConfigError, ResolvedConfig, AUTH_TOKEN_ENV, DEPLOYMENT_NAME_ENV};
pub use error::{AcsError, Result};
pub use http::HttpAcsClient;

#[cfg(any(test, feature = "test-utils"))]
pub use mock::{MockAcsClient, MockCall};
