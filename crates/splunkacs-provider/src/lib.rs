//! Resource handlers for Splunk Cloud ACS.
//!
//! Each handler issues one ACS write and then waits, with a bounded number
//! of reads, until the deployment reports the change. ACS applies writes
//! asynchronously, so a write that returned success is not yet visible.
//!
//! | resource  | create wait              | update wait                    |
//! |-----------|--------------------------|--------------------------------|
//! | HEC token | exists                   | equals planned (404 is fatal)  |
//! | index     | exists                   | exists, then equals planned    |
//!
//! # Example
//!
//! ```no_run
//! use splunkacs_core::{HecTokenSpec, ResourceName};
//! use splunkacs_provider::{AcsProvider, ProviderConfig};
//! use splunkacs_reconcile::CancellationToken;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let provider = AcsProvider::configure(ProviderConfig::default())?;
//! let spec = HecTokenSpec::new(ResourceName::new("ci-token")?, "main");
//!
//! let token = provider
//!     .hec_tokens()
//!     .create(&spec, &CancellationToken::new())
//!     .await?;
//! println!("created {}", token.name());
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod data_sources;
pub mod error;
pub mod hec_token;
pub mod index;
pub mod policy;
pub mod provider;

pub use data_sources::{
    HecTokenDataSource, IndexDataSource, StackStatusDataSource, StackStatusState,
};
pub use error::{Action, ProviderError, Result};
pub use hec_token::{HecTokenResource, HEC_TOKEN};
pub use index::{IndexResource, INDEX};
pub use policy::{BudgetConfig, WaitBudgets, WaitPolicy};
pub use provider::{AcsProvider, ProviderConfig};
