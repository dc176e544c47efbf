//! Core types for the Splunk Admin Config Service adapter.
//!
//! This crate provides the typed resources shared by the client and the
//! resource handlers:
//!
//! - **Identifiers**: validated resource names
//! - **HEC tokens**: [`HecTokenSpec`] (what the caller controls) and [`HecToken`]
//!   (the remote state, including the server-issued token value)
//! - **Indexes**: [`IndexSpec`] and [`Index`], plus the [`IndexPatch`] update body
//! - **Stack status**: [`StackStatus`]
//!
//! The remote types implement [`splunkacs_reconcile::Matches`] against their
//! spec types, which is what convergence waits compare.
//!
//! # Example
//!
//! ```
//! use splunkacs_core::{HecToken, HecTokenSpec, ResourceName};
//! use splunkacs_reconcile::Matches;
//!
//! let spec = HecTokenSpec::new(ResourceName::new("ci-token").unwrap(), "main");
//! let remote = HecToken::new(spec.clone(), "3f1b0c2e-0000-4000-8000-000000000000");
//!
//! assert!(remote.matches(&spec));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod hec_token;
pub mod ids;
pub mod index;
pub mod stack;

pub use error::{CoreError, Result};
pub use hec_token::{HecToken, HecTokenSpec};
pub use ids::{IdError, ResourceName};
pub use index::{Index, IndexDataType, IndexPatch, IndexSpec};
pub use stack::StackStatus;
