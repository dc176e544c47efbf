//! Error types for resource handlers.
//!
//! Every variant renders as a user-facing summary naming the operation and
//! resource kind, followed by the underlying cause.

use std::fmt;

use splunkacs_client::{AcsError, ConfigError};
use splunkacs_core::{HecToken, IdError, Index};
use splunkacs_reconcile::{BudgetError, CancelReason, WaitError};
use thiserror::Error;

/// A result type using `ProviderError`.
pub type Result<T> = std::result::Result<T, ProviderError>;

/// What a handler was doing when an ACS call failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Creating a resource.
    Create,
    /// Reading a resource.
    Read,
    /// Updating a resource.
    Update,
    /// Deleting a resource.
    Delete,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Create => write!(f, "creating"),
            Self::Read => write!(f, "reading"),
            Self::Update => write!(f, "updating"),
            Self::Delete => write!(f, "deleting"),
        }
    }
}

/// Errors that can occur in resource handlers.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Deployment name or token could not be resolved.
    #[error("Invalid provider configuration: {0}")]
    Config(#[from] ConfigError),

    /// A wait budget is unusable.
    #[error("Invalid wait policy: {0}")]
    Policy(#[from] BudgetError),

    /// The configuration file could not be loaded.
    #[error("Unable to load configuration from {path}: {reason}")]
    ConfigFile {
        /// The file that was read.
        path: String,
        /// Why loading failed.
        reason: String,
    },

    /// The HTTP client could not be built.
    #[error("Unable to create Splunk Admin Config API client: {0}")]
    Client(#[source] AcsError),

    /// A resource name was rejected.
    #[error("Invalid resource name: {0}")]
    InvalidName(#[from] IdError),

    /// The change touches a field that cannot be updated in place.
    #[error("Cannot update {field} of {resource} '{name}' in place; the resource must be replaced")]
    RequiresReplace {
        /// Resource kind.
        resource: &'static str,
        /// Resource name.
        name: String,
        /// The immutable field.
        field: &'static str,
    },

    /// An ACS call failed.
    #[error("Unexpected error while {action} {resource}: {source}")]
    Api {
        /// What the handler was doing.
        action: Action,
        /// Resource kind.
        resource: &'static str,
        /// The client error.
        #[source]
        source: AcsError,
    },

    /// A HEC token write was accepted but did not converge.
    #[error("Encountered an error while waiting for HEC Token: {0}")]
    HecTokenWait(#[source] Box<WaitError<HecToken, AcsError>>),

    /// An index write was accepted but did not converge.
    #[error("Encountered an error while waiting for Index: {0}")]
    IndexWait(#[source] Box<WaitError<Index, AcsError>>),
}

impl ProviderError {
    pub(crate) const fn api(action: Action, resource: &'static str, source: AcsError) -> Self {
        Self::Api {
            action,
            resource,
            source,
        }
    }

    /// Returns `true` if ACS reported that the resource does not exist.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        match self {
            Self::Api { source, .. } => source.is_not_found(),
            _ => false,
        }
    }

    /// Returns `true` if retrying the whole operation might succeed.
    ///
    /// A wait that ran out of attempts or time is retriable; one the caller
    /// cancelled is not.
    #[must_use]
    pub fn is_retriable(&self) -> bool {
        match self {
            Self::Api { source, .. } => source.is_retriable(),
            Self::HecTokenWait(err) => wait_is_retriable(err),
            Self::IndexWait(err) => wait_is_retriable(err),
            _ => false,
        }
    }
}

const fn wait_is_retriable<S: fmt::Debug>(err: &WaitError<S, AcsError>) -> bool {
    matches!(
        err,
        WaitError::Exhausted { .. }
            | WaitError::Cancelled {
                reason: CancelReason::DeadlineElapsed,
                ..
            }
    )
}

impl From<WaitError<HecToken, AcsError>> for ProviderError {
    fn from(err: WaitError<HecToken, AcsError>) -> Self {
        Self::HecTokenWait(Box::new(err))
    }
}

impl From<WaitError<Index, AcsError>> for ProviderError {
    fn from(err: WaitError<Index, AcsError>) -> Self {
        Self::IndexWait(Box::new(err))
    }
}

#[cfg(test)]
mod tests {
    use splunkacs_reconcile::{PollTarget, WaitPhase};

    use super::*;

    #[test]
    fn api_error_summary() {
        let err = ProviderError::api(
            Action::Create,
            "HEC Token",
            AcsError::api(400, "defaultIndex is required"),
        );
        assert_eq!(
            err.to_string(),
            "Unexpected error while creating HEC Token: ACS returned HTTP 400: defaultIndex is required"
        );
        assert!(!err.is_not_found());
        assert!(!err.is_retriable());
    }

    #[test]
    fn not_found_passthrough() {
        let err = ProviderError::api(Action::Read, "Index", AcsError::api(404, "missing"));
        assert!(err.is_not_found());
    }

    #[test]
    fn wait_error_summary() {
        let err = ProviderError::from(WaitError::<Index, AcsError>::Exhausted {
            target: PollTarget::new("Index", "web_logs", WaitPhase::Create),
            attempts: 20,
            last_observed: None,
        });
        assert_eq!(
            err.to_string(),
            "Encountered an error while waiting for Index: Index 'web_logs' (create wait) did not converge after 20 attempts"
        );
        assert!(err.is_retriable());
    }

    #[test]
    fn only_budget_and_deadline_waits_are_retriable() {
        let target = || PollTarget::new("HEC Token", "ci-token", WaitPhase::Create);
        let cancelled = |reason| {
            ProviderError::from(WaitError::<HecToken, AcsError>::Cancelled {
                target: target(),
                attempts: 2,
                reason,
                last_observed: None,
            })
        };

        assert!(cancelled(CancelReason::DeadlineElapsed).is_retriable());
        assert!(!cancelled(CancelReason::Signal).is_retriable());

        let fetch = ProviderError::from(WaitError::<HecToken, AcsError>::Fetch {
            target: target(),
            source: AcsError::api(403, "forbidden"),
        });
        assert!(!fetch.is_retriable());
    }

    #[test]
    fn requires_replace_summary() {
        let err = ProviderError::RequiresReplace {
            resource: "Index",
            name: "web_logs".to_string(),
            field: "data_type",
        };
        assert_eq!(
            err.to_string(),
            "Cannot update data_type of Index 'web_logs' in place; the resource must be replaced"
        );
    }
}
