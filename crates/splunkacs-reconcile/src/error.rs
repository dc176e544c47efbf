//! Error types for convergence waits.

use std::fmt;

use thiserror::Error;

use crate::outcome::{CancelReason, PollTarget};

/// Invalid retry budget.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BudgetError {
    /// A budget must allow at least one fetch.
    #[error("max_attempts must be greater than 0")]
    ZeroAttempts,
}

/// A wait that ended without convergence, with the resource and phase it was for.
///
/// `S` is the remote state type (kept for diagnosis), `E` the fetch error type,
/// which is propagated unchanged as the error source.
#[derive(Debug, Error)]
pub enum WaitError<S: fmt::Debug, E: std::error::Error + 'static> {
    /// A fetch failed in a way the active predicate does not tolerate.
    #[error("unexpected error while waiting for {target}: {source}")]
    Fetch {
        /// The resource and phase being waited on.
        target: PollTarget,
        /// The originating fetch error.
        #[source]
        source: E,
    },

    /// The retry budget ran out before the predicate accepted a fetch.
    #[error("{target} did not converge after {attempts} attempts")]
    Exhausted {
        /// The resource and phase being waited on.
        target: PollTarget,
        /// Number of fetches performed.
        attempts: u32,
        /// The last state observed, if the resource was ever found.
        last_observed: Option<S>,
    },

    /// The caller's cancellation signal fired or the deadline elapsed.
    #[error("wait for {target} {reason} after {attempts} attempts")]
    Cancelled {
        /// The resource and phase being waited on.
        target: PollTarget,
        /// Number of fetches performed before stopping.
        attempts: u32,
        /// Why the wait stopped.
        reason: CancelReason,
        /// The last state observed, if the resource was ever found.
        last_observed: Option<S>,
    },
}

impl<S: fmt::Debug, E: std::error::Error + 'static> WaitError<S, E> {
    /// The resource and phase this wait was for.
    #[must_use]
    pub const fn target(&self) -> &PollTarget {
        match self {
            Self::Fetch { target, .. }
            | Self::Exhausted { target, .. }
            | Self::Cancelled { target, .. } => target,
        }
    }

    /// Number of fetches performed, when known.
    #[must_use]
    pub const fn attempts(&self) -> Option<u32> {
        match self {
            Self::Fetch { .. } => None,
            Self::Exhausted { attempts, .. } | Self::Cancelled { attempts, .. } => Some(*attempts),
        }
    }

    /// The last observed remote state, if any.
    #[must_use]
    pub const fn last_observed(&self) -> Option<&S> {
        match self {
            Self::Fetch { .. } => None,
            Self::Exhausted { last_observed, .. } | Self::Cancelled { last_observed, .. } => {
                last_observed.as_ref()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error as _;
    use std::io;

    use super::*;
    use crate::outcome::WaitPhase;

    fn target() -> PollTarget {
        PollTarget::new("HEC token", "ci-token", WaitPhase::Update)
    }

    #[test]
    fn fetch_error_keeps_source() {
        let err: WaitError<(), io::Error> = WaitError::Fetch {
            target: target(),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "forbidden"),
        };

        assert_eq!(
            err.to_string(),
            "unexpected error while waiting for HEC token 'ci-token' (update wait): forbidden"
        );
        let source = err.source().unwrap();
        assert_eq!(source.to_string(), "forbidden");
        assert!(err.attempts().is_none());
    }

    #[test]
    fn exhausted_reports_attempts_and_state() {
        let err: WaitError<&str, io::Error> = WaitError::Exhausted {
            target: target(),
            attempts: 10,
            last_observed: Some("use_ack=true"),
        };

        assert_eq!(
            err.to_string(),
            "HEC token 'ci-token' (update wait) did not converge after 10 attempts"
        );
        assert_eq!(err.attempts(), Some(10));
        assert_eq!(err.last_observed(), Some(&"use_ack=true"));
        assert_eq!(err.target().identity(), "ci-token");
    }

    #[test]
    fn cancelled_names_reason() {
        let err: WaitError<(), io::Error> = WaitError::Cancelled {
            target: target(),
            attempts: 2,
            reason: CancelReason::DeadlineElapsed,
            last_observed: None,
        };

        assert_eq!(
            err.to_string(),
            "wait for HEC token 'ci-token' (update wait) timed out after 2 attempts"
        );
    }
}
