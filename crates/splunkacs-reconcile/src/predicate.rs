//! Convergence predicates.
//!
//! A predicate is a pure decision over one fetch outcome. The three variants
//! encode the three ways a write is confirmed:
//!
//! | variant                  | not found | found, no expected | found, expected      |
//! |--------------------------|-----------|--------------------|----------------------|
//! | `ExistenceOnly`          | continue  | converged          | converged            |
//! | `FieldEquality`          | fatal     | n/a                | converged / continue |
//! | `ExistenceThenEquality`  | continue  | converged          | converged / continue |
//!
//! Every other fetch error is fatal, throttling included. A budget may opt in
//! to retrying throttled fetches; the poller handles that before a predicate
//! sees the outcome.

use std::fmt;

use crate::outcome::FetchOutcome;

/// Compare a fetched remote state against an expected projection.
///
/// Implementations compare only the fields the caller controls; server-computed
/// fields such as token values and usage counters must be ignored.
pub trait Matches<Expected: ?Sized> {
    /// Returns true if every projected field equals the expected value.
    fn matches(&self, expected: &Expected) -> bool;
}

/// How a poll decides it is done.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConvergencePredicate<X> {
    /// Converge as soon as the resource exists.
    ExistenceOnly,
    /// Converge when the resource's fields equal `X`. The resource is assumed
    /// to exist already, so "not found" is fatal.
    FieldEquality(X),
    /// Wait for the resource to exist, then (if given) for its fields to equal `X`.
    ExistenceThenEquality(Option<X>),
}

impl<X> ConvergencePredicate<X> {
    /// Decide what a single fetch outcome means for the poll.
    pub fn evaluate<S, E>(&self, outcome: FetchOutcome<S, E>) -> Verdict<S, E>
    where
        S: Matches<X>,
    {
        match (self, outcome) {
            (_, FetchOutcome::Fatal(error) | FetchOutcome::Transient(error))
            | (Self::FieldEquality(_), FetchOutcome::NotFound(error)) => Verdict::Fatal(error),
            (Self::ExistenceOnly | Self::ExistenceThenEquality(_), FetchOutcome::NotFound(_)) => {
                Verdict::Continue {
                    reason: PendingReason::NotFound,
                    observed: None,
                }
            }
            (Self::ExistenceOnly | Self::ExistenceThenEquality(None), FetchOutcome::Found(state)) => {
                Verdict::Converged(state)
            }
            (
                Self::FieldEquality(expected) | Self::ExistenceThenEquality(Some(expected)),
                FetchOutcome::Found(state),
            ) => {
                if state.matches(expected) {
                    Verdict::Converged(state)
                } else {
                    Verdict::Continue {
                        reason: PendingReason::Mismatch,
                        observed: Some(state),
                    }
                }
            }
        }
    }
}

/// Decision for one fetch.
#[derive(Debug)]
pub enum Verdict<S, E> {
    /// Stop polling; the write is visible.
    Converged(S),
    /// Keep polling if budget remains.
    Continue {
        /// Why the fetch was not accepted.
        reason: PendingReason,
        /// The state that was fetched but did not match, if any.
        observed: Option<S>,
    },
    /// Stop polling with this error.
    Fatal(E),
}

/// Why a fetch did not converge but is worth retrying.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingReason {
    /// The resource is not visible yet.
    NotFound,
    /// The resource exists but some compared field still differs.
    Mismatch,
    /// The service asked us to back off and the budget retries throttling.
    Transient,
}

impl fmt::Display for PendingReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "not yet visible"),
            Self::Mismatch => write!(f, "fields not yet converged"),
            Self::Transient => write!(f, "transient error"),
        }
    }
}
