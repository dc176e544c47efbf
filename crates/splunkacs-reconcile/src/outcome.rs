//! Inputs and results of a single convergence poll.

use std::fmt;

use crate::error::WaitError;

/// Classified result of one fetch against the remote API.
///
/// The caller builds this from its client's response; only the caller knows
/// which status codes mean "not found" or "try again".
#[derive(Debug)]
pub enum FetchOutcome<S, E> {
    /// The resource exists; carries the full decoded remote state.
    Found(S),
    /// The resource is not (yet) visible.
    NotFound(E),
    /// The request was throttled or the service was briefly unavailable.
    Transient(E),
    /// Any other failure.
    Fatal(E),
}

/// Terminal result of a poll.
#[derive(Debug)]
pub enum PollOutcome<S, E> {
    /// The predicate accepted a fetched state.
    Converged(S),
    /// Every attempt in the budget was used without convergence.
    Exhausted {
        /// Number of fetches performed (equal to the budget's `max_attempts`).
        attempts: u32,
        /// The last state observed, if the resource was ever found.
        last_observed: Option<S>,
    },
    /// A fetch failed in a way the predicate does not tolerate.
    Fatal(E),
    /// The cancellation signal fired or the deadline elapsed.
    Cancelled {
        /// Number of fetches performed before stopping.
        attempts: u32,
        /// Why the poll stopped.
        reason: CancelReason,
        /// The last state observed, if the resource was ever found.
        last_observed: Option<S>,
    },
}

impl<S, E> PollOutcome<S, E> {
    /// Returns true if the poll converged.
    #[must_use]
    pub const fn is_converged(&self) -> bool {
        matches!(self, Self::Converged(_))
    }

    /// Convert into a `Result`, attaching the resource and phase to failures.
    ///
    /// # Errors
    ///
    /// Returns the matching `WaitError` variant for every non-converged outcome.
    pub fn into_result(self, target: PollTarget) -> Result<S, WaitError<S, E>>
    where
        S: fmt::Debug,
        E: std::error::Error + 'static,
    {
        match self {
            Self::Converged(state) => Ok(state),
            Self::Exhausted {
                attempts,
                last_observed,
            } => Err(WaitError::Exhausted {
                target,
                attempts,
                last_observed,
            }),
            Self::Fatal(source) => Err(WaitError::Fetch { target, source }),
            Self::Cancelled {
                attempts,
                reason,
                last_observed,
            } => Err(WaitError::Cancelled {
                target,
                attempts,
                reason,
                last_observed,
            }),
        }
    }
}

/// Why a poll stopped before convergence or exhaustion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelReason {
    /// The caller's cancellation token fired.
    Signal,
    /// The budget's overall timeout elapsed.
    DeadlineElapsed,
}

impl fmt::Display for CancelReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Signal => write!(f, "was cancelled"),
            Self::DeadlineElapsed => write!(f, "timed out"),
        }
    }
}

/// Which mutating call a wait follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitPhase {
    /// Waiting after a create.
    Create,
    /// Waiting after an update.
    Update,
}

impl fmt::Display for WaitPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Create => write!(f, "create"),
            Self::Update => write!(f, "update"),
        }
    }
}

/// The resource a poll is waiting on, for logs and error context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollTarget {
    kind: &'static str,
    identity: String,
    phase: WaitPhase,
}

impl PollTarget {
    /// Describe a wait on the `kind` resource named `identity`.
    #[must_use]
    pub fn new(kind: &'static str, identity: impl Into<String>, phase: WaitPhase) -> Self {
        Self {
            kind,
            identity: identity.into(),
            phase,
        }
    }

    /// Resource kind, e.g. `"index"`.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        self.kind
    }

    /// Resource identity (its name).
    #[must_use]
    pub fn identity(&self) -> &str {
        &self.identity
    }

    /// Whether this wait follows a create or an update.
    #[must_use]
    pub const fn phase(&self) -> WaitPhase {
        self.phase
    }
}

impl fmt::Display for PollTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} '{}' ({} wait)", self.kind, self.identity, self.phase)
    }
}
