//! Diagnostic hooks for poll progress.
//!
//! Observers see every step of a poll but cannot influence it.

use std::fmt;
use std::time::Duration;

use crate::outcome::{CancelReason, PollTarget};
use crate::predicate::PendingReason;

/// Receives progress events from a running poll.
///
/// All methods default to doing nothing.
pub trait PollObserver {
    /// A fetch is about to be made. `attempt` is 1-based.
    fn on_attempt(&self, _target: &PollTarget, _attempt: u32, _max_attempts: u32) {}

    /// A fetch did not converge but may be retried.
    fn on_pending(&self, _target: &PollTarget, _attempt: u32, _reason: PendingReason) {}

    /// The poll is about to sleep before the next attempt.
    fn on_wait(&self, _target: &PollTarget, _attempt: u32, _delay: Duration) {}

    /// The predicate accepted the fetch made on `attempt`.
    fn on_converged(&self, _target: &PollTarget, _attempt: u32) {}

    /// The fetch made on `attempt` failed fatally.
    fn on_fatal(&self, _target: &PollTarget, _attempt: u32, _error: &dyn fmt::Display) {}

    /// The budget ran out.
    fn on_exhausted(
        &self,
        _target: &PollTarget,
        _attempts: u32,
        _last_observed: Option<&dyn fmt::Debug>,
    ) {
    }

    /// The poll stopped on cancellation or deadline.
    fn on_cancelled(&self, _target: &PollTarget, _attempts: u32, _reason: CancelReason) {}
}

impl<O: PollObserver + ?Sized> PollObserver for &O {
    fn on_attempt(&self, target: &PollTarget, attempt: u32, max_attempts: u32) {
        (**self).on_attempt(target, attempt, max_attempts);
    }

    fn on_pending(&self, target: &PollTarget, attempt: u32, reason: PendingReason) {
        (**self).on_pending(target, attempt, reason);
    }

    fn on_wait(&self, target: &PollTarget, attempt: u32, delay: Duration) {
        (**self).on_wait(target, attempt, delay);
    }

    fn on_converged(&self, target: &PollTarget, attempt: u32) {
        (**self).on_converged(target, attempt);
    }

    fn on_fatal(&self, target: &PollTarget, attempt: u32, error: &dyn fmt::Display) {
        (**self).on_fatal(target, attempt, error);
    }

    fn on_exhausted(
        &self,
        target: &PollTarget,
        attempts: u32,
        last_observed: Option<&dyn fmt::Debug>,
    ) {
        (**self).on_exhausted(target, attempts, last_observed);
    }

    fn on_cancelled(&self, target: &PollTarget, attempts: u32, reason: CancelReason) {
        (**self).on_cancelled(target, attempts, reason);
    }
}

/// Logs poll progress through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl PollObserver for TracingObserver {
    fn on_attempt(&self, target: &PollTarget, attempt: u32, max_attempts: u32) {
        tracing::debug!(
            kind = target.kind(),
            resource = %target.identity(),
            phase = %target.phase(),
            attempt,
            max_attempts,
            "Waiting for resource to converge"
        );
    }

    fn on_pending(&self, target: &PollTarget, attempt: u32, reason: PendingReason) {
        tracing::debug!(
            kind = target.kind(),
            resource = %target.identity(),
            attempt,
            reason = %reason,
            "Resource not converged yet"
        );
    }

    fn on_wait(&self, target: &PollTarget, attempt: u32, delay: Duration) {
        tracing::trace!(
            resource = %target.identity(),
            attempt,
            delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
            "Sleeping before next attempt"
        );
    }

    fn on_converged(&self, target: &PollTarget, attempt: u32) {
        tracing::info!(
            kind = target.kind(),
            resource = %target.identity(),
            phase = %target.phase(),
            attempts = attempt,
            "Resource converged"
        );
    }

    fn on_fatal(&self, target: &PollTarget, attempt: u32, error: &dyn fmt::Display) {
        tracing::error!(
            kind = target.kind(),
            resource = %target.identity(),
            phase = %target.phase(),
            attempt,
            error = %error,
            "Unexpected error while waiting for resource"
        );
    }

    fn on_exhausted(
        &self,
        target: &PollTarget,
        attempts: u32,
        last_observed: Option<&dyn fmt::Debug>,
    ) {
        tracing::error!(
            kind = target.kind(),
            resource = %target.identity(),
            phase = %target.phase(),
            attempts,
            last_observed = ?last_observed,
            "Resource did not converge within retry budget"
        );
    }

    fn on_cancelled(&self, target: &PollTarget, attempts: u32, reason: CancelReason) {
        tracing::warn!(
            kind = target.kind(),
            resource = %target.identity(),
            phase = %target.phase(),
            attempts,
            reason = %reason,
            "Stopped waiting for resource"
        );
    }
}
