//! The reconciliation poll loop.
//!
//! One poll is a sequential chain of fetch → verdict → wait → fetch on the
//! caller's task. The loop never fetches more than `max_attempts` times, never
//! sleeps after the final attempt, and checks the cancellation token and the
//! deadline before every fetch and before every sleep. A sleep in progress is
//! interrupted as soon as the token fires.

use std::fmt;
use std::future::Future;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::budget::RetryBudget;
use crate::observer::{PollObserver, TracingObserver};
use crate::outcome::{CancelReason, FetchOutcome, PollOutcome, PollTarget};
use crate::predicate::{ConvergencePredicate, Matches, PendingReason, Verdict};

/// Runs convergence polls under a fixed budget.
///
/// A poller holds no per-poll state, so one instance can drive any number of
/// concurrent polls.
#[derive(Debug, Clone)]
pub struct Poller<O = TracingObserver> {
    budget: RetryBudget,
    observer: O,
}

impl Poller<TracingObserver> {
    /// Create a poller that logs progress through `tracing`.
    #[must_use]
    pub const fn new(budget: RetryBudget) -> Self {
        Self {
            budget,
            observer: TracingObserver,
        }
    }
}

impl<O: PollObserver> Poller<O> {
    /// Replace the progress observer.
    #[must_use]
    pub fn with_observer<P: PollObserver>(self, observer: P) -> Poller<P> {
        Poller {
            budget: self.budget,
            observer,
        }
    }

    /// The budget applied to every poll.
    #[must_use]
    pub const fn budget(&self) -> &RetryBudget {
        &self.budget
    }

    /// The progress observer.
    #[must_use]
    pub const fn observer(&self) -> &O {
        &self.observer
    }

    /// Poll `fetch` until `predicate` accepts its result, the budget runs out,
    /// a fatal error occurs, or `cancel` fires.
    pub async fn poll<F, Fut, S, E, X>(
        &self,
        target: &PollTarget,
        predicate: &ConvergencePredicate<X>,
        cancel: &CancellationToken,
        mut fetch: F,
    ) -> PollOutcome<S, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = FetchOutcome<S, E>>,
        S: Matches<X> + fmt::Debug,
        E: fmt::Display,
    {
        let max_attempts = self.budget.max_attempts();
        let interval = self.budget.interval();
        let deadline = self
            .budget
            .timeout()
            .and_then(|timeout| Instant::now().checked_add(timeout));

        let mut attempts = 0u32;
        let mut last_observed: Option<S> = None;

        loop {
            if let Some(reason) = interruption(cancel, deadline) {
                return self.cancelled(target, attempts, reason, last_observed);
            }

            self.observer.on_attempt(target, attempts + 1, max_attempts);
            let outcome = fetch().await;
            attempts += 1;

            let verdict = match outcome {
                FetchOutcome::Transient(_) if self.budget.retries_transient() => Verdict::Continue {
                    reason: PendingReason::Transient,
                    observed: None,
                },
                outcome => predicate.evaluate(outcome),
            };

            match verdict {
                Verdict::Converged(state) => {
                    self.observer.on_converged(target, attempts);
                    return PollOutcome::Converged(state);
                }
                Verdict::Fatal(error) => {
                    self.observer.on_fatal(target, attempts, &error);
                    return PollOutcome::Fatal(error);
                }
                Verdict::Continue { reason, observed } => {
                    self.observer.on_pending(target, attempts, reason);
                    if observed.is_some() {
                        last_observed = observed;
                    }
                }
            }

            if attempts >= max_attempts {
                self.observer.on_exhausted(
                    target,
                    attempts,
                    last_observed.as_ref().map(|state| state as &dyn fmt::Debug),
                );
                return PollOutcome::Exhausted {
                    attempts,
                    last_observed,
                };
            }

            if let Some(reason) = interruption(cancel, deadline) {
                return self.cancelled(target, attempts, reason, last_observed);
            }

            self.observer.on_wait(target, attempts, interval);
            if let Some(reason) = wait(interval, cancel, deadline).await {
                return self.cancelled(target, attempts, reason, last_observed);
            }
        }
    }

    fn cancelled<S, E>(
        &self,
        target: &PollTarget,
        attempts: u32,
        reason: CancelReason,
        last_observed: Option<S>,
    ) -> PollOutcome<S, E> {
        self.observer.on_cancelled(target, attempts, reason);
        PollOutcome::Cancelled {
            attempts,
            reason,
            last_observed,
        }
    }
}

/// Poll once with a `tracing` observer. See [`Poller::poll`].
pub async fn poll<F, Fut, S, E, X>(
    target: &PollTarget,
    predicate: &ConvergencePredicate<X>,
    budget: RetryBudget,
    cancel: &CancellationToken,
    fetch: F,
) -> PollOutcome<S, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = FetchOutcome<S, E>>,
    S: Matches<X> + fmt::Debug,
    E: fmt::Display,
{
    Poller::new(budget).poll(target, predicate, cancel, fetch).await
}

fn interruption(cancel: &CancellationToken, deadline: Option<Instant>) -> Option<CancelReason> {
    if cancel.is_cancelled() {
        Some(CancelReason::Signal)
    } else if deadline.is_some_and(|deadline| Instant::now() >= deadline) {
        Some(CancelReason::DeadlineElapsed)
    } else {
        None
    }
}

/// Sleep for `interval`, returning early with a reason if interrupted.
///
/// An interval too large to schedule sleeps until cancellation or the deadline.
async fn wait(
    interval: std::time::Duration,
    cancel: &CancellationToken,
    deadline: Option<Instant>,
) -> Option<CancelReason> {
    let wake_at = Instant::now().checked_add(interval);

    let (until, on_elapsed) = match (wake_at, deadline) {
        (Some(wake_at), Some(deadline)) if deadline < wake_at => {
            (Some(deadline), Some(CancelReason::DeadlineElapsed))
        }
        (None, Some(deadline)) => (Some(deadline), Some(CancelReason::DeadlineElapsed)),
        (wake_at, _) => (wake_at, None),
    };

    match until {
        Some(until) => {
            tokio::select! {
                biased;
                () = cancel.cancelled() => Some(CancelReason::Signal),
                () = tokio::time::sleep_until(until) => on_elapsed,
            }
        }
        None => {
            cancel.cancelled().await;
            Some(CancelReason::Signal)
        }
    }
}
