//! Retry budgets for convergence waits.
//!
//! A budget is policy handed to the poller per call; the poller never embeds
//! attempt counts or intervals of its own.

use std::time::Duration;

use crate::error::BudgetError;

/// Bounded attempt count and fixed inter-attempt interval for one poll.
///
/// An optional overall timeout turns into a deadline when the poll starts; the
/// poller treats an elapsed deadline like a cancellation signal. A timeout too
/// large to represent as a deadline means no deadline.
///
/// Throttled fetches (HTTP 429/503) are fatal unless the budget opts in with
/// [`with_transient_retries`](Self::with_transient_retries).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryBudget {
    max_attempts: u32,
    interval: Duration,
    timeout: Option<Duration>,
    retry_transient: bool,
}

impl RetryBudget {
    /// Create a budget of `max_attempts` fetches spaced `interval` apart.
    ///
    /// # Errors
    ///
    /// Returns `BudgetError::ZeroAttempts` if `max_attempts` is zero.
    pub const fn new(max_attempts: u32, interval: Duration) -> Result<Self, BudgetError> {
        if max_attempts == 0 {
            return Err(BudgetError::ZeroAttempts);
        }
        Ok(Self {
            max_attempts,
            interval,
            timeout: None,
            retry_transient: false,
        })
    }

    /// Bound the whole poll by `timeout`, measured from the first attempt.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Treat throttled fetches as pending instead of fatal. Each one still
    /// consumes an attempt.
    #[must_use]
    pub const fn with_transient_retries(mut self) -> Self {
        self.retry_transient = true;
        self
    }

    /// Maximum number of fetches.
    #[must_use]
    pub const fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Delay between two consecutive fetches.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Overall timeout, if any.
    #[must_use]
    pub const fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Returns true if throttled fetches are retried.
    #[must_use]
    pub const fn retries_transient(&self) -> bool {
        self.retry_transient
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_zero_attempts() {
        let result = RetryBudget::new(0, Duration::from_secs(10));
        assert_eq!(result, Err(BudgetError::ZeroAttempts));
    }

    #[test]
    fn accessors() {
        let budget = RetryBudget::new(20, Duration::from_secs(10)).unwrap();
        assert_eq!(budget.max_attempts(), 20);
        assert_eq!(budget.interval(), Duration::from_secs(10));
        assert!(budget.timeout().is_none());

        let budget = budget.with_timeout(Duration::from_secs(120));
        assert_eq!(budget.timeout(), Some(Duration::from_secs(120)));
    }

    #[test]
    fn transient_retries_are_opt_in() {
        let budget = RetryBudget::new(3, Duration::from_secs(1)).unwrap();
        assert!(!budget.retries_transient());
        assert!(budget.with_transient_retries().retries_transient());
    }
}
