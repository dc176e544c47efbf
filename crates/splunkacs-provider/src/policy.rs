//! Convergence wait policy.
//!
//! Each mutating call site has its own retry budget. Defaults:
//!
//! | call site          | attempts | interval |
//! |--------------------|----------|----------|
//! | HEC token create   | 20       | 10 s     |
//! | HEC token update   | 10       | 10 s     |
//! | index create/update| 20       | 10 s     |

use std::time::Duration;

use serde::{Deserialize, Serialize};
use splunkacs_reconcile::{BudgetError, RetryBudget};

/// Attempts and spacing for one kind of wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetConfig {
    /// Maximum number of reads.
    pub max_attempts: u32,
    /// Seconds between two reads.
    pub interval_seconds: u64,
}

impl BudgetConfig {
    /// Get the interval as a `Duration`.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_seconds)
    }

    fn budget(
        self,
        timeout: Option<Duration>,
        retry_throttled: bool,
    ) -> Result<RetryBudget, BudgetError> {
        let mut budget = RetryBudget::new(self.max_attempts, self.interval())?;
        if let Some(timeout) = timeout {
            budget = budget.with_timeout(timeout);
        }
        if retry_throttled {
            budget = budget.with_transient_retries();
        }
        Ok(budget)
    }
}

/// Retry budgets for every convergence wait.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaitPolicy {
    /// Wait for a new HEC token to become readable.
    #[serde(default = "WaitPolicy::default_hec_token_create")]
    pub hec_token_create: BudgetConfig,

    /// Wait for a HEC token update to be reflected.
    #[serde(default = "WaitPolicy::default_hec_token_update")]
    pub hec_token_update: BudgetConfig,

    /// Wait for an index create or update.
    #[serde(default = "WaitPolicy::default_index")]
    pub index: BudgetConfig,

    /// Overall bound on a single wait, in seconds.
    #[serde(default)]
    pub timeout_seconds: Option<u64>,

    /// Keep waiting through HTTP 429/503 reads instead of failing.
    #[serde(default)]
    pub retry_throttled: bool,
}

impl WaitPolicy {
    const fn default_hec_token_create() -> BudgetConfig {
        BudgetConfig {
            max_attempts: 20,
            interval_seconds: 10,
        }
    }

    const fn default_hec_token_update() -> BudgetConfig {
        BudgetConfig {
            max_attempts: 10,
            interval_seconds: 10,
        }
    }

    const fn default_index() -> BudgetConfig {
        BudgetConfig {
            max_attempts: 20,
            interval_seconds: 10,
        }
    }

    /// Get the overall timeout as a `Duration`.
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_seconds.map(Duration::from_secs)
    }

    /// Validate and convert into poller budgets.
    ///
    /// # Errors
    ///
    /// Returns `BudgetError::ZeroAttempts` if any budget allows no reads.
    pub fn budgets(&self) -> Result<WaitBudgets, BudgetError> {
        let timeout = self.timeout();
        let retry = self.retry_throttled;
        Ok(WaitBudgets {
            hec_token_create: self.hec_token_create.budget(timeout, retry)?,
            hec_token_update: self.hec_token_update.budget(timeout, retry)?,
            index: self.index.budget(timeout, retry)?,
        })
    }
}

impl Default for WaitPolicy {
    fn default() -> Self {
        Self {
            hec_token_create: Self::default_hec_token_create(),
            hec_token_update: Self::default_hec_token_update(),
            index: Self::default_index(),
            timeout_seconds: None,
            retry_throttled: false,
        }
    }
}

/// Validated budgets handed to the resource handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitBudgets {
    /// HEC token create.
    pub hec_token_create: RetryBudget,
    /// HEC token update.
    pub hec_token_update: RetryBudget,
    /// Index create and update.
    pub index: RetryBudget,
}
