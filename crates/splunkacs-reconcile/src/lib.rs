//! Convergence polling for eventually consistent remote APIs.
//!
//! After a create or update call, the Splunk Admin Config Service does not
//! guarantee that an immediate read reflects the write. This crate provides the
//! single primitive every mutating handler uses to wait for that write to become
//! visible: a bounded poll loop driven by a [`ConvergencePredicate`].
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────┐
//! │  create / update     │  issues the write, then hands over:
//! │  handler             │  fetch closure + predicate + budget + cancel token
//! └──────────┬───────────┘
//!            │
//!            ▼
//! ┌──────────────────────┐      ┌──────────────────────┐
//! │       Poller         │─────▶│ ConvergencePredicate │
//! │  (budget, observer)  │      │  (pure verdict)      │
//! └──────────┬───────────┘      └──────────────────────┘
//!            │ fetch → verdict → wait → fetch ...
//!            ▼
//! ┌──────────────────────┐
//! │     PollOutcome      │  Converged | Exhausted | Fatal | Cancelled
//! └──────────────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//!
//! use splunkacs_reconcile::{
//!     ConvergencePredicate, FetchOutcome, Matches, PollTarget, Poller, RetryBudget, WaitPhase,
//! };
//! use tokio_util::sync::CancellationToken;
//!
//! #[derive(Debug)]
//! struct Remote {
//!     ready: bool,
//! }
//!
//! impl Matches<bool> for Remote {
//!     fn matches(&self, expected: &bool) -> bool {
//!         self.ready == *expected
//!     }
//! }
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let budget = RetryBudget::new(20, Duration::from_secs(10))?;
//! let poller = Poller::new(budget);
//! let target = PollTarget::new("index", "main", WaitPhase::Create);
//! let cancel = CancellationToken::new();
//!
//! let outcome = poller
//!     .poll(&target, &ConvergencePredicate::FieldEquality(true), &cancel, || async {
//!         FetchOutcome::<Remote, std::io::Error>::Found(Remote { ready: true })
//!     })
//!     .await;
//!
//! let remote = outcome.into_result(target)?;
//! assert!(remote.ready);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod budget;
pub mod error;
pub mod observer;
pub mod outcome;
pub mod poller;
pub mod predicate;

pub use budget::RetryBudget;
pub use error::{BudgetError, WaitError};
pub use observer::{PollObserver, TracingObserver};
pub use outcome::{CancelReason, FetchOutcome, PollOutcome, PollTarget, WaitPhase};
pub use poller::{poll, Poller};
pub use predicate::{ConvergencePredicate, Matches, PendingReason, Verdict};

// Re-exported so callers can build cancellation signals without a direct dependency.
pub use tokio_util::sync::CancellationToken;
