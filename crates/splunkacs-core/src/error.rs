//! Common error types for splunkacs.

use thiserror::Error;

/// A result type using `CoreError`.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors raised while building or parsing domain values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// An invalid resource name was provided.
    #[error("invalid resource name: {0}")]
    InvalidId(#[from] crate::ids::IdError),

    /// An index data type other than `event` or `metric`.
    #[error("invalid index data type '{0}': expected one of event, metric")]
    InvalidDataType(String),
}
