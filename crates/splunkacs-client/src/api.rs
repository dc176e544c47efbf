//! The ACS API surface used by the resource handlers.

use async_trait::async_trait;
use splunkacs_core::{HecToken, HecTokenSpec, Index, IndexPatch, IndexSpec, ResourceName, StackStatus};
use splunkacs_reconcile::FetchOutcome;

use crate::error::{AcsError, Result};

/// Operations against one ACS deployment.
///
/// This trait abstracts the HTTP client, allowing for mock implementations in
/// tests.
#[async_trait]
pub trait AcsApi: Send + Sync {
    /// API root this client talks to.
    fn base_url(&self) -> &str;

    /// Create a HEC token.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or ACS rejects it.
    async fn create_hec_token(&self, spec: &HecTokenSpec) -> Result<()>;

    /// Fetch a HEC token by name.
    ///
    /// # Errors
    ///
    /// Returns an `Api` error with status 404 if the token is not visible.
    async fn get_hec_token(&self, name: &ResourceName) -> Result<HecToken>;

    /// Replace a HEC token's settings. The token is addressed by `spec.name`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or ACS rejects it.
    async fn update_hec_token(&self, spec: &HecTokenSpec) -> Result<()>;

    /// Delete a HEC token.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or ACS rejects it.
    async fn delete_hec_token(&self, name: &ResourceName) -> Result<()>;

    /// Create an index.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or ACS rejects it.
    async fn create_index(&self, spec: &IndexSpec) -> Result<()>;

    /// Fetch an index by name.
    ///
    /// # Errors
    ///
    /// Returns an `Api` error with status 404 if the index is not visible.
    async fn get_index(&self, name: &ResourceName) -> Result<Index>;

    /// Change an index's retention settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or ACS rejects it.
    async fn update_index(&self, name: &ResourceName, patch: &IndexPatch) -> Result<()>;

    /// Delete an index.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or ACS rejects it.
    async fn delete_index(&self, name: &ResourceName) -> Result<()>;

    /// Fetch the stack type and version.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or ACS rejects it.
    async fn get_stack_status(&self) -> Result<StackStatus>;
}

/// Classify a read result for a convergence poll.
///
/// 404 means "not visible yet" and 429 or 503 mean throttled. Every other
/// failure is fatal. Whether a throttled read ends the poll is up to the
/// poll's budget.
pub fn fetch_outcome<S>(result: Result<S>) -> FetchOutcome<S, AcsError> {
    match result {
        Ok(state) => FetchOutcome::Found(state),
        Err(err) if err.is_not_found() => FetchOutcome::NotFound(err),
        Err(err) if err.is_retriable() => FetchOutcome::Transient(err),
        Err(err) => FetchOutcome::Fatal(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_results() {
        assert!(matches!(fetch_outcome(Ok(1u8)), FetchOutcome::Found(1)));
        assert!(matches!(
            fetch_outcome::<u8>(Err(AcsError::api(404, "missing"))),
            FetchOutcome::NotFound(_)
        ));
        assert!(matches!(
            fetch_outcome::<u8>(Err(AcsError::api(429, "throttled"))),
            FetchOutcome::Transient(_)
        ));
        assert!(matches!(
            fetch_outcome::<u8>(Err(AcsError::api(503, "unavailable"))),
            FetchOutcome::Transient(_)
        ));
        assert!(matches!(
            fetch_outcome::<u8>(Err(AcsError::api(401, "unauthorized"))),
            FetchOutcome::Fatal(_)
        ));
    }
}
