//! Index resource handler.

use std::sync::Arc;

use splunkacs_client::{fetch_outcome, AcsApi};
use splunkacs_core::{Index, IndexSpec, ResourceName};
use splunkacs_reconcile::{ConvergencePredicate, PollTarget, Poller, RetryBudget, WaitPhase};
use tokio_util::sync::CancellationToken;

use crate::error::{Action, ProviderError, Result};

/// Resource kind used in messages.
pub const INDEX: &str = "Index";

/// Creates, reads, updates and deletes indexes.
///
/// Both create and update wait with an existence-then-equality predicate: a
/// "not found" read keeps the wait going, and on update the retention
/// settings must also read back as written.
pub struct IndexResource<C: AcsApi + ?Sized> {
    client: Arc<C>,
    budget: RetryBudget,
}

impl<C: AcsApi + ?Sized> IndexResource<C> {
    /// Create a handler with an explicit budget.
    #[must_use]
    pub const fn new(client: Arc<C>, budget: RetryBudget) -> Self {
        Self { client, budget }
    }

    /// Create an index and wait until it can be read back.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::Api` if ACS rejects the create, or
    /// `ProviderError::IndexWait` if the index never becomes readable.
    pub async fn create(&self, spec: &IndexSpec, cancel: &CancellationToken) -> Result<Index> {
        self.client
            .create_index(spec)
            .await
            .map_err(|source| ProviderError::api(Action::Create, INDEX, source))?;

        let index = self
            .wait(&spec.name, WaitPhase::Create, None, cancel)
            .await?;
        tracing::info!(index = %index.name(), data_type = %index.spec.data_type, "Index created");
        Ok(index)
    }

    /// Read an index.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::Api`; use `is_not_found` to detect an index
    /// deleted outside this tool.
    pub async fn read(&self, name: &ResourceName) -> Result<Index> {
        self.client
            .get_index(name)
            .await
            .map_err(|source| ProviderError::api(Action::Read, INDEX, source))
    }

    /// Change the retention settings of `prior` to those in `planned` and
    /// wait until they read back as written.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::RequiresReplace` if the name or data type
    /// changes, `ProviderError::Api` if ACS rejects the update, or
    /// `ProviderError::IndexWait` if the index does not converge.
    pub async fn update(
        &self,
        planned: &IndexSpec,
        prior: &Index,
        cancel: &CancellationToken,
    ) -> Result<Index> {
        let immutable = if planned.name == prior.spec.name {
            (planned.data_type != prior.spec.data_type).then_some("data_type")
        } else {
            Some("name")
        };
        if let Some(field) = immutable {
            return Err(ProviderError::RequiresReplace {
                resource: INDEX,
                name: prior.spec.name.to_string(),
                field,
            });
        }

        self.client
            .update_index(&planned.name, &planned.patch())
            .await
            .map_err(|source| ProviderError::api(Action::Update, INDEX, source))?;

        let index = self
            .wait(&planned.name, WaitPhase::Update, Some(planned.clone()), cancel)
            .await?;
        tracing::info!(
            index = %index.name(),
            searchable_days = index.spec.searchable_days,
            max_data_size_mb = index.spec.max_data_size_mb,
            "Index updated"
        );
        Ok(index)
    }

    /// Delete an index.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::Api` if ACS rejects the delete.
    pub async fn delete(&self, name: &ResourceName) -> Result<()> {
        self.client
            .delete_index(name)
            .await
            .map_err(|source| ProviderError::api(Action::Delete, INDEX, source))?;
        tracing::info!(index = %name, "Index deleted");
        Ok(())
    }

    /// Adopt an existing index by name.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::InvalidName` for a malformed name, otherwise as
    /// [`read`](Self::read).
    pub async fn import(&self, id: &str) -> Result<Index> {
        let name = ResourceName::new(id)?;
        self.read(&name).await
    }

    async fn wait(
        &self,
        name: &ResourceName,
        phase: WaitPhase,
        expected: Option<IndexSpec>,
        cancel: &CancellationToken,
    ) -> Result<Index> {
        let target = PollTarget::new(INDEX, name.as_str(), phase);
        let client = &*self.client;

        let outcome = Poller::new(self.budget)
            .poll(
                &target,
                &ConvergencePredicate::ExistenceThenEquality(expected),
                cancel,
                move || async move { fetch_outcome(client.get_index(name).await) },
            )
            .await;

        Ok(outcome.into_result(target)?)
    }
}
