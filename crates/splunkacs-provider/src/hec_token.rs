//! HEC token resource handler.

use std::sync::Arc;

use splunkacs_client::{fetch_outcome, AcsApi};
use splunkacs_core::{HecToken, HecTokenSpec, ResourceName};
use splunkacs_reconcile::{ConvergencePredicate, PollTarget, Poller, RetryBudget, WaitPhase};
use tokio_util::sync::CancellationToken;

use crate::error::{Action, ProviderError, Result};

/// Resource kind used in messages.
pub const HEC_TOKEN: &str = "HEC Token";

/// Creates, reads, updates and deletes HEC tokens, waiting for each write to
/// become visible before returning.
pub struct HecTokenResource<C: AcsApi + ?Sized> {
    client: Arc<C>,
    create_budget: RetryBudget,
    update_budget: RetryBudget,
}

impl<C: AcsApi + ?Sized> HecTokenResource<C> {
    /// Create a handler with explicit budgets.
    #[must_use]
    pub const fn new(client: Arc<C>, create_budget: RetryBudget, update_budget: RetryBudget) -> Self {
        Self {
            client,
            create_budget,
            update_budget,
        }
    }

    /// Create a token and wait until it can be read back.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::Api` if ACS rejects the create, or
    /// `ProviderError::HecTokenWait` if the token never becomes readable.
    pub async fn create(&self, spec: &HecTokenSpec, cancel: &CancellationToken) -> Result<HecToken> {
        self.client
            .create_hec_token(spec)
            .await
            .map_err(|source| ProviderError::api(Action::Create, HEC_TOKEN, source))?;

        let target = PollTarget::new(HEC_TOKEN, spec.name.as_str(), WaitPhase::Create);
        let client = &*self.client;
        let name = &spec.name;

        let outcome = Poller::new(self.create_budget)
            .poll(
                &target,
                &ConvergencePredicate::<HecTokenSpec>::ExistenceOnly,
                cancel,
                move || async move { fetch_outcome(client.get_hec_token(name).await) },
            )
            .await;

        let token = outcome.into_result(target)?;
        tracing::info!(hec_token = %token.name(), "HEC token created");
        Ok(token)
    }

    /// Read a token.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::Api`; use `is_not_found` to detect a token
    /// deleted outside this tool.
    pub async fn read(&self, name: &ResourceName) -> Result<HecToken> {
        self.client
            .get_hec_token(name)
            .await
            .map_err(|source| ProviderError::api(Action::Read, HEC_TOKEN, source))
    }

    /// Apply `planned` to the token described by `prior` and wait until every
    /// setting reads back as written.
    ///
    /// Settings the server computes (the default host) are inherited from
    /// `prior` when `planned` leaves them unset.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::RequiresReplace` if the name changes,
    /// `ProviderError::Api` if ACS rejects the update, or
    /// `ProviderError::HecTokenWait` if the token does not converge. A token
    /// that disappears during the wait is a fatal wait error.
    pub async fn update(
        &self,
        planned: &HecTokenSpec,
        prior: &HecToken,
        cancel: &CancellationToken,
    ) -> Result<HecToken> {
        if planned.name != prior.spec.name {
            return Err(ProviderError::RequiresReplace {
                resource: HEC_TOKEN,
                name: prior.spec.name.to_string(),
                field: "name",
            });
        }

        let expected = planned.clone().inherit_computed(&prior.spec);
        self.client
            .update_hec_token(&expected)
            .await
            .map_err(|source| ProviderError::api(Action::Update, HEC_TOKEN, source))?;

        let target = PollTarget::new(HEC_TOKEN, expected.name.as_str(), WaitPhase::Update);
        let client = &*self.client;
        let name = &expected.name;

        let outcome = Poller::new(self.update_budget)
            .poll(
                &target,
                &ConvergencePredicate::FieldEquality(expected.clone()),
                cancel,
                move || async move { fetch_outcome(client.get_hec_token(name).await) },
            )
            .await;

        let token = outcome.into_result(target)?;
        tracing::info!(hec_token = %token.name(), "HEC token updated");
        Ok(token)
    }

    /// Delete a token.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::Api` if ACS rejects the delete.
    pub async fn delete(&self, name: &ResourceName) -> Result<()> {
        self.client
            .delete_hec_token(name)
            .await
            .map_err(|source| ProviderError::api(Action::Delete, HEC_TOKEN, source))?;
        tracing::info!(hec_token = %name, "HEC token deleted");
        Ok(())
    }

    /// Adopt an existing token by name.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::InvalidName` for a malformed name, otherwise as
    /// [`read`](Self::read).
    pub async fn import(&self, id: &str) -> Result<HecToken> {
        let name = ResourceName::new(id)?;
        self.read(&name).await
    }
}
