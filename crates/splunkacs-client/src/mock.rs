//! In-memory ACS for tests.
//!
//! [`MockAcsClient`] keeps HEC tokens and indexes in maps and answers reads
//! from them. Reads can also be scripted per resource kind, which is how tests
//! simulate eventual consistency: scripted answers are consumed first, then the
//! mock falls back to its stored state.

use std::collections::{HashMap, VecDeque};

use async_trait::async_trait;
use parking_lot::Mutex;
use splunkacs_core::{HecToken, HecTokenSpec, Index, IndexPatch, IndexSpec, ResourceName, StackStatus};

use crate::api::AcsApi;
use crate::error::{AcsError, Result};

/// Host the mock assigns to tokens created without a default host.
pub const MOCK_DEFAULT_HOST: &str = "mock-host";

/// A call received by the mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    /// `create_hec_token`
    CreateHecToken(ResourceName),
    /// `get_hec_token`
    GetHecToken(ResourceName),
    /// `update_hec_token`
    UpdateHecToken(ResourceName),
    /// `delete_hec_token`
    DeleteHecToken(ResourceName),
    /// `create_index`
    CreateIndex(ResourceName),
    /// `get_index`
    GetIndex(ResourceName),
    /// `update_index`
    UpdateIndex(ResourceName),
    /// `delete_index`
    DeleteIndex(ResourceName),
    /// `get_stack_status`
    GetStackStatus,
}

#[derive(Default)]
struct MockState {
    hec_tokens: HashMap<ResourceName, HecToken>,
    indexes: HashMap<ResourceName, Index>,
    stack_status: Option<StackStatus>,
    hec_token_reads: VecDeque<Result<HecToken>>,
    index_reads: VecDeque<Result<Index>>,
    write_failures: VecDeque<AcsError>,
    calls: Vec<MockCall>,
}

/// Scriptable in-memory [`AcsApi`].
#[derive(Default)]
pub struct MockAcsClient {
    state: Mutex<MockState>,
}

impl MockAcsClient {
    /// API root reported by the mock.
    pub const BASE_URL: &'static str = "https://admin.splunk.com/mock/adminconfig/v2";

    /// An empty mock.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `get_stack_status` with `status`.
    #[must_use]
    pub fn with_stack_status(self, status: StackStatus) -> Self {
        self.state.lock().stack_status = Some(status);
        self
    }

    /// Store a HEC token.
    pub fn insert_hec_token(&self, token: HecToken) {
        self.state
            .lock()
            .hec_tokens
            .insert(token.spec.name.clone(), token);
    }

    /// Store an index.
    pub fn insert_index(&self, index: Index) {
        self.state
            .lock()
            .indexes
            .insert(index.spec.name.clone(), index);
    }

    /// Queue answers for the next `get_hec_token` calls.
    pub fn script_hec_token_reads(&self, reads: impl IntoIterator<Item = Result<HecToken>>) {
        self.state.lock().hec_token_reads.extend(reads);
    }

    /// Queue answers for the next `get_index` calls.
    pub fn script_index_reads(&self, reads: impl IntoIterator<Item = Result<Index>>) {
        self.state.lock().index_reads.extend(reads);
    }

    /// Fail the next create, update or delete with `error`.
    pub fn fail_next_write(&self, error: AcsError) {
        self.state.lock().write_failures.push_back(error);
    }

    /// Every call received so far.
    #[must_use]
    pub fn calls(&self) -> Vec<MockCall> {
        self.state.lock().calls.clone()
    }

    /// Number of calls matching `pred`.
    #[must_use]
    pub fn count_calls(&self, pred: impl Fn(&MockCall) -> bool) -> usize {
        self.state.lock().calls.iter().filter(|call| pred(call)).count()
    }

    /// The stored HEC token, if any.
    #[must_use]
    pub fn stored_hec_token(&self, name: &ResourceName) -> Option<HecToken> {
        self.state.lock().hec_tokens.get(name).cloned()
    }

    /// The stored index, if any.
    #[must_use]
    pub fn stored_index(&self, name: &ResourceName) -> Option<Index> {
        self.state.lock().indexes.get(name).cloned()
    }

    fn begin_write(state: &mut MockState, call: MockCall) -> Result<()> {
        state.calls.push(call);
        state.write_failures.pop_front().map_or(Ok(()), Err)
    }
}

fn not_found(kind: &str, name: &ResourceName) -> AcsError {
    AcsError::Api {
        status: 404,
        code: Some("404-object-not-found".to_string()),
        message: format!("{kind} {name} not found"),
    }
}

fn conflict(kind: &str, name: &ResourceName) -> AcsError {
    AcsError::Api {
        status: 409,
        code: Some("409-conflict".to_string()),
        message: format!("{kind} {name} already exists"),
    }
}

#[async_trait]
impl AcsApi for MockAcsClient {
    fn base_url(&self) -> &str {
        Self::BASE_URL
    }

    async fn create_hec_token(&self, spec: &HecTokenSpec) -> Result<()> {
        let mut state = self.state.lock();
        Self::begin_write(&mut state, MockCall::CreateHecToken(spec.name.clone()))?;
        if state.hec_tokens.contains_key(&spec.name) {
            return Err(conflict("HEC token", &spec.name));
        }

        let mut stored = spec.clone();
        if stored.default_host.is_none() {
            stored.default_host = Some(MOCK_DEFAULT_HOST.to_string());
        }
        let token = HecToken::new(stored, format!("mock-token-{}", spec.name));
        state.hec_tokens.insert(spec.name.clone(), token);
        Ok(())
    }

    async fn get_hec_token(&self, name: &ResourceName) -> Result<HecToken> {
        let mut state = self.state.lock();
        state.calls.push(MockCall::GetHecToken(name.clone()));
        if let Some(scripted) = state.hec_token_reads.pop_front() {
            return scripted;
        }
        state
            .hec_tokens
            .get(name)
            .cloned()
            .ok_or_else(|| not_found("HEC token", name))
    }

    async fn update_hec_token(&self, spec: &HecTokenSpec) -> Result<()> {
        let mut state = self.state.lock();
        Self::begin_write(&mut state, MockCall::UpdateHecToken(spec.name.clone()))?;
        let existing = state
            .hec_tokens
            .get_mut(&spec.name)
            .ok_or_else(|| not_found("HEC token", &spec.name))?;

        let prior_host = existing.spec.default_host.take();
        existing.spec = spec.clone();
        if existing.spec.default_host.is_none() {
            existing.spec.default_host = prior_host;
        }
        Ok(())
    }

    async fn delete_hec_token(&self, name: &ResourceName) -> Result<()> {
        let mut state = self.state.lock();
        Self::begin_write(&mut state, MockCall::DeleteHecToken(name.clone()))?;
        state
            .hec_tokens
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| not_found("HEC token", name))
    }

    async fn create_index(&self, spec: &IndexSpec) -> Result<()> {
        let mut state = self.state.lock();
        Self::begin_write(&mut state, MockCall::CreateIndex(spec.name.clone()))?;
        if state.indexes.contains_key(&spec.name) {
            return Err(conflict("index", &spec.name));
        }

        let index = Index {
            spec: spec.clone(),
            total_event_count: "0".to_string(),
            total_raw_size_mb: "0".to_string(),
        };
        state.indexes.insert(spec.name.clone(), index);
        Ok(())
    }

    async fn get_index(&self, name: &ResourceName) -> Result<Index> {
        let mut state = self.state.lock();
        state.calls.push(MockCall::GetIndex(name.clone()));
        if let Some(scripted) = state.index_reads.pop_front() {
            return scripted;
        }
        state
            .indexes
            .get(name)
            .cloned()
            .ok_or_else(|| not_found("index", name))
    }

    async fn update_index(&self, name: &ResourceName, patch: &IndexPatch) -> Result<()> {
        let mut state = self.state.lock();
        Self::begin_write(&mut state, MockCall::UpdateIndex(name.clone()))?;
        let existing = state
            .indexes
            .get_mut(name)
            .ok_or_else(|| not_found("index", name))?;

        if let Some(days) = patch.searchable_days {
            existing.spec.searchable_days = days;
        }
        if let Some(size) = patch.max_data_size_mb {
            existing.spec.max_data_size_mb = size;
        }
        Ok(())
    }

    async fn delete_index(&self, name: &ResourceName) -> Result<()> {
        let mut state = self.state.lock();
        Self::begin_write(&mut state, MockCall::DeleteIndex(name.clone()))?;
        state
            .indexes
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| not_found("index", name))
    }

    async fn get_stack_status(&self) -> Result<StackStatus> {
        let mut state = self.state.lock();
        state.calls.push(MockCall::GetStackStatus);
        state
            .stack_status
            .clone()
            .ok_or_else(|| AcsError::api(503, "stack status unavailable"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(value: &str) -> ResourceName {
        ResourceName::new(value).unwrap()
    }

    #[tokio::test]
    async fn create_then_read() {
        let mock = MockAcsClient::new();
        let spec = HecTokenSpec::new(name("ci-token"), "main");

        mock.create_hec_token(&spec).await.unwrap();
        let token = mock.get_hec_token(&spec.name).await.unwrap();

        assert_eq!(token.spec.default_host.as_deref(), Some(MOCK_DEFAULT_HOST));
        assert_eq!(token.token, "mock-token-ci-token");
        assert_eq!(
            mock.calls(),
            vec![
                MockCall::CreateHecToken(name("ci-token")),
                MockCall::GetHecToken(name("ci-token")),
            ]
        );
    }

    #[tokio::test]
    async fn scripted_reads_come_first() {
        let mock = MockAcsClient::new();
        let spec = IndexSpec {
            name: name("web_logs"),
            data_type: splunkacs_core::IndexDataType::Event,
            searchable_days: 90,
            max_data_size_mb: 0,
        };
        mock.create_index(&spec).await.unwrap();
        mock.script_index_reads([Err(AcsError::api(404, "not yet"))]);

        assert!(mock.get_index(&spec.name).await.unwrap_err().is_not_found());
        assert_eq!(mock.get_index(&spec.name).await.unwrap().spec, spec);
    }

    #[tokio::test]
    async fn write_failures_are_consumed_once() {
        let mock = MockAcsClient::new();
        mock.fail_next_write(AcsError::api(400, "bad request"));
        let spec = HecTokenSpec::new(name("ci-token"), "main");

        let err = mock.create_hec_token(&spec).await.unwrap_err();
        assert_eq!(err.status(), Some(400));
        mock.create_hec_token(&spec).await.unwrap();
        assert_eq!(
            mock.create_hec_token(&spec).await.unwrap_err().status(),
            Some(409)
        );
    }

    #[tokio::test]
    async fn missing_resources_are_not_found() {
        let mock = MockAcsClient::new();
        assert!(mock
            .delete_index(&name("ghost"))
            .await
            .unwrap_err()
            .is_not_found());
        assert!(mock
            .get_hec_token(&name("ghost"))
            .await
            .unwrap_err()
            .is_not_found());
    }
}
