//! HTTP Event Collector tokens.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use splunkacs_reconcile::Matches;

use crate::ids::ResourceName;

/// The caller-controlled settings of a HEC token.
///
/// This is both the create/update request body and the projection compared by
/// update waits. Field names follow the ACS wire format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HecTokenSpec {
    /// Token name. Changing it means replacing the token.
    pub name: ResourceName,
    /// Indexes the token may write to. Order is not significant.
    #[serde(default)]
    pub allowed_indexes: Vec<String>,
    /// Default host; assigned by the server when not set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_host: Option<String>,
    /// Default index for events sent with this token.
    pub default_index: String,
    /// Default source.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_source: Option<String>,
    /// Default sourcetype.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_sourcetype: Option<String>,
    /// Whether the token is disabled.
    #[serde(default)]
    pub disabled: bool,
    /// Whether indexer acknowledgement is enabled.
    #[serde(rename = "useACK", default)]
    pub use_ack: bool,
}

impl HecTokenSpec {
    /// A spec with only the required fields set.
    #[must_use]
    pub fn new(name: ResourceName, default_index: impl Into<String>) -> Self {
        Self {
            name,
            allowed_indexes: Vec::new(),
            default_host: None,
            default_index: default_index.into(),
            default_source: None,
            default_sourcetype: None,
            disabled: false,
            use_ack: false,
        }
    }

    /// Fill server-computed fields the caller left unset from `prior` state.
    ///
    /// An update that does not mention `default_host` keeps whatever host the
    /// server assigned, so the update wait must expect that value.
    #[must_use]
    pub fn inherit_computed(mut self, prior: &Self) -> Self {
        if is_unset(self.default_host.as_deref()) {
            self.default_host.clone_from(&prior.default_host);
        }
        self
    }
}

impl Matches<HecTokenSpec> for HecTokenSpec {
    fn matches(&self, expected: &HecTokenSpec) -> bool {
        self.name == expected.name
            && same_set(&self.allowed_indexes, &expected.allowed_indexes)
            && same_optional(self.default_host.as_deref(), expected.default_host.as_deref())
            && self.default_index == expected.default_index
            && same_optional(
                self.default_source.as_deref(),
                expected.default_source.as_deref(),
            )
            && same_optional(
                self.default_sourcetype.as_deref(),
                expected.default_sourcetype.as_deref(),
            )
            && self.disabled == expected.disabled
            && self.use_ack == expected.use_ack
    }
}

/// A HEC token as stored by ACS.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HecToken {
    /// The token's settings.
    pub spec: HecTokenSpec,
    /// The server-issued token value.
    #[serde(default)]
    pub token: String,
}

impl HecToken {
    /// Pair a spec with its token value.
    #[must_use]
    pub fn new(spec: HecTokenSpec, token: impl Into<String>) -> Self {
        Self {
            spec,
            token: token.into(),
        }
    }

    /// The token's name.
    #[must_use]
    pub const fn name(&self) -> &ResourceName {
        &self.spec.name
    }
}

// The token value is a credential; it never goes into logs.
impl fmt::Debug for HecToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HecToken")
            .field("spec", &self.spec)
            .field("token", &"<redacted>")
            .finish()
    }
}

impl Matches<HecTokenSpec> for HecToken {
    fn matches(&self, expected: &HecTokenSpec) -> bool {
        self.spec.matches(expected)
    }
}

fn is_unset(value: Option<&str>) -> bool {
    value.is_none_or(str::is_empty)
}

fn same_optional(a: Option<&str>, b: Option<&str>) -> bool {
    a.unwrap_or_default() == b.unwrap_or_default()
}

fn same_set(a: &[String], b: &[String]) -> bool {
    a.iter().collect::<BTreeSet<_>>() == b.iter().collect::<BTreeSet<_>>()
}
