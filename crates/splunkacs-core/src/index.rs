//! Splunk indexes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use splunkacs_reconcile::Matches;

use crate::error::CoreError;
use crate::ids::ResourceName;

/// The kind of data an index stores.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexDataType {
    /// Event data.
    #[default]
    Event,
    /// Metric data.
    Metric,
}

impl IndexDataType {
    /// The wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Event => "event",
            Self::Metric => "metric",
        }
    }
}

impl fmt::Display for IndexDataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IndexDataType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "event" => Ok(Self::Event),
            "metric" => Ok(Self::Metric),
            other => Err(CoreError::InvalidDataType(other.to_string())),
        }
    }
}

/// The caller-controlled settings of an index.
///
/// Doubles as the create request body and the projection compared by index
/// waits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexSpec {
    /// Index name.
    pub name: ResourceName,
    /// Event or metric index.
    #[serde(rename = "datatype", default)]
    pub data_type: IndexDataType,
    /// Days of data kept searchable.
    #[serde(default)]
    pub searchable_days: u32,
    /// Maximum index size in MB (0 means unlimited).
    #[serde(rename = "maxDataSizeMB", default)]
    pub max_data_size_mb: u64,
}

impl IndexSpec {
    /// The update body that moves an existing index to this spec.
    ///
    /// Only retention settings can be changed in place.
    #[must_use]
    pub const fn patch(&self) -> IndexPatch {
        IndexPatch {
            searchable_days: Some(self.searchable_days),
            max_data_size_mb: Some(self.max_data_size_mb),
        }
    }
}

/// Partial update of an index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexPatch {
    /// New searchable days, if changing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub searchable_days: Option<u32>,
    /// New maximum size in MB, if changing.
    #[serde(
        rename = "maxDataSizeMB",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub max_data_size_mb: Option<u64>,
}

/// An index as reported by ACS.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Index {
    /// The comparable settings.
    #[serde(flatten)]
    pub spec: IndexSpec,
    /// Number of events stored; server-computed.
    #[serde(default)]
    pub total_event_count: String,
    /// Raw data size in MB; server-computed.
    #[serde(rename = "totalRawSizeMB", default)]
    pub total_raw_size_mb: String,
}

impl Index {
    /// The index name.
    #[must_use]
    pub const fn name(&self) -> &ResourceName {
        &self.spec.name
    }
}

impl Matches<IndexSpec> for Index {
    fn matches(&self, expected: &IndexSpec) -> bool {
        self.spec == *expected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec() -> IndexSpec {
        IndexSpec {
            name: ResourceName::new("web_logs").unwrap(),
            data_type: IndexDataType::Event,
            searchable_days: 90,
            max_data_size_mb: 512,
        }
    }

    #[test]
    fn data_type_parse() {
        assert_eq!("event".parse::<IndexDataType>().unwrap(), IndexDataType::Event);
        assert_eq!("metric".parse::<IndexDataType>().unwrap(), IndexDataType::Metric);
        assert_eq!(
            "logs".parse::<IndexDataType>(),
            Err(CoreError::InvalidDataType("logs".to_string()))
        );
        assert!(serde_json::from_str::<IndexDataType>("\"Event\"").is_err());
    }

    #[test]
    fn counters_are_not_compared() {
        let remote = Index {
            spec: spec(),
            total_event_count: "1200".to_string(),
            total_raw_size_mb: "3".to_string(),
        };
        assert!(remote.matches(&spec()));
    }

    #[test]
    fn retention_change_is_a_mismatch() {
        let remote = Index {
            spec: spec(),
            total_event_count: String::new(),
            total_raw_size_mb: String::new(),
        };
        let mut expected = spec();
        expected.searchable_days = 30;
        assert!(!remote.matches(&expected));
    }

    #[test]
    fn decodes_flat_wire_format() {
        let index: Index = serde_json::from_str(
            r#"{
                "name": "web_logs",
                "datatype": "metric",
                "searchableDays": 90,
                "maxDataSizeMB": 512,
                "totalEventCount": "0",
                "totalRawSizeMB": "0"
            }"#,
        )
        .unwrap();

        assert_eq!(index.name().as_str(), "web_logs");
        assert_eq!(index.spec.data_type, IndexDataType::Metric);
        assert_eq!(index.spec.max_data_size_mb, 512);
        assert_eq!(index.total_event_count, "0");
    }

    #[test]
    fn patch_carries_retention_only() {
        let json = serde_json::to_value(spec().patch()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"searchableDays": 90, "maxDataSizeMB": 512})
        );

        let empty = serde_json::to_value(IndexPatch::default()).unwrap();
        assert_eq!(empty, serde_json::json!({}));
    }
}
