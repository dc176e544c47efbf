//! Stack status.

use serde::{Deserialize, Serialize};

/// Type and version of the Splunk Cloud stack behind a deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackStatus {
    /// Stack type, e.g. `victoria`.
    #[serde(rename = "stackType")]
    pub stack_type: String,
    /// Splunk version running on the stack.
    #[serde(rename = "stackVersion")]
    pub version: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_stack_fields() {
        let status: StackStatus =
            serde_json::from_str(r#"{"stackType":"victoria","stackVersion":"9.1.2308.203"}"#)
                .unwrap();
        assert_eq!(status.stack_type, "victoria");
        assert_eq!(status.version, "9.1.2308.203");
    }
}
