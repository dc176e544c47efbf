//! Resource identifiers.
//!
//! Every ACS resource handled here (HEC tokens, indexes) is addressed by name.
//! Names end up in URL paths, so they are validated once at the edge.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The name of an ACS resource.
///
/// Non-empty, at most [`ResourceName::MAX_LEN`] bytes, and free of `/`,
/// whitespace and control characters.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ResourceName(String);

impl ResourceName {
    /// Longest accepted name, in bytes.
    pub const MAX_LEN: usize = 255;

    /// Validate and wrap a resource name.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is empty, too long, or contains a
    /// character that cannot appear in a URL path segment.
    pub fn new(name: impl Into<String>) -> Result<Self, IdError> {
        let name = name.into();
        if name.is_empty() {
            return Err(IdError::Empty);
        }
        if name.len() > Self::MAX_LEN {
            return Err(IdError::TooLong {
                max: Self::MAX_LEN,
                got: name.len(),
            });
        }
        if let Some(ch) = name
            .chars()
            .find(|ch| *ch == '/' || ch.is_whitespace() || ch.is_control())
        {
            return Err(IdError::InvalidCharacter(ch));
        }
        Ok(Self(name))
    }

    /// Return the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ResourceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ResourceName({})", self.0)
    }
}

impl fmt::Display for ResourceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ResourceName {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for ResourceName {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ResourceName> for String {
    fn from(name: ResourceName) -> Self {
        name.0
    }
}

impl AsRef<str> for ResourceName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Errors that can occur when parsing a resource name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdError {
    /// The name is empty.
    #[error("name must not be empty")]
    Empty,

    /// The name exceeds the maximum length.
    #[error("name too long: at most {max} bytes, got {got}")]
    TooLong {
        /// The maximum number of bytes.
        max: usize,
        /// The actual number of bytes.
        got: usize,
    },

    /// The name contains a character that is not allowed.
    #[error("name contains invalid character {0:?}")]
    InvalidCharacter(char),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_typical_names() {
        for name in ["main", "web_logs", "ci-token", "metrics.prod"] {
            let parsed = ResourceName::new(name).unwrap();
            assert_eq!(parsed.as_str(), name);
            assert_eq!(parsed.to_string(), name);
        }
    }

    #[test]
    fn rejects_empty() {
        assert_eq!(ResourceName::new(""), Err(IdError::Empty));
    }

    #[test]
    fn rejects_path_separators_and_whitespace() {
        assert_eq!(
            ResourceName::new("a/b"),
            Err(IdError::InvalidCharacter('/'))
        );
        assert_eq!(
            ResourceName::new("web logs"),
            Err(IdError::InvalidCharacter(' '))
        );
        assert!(matches!(
            "tab\there".parse::<ResourceName>(),
            Err(IdError::InvalidCharacter('\t'))
        ));
    }

    #[test]
    fn rejects_overlong_names() {
        let name = "x".repeat(ResourceName::MAX_LEN + 1);
        assert!(matches!(
            ResourceName::new(name),
            Err(IdError::TooLong { max: 255, got: 256 })
        ));
        assert!(ResourceName::new("x".repeat(ResourceName::MAX_LEN)).is_ok());
    }

    #[test]
    fn serde_validates() {
        let name: ResourceName = serde_json::from_str("\"main\"").unwrap();
        assert_eq!(name.as_str(), "main");
        assert_eq!(serde_json::to_string(&name).unwrap(), "\"main\"");

        assert!(serde_json::from_str::<ResourceName>("\"\"").is_err());
    }

    #[test]
    fn debug_format() {
        let name = ResourceName::new("main").unwrap();
        assert_eq!(format!("{name:?}"), "ResourceName(main)");
    }
}
