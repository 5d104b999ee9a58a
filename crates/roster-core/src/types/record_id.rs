//! Record identifier type.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, InvalidInputError};

/// A server-assigned record identifier.
///
/// Identifiers are opaque strings. They are inserted into URL paths, so they
/// must be non-empty, may not contain path separators or whitespace, and may
/// not be a dot segment.
///
/// # Example
///
/// ```
/// use roster_core::RecordId;
///
/// let id = RecordId::new("64f1c2ab9e").unwrap();
/// assert_eq!(id.as_str(), "64f1c2ab9e");
/// assert!(RecordId::new("a/b").is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RecordId(String);

impl RecordId {
    /// Create a new record id, validating the format.
    ///
    /// # Errors
    ///
    /// Returns an error if the id is empty, is `.` or `..`, or contains `/`,
    /// `?`, `#` or whitespace.
    pub fn new(s: impl Into<String>) -> Result<Self, Error> {
        let s = s.into();
        Self::validate(&s)?;
        Ok(Self(s))
    }

    /// Returns the id string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn validate(s: &str) -> Result<(), Error> {
        if s.is_empty() {
            return Err(InvalidInputError::RecordId {
                value: s.to_string(),
                reason: "cannot be empty".to_string(),
            }
            .into());
        }

        if matches!(s, "." | "..") {
            return Err(InvalidInputError::RecordId {
                value: s.to_string(),
                reason: "cannot be a dot segment".to_string(),
            }
            .into());
        }

        if let Some(c) = s
            .chars()
            .find(|c| c.is_whitespace() || matches!(c, '/' | '?' | '#'))
        {
            return Err(InvalidInputError::RecordId {
                value: s.to_string(),
                reason: format!("contains invalid character '{}'", c.escape_default()),
            }
            .into());
        }

        Ok(())
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for RecordId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for RecordId {
    type Error = Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<RecordId> for String {
    fn from(id: RecordId) -> Self {
        id.0
    }
}

impl AsRef<str> for RecordId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_ids() {
        assert!(RecordId::new("abc123").is_ok());
        assert!(RecordId::new("64f1c2ab9e0d").is_ok());
        assert!(RecordId::new("42").is_ok());
    }

    #[test]
    fn rejects_empty() {
        assert!(RecordId::new("").is_err());
    }

    #[test]
    fn rejects_path_characters() {
        assert!(RecordId::new("a/b").is_err());
        assert!(RecordId::new("a?b").is_err());
        assert!(RecordId::new("a b").is_err());
    }

    #[test]
    fn rejects_dot_segments() {
        assert!(RecordId::new(".").is_err());
        assert!(RecordId::new("..").is_err());
        assert!(RecordId::new("...").is_ok());
        assert!(RecordId::new("v1.2").is_ok());
    }

    #[test]
    fn serde_roundtrip() {
        let id = RecordId::new("abc123").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"abc123\"");
        let parsed: RecordId = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, id);
        assert!(serde_json::from_str::<RecordId>("\"\"").is_err());
    }
}
