//! Newtype identifiers for board entities

use serde::{Deserialize, Serialize};
use std::fmt;

/// A task identifier (ULID)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    /// Generate a fresh ULID-based task ID
    pub fn new() -> Self {
        Self(ulid::Ulid::new().to_string())
    }

    /// Wrap an existing ID string (e.g. read back from a filename)
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for TaskId {
    fn from(s: &str) -> Self {
        Self::from_string(s)
    }
}

impl From<String> for TaskId {
    fn from(s: String) -> Self {
        Self::from_string(s)
    }
}

/// A column identifier (human-readable slug, e.g. "todo")
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(transparent)]
pub struct ColumnId(String);

impl ColumnId {
    /// Wrap an existing slug
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Check that the slug is non-empty and filesystem/URL safe
    pub fn is_valid_slug(&self) -> bool {
        !self.0.is_empty()
            && self
                .0
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_'))
    }
}

impl fmt::Display for ColumnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ColumnId {
    fn from(s: &str) -> Self {
        Self::from_string(s)
    }
}

impl From<String> for ColumnId {
    fn from(s: String) -> Self {
        Self::from_string(s)
    }
}
