//! Error types for the taskboard engine

use std::path::PathBuf;
use thiserror::Error;

/// Result type for taskboard operations
pub type Result<T> = std::result::Result<T, TaskboardError>;

/// Errors that can occur in taskboard operations
#[derive(Debug, Error)]
pub enum TaskboardError {
    /// Board not initialized at the given path
    #[error("board not initialized at {path}")]
    NotInitialized { path: PathBuf },

    /// Board already exists
    #[error("board already exists at {path}")]
    AlreadyExists { path: PathBuf },

    /// Task not found
    #[error("task not found: {id}")]
    TaskNotFound { id: String },

    /// Column not found
    #[error("column not found: {id}")]
    ColumnNotFound { id: String },

    /// Column has tasks and cannot be deleted
    #[error("column '{id}' has {count} tasks and cannot be deleted")]
    ColumnNotEmpty { id: String, count: usize },

    /// Duplicate ID
    #[error("duplicate {item_type} ID: {id}")]
    DuplicateId { item_type: String, id: String },

    /// A task cannot depend on itself
    #[error("task {id} cannot depend on itself")]
    SelfDependency { id: String },

    /// The dependency edge already exists
    #[error("task {task} already depends on {depends_on}")]
    DuplicateDependency { task: String, depends_on: String },

    /// Adding the edge would create a dependency cycle
    #[error("dependency cycle: {depends_on} already depends on {task}")]
    DependencyCycle { task: String, depends_on: String },

    /// The dependency edge does not exist
    #[error("task {task} does not depend on {depends_on}")]
    DependencyNotFound { task: String, depends_on: String },

    /// Invalid field value
    #[error("invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    /// Lock is held by another process - the caller should retry the
    /// whole operation
    #[error("lock busy - another operation in progress")]
    LockBusy,

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl TaskboardError {
    /// Create a DuplicateId error
    pub fn duplicate_id(item_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self::DuplicateId {
            item_type: item_type.into(),
            id: id.into(),
        }
    }

    /// Create an InvalidValue error
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Whether the failed operation can be retried as-is
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::LockBusy)
    }
}
