//! Operation traits and logging primitives
//!
//! Operations are structs where the fields ARE the parameters. Each command
//! implements [`Operation`] for its metadata and [`Execute`] for its behavior.
//! Mutating commands return [`ExecutionResult::Logged`] so the processor can
//! persist an audit trail; read-only commands return
//! [`ExecutionResult::Unlogged`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Instant;

pub use async_trait::async_trait;

/// Metadata describing an operation
pub trait Operation {
    /// The verb (e.g. "add", "move")
    fn verb(&self) -> &'static str;

    /// The noun (e.g. "task", "column")
    fn noun(&self) -> &'static str;

    /// Human-readable description
    fn description(&self) -> &'static str;

    /// Canonical op string (e.g. "move task")
    fn op_string(&self) -> String {
        format!("{} {}", self.verb(), self.noun())
    }
}

/// Execute an operation against a context
#[async_trait]
pub trait Execute<C, E> {
    async fn execute(&self, ctx: &C) -> ExecutionResult<Value, E>;
}

/// Result of executing an operation
///
/// Distinguishes between:
/// - Logged: Operations that mutate state and should be audited
/// - Unlogged: Read-only operations with no side effects
/// - Failed: Errors (optionally logged)
pub enum ExecutionResult<T, E> {
    /// Operation succeeded and should be logged
    Logged { value: T, log_entry: LogEntry },
    /// Operation succeeded but no logging needed (read-only)
    Unlogged { value: T },
    /// Operation failed
    Failed {
        error: E,
        log_entry: Option<LogEntry>,
    },
}

impl<T, E> ExecutionResult<T, E> {
    /// Extract the result (Ok or Err)
    pub fn into_result(self) -> Result<T, E> {
        match self {
            Self::Logged { value, .. } => Ok(value),
            Self::Unlogged { value } => Ok(value),
            Self::Failed { error, .. } => Err(error),
        }
    }

    /// Get the value and log entry separately
    pub fn split(self) -> (Result<T, E>, Option<LogEntry>) {
        match self {
            Self::Logged { value, log_entry } => (Ok(value), Some(log_entry)),
            Self::Unlogged { value } => (Ok(value), None),
            Self::Failed { error, log_entry } => (Err(error), log_entry),
        }
    }

    /// Check if this should be logged
    pub fn should_log(&self) -> bool {
        matches!(
            self,
            Self::Logged { .. }
                | Self::Failed {
                    log_entry: Some(_),
                    ..
                }
        )
    }
}

/// Wrap a mutating command's result, attaching a log entry either way
pub fn finish_logged<E: std::fmt::Display>(
    op: &dyn Operation,
    input: Value,
    result: Result<Value, E>,
    start: Instant,
) -> ExecutionResult<Value, E> {
    let duration_ms = start.elapsed().as_millis() as u64;

    match result {
        Ok(value) => ExecutionResult::Logged {
            value: value.clone(),
            log_entry: LogEntry::new(op.op_string(), input, value, None, duration_ms),
        },
        Err(error) => {
            let error_msg = error.to_string();
            ExecutionResult::Failed {
                error,
                log_entry: Some(LogEntry::new(
                    op.op_string(),
                    input,
                    serde_json::json!({"error": error_msg}),
                    None,
                    duration_ms,
                )),
            }
        }
    }
}

/// Wrap a read-only command's result
pub fn finish_unlogged<E>(result: Result<Value, E>) -> ExecutionResult<Value, E> {
    match result {
        Ok(value) => ExecutionResult::Unlogged { value },
        Err(error) => ExecutionResult::Failed {
            error,
            log_entry: None,
        },
    }
}

/// A log entry recording an operation execution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    /// Unique ID for this log entry (ULID format)
    pub id: String,

    /// When the operation occurred
    pub timestamp: DateTime<Utc>,

    /// Canonical op string (e.g., "add task", "move task")
    pub op: String,

    /// The normalized input parameters (as JSON)
    pub input: Value,

    /// The result value or error (as JSON)
    pub output: Value,

    /// Who performed the operation (optional)
    /// Format: "user_id" or "agent_name[session_id]"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actor: Option<String>,

    /// How long the operation took (milliseconds)
    pub duration_ms: u64,
}

impl LogEntry {
    /// Create a new log entry
    pub fn new(
        op: impl Into<String>,
        input: Value,
        output: Value,
        actor: Option<String>,
        duration_ms: u64,
    ) -> Self {
        Self {
            id: ulid::Ulid::new().to_string(),
            timestamp: Utc::now(),
            op: op.into(),
            input,
            output,
            actor,
            duration_ms,
        }
    }

    /// Set the actor
    pub fn with_actor(mut self, actor: impl Into<String>) -> Self {
        self.actor = Some(actor.into());
        self
    }
}
