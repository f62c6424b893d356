//! Operation processor - executes commands and persists their audit trail

use crate::context::BoardContext;
use crate::error::{Result, TaskboardError};
use crate::operation::{Execute, Operation};
use crate::types::TaskId;
use serde_json::Value;

/// Runs operations against a context, appending log entries for every
/// logged execution: to the global activity log always, and to the
/// affected task's own log for task operations.
#[derive(Debug, Default)]
pub struct BoardOperationProcessor {
    actor: Option<String>,
}

impl BoardOperationProcessor {
    /// Processor with no actor attribution
    pub fn new() -> Self {
        Self { actor: None }
    }

    /// Processor attributing operations to an actor
    /// (format: "user_id" or "agent_name[session_id]")
    pub fn with_actor(actor: impl Into<String>) -> Self {
        Self {
            actor: Some(actor.into()),
        }
    }

    /// Execute an operation and persist its log entry if it produced one
    pub async fn process<O>(&self, op: &O, ctx: &BoardContext) -> Result<Value>
    where
        O: Execute<BoardContext, TaskboardError> + Operation + Sync,
    {
        let noun = op.noun();
        let (result, log_entry) = op.execute(ctx).await.split();

        if let Some(mut entry) = log_entry {
            if let Some(actor) = &self.actor {
                entry = entry.with_actor(actor.clone());
            }

            ctx.append_activity(&entry).await?;

            // Task operations also land in the task's own log
            if noun == "task" {
                if let Some(task_id) = result
                    .as_ref()
                    .ok()
                    .and_then(|v| v.get("id"))
                    .and_then(|v| v.as_str())
                {
                    let id = TaskId::from_string(task_id);
                    if ctx.task_exists(&id) {
                        ctx.append_task_log(&id, &entry).await?;
                    }
                }
            }
        }

        result
    }
}
