//! RemoveDependency command

use crate::context::BoardContext;
use crate::error::TaskboardError;
use crate::operation::{async_trait, finish_logged, Execute, ExecutionResult, Operation};
use crate::types::TaskId;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Remove a dependency edge. Removing edges can never introduce a cycle,
/// so no re-validation runs.
#[derive(Debug, Deserialize, Serialize)]
pub struct RemoveDependency {
    /// The dependent task
    pub id: TaskId,
    /// The prerequisite task to unlink
    pub depends_on: TaskId,
}

impl RemoveDependency {
    /// Create a new RemoveDependency command
    pub fn new(id: impl Into<TaskId>, depends_on: impl Into<TaskId>) -> Self {
        Self {
            id: id.into(),
            depends_on: depends_on.into(),
        }
    }
}

impl Operation for RemoveDependency {
    fn verb(&self) -> &'static str {
        "undepend"
    }
    fn noun(&self) -> &'static str {
        "task"
    }
    fn description(&self) -> &'static str {
        "Remove a dependency between two tasks"
    }
}

#[async_trait]
impl Execute<BoardContext, TaskboardError> for RemoveDependency {
    async fn execute(&self, ctx: &BoardContext) -> ExecutionResult<Value, TaskboardError> {
        let start = std::time::Instant::now();
        let input = serde_json::to_value(self).unwrap();

        let result = async {
            let _lock = ctx.lock().await?;
            let mut task = ctx.read_task(&self.id).await?;

            if !task.depends_on.contains(&self.depends_on) {
                return Err(TaskboardError::DependencyNotFound {
                    task: self.id.to_string(),
                    depends_on: self.depends_on.to_string(),
                });
            }

            task.depends_on.retain(|d| d != &self.depends_on);
            ctx.write_task(&task).await?;

            let mut result = serde_json::to_value(&task)?;
            result["id"] = serde_json::json!(&task.id);
            Ok(result)
        }
        .await;

        finish_logged(self, input, result, start)
    }
}
