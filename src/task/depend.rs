//! AddDependency command

use crate::context::BoardContext;
use crate::error::TaskboardError;
use crate::graph::DependencyGraph;
use crate::operation::{async_trait, finish_logged, Execute, ExecutionResult, Operation};
use crate::types::TaskId;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Add a dependency edge: the task depends on (is blocked by) another.
///
/// The check and the write happen under the board's exclusive lock, so a
/// concurrent insert cannot slip between the cycle check and the persist.
#[derive(Debug, Deserialize, Serialize)]
pub struct AddDependency {
    /// The dependent task
    pub id: TaskId,
    /// The prerequisite task
    pub depends_on: TaskId,
}

impl AddDependency {
    /// Create a new AddDependency command
    pub fn new(id: impl Into<TaskId>, depends_on: impl Into<TaskId>) -> Self {
        Self {
            id: id.into(),
            depends_on: depends_on.into(),
        }
    }
}

impl Operation for AddDependency {
    fn verb(&self) -> &'static str {
        "depend"
    }
    fn noun(&self) -> &'static str {
        "task"
    }
    fn description(&self) -> &'static str {
        "Make a task depend on another task"
    }
}

#[async_trait]
impl Execute<BoardContext, TaskboardError> for AddDependency {
    async fn execute(&self, ctx: &BoardContext) -> ExecutionResult<Value, TaskboardError> {
        let start = std::time::Instant::now();
        let input = serde_json::to_value(self).unwrap();

        let result = async {
            let _lock = ctx.lock().await?;
            let mut task = ctx.read_task(&self.id).await?;

            if !ctx.task_exists(&self.depends_on) {
                return Err(TaskboardError::TaskNotFound {
                    id: self.depends_on.to_string(),
                });
            }

            let all_tasks = ctx.read_all_tasks().await?;
            let graph = DependencyGraph::from_tasks(&all_tasks);
            graph.check_new_edge(&self.id, &self.depends_on)?;

            task.depends_on.push(self.depends_on.clone());
            ctx.write_task(&task).await?;

            let mut result = serde_json::to_value(&task)?;
            result["id"] = serde_json::json!(&task.id);
            Ok(result)
        }
        .await;

        finish_logged(self, input, result, start)
    }
}
