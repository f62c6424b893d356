//! DeleteTask command

use crate::context::{BoardContext, Changeset};
use crate::error::TaskboardError;
use crate::operation::{async_trait, finish_logged, Execute, ExecutionResult, Operation};
use crate::ordering::{plan_removal, Slot};
use crate::types::{Task, TaskId};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Delete a task: closes its column's position gap and strips the dangling
/// dependency edge from every task that depended on it, all in one commit
#[derive(Debug, Deserialize, Serialize)]
pub struct DeleteTask {
    /// The task ID to delete
    pub id: TaskId,
}

impl DeleteTask {
    /// Create a new DeleteTask command
    pub fn new(id: impl Into<TaskId>) -> Self {
        Self { id: id.into() }
    }
}

impl Operation for DeleteTask {
    fn verb(&self) -> &'static str {
        "delete"
    }
    fn noun(&self) -> &'static str {
        "task"
    }
    fn description(&self) -> &'static str {
        "Delete a task and repair ordering and dependencies"
    }
}

#[async_trait]
impl Execute<BoardContext, TaskboardError> for DeleteTask {
    async fn execute(&self, ctx: &BoardContext) -> ExecutionResult<Value, TaskboardError> {
        let start = std::time::Instant::now();
        let input = serde_json::to_value(self).unwrap();

        let result = async {
            let _lock = ctx.lock().await?;
            let task = ctx.read_task(&self.id).await?;
            let all_tasks = ctx.read_all_tasks().await?;

            // A sibling may need both an index shift and an edge strip;
            // accumulate per task so each file is written once.
            let mut pending: HashMap<TaskId, Task> = HashMap::new();

            let slots: Vec<Slot<TaskId>> = all_tasks
                .iter()
                .filter(|t| t.position.column == task.position.column)
                .map(|t| Slot::new(t.id.clone(), t.position.index))
                .collect();

            for update in plan_removal(&slots, task.position.index) {
                let entry = pending.entry(update.id.clone()).or_insert_with(|| {
                    all_tasks
                        .iter()
                        .find(|t| t.id == update.id)
                        .cloned()
                        .expect("update refers to a known task")
                });
                entry.position.index = update.index;
            }

            for dependent in all_tasks.iter().filter(|t| t.depends_on.contains(&self.id)) {
                let entry = pending
                    .entry(dependent.id.clone())
                    .or_insert_with(|| dependent.clone());
                entry.depends_on.retain(|d| d != &self.id);
            }

            let mut change = Changeset::new();
            for task in pending.into_values() {
                change.write_task(task);
            }
            change.delete_task(self.id.clone());
            ctx.commit(&change).await?;

            Ok(serde_json::json!({
                "deleted": true,
                "id": self.id.to_string()
            }))
        }
        .await;

        finish_logged(self, input, result, start)
    }
}
