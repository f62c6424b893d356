//! DeleteColumn command

use crate::context::{BoardContext, Changeset};
use crate::error::TaskboardError;
use crate::operation::{async_trait, finish_logged, Execute, ExecutionResult, Operation};
use crate::ordering::{plan_removal, Slot};
use crate::types::ColumnId;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Delete a column (fails if it has tasks); closes the position gap
#[derive(Debug, Deserialize, Serialize)]
pub struct DeleteColumn {
    /// The column ID to delete
    pub id: ColumnId,
}

impl DeleteColumn {
    /// Create a new DeleteColumn command
    pub fn new(id: impl Into<ColumnId>) -> Self {
        Self { id: id.into() }
    }
}

impl Operation for DeleteColumn {
    fn verb(&self) -> &'static str {
        "delete"
    }
    fn noun(&self) -> &'static str {
        "column"
    }
    fn description(&self) -> &'static str {
        "Delete an empty column"
    }
}

#[async_trait]
impl Execute<BoardContext, TaskboardError> for DeleteColumn {
    async fn execute(&self, ctx: &BoardContext) -> ExecutionResult<Value, TaskboardError> {
        let start = std::time::Instant::now();
        let input = serde_json::to_value(self).unwrap();

        let result = async {
            let _lock = ctx.lock().await?;
            let columns = ctx.read_all_columns().await?;

            let column = columns
                .iter()
                .find(|c| c.id == self.id)
                .cloned()
                .ok_or_else(|| TaskboardError::ColumnNotFound {
                    id: self.id.to_string(),
                })?;

            let tasks = ctx.read_all_tasks().await?;
            let task_count = tasks
                .iter()
                .filter(|t| t.position.column == self.id)
                .count();
            if task_count > 0 {
                return Err(TaskboardError::ColumnNotEmpty {
                    id: self.id.to_string(),
                    count: task_count,
                });
            }

            let slots: Vec<Slot<ColumnId>> = columns
                .iter()
                .map(|c| Slot::new(c.id.clone(), c.position))
                .collect();

            let mut change = Changeset::new();
            for update in plan_removal(&slots, column.position) {
                let mut shifted = columns
                    .iter()
                    .find(|c| c.id == update.id)
                    .cloned()
                    .expect("update refers to a known column");
                shifted.position = update.index;
                change.write_column(shifted);
            }
            change.delete_column(self.id.clone());
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
