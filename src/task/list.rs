//! ListTasks command

use crate::context::BoardContext;
use crate::error::TaskboardError;
use crate::operation::{async_trait, finish_unlogged, Execute, ExecutionResult, Operation};
use crate::types::{terminal_column, ColumnId};
use serde::Deserialize;
use serde_json::Value;

/// List tasks, optionally filtered to a single column.
///
/// Tasks are ordered by column position first, then by index within
/// the column, so the output reads top to bottom, left to right.
#[derive(Debug, Default, Deserialize)]
pub struct ListTasks {
    /// Restrict the listing to one column
    pub column: Option<ColumnId>,
    /// Only include ready tasks
    pub ready: bool,
}

impl ListTasks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter to a single column
    pub fn in_column(column: impl Into<ColumnId>) -> Self {
        Self {
            column: Some(column.into()),
            ready: false,
        }
    }

    /// Only include tasks whose prerequisites are all complete
    pub fn ready_only(mut self) -> Self {
        self.ready = true;
        self
    }
}

impl Operation for ListTasks {
    fn verb(&self) -> &'static str {
        "list"
    }
    fn noun(&self) -> &'static str {
        "tasks"
    }
    fn description(&self) -> &'static str {
        "List tasks in board order"
    }
}

#[async_trait]
impl Execute<BoardContext, TaskboardError> for ListTasks {
    async fn execute(&self, ctx: &BoardContext) -> ExecutionResult<Value, TaskboardError> {
        let result = async {
            let _lock = ctx.lock_shared().await?;

            if let Some(column) = &self.column {
                if !ctx.column_exists(column) {
                    return Err(TaskboardError::ColumnNotFound {
                        id: column.to_string(),
                    });
                }
            }

            let columns = ctx.read_all_columns().await?;
            let terminal = terminal_column(&columns)
                .map(|c| c.id.to_string())
                .unwrap_or_default();
            let column_order: std::collections::HashMap<&ColumnId, usize> =
                columns.iter().map(|c| (&c.id, c.position)).collect();

            let all_tasks = ctx.read_all_tasks().await?;
            let mut tasks: Vec<_> = all_tasks
                .iter()
                .filter(|t| {
                    self.column
                        .as_ref()
                        .map(|c| &t.position.column == c)
                        .unwrap_or(true)
                })
                .filter(|t| !self.ready || t.is_ready(&all_tasks, &terminal))
                .collect();
            tasks.sort_by_key(|t| {
                (
                    column_order.get(&t.position.column).copied().unwrap_or(usize::MAX),
                    t.position.index,
                )
            });

            let tasks_json: Vec<Value> = tasks
                .iter()
                .map(|task| {
                    let mut value = serde_json::to_value(task)?;
                    value["id"] = serde_json::json!(&task.id);
                    Ok(value)
                })
                .collect::<Result<_, TaskboardError>>()?;

            Ok(serde_json::json!({
                "count": tasks_json.len(),
                "tasks": tasks_json
            }))
        }
        .await;

        finish_unlogged(result)
    }
}
