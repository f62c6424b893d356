//! GetColumn command

use crate::context::BoardContext;
use crate::error::TaskboardError;
use crate::operation::{async_trait, finish_unlogged, Execute, ExecutionResult, Operation};
use crate::types::ColumnId;
use serde::Deserialize;
use serde_json::Value;

/// Get a column by ID with its task count
#[derive(Debug, Deserialize)]
pub struct GetColumn {
    /// The column ID to retrieve
    pub id: ColumnId,
}

impl GetColumn {
    /// Create a new GetColumn command
    pub fn new(id: impl Into<ColumnId>) -> Self {
        Self { id: id.into() }
    }
}

impl Operation for GetColumn {
    fn verb(&self) -> &'static str {
        "get"
    }
    fn noun(&self) -> &'static str {
        "column"
    }
    fn description(&self) -> &'static str {
        "Retrieve a column by ID with its task count"
    }
}

#[async_trait]
impl Execute<BoardContext, TaskboardError> for GetColumn {
    async fn execute(&self, ctx: &BoardContext) -> ExecutionResult<Value, TaskboardError> {
        let result = async {
            let _lock = ctx.lock_shared().await?;
            let column = ctx.read_column(&self.id).await?;
            let tasks = ctx.read_all_tasks().await?;
            let task_count = tasks
                .iter()
                .filter(|t| t.position.column == self.id)
                .count();

            let mut result = serde_json::to_value(&column)?;
            result["id"] = serde_json::json!(&column.id);
            result["task_count"] = serde_json::json!(task_count);
            Ok(result)
        }
        .await;

        finish_unlogged(result)
    }
}
