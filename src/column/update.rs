//! UpdateColumn command

use crate::context::BoardContext;
use crate::error::TaskboardError;
use crate::operation::{async_trait, finish_logged, Execute, ExecutionResult, Operation};
use crate::types::ColumnId;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Rename a column
#[derive(Debug, Deserialize, Serialize)]
pub struct UpdateColumn {
    /// The column ID to update
    pub id: ColumnId,
    /// The new display name
    pub name: String,
}

impl UpdateColumn {
    /// Create a new UpdateColumn command
    pub fn new(id: impl Into<ColumnId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

impl Operation for UpdateColumn {
    fn verb(&self) -> &'static str {
        "update"
    }
    fn noun(&self) -> &'static str {
        "column"
    }
    fn description(&self) -> &'static str {
        "Rename a column"
    }
}

#[async_trait]
impl Execute<BoardContext, TaskboardError> for UpdateColumn {
    async fn execute(&self, ctx: &BoardContext) -> ExecutionResult<Value, TaskboardError> {
        let start = std::time::Instant::now();
        let input = serde_json::to_value(self).unwrap();

        let result = async {
            let _lock = ctx.lock().await?;

            if self.name.is_empty() {
                return Err(TaskboardError::invalid_value("name", "must not be empty"));
            }

            let mut column = ctx.read_column(&self.id).await?;
            column.name = self.name.clone();
            ctx.write_column(&column).await?;

            let mut result = serde_json::to_value(&column)?;
            result["id"] = serde_json::json!(&column.id);
            Ok(result)
        }
        .await;

        finish_logged(self, input, result, start)
    }
}
