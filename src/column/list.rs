//! ListColumns command

use crate::context::BoardContext;
use crate::error::TaskboardError;
use crate::operation::{async_trait, finish_unlogged, Execute, ExecutionResult, Operation};
use serde::Deserialize;
use serde_json::Value;

/// List all columns ordered by position
#[derive(Debug, Default, Deserialize)]
pub struct ListColumns;

impl ListColumns {
    pub fn new() -> Self {
        Self
    }
}

impl Operation for ListColumns {
    fn verb(&self) -> &'static str {
        "list"
    }
    fn noun(&self) -> &'static str {
        "columns"
    }
    fn description(&self) -> &'static str {
        "List all columns ordered by position"
    }
}

#[async_trait]
impl Execute<BoardContext, TaskboardError> for ListColumns {
    async fn execute(&self, ctx: &BoardContext) -> ExecutionResult<Value, TaskboardError> {
        let result = async {
            let _lock = ctx.lock_shared().await?;
            let mut columns = ctx.read_all_columns().await?;
            columns.sort_by_key(|c| c.position);

            let columns_json: Vec<Value> = columns
                .iter()
                .map(|column| {
                    let mut value = serde_json::to_value(column)?;
                    value["id"] = serde_json::json!(column.id);
                    Ok(value)
                })
                .collect::<Result<_, TaskboardError>>()?;

            Ok(serde_json::json!({
                "columns": columns_json,
                "count": columns.len()
            }))
        }
        .await;

        finish_unlogged(result)
    }
}
