//! GetBoard command

use crate::context::BoardContext;
use crate::error::TaskboardError;
use crate::operation::{async_trait, finish_unlogged, Execute, ExecutionResult, Operation};
use serde::Deserialize;
use serde_json::Value;

/// Get the board with its columns and per-column task counts
#[derive(Debug, Default, Deserialize)]
pub struct GetBoard;

impl GetBoard {
    pub fn new() -> Self {
        Self
    }
}

impl Operation for GetBoard {
    fn verb(&self) -> &'static str {
        "get"
    }
    fn noun(&self) -> &'static str {
        "board"
    }
    fn description(&self) -> &'static str {
        "Retrieve the board with columns and task counts"
    }
}

#[async_trait]
impl Execute<BoardContext, TaskboardError> for GetBoard {
    async fn execute(&self, ctx: &BoardContext) -> ExecutionResult<Value, TaskboardError> {
        let result = async {
            let _lock = ctx.lock_shared().await?;
            let board = ctx.read_board().await?;
            let mut columns = ctx.read_all_columns().await?;
            columns.sort_by_key(|c| c.position);
            let tasks = ctx.read_all_tasks().await?;

            let columns_json: Vec<Value> = columns
                .iter()
                .map(|column| {
                    let mut value = serde_json::to_value(column)?;
                    value["id"] = serde_json::json!(column.id);
                    value["task_count"] = serde_json::json!(tasks
                        .iter()
                        .filter(|t| t.position.column == column.id)
                        .count());
                    Ok(value)
                })
                .collect::<Result<_, TaskboardError>>()?;

            let mut result = serde_json::to_value(&board)?;
            result["columns"] = Value::Array(columns_json);
            result["task_count"] = serde_json::json!(tasks.len());
            Ok(result)
        }
        .await;

        finish_unlogged(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::InitBoard;
    use crate::task::AddTask;
    use tempfile::TempDir;

    async fn setup() -> (TempDir, BoardContext) {
        let temp = TempDir::new().unwrap();
        let board_dir = temp.path().join(".taskboard");
        let ctx = BoardContext::new(board_dir);

        InitBoard::new("Test")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();

        (temp, ctx)
    }

    #[tokio::test]
    async fn test_get_board() {
        let (_temp, ctx) = setup().await;

        AddTask::new("Task").execute(&ctx).await.into_result().unwrap();

        let result = GetBoard::new().execute(&ctx).await.into_result().unwrap();
        assert_eq!(result["name"], "Test");
        assert_eq!(result["task_count"], 1);

        let columns = result["columns"].as_array().unwrap();
        assert_eq!(columns.len(), 3);
        assert_eq!(columns[0]["id"], "todo");
        assert_eq!(columns[0]["task_count"], 1);
    }

    #[tokio::test]
    async fn test_get_board_not_initialized() {
        let temp = TempDir::new().unwrap();
        let ctx = BoardContext::new(temp.path().join(".taskboard"));

        let result = GetBoard::new().execute(&ctx).await.into_result();
        assert!(matches!(result, Err(TaskboardError::NotInitialized { .. })));
    }
}
