//! NextTask command

use crate::context::BoardContext;
use crate::error::TaskboardError;
use crate::operation::{async_trait, finish_unlogged, Execute, ExecutionResult, Operation};
use crate::types::{first_column, terminal_column};
use serde::Deserialize;
use serde_json::Value;

/// Suggest the next task to work on: the oldest ready task in the first
/// column. ULID ids sort by creation time, so "oldest" is the smallest id.
#[derive(Debug, Default, Deserialize)]
pub struct NextTask;

impl NextTask {
    pub fn new() -> Self {
        Self
    }
}

impl Operation for NextTask {
    fn verb(&self) -> &'static str {
        "next"
    }
    fn noun(&self) -> &'static str {
        "task"
    }
    fn description(&self) -> &'static str {
        "Suggest the next ready task to start"
    }
}

#[async_trait]
impl Execute<BoardContext, TaskboardError> for NextTask {
    async fn execute(&self, ctx: &BoardContext) -> ExecutionResult<Value, TaskboardError> {
        let result = async {
            let _lock = ctx.lock_shared().await?;
            let columns = ctx.read_all_columns().await?;
            let first = first_column(&columns).ok_or_else(|| TaskboardError::NotInitialized {
                path: ctx.root().to_path_buf(),
            })?;
            let terminal = terminal_column(&columns)
                .map(|c| c.id.to_string())
                .unwrap_or_default();

            let all_tasks = ctx.read_all_tasks().await?;
            let next = all_tasks
                .iter()
                .filter(|t| t.position.column == first.id)
                .filter(|t| t.is_ready(&all_tasks, &terminal))
                .min_by(|a, b| a.id.cmp(&b.id));

            match next {
                Some(task) => {
                    let mut value = serde_json::to_value(task)?;
                    value["id"] = serde_json::json!(&task.id);
                    Ok(serde_json::json!({ "task": value }))
                }
                None => Ok(serde_json::json!({ "task": Value::Null })),
            }
        }
        .await;

        finish_unlogged(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::InitBoard;
    use crate::task::{AddDependency, AddTask, MoveTask};
    use crate::types::TaskId;
    use tempfile::TempDir;

    async fn setup() -> (TempDir, BoardContext) {
        let temp = TempDir::new().unwrap();
        let ctx = BoardContext::new(temp.path().join(".taskboard"));
        InitBoard::new("Test")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        (temp, ctx)
    }

    async fn add_task(ctx: &BoardContext, title: &str) -> TaskId {
        let result = AddTask::new(title).execute(ctx).await.into_result().unwrap();
        TaskId::from_string(result["id"].as_str().unwrap())
    }

    #[tokio::test]
    async fn test_next_returns_oldest_ready() {
        let (_temp, ctx) = setup().await;

        let first = add_task(&ctx, "First").await;
        add_task(&ctx, "Second").await;

        let result = NextTask::new().execute(&ctx).await.into_result().unwrap();
        assert_eq!(result["task"]["id"], first.as_str());
    }

    #[tokio::test]
    async fn test_next_skips_blocked() {
        let (_temp, ctx) = setup().await;

        let first = add_task(&ctx, "First").await;
        let second = add_task(&ctx, "Second").await;
        AddDependency::new(first, second.clone())
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();

        let result = NextTask::new().execute(&ctx).await.into_result().unwrap();
        assert_eq!(result["task"]["id"], second.as_str());
    }

    #[tokio::test]
    async fn test_next_only_considers_first_column() {
        let (_temp, ctx) = setup().await;

        let a = add_task(&ctx, "A").await;
        MoveTask::to_column(a, "doing")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();

        let result = NextTask::new().execute(&ctx).await.into_result().unwrap();
        assert!(result["task"].is_null());
    }

    #[tokio::test]
    async fn test_next_empty_board() {
        let (_temp, ctx) = setup().await;

        let result = NextTask::new().execute(&ctx).await.into_result().unwrap();
        assert!(result["task"].is_null());
    }
}
