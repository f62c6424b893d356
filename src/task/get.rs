//! GetTask command

use crate::context::BoardContext;
use crate::error::TaskboardError;
use crate::operation::{async_trait, finish_unlogged, Execute, ExecutionResult, Operation};
use crate::types::{terminal_column, TaskId};
use serde::Deserialize;
use serde_json::Value;

/// Get a single task with its derived dependency views.
///
/// `blocked_by` and `blocks` are computed from the stored `depends_on`
/// edges at read time; they are never persisted.
#[derive(Debug, Deserialize)]
pub struct GetTask {
    pub id: TaskId,
}

impl GetTask {
    pub fn new(id: impl Into<TaskId>) -> Self {
        Self { id: id.into() }
    }
}

impl Operation for GetTask {
    fn verb(&self) -> &'static str {
        "get"
    }
    fn noun(&self) -> &'static str {
        "task"
    }
    fn description(&self) -> &'static str {
        "Retrieve a task with its dependency state"
    }
}

#[async_trait]
impl Execute<BoardContext, TaskboardError> for GetTask {
    async fn execute(&self, ctx: &BoardContext) -> ExecutionResult<Value, TaskboardError> {
        let result = async {
            let _lock = ctx.lock_shared().await?;
            let task = ctx.read_task(&self.id).await?;
            let all_tasks = ctx.read_all_tasks().await?;
            let columns = ctx.read_all_columns().await?;
            let terminal = terminal_column(&columns)
                .map(|c| c.id.to_string())
                .unwrap_or_default();

            let mut result = serde_json::to_value(&task)?;
            result["id"] = serde_json::json!(&task.id);
            result["ready"] = serde_json::json!(task.is_ready(&all_tasks, &terminal));
            result["blocked_by"] = serde_json::to_value(task.blocked_by(&all_tasks, &terminal))?;
            result["blocks"] = serde_json::to_value(task.blocks(&all_tasks))?;
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
    use crate::task::{AddDependency, AddTask, MoveTask};
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
    async fn test_get_task() {
        let (_temp, ctx) = setup().await;
        let id = add_task(&ctx, "First").await;

        let result = GetTask::new(id.clone()).execute(&ctx).await.into_result().unwrap();
        assert_eq!(result["id"], id.as_str());
        assert_eq!(result["title"], "First");
        assert_eq!(result["ready"], true);
        assert!(result["blocked_by"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_get_task_not_found() {
        let (_temp, ctx) = setup().await;

        let result = GetTask::new(TaskId::new()).execute(&ctx).await.into_result();
        assert!(matches!(result, Err(TaskboardError::TaskNotFound { .. })));
    }

    #[tokio::test]
    async fn test_dependency_views() {
        let (_temp, ctx) = setup().await;
        let a = add_task(&ctx, "A").await;
        let b = add_task(&ctx, "B").await;

        AddDependency::new(a.clone(), b.clone())
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();

        let view_a = GetTask::new(a.clone()).execute(&ctx).await.into_result().unwrap();
        assert_eq!(view_a["ready"], false);
        assert_eq!(view_a["blocked_by"][0], b.as_str());

        let view_b = GetTask::new(b.clone()).execute(&ctx).await.into_result().unwrap();
        assert_eq!(view_b["ready"], true);
        assert_eq!(view_b["blocks"][0], a.as_str());

        // Moving the prerequisite to the terminal column unblocks the dependent
        MoveTask::to_column(b, "done")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        let view_a = GetTask::new(a).execute(&ctx).await.into_result().unwrap();
        assert_eq!(view_a["ready"], true);
        assert!(view_a["blocked_by"].as_array().unwrap().is_empty());
    }
}
