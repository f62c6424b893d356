//! UpdateTask command

use crate::context::BoardContext;
use crate::error::TaskboardError;
use crate::operation::{async_trait, finish_logged, Execute, ExecutionResult, Operation};
use crate::types::TaskId;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Update a task's title or description. Position and dependencies are
/// changed through their own commands.
#[derive(Debug, Deserialize, Serialize)]
pub struct UpdateTask {
    pub id: TaskId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl UpdateTask {
    pub fn new(id: impl Into<TaskId>) -> Self {
        Self {
            id: id.into(),
            title: None,
            description: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

impl Operation for UpdateTask {
    fn verb(&self) -> &'static str {
        "update"
    }
    fn noun(&self) -> &'static str {
        "task"
    }
    fn description(&self) -> &'static str {
        "Update a task's title or description"
    }
}

#[async_trait]
impl Execute<BoardContext, TaskboardError> for UpdateTask {
    async fn execute(&self, ctx: &BoardContext) -> ExecutionResult<Value, TaskboardError> {
        let start = std::time::Instant::now();
        let input = serde_json::to_value(self).unwrap();

        let result = async {
            let _lock = ctx.lock().await?;
            let mut task = ctx.read_task(&self.id).await?;

            if let Some(title) = &self.title {
                if title.trim().is_empty() {
                    return Err(TaskboardError::invalid_value(
                        "title",
                        "title must not be empty",
                    ));
                }
                task.title = title.clone();
            }
            if let Some(description) = &self.description {
                task.description = description.clone();
            }

            ctx.write_task(&task).await?;

            let mut result = serde_json::to_value(&task)?;
            result["id"] = serde_json::json!(&task.id);
            Ok(result)
        }
        .await;

        finish_logged(self, input, result, start)
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
        let ctx = BoardContext::new(temp.path().join(".taskboard"));
        InitBoard::new("Test")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        (temp, ctx)
    }

    #[tokio::test]
    async fn test_update_title_and_description() {
        let (_temp, ctx) = setup().await;
        let added = AddTask::new("Old").execute(&ctx).await.into_result().unwrap();
        let id = TaskId::from_string(added["id"].as_str().unwrap());

        let result = UpdateTask::new(id.clone())
            .with_title("New")
            .with_description("details")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        assert_eq!(result["title"], "New");
        assert_eq!(result["description"], "details");

        let task = ctx.read_task(&id).await.unwrap();
        assert_eq!(task.title, "New");
    }

    #[tokio::test]
    async fn test_update_preserves_position() {
        let (_temp, ctx) = setup().await;
        let added = AddTask::new("Task").execute(&ctx).await.into_result().unwrap();
        let id = TaskId::from_string(added["id"].as_str().unwrap());

        UpdateTask::new(id.clone())
            .with_title("Renamed")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();

        let task = ctx.read_task(&id).await.unwrap();
        assert_eq!(task.position.column.as_str(), "todo");
        assert_eq!(task.position.index, 0);
    }

    #[tokio::test]
    async fn test_empty_title_rejected() {
        let (_temp, ctx) = setup().await;
        let added = AddTask::new("Task").execute(&ctx).await.into_result().unwrap();
        let id = TaskId::from_string(added["id"].as_str().unwrap());

        let result = UpdateTask::new(id)
            .with_title("  ")
            .execute(&ctx)
            .await
            .into_result();
        assert!(matches!(result, Err(TaskboardError::InvalidValue { .. })));
    }

    #[tokio::test]
    async fn test_update_missing_task() {
        let (_temp, ctx) = setup().await;

        let result = UpdateTask::new(TaskId::new())
            .with_title("X")
            .execute(&ctx)
            .await
            .into_result();
        assert!(matches!(result, Err(TaskboardError::TaskNotFound { .. })));
    }
}
