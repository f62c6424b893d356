//! ListActivity command

use crate::context::BoardContext;
use crate::error::TaskboardError;
use crate::operation::{async_trait, finish_unlogged, Execute, ExecutionResult, Operation};
use serde::Deserialize;
use serde_json::Value;

/// Read the board-wide activity log, newest entries first.
#[derive(Debug, Default, Deserialize)]
pub struct ListActivity {
    /// Maximum number of entries to return
    pub limit: Option<usize>,
}

impl ListActivity {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

impl Operation for ListActivity {
    fn verb(&self) -> &'static str {
        "list"
    }
    fn noun(&self) -> &'static str {
        "activity"
    }
    fn description(&self) -> &'static str {
        "Read the activity log, newest first"
    }
}

#[async_trait]
impl Execute<BoardContext, TaskboardError> for ListActivity {
    async fn execute(&self, ctx: &BoardContext) -> ExecutionResult<Value, TaskboardError> {
        let result = async {
            let entries = ctx.read_activity(self.limit).await?;
            Ok(serde_json::json!({
                "count": entries.len(),
                "entries": entries
            }))
        }
        .await;

        finish_unlogged(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::InitBoard;
    use crate::processor::BoardOperationProcessor;
    use crate::task::AddTask;
    use tempfile::TempDir;

    async fn setup() -> (TempDir, BoardContext, BoardOperationProcessor) {
        let temp = TempDir::new().unwrap();
        let ctx = BoardContext::new(temp.path().join(".taskboard"));
        let processor = BoardOperationProcessor::new();
        processor.process(&InitBoard::new("Test"), &ctx).await.unwrap();
        (temp, ctx, processor)
    }

    #[tokio::test]
    async fn test_list_activity_newest_first() {
        let (_temp, ctx, processor) = setup().await;

        processor.process(&AddTask::new("First"), &ctx).await.unwrap();
        processor.process(&AddTask::new("Second"), &ctx).await.unwrap();

        let result = ListActivity::new().execute(&ctx).await.into_result().unwrap();
        assert_eq!(result["count"], 3);
        assert_eq!(result["entries"][0]["input"]["title"], "Second");
        assert_eq!(result["entries"][2]["op"], "init board");
    }

    #[tokio::test]
    async fn test_list_activity_limit() {
        let (_temp, ctx, processor) = setup().await;

        for i in 0..5 {
            processor
                .process(&AddTask::new(format!("Task {i}")), &ctx)
                .await
                .unwrap();
        }

        let result = ListActivity::new()
            .with_limit(2)
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        assert_eq!(result["count"], 2);
        assert_eq!(result["entries"][0]["input"]["title"], "Task 4");
    }

    #[tokio::test]
    async fn test_reads_are_not_logged() {
        let (_temp, ctx, processor) = setup().await;

        processor.process(&ListActivity::new(), &ctx).await.unwrap();

        let result = ListActivity::new().execute(&ctx).await.into_result().unwrap();
        assert_eq!(result["count"], 1);
    }
}
