//! MoveTask command

use crate::context::{BoardContext, Changeset};
use crate::error::TaskboardError;
use crate::operation::{async_trait, finish_logged, Execute, ExecutionResult, Operation};
use crate::ordering::{plan_cross_container_move, plan_same_container_move, Slot};
use crate::types::{ColumnId, Position, Task, TaskId};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Move a task to a new position, within its column or across columns.
///
/// The whole renumbering - gap closing in the source, room making in the
/// destination, the task's own position - lands as one commit, so no reader
/// ever sees a duplicate or missing index.
#[derive(Debug, Deserialize, Serialize)]
pub struct MoveTask {
    /// The task ID to move
    pub id: TaskId,
    /// Target column; omitted means the task's current column
    pub column: Option<ColumnId>,
    /// Target index; omitted or beyond the end means append
    pub index: Option<usize>,
}

impl MoveTask {
    /// Create a new MoveTask command
    pub fn new(id: impl Into<TaskId>) -> Self {
        Self {
            id: id.into(),
            column: None,
            index: None,
        }
    }

    /// Move to a column (at the end)
    pub fn to_column(id: impl Into<TaskId>, column: impl Into<ColumnId>) -> Self {
        Self {
            id: id.into(),
            column: Some(column.into()),
            index: None,
        }
    }

    /// Set the target index
    pub fn with_index(mut self, index: usize) -> Self {
        self.index = Some(index);
        self
    }

    /// Set the target column
    pub fn with_column(mut self, column: impl Into<ColumnId>) -> Self {
        self.column = Some(column.into());
        self
    }
}

impl Operation for MoveTask {
    fn verb(&self) -> &'static str {
        "move"
    }
    fn noun(&self) -> &'static str {
        "task"
    }
    fn description(&self) -> &'static str {
        "Move a task to a different column or position"
    }
}

#[async_trait]
impl Execute<BoardContext, TaskboardError> for MoveTask {
    async fn execute(&self, ctx: &BoardContext) -> ExecutionResult<Value, TaskboardError> {
        let start = std::time::Instant::now();
        let input = serde_json::to_value(self).unwrap();

        let result = async {
            let _lock = ctx.lock().await?;
            let mut task = ctx.read_task(&self.id).await?;

            let target_column = self
                .column
                .clone()
                .unwrap_or_else(|| task.position.column.clone());
            if !ctx.column_exists(&target_column) {
                return Err(TaskboardError::ColumnNotFound {
                    id: target_column.to_string(),
                });
            }

            let all_tasks = ctx.read_all_tasks().await?;
            let target = self.index.unwrap_or(usize::MAX);
            let old = task.position.index;

            let column_slots = |column: &ColumnId| -> Vec<Slot<TaskId>> {
                all_tasks
                    .iter()
                    .filter(|t| &t.position.column == column)
                    .map(|t| Slot::new(t.id.clone(), t.position.index))
                    .collect()
            };

            let mut change = Changeset::new();
            let shifted_task = |update: &crate::ordering::SlotUpdate<TaskId>| -> Task {
                let mut shifted = all_tasks
                    .iter()
                    .find(|t| t.id == update.id)
                    .cloned()
                    .expect("update refers to a known task");
                shifted.position.index = update.index;
                shifted
            };

            if target_column == task.position.column {
                let slots = column_slots(&target_column);
                let (new, updates) = plan_same_container_move(&slots, old, target);

                // No-op move: leave every position untouched
                if new == old {
                    let mut result = serde_json::to_value(&task)?;
                    result["id"] = serde_json::json!(&task.id);
                    return Ok(result);
                }

                for update in &updates {
                    change.write_task(shifted_task(update));
                }
                task.position.index = new;
            } else {
                let source = column_slots(&task.position.column);
                let dest = column_slots(&target_column);
                let plan = plan_cross_container_move(&source, &dest, old, target);

                for update in plan.source_updates.iter().chain(&plan.dest_updates) {
                    change.write_task(shifted_task(update));
                }
                task.position = Position::new(target_column, plan.new_index);
            }

            change.write_task(task.clone());
            ctx.commit(&change).await?;

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
    use crate::ordering::is_dense;
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

    async fn add_task(ctx: &BoardContext, title: &str) -> TaskId {
        let result = AddTask::new(title).execute(ctx).await.into_result().unwrap();
        TaskId::from_string(result["id"].as_str().unwrap())
    }

    async fn column_indexes(ctx: &BoardContext, column: &str) -> Vec<usize> {
        ctx.read_all_tasks()
            .await
            .unwrap()
            .iter()
            .filter(|t| t.position.column.as_str() == column)
            .map(|t| t.position.index)
            .collect()
    }

    #[tokio::test]
    async fn test_move_task_to_column() {
        let (_temp, ctx) = setup().await;

        let id = add_task(&ctx, "Task").await;

        let result = MoveTask::to_column(id, "done")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();

        assert_eq!(result["position"]["column"], "done");
        assert_eq!(result["position"]["index"], 0);
    }

    #[tokio::test]
    async fn test_move_task_invalid_column() {
        let (_temp, ctx) = setup().await;

        let id = add_task(&ctx, "Task").await;

        let result = MoveTask::to_column(id, "nonexistent").execute(&ctx).await.into_result();
        assert!(matches!(result, Err(TaskboardError::ColumnNotFound { .. })));
    }

    #[tokio::test]
    async fn test_move_within_column_renumbers_exactly() {
        let (_temp, ctx) = setup().await;

        // Positions [0,1,2,3]; move the task at 3 to 1
        let t0 = add_task(&ctx, "T0").await;
        let t1 = add_task(&ctx, "T1").await;
        let t2 = add_task(&ctx, "T2").await;
        let t3 = add_task(&ctx, "T3").await;

        MoveTask::new(t3.clone())
            .with_index(1)
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();

        assert_eq!(ctx.read_task(&t0).await.unwrap().position.index, 0);
        assert_eq!(ctx.read_task(&t3).await.unwrap().position.index, 1);
        assert_eq!(ctx.read_task(&t1).await.unwrap().position.index, 2);
        assert_eq!(ctx.read_task(&t2).await.unwrap().position.index, 3);
    }

    #[tokio::test]
    async fn test_noop_move_leaves_positions_unchanged() {
        let (_temp, ctx) = setup().await;

        let _t0 = add_task(&ctx, "T0").await;
        let t1 = add_task(&ctx, "T1").await;
        let _t2 = add_task(&ctx, "T2").await;

        let before = ctx.read_all_tasks().await.unwrap();

        MoveTask::new(t1.clone())
            .with_index(1)
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();

        let after = ctx.read_all_tasks().await.unwrap();
        for task in &before {
            let found = after.iter().find(|t| t.id == task.id).unwrap();
            assert_eq!(found.position, task.position);
        }
    }

    #[tokio::test]
    async fn test_move_beyond_end_clamps_to_append() {
        let (_temp, ctx) = setup().await;

        let t0 = add_task(&ctx, "T0").await;
        let _t1 = add_task(&ctx, "T1").await;
        let _t2 = add_task(&ctx, "T2").await;

        let result = MoveTask::new(t0)
            .with_index(99)
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();

        assert_eq!(result["position"]["index"], 2);
        assert!(is_dense(&column_indexes(&ctx, "todo").await));
    }

    #[tokio::test]
    async fn test_cross_column_move_keeps_both_columns_dense() {
        let (_temp, ctx) = setup().await;

        let t0 = add_task(&ctx, "T0").await;
        let _t1 = add_task(&ctx, "T1").await;
        let _t2 = add_task(&ctx, "T2").await;

        // Seed the destination
        let d0 = add_task(&ctx, "D0").await;
        MoveTask::to_column(d0, "doing")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();

        // Move t0 into the middle of "doing"
        let result = MoveTask::to_column(t0, "doing")
            .with_index(0)
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        assert_eq!(result["position"]["index"], 0);

        assert!(is_dense(&column_indexes(&ctx, "todo").await));
        assert!(is_dense(&column_indexes(&ctx, "doing").await));
        assert_eq!(column_indexes(&ctx, "todo").await.len(), 2);
        assert_eq!(column_indexes(&ctx, "doing").await.len(), 2);
    }

    #[tokio::test]
    async fn test_move_missing_task() {
        let (_temp, ctx) = setup().await;

        let result = MoveTask::new("missing").execute(&ctx).await.into_result();
        assert!(matches!(result, Err(TaskboardError::TaskNotFound { .. })));
    }
}
