//! AddColumn command

use crate::context::{BoardContext, Changeset};
use crate::error::TaskboardError;
use crate::operation::{async_trait, finish_logged, Execute, ExecutionResult, Operation};
use crate::ordering::{plan_insertion, Slot};
use crate::types::{Column, ColumnId};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Add a new column to the board
#[derive(Debug, Deserialize, Serialize)]
pub struct AddColumn {
    /// The column ID (slug)
    pub id: ColumnId,
    /// The column display name
    pub name: String,
    /// Optional position; omitted means append at the end
    pub position: Option<usize>,
}

impl AddColumn {
    /// Create a new AddColumn command
    pub fn new(id: impl Into<ColumnId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            position: None,
        }
    }

    /// Set the position in the column order
    pub fn with_position(mut self, position: usize) -> Self {
        self.position = Some(position);
        self
    }
}

impl Operation for AddColumn {
    fn verb(&self) -> &'static str {
        "add"
    }
    fn noun(&self) -> &'static str {
        "column"
    }
    fn description(&self) -> &'static str {
        "Add a new column to the board"
    }
}

#[async_trait]
impl Execute<BoardContext, TaskboardError> for AddColumn {
    async fn execute(&self, ctx: &BoardContext) -> ExecutionResult<Value, TaskboardError> {
        let start = std::time::Instant::now();
        let input = serde_json::to_value(self).unwrap();

        let result = async {
            let _lock = ctx.lock().await?;
            ctx.read_board().await?; // initialized check

            if !self.id.is_valid_slug() {
                return Err(TaskboardError::invalid_value(
                    "id",
                    "must be a non-empty alphanumeric slug",
                ));
            }
            if self.name.is_empty() {
                return Err(TaskboardError::invalid_value("name", "must not be empty"));
            }
            if ctx.column_exists(&self.id) {
                return Err(TaskboardError::duplicate_id("column", self.id.to_string()));
            }

            let columns = ctx.read_all_columns().await?;
            let slots: Vec<Slot<ColumnId>> = columns
                .iter()
                .map(|c| Slot::new(c.id.clone(), c.position))
                .collect();

            let (position, updates) =
                plan_insertion(&slots, self.position.unwrap_or(usize::MAX));

            let column = Column {
                id: self.id.clone(),
                name: self.name.clone(),
                position,
            };

            let mut change = Changeset::new();
            for update in updates {
                let mut shifted = columns
                    .iter()
                    .find(|c| c.id == update.id)
                    .cloned()
                    .expect("update refers to a known column");
                shifted.position = update.index;
                change.write_column(shifted);
            }
            change.write_column(column.clone());
            ctx.commit(&change).await?;

            let mut result = serde_json::to_value(&column)?;
            result["id"] = serde_json::json!(&column.id);
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
    use crate::column::ListColumns;
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
    async fn test_add_column_appends() {
        let (_temp, ctx) = setup().await;

        let result = AddColumn::new("blocked", "Blocked")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();

        assert_eq!(result["id"], "blocked");
        assert_eq!(result["name"], "Blocked");
        assert_eq!(result["position"], 3);
    }

    #[tokio::test]
    async fn test_add_column_duplicate() {
        let (_temp, ctx) = setup().await;

        let result = AddColumn::new("todo", "Duplicate")
            .execute(&ctx)
            .await
            .into_result();
        assert!(matches!(result, Err(TaskboardError::DuplicateId { .. })));
    }

    #[tokio::test]
    async fn test_add_column_invalid_slug() {
        let (_temp, ctx) = setup().await;

        let result = AddColumn::new("has space", "Bad")
            .execute(&ctx)
            .await
            .into_result();
        assert!(matches!(result, Err(TaskboardError::InvalidValue { .. })));
    }

    #[tokio::test]
    async fn test_add_column_at_position_shifts_siblings() {
        let (_temp, ctx) = setup().await;

        AddColumn::new("review", "Review")
            .with_position(1)
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();

        let result = ListColumns::new().execute(&ctx).await.into_result().unwrap();
        let ids: Vec<&str> = result["columns"]
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["id"].as_str().unwrap())
            .collect();
        assert_eq!(ids, vec!["todo", "review", "doing", "done"]);
    }
}
