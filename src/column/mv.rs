//! MoveColumn command

use crate::context::{BoardContext, Changeset};
use crate::error::TaskboardError;
use crate::operation::{async_trait, finish_logged, Execute, ExecutionResult, Operation};
use crate::ordering::{plan_same_container_move, Slot};
use crate::types::ColumnId;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Move a column to a new position within the board
#[derive(Debug, Deserialize, Serialize)]
pub struct MoveColumn {
    /// The column ID to move
    pub id: ColumnId,
    /// The target position; beyond the end clamps to the last slot
    pub position: usize,
}

impl MoveColumn {
    /// Create a new MoveColumn command
    pub fn new(id: impl Into<ColumnId>, position: usize) -> Self {
        Self {
            id: id.into(),
            position,
        }
    }
}

impl Operation for MoveColumn {
    fn verb(&self) -> &'static str {
        "move"
    }
    fn noun(&self) -> &'static str {
        "column"
    }
    fn description(&self) -> &'static str {
        "Move a column to a different position"
    }
}

#[async_trait]
impl Execute<BoardContext, TaskboardError> for MoveColumn {
    async fn execute(&self, ctx: &BoardContext) -> ExecutionResult<Value, TaskboardError> {
        let start = std::time::Instant::now();
        let input = serde_json::to_value(self).unwrap();

        let result = async {
            let _lock = ctx.lock().await?;
            let columns = ctx.read_all_columns().await?;

            let mut moving = columns
                .iter()
                .find(|c| c.id == self.id)
                .cloned()
                .ok_or_else(|| TaskboardError::ColumnNotFound {
                    id: self.id.to_string(),
                })?;

            let slots: Vec<Slot<ColumnId>> = columns
                .iter()
                .map(|c| Slot::new(c.id.clone(), c.position))
                .collect();

            let (new, updates) =
                plan_same_container_move(&slots, moving.position, self.position);

            // A no-op move leaves every position file untouched
            if new != moving.position {
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
                moving.position = new;
                change.write_column(moving.clone());
                ctx.commit(&change).await?;
            }

            let mut result = serde_json::to_value(&moving)?;
            result["id"] = serde_json::json!(&moving.id);
            Ok(result)
        }
        .await;

        finish_logged(self, input, result, start)
    }
}
