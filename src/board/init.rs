//! InitBoard command

use crate::context::{BoardContext, Changeset};
use crate::error::TaskboardError;
use crate::operation::{async_trait, finish_logged, Execute, ExecutionResult, Operation};
use crate::types::Board;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Initialize a new board
#[derive(Debug, Deserialize, Serialize)]
pub struct InitBoard {
    /// The board name
    pub name: String,
    /// Optional board description
    pub description: Option<String>,
}

impl InitBoard {
    /// Create a new InitBoard command
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
        }
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

impl Operation for InitBoard {
    fn verb(&self) -> &'static str {
        "init"
    }
    fn noun(&self) -> &'static str {
        "board"
    }
    fn description(&self) -> &'static str {
        "Initialize a new board with default columns"
    }
}

#[async_trait]
impl Execute<BoardContext, TaskboardError> for InitBoard {
    async fn execute(&self, ctx: &BoardContext) -> ExecutionResult<Value, TaskboardError> {
        let start = std::time::Instant::now();
        let input = serde_json::to_value(self).unwrap();

        let result = async {
            // The existence check must sit under the lock: two racing inits
            // could otherwise both pass it and interleave their writes.
            let _lock = ctx.lock().await?;
            if ctx.is_initialized() {
                return Err(TaskboardError::AlreadyExists {
                    path: ctx.root().to_path_buf(),
                });
            }

            ctx.create_directories().await?;

            let mut board = Board::new(self.name.clone());
            if let Some(desc) = &self.description {
                board = board.with_description(desc.clone());
            }

            // Board metadata and default columns land as one commit, so a
            // failure partway never leaves a board without its columns.
            let mut change = Changeset::new();
            change.write_board(board.clone());
            for column in Board::default_columns() {
                change.write_column(column);
            }
            ctx.commit(&change).await?;

            // Return board with columns in response (for API compatibility)
            let columns_json: Vec<Value> = Board::default_columns()
                .iter()
                .map(|column| {
                    let mut value = serde_json::to_value(column)?;
                    value["id"] = serde_json::json!(column.id);
                    Ok(value)
                })
                .collect::<Result<_, TaskboardError>>()?;

            let mut result = serde_json::to_value(&board)?;
            result["columns"] = Value::Array(columns_json);
            Ok(result)
        }
        .await;

        finish_logged(self, input, result, start)
    }
}
