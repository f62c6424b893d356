//! UpdateBoard command

use crate::context::BoardContext;
use crate::error::TaskboardError;
use crate::operation::{async_trait, finish_logged, Execute, ExecutionResult, Operation};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Update board metadata
#[derive(Debug, Deserialize, Serialize)]
pub struct UpdateBoard {
    /// New board name
    pub name: Option<String>,
    /// New board description
    pub description: Option<String>,
}

impl UpdateBoard {
    /// Create an empty UpdateBoard command
    pub fn new() -> Self {
        Self {
            name: None,
            description: None,
        }
    }

    /// Set the name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

impl Default for UpdateBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl Operation for UpdateBoard {
    fn verb(&self) -> &'static str {
        "update"
    }
    fn noun(&self) -> &'static str {
        "board"
    }
    fn description(&self) -> &'static str {
        "Update board name or description"
    }
}

#[async_trait]
impl Execute<BoardContext, TaskboardError> for UpdateBoard {
    async fn execute(&self, ctx: &BoardContext) -> ExecutionResult<Value, TaskboardError> {
        let start = std::time::Instant::now();
        let input = serde_json::to_value(self).unwrap();

        let result = async {
            let _lock = ctx.lock().await?;
            let mut board = ctx.read_board().await?;

            if let Some(name) = &self.name {
                if name.is_empty() {
                    return Err(TaskboardError::invalid_value("name", "must not be empty"));
                }
                board.name = name.clone();
            }
            if let Some(description) = &self.description {
                board.description = Some(description.clone());
            }

            ctx.write_board(&board).await?;
            Ok(serde_json::to_value(&board)?)
        }
        .await;

        finish_logged(self, input, result, start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::InitBoard;
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
    async fn test_update_board_name() {
        let (_temp, ctx) = setup().await;

        let result = UpdateBoard::new()
            .with_name("Renamed")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();

        assert_eq!(result["name"], "Renamed");
        assert_eq!(ctx.read_board().await.unwrap().name, "Renamed");
    }

    #[tokio::test]
    async fn test_update_board_empty_name_rejected() {
        let (_temp, ctx) = setup().await;

        let result = UpdateBoard::new().with_name("").execute(&ctx).await.into_result();
        assert!(matches!(result, Err(TaskboardError::InvalidValue { .. })));
    }
}
