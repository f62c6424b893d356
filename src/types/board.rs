//! Board-level types: Board, Column

use super::ids::ColumnId;
use serde::{Deserialize, Serialize};

/// The board - just metadata (name + description).
/// Columns are stored as individual files for git-friendly merging.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Board {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Board {
    /// Create a new board with the given name
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

    /// Get the default columns for a new board
    pub fn default_columns() -> Vec<Column> {
        vec![
            Column {
                id: ColumnId::from_string("todo"),
                name: "To Do".into(),
                position: 0,
            },
            Column {
                id: ColumnId::from_string("doing"),
                name: "Doing".into(),
                position: 1,
            },
            Column {
                id: ColumnId::from_string("done"),
                name: "Done".into(),
                position: 2,
            },
        ]
    }
}

/// A column defines a workflow stage
///
/// `position` is dense and zero-based within the board, the same invariant
/// tasks keep within a column.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Column {
    #[serde(skip)]
    pub id: ColumnId,
    pub name: String,
    pub position: usize,
}

/// Pick the column with the lowest position (workflow entry point)
pub fn first_column(columns: &[Column]) -> Option<&Column> {
    columns.iter().min_by_key(|c| c.position)
}

/// Pick the column with the highest position (terminal "done" stage)
pub fn terminal_column(columns: &[Column]) -> Option<&Column> {
    columns.iter().max_by_key(|c| c.position)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_columns_are_dense() {
        let columns = Board::default_columns();
        let positions: Vec<usize> = columns.iter().map(|c| c.position).collect();
        assert_eq!(positions, vec![0, 1, 2]);
    }

    #[test]
    fn test_first_and_terminal_column() {
        let columns = Board::default_columns();
        assert_eq!(first_column(&columns).unwrap().id.as_str(), "todo");
        assert_eq!(terminal_column(&columns).unwrap().id.as_str(), "done");
    }
}
