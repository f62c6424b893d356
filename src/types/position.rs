//! Position types for task ordering
//!
//! A task's position is its column plus a dense, zero-based integer index
//! within that column. For any column holding n tasks the set of indexes is
//! exactly {0, .., n-1}; the move/insert/delete commands renumber siblings
//! to keep it that way.

use super::ids::ColumnId;
use serde::{Deserialize, Serialize};

/// Full position of a task on the board: column + index within the column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub column: ColumnId,
    pub index: usize,
}

impl Position {
    /// Create a new position
    pub fn new(column: ColumnId, index: usize) -> Self {
        Self { column, index }
    }

    /// Position at the start of a column
    pub fn head_of(column: ColumnId) -> Self {
        Self { column, index: 0 }
    }
}
