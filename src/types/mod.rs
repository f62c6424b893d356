//! Core data types for the taskboard engine

mod board;
mod ids;
mod position;
mod task;

pub use board::{first_column, terminal_column, Board, Column};
pub use ids::{ColumnId, TaskId};
pub use position::Position;
pub use task::Task;
