//! Task board engine with file-backed storage
//!
//! This crate provides a project task board that stores all data as JSON
//! files in a `.taskboard` directory. Tasks live in ordered columns, with
//! dense zero-based positions and a cycle-free dependency graph between
//! tasks, and every mutation is journaled to JSONL activity logs.
//!
//! ## Overview
//!
//! - **One directory = one board** - The `.taskboard` directory holds everything
//! - **File-per-entity** - Each task and column is an individual JSON file
//! - **Dense ordering** - Positions within a column are always `0..n-1`,
//!   with no gaps and no duplicates, maintained on every insert/move/delete
//! - **Acyclic dependencies** - A dependency edge is only accepted if it
//!   cannot be reached back from its prerequisite
//! - **Audited** - Per-task JSONL logs plus a global activity log record
//!   which actor did what and when
//!
//! ## Basic Usage
//!
//! ```rust,no_run
//! use taskboard::{board::InitBoard, task::AddTask, BoardContext, Execute};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! // Initialize a new board
//! let ctx = BoardContext::new("/path/to/project/.taskboard");
//! InitBoard::new("My Project").execute(&ctx).await.into_result()?;
//!
//! // Add a task to the first column
//! let result = AddTask::new("Implement feature X")
//!     .with_description("Add the new feature")
//!     .execute(&ctx)
//!     .await
//!     .into_result()?;
//!
//! println!("Created task: {}", result["id"]);
//! # Ok(())
//! # }
//! ```
//!
//! ## Storage Structure
//!
//! ```text
//! project/
//! └── .taskboard/
//!     ├── board.json           # Board metadata
//!     ├── columns/
//!     │   └── {id}.json        # Column state (position, name)
//!     ├── tasks/
//!     │   ├── {id}.json        # Task state (position, dependencies)
//!     │   └── {id}.jsonl       # Per-task operation log
//!     ├── activity/
//!     │   └── current.jsonl    # Global operation log
//!     └── .lock                # Exclusive lock for mutating operations
//! ```
//!
//! Entity state files use JSON. Operation logs use JSONL (one JSON object
//! per line, newest entries at the end; reads return them newest first).

mod context;
mod error;
pub mod graph;
mod operation;
pub mod ordering;
mod processor;
pub mod types;

// Command modules
pub mod activity;
pub mod board;
pub mod column;
pub mod task;

pub use context::{BoardContext, BoardLock, Changeset};
pub use error::{Result, TaskboardError};
pub use operation::{async_trait, Execute, ExecutionResult, LogEntry, Operation};
pub use processor::BoardOperationProcessor;

// Re-export commonly used types
pub use types::{Board, Column, ColumnId, Position, Task, TaskId};
