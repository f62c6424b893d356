//! Task type and its derived dependency views

use super::ids::TaskId;
use super::position::Position;
use serde::{Deserialize, Serialize};

/// A task/card on the board
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    #[serde(skip)]
    pub id: TaskId,
    pub title: String,
    #[serde(default)]
    pub description: String,

    /// Position = column + dense index within the column
    pub position: Position,

    /// Canonical dependency edges: this task depends on (is blocked by)
    /// each listed task. The reverse direction (`blocks`) is derived, never
    /// stored. The edge set over all tasks must stay acyclic.
    #[serde(default)]
    pub depends_on: Vec<TaskId>,
}

impl Task {
    /// Create a new task with the given title and position
    pub fn new(title: impl Into<String>, position: Position) -> Self {
        Self {
            id: TaskId::new(),
            title: title.into(),
            description: String::new(),
            position,
            depends_on: Vec::new(),
        }
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set dependencies
    pub fn with_depends_on(mut self, deps: Vec<TaskId>) -> Self {
        self.depends_on = deps;
        self
    }

    /// Check if all dependencies are complete (in the given terminal column)
    pub fn is_ready(&self, all_tasks: &[Task], terminal_column_id: &str) -> bool {
        self.depends_on.iter().all(|dep_id| {
            all_tasks
                .iter()
                .find(|t| &t.id == dep_id)
                .map(|t| t.position.column.as_str() == terminal_column_id)
                .unwrap_or(true) // Missing dependency is treated as complete
        })
    }

    /// Get tasks that this task is blocked by (incomplete dependencies)
    pub fn blocked_by(&self, all_tasks: &[Task], terminal_column_id: &str) -> Vec<TaskId> {
        self.depends_on
            .iter()
            .filter(|dep_id| {
                all_tasks
                    .iter()
                    .find(|t| &t.id == *dep_id)
                    .map(|t| t.position.column.as_str() != terminal_column_id)
                    .unwrap_or(false)
            })
            .cloned()
            .collect()
    }

    /// Get tasks that depend on this task (derived view over `depends_on`)
    pub fn blocks(&self, all_tasks: &[Task]) -> Vec<TaskId> {
        all_tasks
            .iter()
            .filter(|t| t.depends_on.contains(&self.id))
            .map(|t| t.id.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ColumnId;

    fn task_in(column: &str, index: usize, title: &str) -> Task {
        Task::new(
            title,
            Position::new(ColumnId::from_string(column), index),
        )
    }

    #[test]
    fn test_is_ready_no_deps() {
        let task = task_in("todo", 0, "solo");
        assert!(task.is_ready(&[], "done"));
    }

    #[test]
    fn test_blocked_by_and_blocks_are_mirror_views() {
        let dep = task_in("todo", 0, "prereq");
        let mut task = task_in("todo", 1, "dependent");
        task.depends_on.push(dep.id.clone());

        let all = vec![dep.clone(), task.clone()];

        assert_eq!(task.blocked_by(&all, "done"), vec![dep.id.clone()]);
        assert_eq!(dep.blocks(&all), vec![task.id.clone()]);
        assert!(!task.is_ready(&all, "done"));
    }

    #[test]
    fn test_ready_when_dep_in_terminal_column() {
        let dep = task_in("done", 0, "finished prereq");
        let mut task = task_in("todo", 0, "dependent");
        task.depends_on.push(dep.id.clone());

        let all = vec![dep, task.clone()];
        assert!(task.is_ready(&all, "done"));
        assert!(task.blocked_by(&all, "done").is_empty());
    }
}
