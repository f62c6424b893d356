//! Dependency graph validation
//!
//! Task dependencies form a directed graph: an edge `A -> B` means task A
//! depends on (is blocked by) task B. The graph must stay acyclic; the only
//! gate is [`DependencyGraph::check_new_edge`], run before any edge is
//! persisted. The reachability walk is an explicit-stack depth-first search
//! with a visited set, so deep dependency chains cannot overflow the call
//! stack and diamond shapes are visited once.

use crate::error::{Result, TaskboardError};
use crate::types::{Task, TaskId};
use std::collections::{HashMap, HashSet};

/// The dependency edge set of a board, keyed by dependent task
#[derive(Debug, Default, Clone)]
pub struct DependencyGraph {
    edges: HashMap<TaskId, Vec<TaskId>>,
}

impl DependencyGraph {
    /// Build the graph from the stored tasks' `depends_on` lists
    pub fn from_tasks<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> Self {
        let mut edges = HashMap::new();
        for task in tasks {
            if !task.depends_on.is_empty() {
                edges.insert(task.id.clone(), task.depends_on.clone());
            }
        }
        Self { edges }
    }

    /// Whether the exact ordered pair already exists
    pub fn contains_edge(&self, from: &TaskId, to: &TaskId) -> bool {
        self.edges
            .get(from)
            .map(|deps| deps.contains(to))
            .unwrap_or(false)
    }

    /// The tasks `from` directly depends on
    pub fn prerequisites_of(&self, from: &TaskId) -> &[TaskId] {
        self.edges.get(from).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The tasks that directly depend on `to` (derived reverse view)
    pub fn dependents_of(&self, to: &TaskId) -> Vec<TaskId> {
        self.edges
            .iter()
            .filter(|(_, deps)| deps.contains(to))
            .map(|(from, _)| from.clone())
            .collect()
    }

    /// Would adding `from -> to` close a dependency loop?
    ///
    /// The new edge creates a cycle exactly when `from` is already reachable
    /// from `to` along existing edges. Iterative DFS from `to`; the visited
    /// set handles diamonds and guarantees termination even if the stored
    /// graph is already (incorrectly) cyclic.
    pub fn would_create_cycle(&self, from: &TaskId, to: &TaskId) -> bool {
        let mut visited: HashSet<&TaskId> = HashSet::new();
        let mut stack: Vec<&TaskId> = vec![to];

        while let Some(current) = stack.pop() {
            if current == from {
                return true;
            }
            if !visited.insert(current) {
                continue;
            }
            for next in self.prerequisites_of(current) {
                if !visited.contains(next) {
                    stack.push(next);
                }
            }
        }

        false
    }

    /// Gate for edge insertion: rejects self-loops, duplicates, and cycles.
    ///
    /// Self-dependency is rejected before the search runs, independent of
    /// graph state.
    pub fn check_new_edge(&self, from: &TaskId, to: &TaskId) -> Result<()> {
        if from == to {
            return Err(TaskboardError::SelfDependency {
                id: from.to_string(),
            });
        }
        if self.contains_edge(from, to) {
            return Err(TaskboardError::DuplicateDependency {
                task: from.to_string(),
                depends_on: to.to_string(),
            });
        }
        if self.would_create_cycle(from, to) {
            return Err(TaskboardError::DependencyCycle {
                task: from.to_string(),
                depends_on: to.to_string(),
            });
        }
        Ok(())
    }

    /// Record a validated edge in the in-memory set
    pub fn insert_edge(&mut self, from: TaskId, to: TaskId) {
        self.edges.entry(from).or_default().push(to);
    }

    /// Remove an edge; reports whether the ordered pair was present.
    /// Removal never needs cycle re-validation.
    pub fn remove_edge(&mut self, from: &TaskId, to: &TaskId) -> bool {
        match self.edges.get_mut(from) {
            Some(deps) => {
                let before = deps.len();
                deps.retain(|d| d != to);
                let removed = deps.len() != before;
                if deps.is_empty() {
                    self.edges.remove(from);
                }
                removed
            }
            None => false,
        }
    }
}
