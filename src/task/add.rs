//! AddTask command

use crate::context::{BoardContext, Changeset};
use crate::error::TaskboardError;
use crate::graph::DependencyGraph;
use crate::operation::{async_trait, finish_logged, Execute, ExecutionResult, Operation};
use crate::ordering::{plan_insertion, Slot};
use crate::types::{first_column, ColumnId, Position, Task, TaskId};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Add a new task to the board
#[derive(Debug, Deserialize, Serialize)]
pub struct AddTask {
    /// The task title (required)
    pub title: String,
    /// Detailed task description
    pub description: Option<String>,
    /// Target column; omitted means the first column
    pub column: Option<ColumnId>,
    /// Index within the column; omitted means append at the end
    pub index: Option<usize>,
    /// Task IDs this task depends on
    #[serde(default)]
    pub depends_on: Vec<TaskId>,
}

impl AddTask {
    /// Create a new AddTask command with just a title
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            column: None,
            index: None,
            depends_on: Vec::new(),
        }
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the target column
    pub fn with_column(mut self, column: impl Into<ColumnId>) -> Self {
        self.column = Some(column.into());
        self
    }

    /// Set the index within the column
    pub fn with_index(mut self, index: usize) -> Self {
        self.index = Some(index);
        self
    }

    /// Set the dependencies
    pub fn with_depends_on(mut self, deps: Vec<TaskId>) -> Self {
        self.depends_on = deps;
        self
    }
}

impl Operation for AddTask {
    fn verb(&self) -> &'static str {
        "add"
    }
    fn noun(&self) -> &'static str {
        "task"
    }
    fn description(&self) -> &'static str {
        "Create a new task on the board"
    }
}

#[async_trait]
impl Execute<BoardContext, TaskboardError> for AddTask {
    async fn execute(&self, ctx: &BoardContext) -> ExecutionResult<Value, TaskboardError> {
        let start = std::time::Instant::now();
        let input = serde_json::to_value(self).unwrap();

        let result = async {
            let _lock = ctx.lock().await?;
            ctx.read_board().await?; // initialized check

            if self.title.is_empty() {
                return Err(TaskboardError::invalid_value("title", "must not be empty"));
            }

            let columns = ctx.read_all_columns().await?;
            let column_id = match &self.column {
                Some(id) => {
                    if !columns.iter().any(|c| &c.id == id) {
                        return Err(TaskboardError::ColumnNotFound { id: id.to_string() });
                    }
                    id.clone()
                }
                None => first_column(&columns)
                    .map(|c| c.id.clone())
                    .ok_or_else(|| {
                        TaskboardError::invalid_value("column", "board has no columns")
                    })?,
            };

            let all_tasks = ctx.read_all_tasks().await?;

            let mut task = Task::new(
                self.title.clone(),
                Position::head_of(column_id.clone()),
            );
            if let Some(desc) = &self.description {
                task = task.with_description(desc.clone());
            }

            // Validate the initial dependency edges through the graph gate;
            // the new task has no dependents yet, so this catches self
            // references and duplicates within the requested list.
            let mut graph = DependencyGraph::from_tasks(&all_tasks);
            for dep in &self.depends_on {
                if !ctx.task_exists(dep) {
                    return Err(TaskboardError::TaskNotFound {
                        id: dep.to_string(),
                    });
                }
                graph.check_new_edge(&task.id, dep)?;
                graph.insert_edge(task.id.clone(), dep.clone());
            }
            task.depends_on = self.depends_on.clone();

            // Position within the column: append unless an index was given
            let slots: Vec<Slot<TaskId>> = all_tasks
                .iter()
                .filter(|t| t.position.column == column_id)
                .map(|t| Slot::new(t.id.clone(), t.position.index))
                .collect();
            let (index, updates) = plan_insertion(&slots, self.index.unwrap_or(usize::MAX));
            task.position.index = index;

            let mut change = Changeset::new();
            for update in updates {
                let mut shifted = all_tasks
                    .iter()
                    .find(|t| t.id == update.id)
                    .cloned()
                    .expect("update refers to a known task");
                shifted.position.index = update.index;
                change.write_task(shifted);
            }
            change.write_task(task.clone());
            ctx.commit(&change).await?;

            let mut result = serde_json::to_value(&task)?;
            result["id"] = serde_json::json!(&task.id);
            Ok(result)
        }
        .await;

        finish_logged(self, input, result, start)
    }
}
