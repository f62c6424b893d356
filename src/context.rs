//! BoardContext - I/O primitives for taskboard storage
//!
//! The context provides access to storage and utilities. No business logic
//! methods, just data access primitives. Commands do all the work.
//!
//! Mutations that touch several entities at once (position renumbering)
//! go through [`Changeset`] / [`BoardContext::commit`]: every file is staged
//! first, then renamed into place, with rollback from in-memory snapshots if
//! a rename fails. The renames themselves land one at a time, so consistency
//! for readers comes from the lock file: mutating commands hold it
//! exclusively ([`BoardContext::lock`]) for their whole read-validate-commit
//! span, and multi-file read commands hold it shared
//! ([`BoardContext::lock_shared`]). A read that acquires the shared lock
//! therefore never observes a duplicate or missing position.

use crate::error::{Result, TaskboardError};
use crate::operation::LogEntry;
use crate::types::{Board, Column, ColumnId, Task, TaskId};
use fs2::FileExt;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Context passed to every command - provides access, not logic
pub struct BoardContext {
    /// Path to the .taskboard directory
    root: PathBuf,
}

impl BoardContext {
    /// Create a new context for the given .taskboard directory
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Create a context by finding the .taskboard directory from a starting path
    pub fn find(start: impl AsRef<Path>) -> Result<Self> {
        let mut current = start.as_ref().to_path_buf();

        loop {
            let board_dir = current.join(".taskboard");
            if board_dir.is_dir() {
                return Ok(Self::new(board_dir));
            }

            if !current.pop() {
                return Err(TaskboardError::NotInitialized {
                    path: start.as_ref().to_path_buf(),
                });
            }
        }
    }

    // =========================================================================
    // Path helpers
    // =========================================================================

    /// Get the root .taskboard directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path to board.json
    pub fn board_path(&self) -> PathBuf {
        self.root.join("board.json")
    }

    /// Path to columns directory
    pub fn columns_dir(&self) -> PathBuf {
        self.root.join("columns")
    }

    /// Path to a column's JSON file
    pub fn column_path(&self, id: &ColumnId) -> PathBuf {
        self.columns_dir().join(format!("{}.json", id))
    }

    /// Path to tasks directory
    pub fn tasks_dir(&self) -> PathBuf {
        self.root.join("tasks")
    }

    /// Path to a task's JSON file
    pub fn task_path(&self, id: &TaskId) -> PathBuf {
        self.tasks_dir().join(format!("{}.json", id))
    }

    /// Path to a task's log file
    pub fn task_log_path(&self, id: &TaskId) -> PathBuf {
        self.tasks_dir().join(format!("{}.jsonl", id))
    }

    /// Path to the activity directory
    pub fn activity_dir(&self) -> PathBuf {
        self.root.join("activity")
    }

    /// Path to the current activity log
    pub fn activity_path(&self) -> PathBuf {
        self.activity_dir().join("current.jsonl")
    }

    /// Path to the lock file
    pub fn lock_path(&self) -> PathBuf {
        self.root.join(".lock")
    }

    // =========================================================================
    // Directory initialization
    // =========================================================================

    /// Check if the board is initialized
    pub fn is_initialized(&self) -> bool {
        self.board_path().exists()
    }

    /// Create the directory structure for a new board
    ///
    /// This is idempotent - safe to call multiple times.
    pub async fn create_directories(&self) -> Result<()> {
        fs::create_dir_all(&self.root).await?;
        fs::create_dir_all(self.columns_dir()).await?;
        fs::create_dir_all(self.tasks_dir()).await?;
        fs::create_dir_all(self.activity_dir()).await?;
        Ok(())
    }

    // =========================================================================
    // Board I/O
    // =========================================================================

    /// Read the board file
    pub async fn read_board(&self) -> Result<Board> {
        let path = self.board_path();
        if !path.exists() {
            return Err(TaskboardError::NotInitialized {
                path: self.root.clone(),
            });
        }

        let content = fs::read_to_string(&path).await?;
        let board: Board = serde_json::from_str(&content)?;
        Ok(board)
    }

    /// Write the board file (atomic write via temp file)
    pub async fn write_board(&self, board: &Board) -> Result<()> {
        let path = self.board_path();
        let content = serde_json::to_string_pretty(board)?;
        atomic_write(&path, content.as_bytes()).await
    }

    // =========================================================================
    // Column I/O
    // =========================================================================

    /// Read a column file
    pub async fn read_column(&self, id: &ColumnId) -> Result<Column> {
        let path = self.column_path(id);
        if !path.exists() {
            return Err(TaskboardError::ColumnNotFound { id: id.to_string() });
        }

        let content = fs::read_to_string(&path).await?;
        let mut column: Column = serde_json::from_str(&content)?;
        column.id = id.clone();
        Ok(column)
    }

    /// Write a column file (atomic write via temp file)
    pub async fn write_column(&self, column: &Column) -> Result<()> {
        let path = self.column_path(&column.id);
        let content = serde_json::to_string_pretty(column)?;
        atomic_write(&path, content.as_bytes()).await
    }

    /// Check if a column exists
    pub fn column_exists(&self, id: &ColumnId) -> bool {
        self.column_path(id).exists()
    }

    /// List all column IDs by reading the columns directory
    pub async fn list_column_ids(&self) -> Result<Vec<ColumnId>> {
        Ok(list_json_stems(&self.columns_dir())
            .await?
            .into_iter()
            .map(ColumnId::from_string)
            .collect())
    }

    /// Read all columns
    pub async fn read_all_columns(&self) -> Result<Vec<Column>> {
        let ids = self.list_column_ids().await?;
        let mut columns = Vec::with_capacity(ids.len());

        for id in ids {
            columns.push(self.read_column(&id).await?);
        }

        Ok(columns)
    }

    // =========================================================================
    // Task I/O
    // =========================================================================

    /// Read a task file
    pub async fn read_task(&self, id: &TaskId) -> Result<Task> {
        let path = self.task_path(id);
        if !path.exists() {
            return Err(TaskboardError::TaskNotFound { id: id.to_string() });
        }

        let content = fs::read_to_string(&path).await?;
        let mut task: Task = serde_json::from_str(&content)?;
        task.id = id.clone();
        Ok(task)
    }

    /// Write a task file (atomic write via temp file)
    pub async fn write_task(&self, task: &Task) -> Result<()> {
        let path = self.task_path(&task.id);
        let content = serde_json::to_string_pretty(task)?;
        atomic_write(&path, content.as_bytes()).await
    }

    /// Check if a task exists
    pub fn task_exists(&self, id: &TaskId) -> bool {
        self.task_path(id).exists()
    }

    /// List all task IDs by reading the tasks directory
    pub async fn list_task_ids(&self) -> Result<Vec<TaskId>> {
        Ok(list_json_stems(&self.tasks_dir())
            .await?
            .into_iter()
            .map(TaskId::from_string)
            .collect())
    }

    /// Read all tasks
    pub async fn read_all_tasks(&self) -> Result<Vec<Task>> {
        let ids = self.list_task_ids().await?;
        let mut tasks = Vec::with_capacity(ids.len());

        for id in ids {
            tasks.push(self.read_task(&id).await?);
        }

        Ok(tasks)
    }

    // =========================================================================
    // Changeset commit
    // =========================================================================

    /// Apply a multi-entity change as one all-or-nothing commit.
    ///
    /// Writes are staged to temp files first; only when every stage
    /// succeeds are the temp files renamed over the real ones and the
    /// deletions performed. If the apply phase fails partway, the files
    /// already touched are restored from snapshots taken up front, so a
    /// failed commit leaves positions exactly as they were.
    pub async fn commit(&self, change: &Changeset) -> Result<()> {
        if change.is_empty() {
            return Ok(());
        }

        // (final path, staged temp path) for writes
        let mut writes: Vec<(PathBuf, PathBuf)> = Vec::new();
        // paths to remove after the writes land
        let mut deletions: Vec<PathBuf> = Vec::new();
        // pre-commit contents of every touched path
        let mut snapshots: HashMap<PathBuf, Option<Vec<u8>>> = HashMap::new();

        if let Some(board) = &change.board {
            let path = self.board_path();
            let staged = path.with_extension("tmp");
            snapshots.insert(path.clone(), read_optional(&path).await?);
            let content = serde_json::to_string_pretty(board)?;
            if let Err(e) = fs::write(&staged, content.as_bytes()).await {
                cleanup_staged(&writes, &staged).await;
                return Err(e.into());
            }
            writes.push((path, staged));
        }

        for task in &change.tasks {
            let path = self.task_path(&task.id);
            let staged = path.with_extension("tmp");
            snapshots.insert(path.clone(), read_optional(&path).await?);
            let content = serde_json::to_string_pretty(task)?;
            if let Err(e) = fs::write(&staged, content.as_bytes()).await {
                cleanup_staged(&writes, &staged).await;
                return Err(e.into());
            }
            writes.push((path, staged));
        }

        for column in &change.columns {
            let path = self.column_path(&column.id);
            let staged = path.with_extension("tmp");
            snapshots.insert(path.clone(), read_optional(&path).await?);
            let content = serde_json::to_string_pretty(column)?;
            if let Err(e) = fs::write(&staged, content.as_bytes()).await {
                cleanup_staged(&writes, &staged).await;
                return Err(e.into());
            }
            writes.push((path, staged));
        }

        for id in &change.deleted_tasks {
            let path = self.task_path(id);
            snapshots.insert(path.clone(), read_optional(&path).await?);
            deletions.push(path);
            // Per-task logs go with the task; they are not position data,
            // so they are removed best-effort after the commit.
        }

        for id in &change.deleted_columns {
            let path = self.column_path(id);
            snapshots.insert(path.clone(), read_optional(&path).await?);
            deletions.push(path);
        }

        tracing::debug!(
            writes = writes.len(),
            deletions = deletions.len(),
            "committing changeset"
        );

        // Apply phase: renames and removals, tracking what has landed
        let mut applied: Vec<PathBuf> = Vec::new();

        for (path, staged) in &writes {
            if let Err(e) = fs::rename(staged, path).await {
                self.rollback(&applied, &snapshots).await;
                cleanup_staged(&writes, staged).await;
                return Err(e.into());
            }
            applied.push(path.clone());
        }

        for path in &deletions {
            if path.exists() {
                if let Err(e) = fs::remove_file(path).await {
                    self.rollback(&applied, &snapshots).await;
                    return Err(e.into());
                }
                applied.push(path.clone());
            }
        }

        // Trailing cleanup outside the transaction boundary
        for id in &change.deleted_tasks {
            let log_path = self.task_log_path(id);
            if log_path.exists() {
                let _ = fs::remove_file(&log_path).await;
            }
        }

        Ok(())
    }

    /// Restore the snapshots of paths touched by a failed commit
    async fn rollback(&self, applied: &[PathBuf], snapshots: &HashMap<PathBuf, Option<Vec<u8>>>) {
        tracing::warn!(applied = applied.len(), "commit failed - rolling back");

        for path in applied {
            let restore = match snapshots.get(path) {
                Some(Some(bytes)) => fs::write(path, bytes).await,
                // Path did not exist before the commit
                Some(None) => match fs::remove_file(path).await {
                    Ok(()) => Ok(()),
                    Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
                    Err(e) => Err(e),
                },
                None => Ok(()),
            };

            if let Err(e) = restore {
                tracing::warn!(path = %path.display(), error = %e, "rollback write failed");
            }
        }
    }

    // =========================================================================
    // Activity logging
    // =========================================================================

    /// Append a log entry to the global activity log
    pub async fn append_activity(&self, entry: &LogEntry) -> Result<()> {
        self.append_log(&self.activity_path(), entry).await
    }

    /// Append a log entry to a task's log
    pub async fn append_task_log(&self, task_id: &TaskId, entry: &LogEntry) -> Result<()> {
        self.append_log(&self.task_log_path(task_id), entry).await
    }

    /// Append a log entry to a JSONL file
    async fn append_log(&self, path: &Path, entry: &LogEntry) -> Result<()> {
        let mut line = serde_json::to_string(entry)?;
        line.push('\n');

        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .await?;

        file.write_all(line.as_bytes()).await?;
        file.flush().await?;

        Ok(())
    }

    /// Read activity log entries (from current.jsonl), newest first
    pub async fn read_activity(&self, limit: Option<usize>) -> Result<Vec<LogEntry>> {
        let path = self.activity_path();
        if !path.exists() {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&path).await?;
        let mut entries: Vec<LogEntry> = content
            .lines()
            .filter(|line| !line.is_empty())
            .filter_map(|line| serde_json::from_str(line).ok())
            .collect();

        entries.reverse();

        if let Some(limit) = limit {
            entries.truncate(limit);
        }

        Ok(entries)
    }

    // =========================================================================
    // Locking
    // =========================================================================

    /// Try to acquire an exclusive lock (non-blocking).
    ///
    /// Every mutating command holds this lock for its whole duration; a
    /// busy lock surfaces as [`TaskboardError::LockBusy`], which the caller
    /// should treat as "retry the whole operation".
    pub async fn lock(&self) -> Result<BoardLock> {
        let (file, path) = self.open_lock_file().await?;

        match file.try_lock_exclusive() {
            Ok(()) => Ok(BoardLock { file, path }),
            Err(_) => Err(TaskboardError::LockBusy),
        }
    }

    /// Try to acquire a shared lock (non-blocking).
    ///
    /// Multi-file read commands hold this for the duration of their reads:
    /// readers coexist with each other, but a commit in flight surfaces as
    /// [`TaskboardError::LockBusy`] instead of a half-renumbered snapshot.
    pub async fn lock_shared(&self) -> Result<BoardLock> {
        let (file, path) = self.open_lock_file().await?;

        match fs2::FileExt::try_lock_shared(&file) {
            Ok(()) => Ok(BoardLock { file, path }),
            Err(_) => Err(TaskboardError::LockBusy),
        }
    }

    async fn open_lock_file(&self) -> Result<(std::fs::File, PathBuf)> {
        let lock_path = self.lock_path();

        if let Some(parent) = lock_path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .open(&lock_path)?;

        Ok((file, lock_path))
    }
}

/// A buffered multi-entity change, applied all-or-nothing by
/// [`BoardContext::commit`]
#[derive(Debug, Default)]
pub struct Changeset {
    board: Option<Board>,
    tasks: Vec<Task>,
    columns: Vec<Column>,
    deleted_tasks: Vec<TaskId>,
    deleted_columns: Vec<ColumnId>,
}

impl Changeset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a board metadata write
    pub fn write_board(&mut self, board: Board) {
        self.board = Some(board);
    }

    /// Queue a task write
    pub fn write_task(&mut self, task: Task) {
        self.tasks.push(task);
    }

    /// Queue a column write
    pub fn write_column(&mut self, column: Column) {
        self.columns.push(column);
    }

    /// Queue a task deletion
    pub fn delete_task(&mut self, id: TaskId) {
        self.deleted_tasks.push(id);
    }

    /// Queue a column deletion
    pub fn delete_column(&mut self, id: ColumnId) {
        self.deleted_columns.push(id);
    }

    pub fn is_empty(&self) -> bool {
        self.board.is_none()
            && self.tasks.is_empty()
            && self.columns.is_empty()
            && self.deleted_tasks.is_empty()
            && self.deleted_columns.is_empty()
    }
}

/// RAII lock guard - releases on drop
pub struct BoardLock {
    file: std::fs::File,
    #[allow(dead_code)]
    path: PathBuf,
}

impl Drop for BoardLock {
    fn drop(&mut self) {
        let _ = fs2::FileExt::unlock(&self.file);
    }
}

/// Atomic write via temp file and rename
async fn atomic_write(path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }

    let temp_path = path.with_extension("tmp");
    fs::write(&temp_path, content).await?;
    fs::rename(&temp_path, path).await?;

    Ok(())
}

/// Read a file's bytes, or None if it does not exist
async fn read_optional(path: &Path) -> Result<Option<Vec<u8>>> {
    match fs::read(path).await {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Remove staged temp files after a failed commit, up to and including `last`
async fn cleanup_staged(writes: &[(PathBuf, PathBuf)], last: &Path) {
    for (_, staged) in writes {
        let _ = fs::remove_file(staged).await;
    }
    let _ = fs::remove_file(last).await;
}

/// File stems of all .json entries in a directory
async fn list_json_stems(dir: &Path) -> Result<Vec<String>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let mut stems = Vec::new();
    let mut entries = fs::read_dir(dir).await?;

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.extension().and_then(|s| s.to_str()) == Some("json") {
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                stems.push(stem.to_string());
            }
        }
    }

    Ok(stems)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Position;
    use tempfile::TempDir;

    async fn setup() -> (TempDir, BoardContext) {
        let temp = TempDir::new().unwrap();
        let board_dir = temp.path().join(".taskboard");
        let ctx = BoardContext::new(board_dir);
        ctx.create_directories().await.unwrap();
        (temp, ctx)
    }

    #[tokio::test]
    async fn test_paths() {
        let (temp, ctx) = setup().await;
        let root = temp.path().join(".taskboard");

        assert_eq!(ctx.root(), root);
        assert_eq!(ctx.board_path(), root.join("board.json"));
        assert_eq!(ctx.tasks_dir(), root.join("tasks"));
        assert_eq!(ctx.columns_dir(), root.join("columns"));
    }

    #[tokio::test]
    async fn test_board_io() {
        let (_temp, ctx) = setup().await;

        let board = Board::new("Test Board");
        ctx.write_board(&board).await.unwrap();

        let loaded = ctx.read_board().await.unwrap();
        assert_eq!(loaded.name, "Test Board");
    }

    #[tokio::test]
    async fn test_task_io_restores_id_from_filename() {
        let (_temp, ctx) = setup().await;

        let task = Task::new(
            "Test Task",
            Position::new(ColumnId::from_string("todo"), 0),
        );
        let task_id = task.id.clone();

        ctx.write_task(&task).await.unwrap();
        let loaded = ctx.read_task(&task_id).await.unwrap();

        assert_eq!(loaded.id, task_id);
        assert_eq!(loaded.title, "Test Task");
    }

    #[tokio::test]
    async fn test_column_io() {
        let (_temp, ctx) = setup().await;

        for column in Board::default_columns() {
            ctx.write_column(&column).await.unwrap();
        }

        let mut columns = ctx.read_all_columns().await.unwrap();
        columns.sort_by_key(|c| c.position);
        assert_eq!(columns.len(), 3);
        assert_eq!(columns[0].id.as_str(), "todo");
    }

    #[tokio::test]
    async fn test_read_missing_task() {
        let (_temp, ctx) = setup().await;

        let result = ctx.read_task(&TaskId::from_string("missing")).await;
        assert!(matches!(result, Err(TaskboardError::TaskNotFound { .. })));
    }

    #[tokio::test]
    async fn test_commit_writes_and_deletes() {
        let (_temp, ctx) = setup().await;

        let a = Task::new("A", Position::new(ColumnId::from_string("todo"), 0));
        let b = Task::new("B", Position::new(ColumnId::from_string("todo"), 1));
        ctx.write_task(&a).await.unwrap();
        ctx.write_task(&b).await.unwrap();

        let mut shifted = ctx.read_task(&b.id).await.unwrap();
        shifted.position.index = 0;

        let mut change = Changeset::new();
        change.write_task(shifted);
        change.delete_task(a.id.clone());
        ctx.commit(&change).await.unwrap();

        assert!(!ctx.task_exists(&a.id));
        assert_eq!(ctx.read_task(&b.id).await.unwrap().position.index, 0);
    }

    #[tokio::test]
    async fn test_commit_stages_board_with_columns() {
        let (_temp, ctx) = setup().await;

        let mut change = Changeset::new();
        change.write_board(Board::new("Staged"));
        for column in Board::default_columns() {
            change.write_column(column);
        }
        ctx.commit(&change).await.unwrap();

        assert_eq!(ctx.read_board().await.unwrap().name, "Staged");
        assert_eq!(ctx.read_all_columns().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_empty_commit_is_a_noop() {
        let (_temp, ctx) = setup().await;
        ctx.commit(&Changeset::new()).await.unwrap();
    }

    #[tokio::test]
    async fn test_lock_exclusive() {
        let (_temp, ctx) = setup().await;

        let guard = ctx.lock().await.unwrap();
        let second = ctx.lock().await;
        assert!(matches!(second, Err(TaskboardError::LockBusy)));

        drop(guard);
        assert!(ctx.lock().await.is_ok());
    }

    #[tokio::test]
    async fn test_shared_locks_coexist() {
        let (_temp, ctx) = setup().await;

        let first = ctx.lock_shared().await.unwrap();
        let second = ctx.lock_shared().await.unwrap();

        drop(first);
        drop(second);
        assert!(ctx.lock().await.is_ok());
    }

    #[tokio::test]
    async fn test_shared_and_exclusive_locks_conflict() {
        let (_temp, ctx) = setup().await;

        // A commit in flight keeps readers out
        let exclusive = ctx.lock().await.unwrap();
        assert!(matches!(
            ctx.lock_shared().await,
            Err(TaskboardError::LockBusy)
        ));
        drop(exclusive);

        // And a reader in flight keeps commits out
        let shared = ctx.lock_shared().await.unwrap();
        assert!(matches!(ctx.lock().await, Err(TaskboardError::LockBusy)));
        drop(shared);
    }

    #[tokio::test]
    async fn test_activity_log_round_trip() {
        let (_temp, ctx) = setup().await;

        let entry = LogEntry::new(
            "add task",
            serde_json::json!({"title": "x"}),
            serde_json::json!({"id": "t1"}),
            Some("tester".into()),
            3,
        );
        ctx.append_activity(&entry).await.unwrap();

        let entries = ctx.read_activity(None).await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].op, "add task");
        assert_eq!(entries[0].actor.as_deref(), Some("tester"));
    }
}
