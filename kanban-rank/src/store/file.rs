//! FileStore - file-backed implementation of [`BoardStore`]
//!
//! ```text
//! root/
//! ├── {owner}/columns/{id}.json   # Column state
//! ├── {owner}/tasks/{id}.json     # Task state
//! ├── {owner}/tasks/{id}.jsonl    # Per-task operation log
//! ├── activity/current.jsonl      # Global operation log
//! └── .lock                       # Advisory lock file
//! ```
//!
//! Owner and record ids become path components, so every id is checked
//! with `validate` before a path is built from it. Owner directories are
//! created on first write.
//!
//! Records are written atomically (temp file + rename). Logs are JSONL,
//! appended oldest first and returned newest first.

use super::{entry_owner, newest_first, sort_columns, sort_tasks, BoardStore};
use crate::error::{BoardError, Result};
use crate::rank::Rank;
use crate::types::{BoardKey, Column, ColumnId, ColumnKey, OwnerId, Task, TaskId};
use async_trait::async_trait;
use chrono::Utc;
use fs2::FileExt;
use kanban_rank_operations::LogEntry;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

/// Store rooted at a directory on disk
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Create a store for the given root directory
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    // =========================================================================
    // Path helpers
    // =========================================================================

    /// Get the root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path to one owner's directory
    pub fn owner_dir(&self, owner: &OwnerId) -> PathBuf {
        self.root.join(owner.as_str())
    }

    /// Path to an owner's tasks directory
    pub fn tasks_dir(&self, owner: &OwnerId) -> PathBuf {
        self.owner_dir(owner).join("tasks")
    }

    /// Path to a task's JSON file
    pub fn task_path(&self, owner: &OwnerId, id: &TaskId) -> PathBuf {
        self.tasks_dir(owner).join(format!("{}.json", id))
    }

    /// Path to a task's log file
    pub fn task_log_path(&self, owner: &OwnerId, id: &TaskId) -> PathBuf {
        self.tasks_dir(owner).join(format!("{}.jsonl", id))
    }

    /// Path to an owner's columns directory
    pub fn columns_dir(&self, owner: &OwnerId) -> PathBuf {
        self.owner_dir(owner).join("columns")
    }

    /// Path to a column's JSON file
    pub fn column_path(&self, owner: &OwnerId, id: &ColumnId) -> PathBuf {
        self.columns_dir(owner).join(format!("{}.json", id))
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

    fn checked_task_path(&self, owner: &OwnerId, id: &TaskId) -> Result<PathBuf> {
        owner.validate("owner")?;
        id.validate("id")?;
        Ok(self.task_path(owner, id))
    }

    fn checked_column_path(&self, owner: &OwnerId, id: &ColumnId) -> Result<PathBuf> {
        owner.validate("owner")?;
        id.validate("id")?;
        Ok(self.column_path(owner, id))
    }

    // =========================================================================
    // Directory initialization
    // =========================================================================

    /// Check if all required directories exist
    pub fn directories_exist(&self) -> bool {
        self.root.is_dir() && self.activity_dir().is_dir()
    }

    /// Create the directory structure. Idempotent.
    pub async fn create_directories(&self) -> Result<()> {
        fs::create_dir_all(&self.root).await?;
        fs::create_dir_all(self.activity_dir()).await?;
        debug!(root = %self.root.display(), "created store directories");
        Ok(())
    }

    fn ensure_initialized(&self) -> Result<()> {
        if self.directories_exist() {
            Ok(())
        } else {
            Err(BoardError::NotInitialized {
                path: self.root.clone(),
            })
        }
    }

    // =========================================================================
    // Locking
    // =========================================================================

    /// Try to acquire the exclusive store lock (non-blocking).
    ///
    /// Holding it around a read-then-write sequence keeps concurrent movers
    /// from interleaving inside the same store.
    pub async fn lock(&self) -> Result<StoreLock> {
        let lock_path = self.lock_path();

        if let Some(parent) = lock_path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&lock_path)?;

        match file.try_lock_exclusive() {
            Ok(()) => Ok(StoreLock { file }),
            Err(_) => Err(BoardError::LockBusy),
        }
    }

    // =========================================================================
    // Record helpers
    // =========================================================================

    async fn read_record<T: DeserializeOwned>(path: &Path) -> Result<T> {
        let content = fs::read_to_string(path).await?;
        Ok(serde_json::from_str(&content)?)
    }

    async fn write_record<T: Serialize>(path: &Path, record: &T) -> Result<()> {
        let content = serde_json::to_string_pretty(record)?;
        atomic_write(path, content.as_bytes()).await
    }

    async fn read_all<T: DeserializeOwned>(dir: &Path) -> Result<Vec<T>> {
        let mut records = Vec::new();
        if !dir.is_dir() {
            return Ok(records);
        }
        let mut entries = fs::read_dir(dir).await?;

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|s| s.to_str()) == Some("json") {
                records.push(Self::read_record(&path).await?);
            }
        }

        Ok(records)
    }

    async fn append_line(path: &Path, entry: &LogEntry) -> Result<()> {
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

    async fn read_lines(path: &Path) -> Result<Vec<LogEntry>> {
        if !path.exists() {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(path).await?;
        let mut entries = Vec::new();
        for line in content.lines().filter(|line| !line.is_empty()) {
            match serde_json::from_str(line) {
                Ok(entry) => entries.push(entry),
                Err(e) => warn!(path = %path.display(), error = %e, "skipping unreadable log line"),
            }
        }
        Ok(entries)
    }

    /// Log entries for one of `owner`'s tasks, newest first
    pub async fn read_task_log(
        &self,
        owner: &OwnerId,
        id: &TaskId,
        limit: Option<usize>,
    ) -> Result<Vec<LogEntry>> {
        self.checked_task_path(owner, id)?;
        let entries = Self::read_lines(&self.task_log_path(owner, id)).await?;
        Ok(newest_first(entries, limit))
    }
}

#[async_trait]
impl BoardStore for FileStore {
    async fn read_task(&self, owner: &OwnerId, id: &TaskId) -> Result<Task> {
        self.ensure_initialized()?;
        let path = self.checked_task_path(owner, id)?;
        if !path.exists() {
            return Err(BoardError::TaskNotFound { id: id.to_string() });
        }
        Self::read_record(&path).await
    }

    async fn insert_task(&self, task: &Task) -> Result<()> {
        self.ensure_initialized()?;
        let path = self.checked_task_path(&task.owner, &task.id)?;
        if path.exists() {
            return Err(BoardError::duplicate_id("task", task.id.to_string()));
        }
        Self::write_record(&path, task).await
    }

    async fn write_task(&self, task: &Task) -> Result<()> {
        self.read_task(&task.owner, &task.id).await?;
        Self::write_record(&self.task_path(&task.owner, &task.id), task).await?;
        debug!(task = %task.id, "wrote task");
        Ok(())
    }

    async fn list_tasks(&self, key: &ColumnKey) -> Result<Vec<Task>> {
        self.ensure_initialized()?;
        key.owner.validate("owner")?;
        let mut tasks: Vec<Task> = Self::read_all::<Task>(&self.tasks_dir(&key.owner))
            .await?
            .into_iter()
            .filter(|t| t.column == key.column)
            .collect();
        sort_tasks(&mut tasks);
        Ok(tasks)
    }

    async fn write_placement(
        &self,
        owner: &OwnerId,
        id: &TaskId,
        column: &ColumnId,
        rank: &Rank,
    ) -> Result<Task> {
        let mut task = self.read_task(owner, id).await?;
        task.column = column.clone();
        task.rank = rank.clone();
        task.updated_at = Utc::now();

        Self::write_record(&self.task_path(owner, id), &task).await?;
        debug!(task = %id, column = %column, rank = %rank, "wrote placement");
        Ok(task)
    }

    async fn read_column(&self, owner: &OwnerId, id: &ColumnId) -> Result<Column> {
        self.ensure_initialized()?;
        let path = self.checked_column_path(owner, id)?;
        if !path.exists() {
            return Err(BoardError::ColumnNotFound { id: id.to_string() });
        }
        Self::read_record(&path).await
    }

    async fn insert_column(&self, column: &Column) -> Result<()> {
        self.ensure_initialized()?;
        let path = self.checked_column_path(&column.owner, &column.id)?;
        if path.exists() {
            return Err(BoardError::duplicate_id("column", column.id.to_string()));
        }
        Self::write_record(&path, column).await
    }

    async fn write_column(&self, column: &Column) -> Result<()> {
        self.read_column(&column.owner, &column.id).await?;
        Self::write_record(&self.column_path(&column.owner, &column.id), column).await?;
        debug!(column = %column.id, "wrote column");
        Ok(())
    }

    async fn delete_column(&self, owner: &OwnerId, id: &ColumnId) -> Result<Column> {
        let column = self.read_column(owner, id).await?;
        fs::remove_file(self.column_path(owner, id)).await?;
        debug!(column = %id, "deleted column");
        Ok(column)
    }

    async fn list_columns(&self, key: &BoardKey) -> Result<Vec<Column>> {
        self.ensure_initialized()?;
        key.owner.validate("owner")?;
        let mut columns: Vec<Column> = Self::read_all::<Column>(&self.columns_dir(&key.owner))
            .await?
            .into_iter()
            .filter(|c| c.project == key.project)
            .collect();
        sort_columns(&mut columns);
        Ok(columns)
    }

    async fn write_container_position(
        &self,
        owner: &OwnerId,
        id: &ColumnId,
        position: usize,
    ) -> Result<()> {
        let mut column = self.read_column(owner, id).await?;
        column.order = position;
        Self::write_record(&self.column_path(owner, id), &column).await?;
        debug!(column = %id, position, "wrote column position");
        Ok(())
    }

    async fn append_log(&self, entry: &LogEntry) -> Result<()> {
        self.ensure_initialized()?;
        Self::append_line(&self.activity_path(), entry).await?;

        if let (Some(owner), Some(subject)) = (entry_owner(entry), &entry.subject) {
            let id = TaskId::from_string(subject.as_str());
            if let Ok(path) = self.checked_task_path(&owner, &id) {
                if path.exists() {
                    Self::append_line(&self.task_log_path(&owner, &id), entry).await?;
                }
            }
        }
        Ok(())
    }

    async fn read_activity(&self, limit: Option<usize>) -> Result<Vec<LogEntry>> {
        let entries = Self::read_lines(&self.activity_path()).await?;
        Ok(newest_first(entries, limit))
    }
}

/// RAII lock guard - releases on drop
#[derive(Debug)]
pub struct StoreLock {
    file: std::fs::File,
}

impl Drop for StoreLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
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
