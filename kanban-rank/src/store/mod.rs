//! Storage seam for the ordering engine.
//!
//! The engine reads column membership and writes placements only through
//! [`BoardStore`], so it runs unchanged on any backend. Two backends ship
//! with the crate: [`MemoryStore`] and the file-backed [`FileStore`].
//!
//! Records are scoped by owner: two owners may use the same task or column
//! id without seeing each other's records.
//!
//! Every call is independent. Nothing here gives a multi-call transaction;
//! callers that need one serialize at a higher level (see
//! [`FileStore::lock`]).

mod file;
mod memory;

pub use file::{FileStore, StoreLock};
pub use memory::MemoryStore;

use crate::error::Result;
use crate::rank::Rank;
use crate::types::{BoardKey, Column, ColumnId, ColumnKey, Member, OwnerId, Task, TaskId};
use async_trait::async_trait;
use kanban_rank_operations::LogEntry;
use serde_json::Value;

/// Persistence operations the engine relies on
#[async_trait]
pub trait BoardStore: Send + Sync {
    // ========================================================================
    // TASK OPERATIONS
    // ========================================================================

    /// Read one task owned by `owner`
    async fn read_task(&self, owner: &OwnerId, id: &TaskId) -> Result<Task>;

    /// Insert a new task
    async fn insert_task(&self, task: &Task) -> Result<()>;

    /// Replace a stored task with `task`
    async fn write_task(&self, task: &Task) -> Result<()>;

    /// Tasks of one column, ascending by rank then id
    async fn list_tasks(&self, key: &ColumnKey) -> Result<Vec<Task>>;

    /// Ordered `{id, rank}` membership of one column
    async fn list_members(&self, key: &ColumnKey) -> Result<Vec<Member>> {
        Ok(self.list_tasks(key).await?.iter().map(Member::from).collect())
    }

    /// Set a task's column and rank in one update, returning the new snapshot
    async fn write_placement(
        &self,
        owner: &OwnerId,
        id: &TaskId,
        column: &ColumnId,
        rank: &Rank,
    ) -> Result<Task>;

    // ========================================================================
    // COLUMN OPERATIONS
    // ========================================================================

    /// Read one column owned by `owner`
    async fn read_column(&self, owner: &OwnerId, id: &ColumnId) -> Result<Column>;

    /// Insert a new column
    async fn insert_column(&self, column: &Column) -> Result<()>;

    /// Replace a stored column with `column`
    async fn write_column(&self, column: &Column) -> Result<()>;

    /// Remove a column, returning what was removed
    async fn delete_column(&self, owner: &OwnerId, id: &ColumnId) -> Result<Column>;

    /// Columns of one board, ascending by order then id
    async fn list_columns(&self, key: &BoardKey) -> Result<Vec<Column>>;

    /// Set a column's integer position
    async fn write_container_position(
        &self,
        owner: &OwnerId,
        id: &ColumnId,
        position: usize,
    ) -> Result<()>;

    // ========================================================================
    // AUDIT LOG
    // ========================================================================

    /// Append one entry to the activity log
    async fn append_log(&self, entry: &LogEntry) -> Result<()>;

    /// Activity log entries, newest first
    async fn read_activity(&self, limit: Option<usize>) -> Result<Vec<LogEntry>>;
}

/// Owner named in a log entry's input, if any
pub(crate) fn entry_owner(entry: &LogEntry) -> Option<OwnerId> {
    entry
        .input
        .get("owner")
        .and_then(Value::as_str)
        .map(OwnerId::from_string)
}

/// Sort tasks the way every store returns them
pub(crate) fn sort_tasks(tasks: &mut [Task]) {
    tasks.sort_by(|a, b| a.rank.cmp(&b.rank).then_with(|| a.id.cmp(&b.id)));
}

/// Sort columns the way every store returns them
pub(crate) fn sort_columns(columns: &mut [Column]) {
    columns.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.id.cmp(&b.id)));
}

/// Keep the newest `limit` entries, newest first
pub(crate) fn newest_first(mut entries: Vec<LogEntry>, limit: Option<usize>) -> Vec<LogEntry> {
    entries.reverse();
    if let Some(limit) = limit {
        entries.truncate(limit);
    }
    entries
}
