//! In-process store backed by hash maps

use super::{newest_first, sort_columns, sort_tasks, BoardStore};
use crate::error::{BoardError, Result};
use crate::rank::Rank;
use crate::types::{BoardKey, Column, ColumnId, ColumnKey, OwnerId, Task, TaskId};
use async_trait::async_trait;
use chrono::Utc;
use kanban_rank_operations::LogEntry;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::RwLock;

#[derive(Default)]
struct Tables {
    tasks: HashMap<(OwnerId, TaskId), Task>,
    columns: HashMap<(OwnerId, ColumnId), Column>,
    activity: Vec<LogEntry>,
}

fn task_key(owner: &OwnerId, id: &TaskId) -> (OwnerId, TaskId) {
    (owner.clone(), id.clone())
}

fn column_key(owner: &OwnerId, id: &ColumnId) -> (OwnerId, ColumnId) {
    (owner.clone(), id.clone())
}

/// Store that keeps everything in memory. Each call is atomic on its own.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
    writes: AtomicUsize,
    membership_reads: AtomicUsize,
    fail_writes: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Placement and position writes performed so far
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Column membership listings performed so far
    pub fn membership_reads(&self) -> usize {
        self.membership_reads.load(Ordering::SeqCst)
    }

    /// Make every placement/position write fail, to exercise error paths
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn check_writable(&self) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(BoardError::storage("writes disabled"));
        }
        Ok(())
    }
}

#[async_trait]
impl BoardStore for MemoryStore {
    async fn read_task(&self, owner: &OwnerId, id: &TaskId) -> Result<Task> {
        let tables = self.tables.read().await;
        tables
            .tasks
            .get(&task_key(owner, id))
            .cloned()
            .ok_or_else(|| BoardError::TaskNotFound { id: id.to_string() })
    }

    async fn insert_task(&self, task: &Task) -> Result<()> {
        let mut tables = self.tables.write().await;
        let key = task_key(&task.owner, &task.id);
        if tables.tasks.contains_key(&key) {
            return Err(BoardError::duplicate_id("task", task.id.to_string()));
        }
        tables.tasks.insert(key, task.clone());
        Ok(())
    }

    async fn write_task(&self, task: &Task) -> Result<()> {
        let mut tables = self.tables.write().await;
        let stored = tables
            .tasks
            .get_mut(&task_key(&task.owner, &task.id))
            .ok_or_else(|| BoardError::TaskNotFound {
                id: task.id.to_string(),
            })?;
        *stored = task.clone();
        Ok(())
    }

    async fn list_tasks(&self, key: &ColumnKey) -> Result<Vec<Task>> {
        self.membership_reads.fetch_add(1, Ordering::SeqCst);
        let tables = self.tables.read().await;
        let mut tasks: Vec<Task> = tables
            .tasks
            .values()
            .filter(|t| t.owner == key.owner && t.column == key.column)
            .cloned()
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
        self.check_writable()?;
        let mut tables = self.tables.write().await;
        let task = tables
            .tasks
            .get_mut(&task_key(owner, id))
            .ok_or_else(|| BoardError::TaskNotFound { id: id.to_string() })?;

        task.column = column.clone();
        task.rank = rank.clone();
        task.updated_at = Utc::now();
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(task.clone())
    }

    async fn read_column(&self, owner: &OwnerId, id: &ColumnId) -> Result<Column> {
        let tables = self.tables.read().await;
        tables
            .columns
            .get(&column_key(owner, id))
            .cloned()
            .ok_or_else(|| BoardError::ColumnNotFound { id: id.to_string() })
    }

    async fn insert_column(&self, column: &Column) -> Result<()> {
        let mut tables = self.tables.write().await;
        let key = column_key(&column.owner, &column.id);
        if tables.columns.contains_key(&key) {
            return Err(BoardError::duplicate_id("column", column.id.to_string()));
        }
        tables.columns.insert(key, column.clone());
        Ok(())
    }

    async fn write_column(&self, column: &Column) -> Result<()> {
        let mut tables = self.tables.write().await;
        let stored = tables
            .columns
            .get_mut(&column_key(&column.owner, &column.id))
            .ok_or_else(|| BoardError::ColumnNotFound {
                id: column.id.to_string(),
            })?;
        *stored = column.clone();
        Ok(())
    }

    async fn delete_column(&self, owner: &OwnerId, id: &ColumnId) -> Result<Column> {
        self.tables
            .write()
            .await
            .columns
            .remove(&column_key(owner, id))
            .ok_or_else(|| BoardError::ColumnNotFound { id: id.to_string() })
    }

    async fn list_columns(&self, key: &BoardKey) -> Result<Vec<Column>> {
        let tables = self.tables.read().await;
        let mut columns: Vec<Column> = tables
            .columns
            .values()
            .filter(|c| c.owner == key.owner && c.project == key.project)
            .cloned()
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
        self.check_writable()?;
        let mut tables = self.tables.write().await;
        let column = tables
            .columns
            .get_mut(&column_key(owner, id))
            .ok_or_else(|| BoardError::ColumnNotFound { id: id.to_string() })?;

        column.order = position;
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn append_log(&self, entry: &LogEntry) -> Result<()> {
        self.tables.write().await.activity.push(entry.clone());
        Ok(())
    }

    async fn read_activity(&self, limit: Option<usize>) -> Result<Vec<LogEntry>> {
        let entries = self.tables.read().await.activity.clone();
        Ok(newest_first(entries, limit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ProjectId;

    fn owner() -> OwnerId {
        OwnerId::from_string("owner")
    }

    fn task(column: &str, rank: &str) -> Task {
        Task::new(
            owner(),
            ProjectId::from_string("p"),
            ColumnId::from_string(column),
            "t",
            Rank::parse(rank).unwrap(),
        )
    }

    #[tokio::test]
    async fn test_members_sorted_by_rank() {
        let store = MemoryStore::new();
        for r in ["z", "A", "U"] {
            store.insert_task(&task("todo", r)).await.unwrap();
        }
        store.insert_task(&task("done", "0")).await.unwrap();

        let key = ColumnKey::new(owner(), ColumnId::from_string("todo"));
        let ranks: Vec<String> = store
            .list_members(&key)
            .await
            .unwrap()
            .into_iter()
            .map(|m| m.rank.to_string())
            .collect();
        assert_eq!(ranks, vec!["A", "U", "z"]);
    }

    #[tokio::test]
    async fn test_reads_are_owner_scoped() {
        let store = MemoryStore::new();
        let t = task("todo", "V");
        store.insert_task(&t).await.unwrap();

        let other = OwnerId::from_string("someone-else");
        let result = store.read_task(&other, &t.id).await;
        assert!(matches!(result, Err(BoardError::TaskNotFound { .. })));
        assert!(store.read_task(&owner(), &t.id).await.is_ok());
    }

    #[tokio::test]
    async fn test_owners_have_separate_namespaces() {
        let store = MemoryStore::new();
        let project = ProjectId::from_string("p");
        for name in ["alice", "bob"] {
            let column = Column::new(OwnerId::from_string(name), project.clone(), name, 0)
                .with_id(ColumnId::from_string("todo"));
            store.insert_column(&column).await.unwrap();
        }

        let todo = ColumnId::from_string("todo");
        let alice = store
            .read_column(&OwnerId::from_string("alice"), &todo)
            .await
            .unwrap();
        let bob = store
            .read_column(&OwnerId::from_string("bob"), &todo)
            .await
            .unwrap();
        assert_eq!(alice.name, "alice");
        assert_eq!(bob.name, "bob");

        store
            .delete_column(&OwnerId::from_string("alice"), &todo)
            .await
            .unwrap();
        assert!(store
            .read_column(&OwnerId::from_string("bob"), &todo)
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_write_task_requires_existing() {
        let store = MemoryStore::new();
        let mut t = task("todo", "V");
        assert!(matches!(
            store.write_task(&t).await,
            Err(BoardError::TaskNotFound { .. })
        ));

        store.insert_task(&t).await.unwrap();
        t.title = "renamed".into();
        store.write_task(&t).await.unwrap();
        assert_eq!(
            store.read_task(&owner(), &t.id).await.unwrap().title,
            "renamed"
        );
    }

    #[tokio::test]
    async fn test_write_placement_counts_and_fails_on_demand() {
        let store = MemoryStore::new();
        let t = task("todo", "V");
        store.insert_task(&t).await.unwrap();

        let done = ColumnId::from_string("done");
        let moved = store
            .write_placement(&owner(), &t.id, &done, &Rank::parse("W").unwrap())
            .await
            .unwrap();
        assert_eq!(moved.column, done);
        assert_eq!(store.write_count(), 1);

        store.set_fail_writes(true);
        let result = store
            .write_placement(&owner(), &t.id, &done, &Rank::mid())
            .await;
        assert!(matches!(result, Err(BoardError::Storage { .. })));
        assert_eq!(store.write_count(), 1);
    }

    #[tokio::test]
    async fn test_activity_newest_first() {
        let store = MemoryStore::new();
        for op in ["add task", "move task", "rebalance column"] {
            store
                .append_log(&LogEntry::new(op, serde_json::Value::Null, 0))
                .await
                .unwrap();
        }

        let entries = store.read_activity(Some(2)).await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].op, "rebalance column");
        assert_eq!(entries[1].op, "move task");
    }
}
