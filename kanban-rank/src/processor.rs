//! Runs board commands and records their log entries

use crate::context::BoardContext;
use crate::error::{BoardError, Result};
use async_trait::async_trait;
use kanban_rank_operations::{Execute, OperationProcessor};
use serde_json::Value;
use tracing::{debug, warn};

/// Executes commands against a [`BoardContext`] and appends each produced
/// log entry to the store's activity log, stamped with the actor.
#[derive(Debug, Clone, Default)]
pub struct BoardOperationProcessor {
    actor: Option<String>,
}

impl BoardOperationProcessor {
    /// Processor with no actor attribution
    pub fn new() -> Self {
        Self::default()
    }

    /// Processor that attributes every entry to `actor`
    pub fn with_actor(actor: impl Into<String>) -> Self {
        Self {
            actor: Some(actor.into()),
        }
    }

    pub fn actor(&self) -> Option<&str> {
        self.actor.as_deref()
    }
}

#[async_trait]
impl OperationProcessor<BoardContext, BoardError> for BoardOperationProcessor {
    async fn process<O>(&self, operation: &O, ctx: &BoardContext) -> Result<Value>
    where
        O: Execute<BoardContext, BoardError> + 'static,
    {
        let op = operation.op_string();
        let (result, log_entry) = operation.execute(ctx).await.split();

        if let Some(mut entry) = log_entry {
            if let Some(actor) = &self.actor {
                entry = entry.with_actor(actor.clone());
            }
            // A failed audit write must not mask the operation's own error
            match (&result, ctx.store().append_log(&entry).await) {
                (_, Ok(())) => debug!(op = %op, entry = %entry.id, "logged operation"),
                (Ok(_), Err(e)) => return Err(e),
                (Err(_), Err(e)) => warn!(op = %op, error = %e, "could not log failed operation"),
            }
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::AddColumn;
    use crate::store::MemoryStore;
    use crate::task::ListTasks;
    use crate::types::{ColumnId, OwnerId, ProjectId};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_logged_operation_gets_actor() {
        let ctx = BoardContext::new(Arc::new(MemoryStore::new()));
        let processor = BoardOperationProcessor::with_actor("alice");

        processor
            .process(
                &AddColumn::new(OwnerId::from_string("o"), ProjectId::from_string("p"), "To Do"),
                &ctx,
            )
            .await
            .unwrap();

        let entries = ctx.store().read_activity(None).await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].op, "add column");
        assert_eq!(entries[0].actor.as_deref(), Some("alice"));
    }

    #[tokio::test]
    async fn test_unlogged_operation_leaves_no_entry() {
        let ctx = BoardContext::new(Arc::new(MemoryStore::new()));
        let processor = BoardOperationProcessor::new();

        let result = processor
            .process(
                &ListTasks::new(OwnerId::from_string("o"), ColumnId::from_string("todo")),
                &ctx,
            )
            .await
            .unwrap();

        assert_eq!(result, serde_json::json!([]));
        assert!(ctx.store().read_activity(None).await.unwrap().is_empty());
    }
}
