//! DeleteColumn command

use super::reorder::plan_reorder;
use crate::context::BoardContext;
use crate::error::BoardError;
use crate::outcome::{finish, Outcome};
use crate::types::{ColumnId, ColumnKey, OwnerId};
use kanban_rank_operations::{async_trait, Execute, ExecutionResult, LogEntry, Operation};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

/// Delete an empty column and close the gap it leaves in the board order
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DeleteColumn {
    pub owner: OwnerId,
    /// The column to delete
    pub id: ColumnId,
}

impl DeleteColumn {
    pub fn new(owner: OwnerId, id: impl Into<ColumnId>) -> Self {
        Self {
            owner,
            id: id.into(),
        }
    }
}

impl Operation for DeleteColumn {
    fn verb(&self) -> &'static str {
        "delete"
    }

    fn noun(&self) -> &'static str {
        "column"
    }
}

#[async_trait]
impl Execute<BoardContext, BoardError> for DeleteColumn {
    async fn execute(&self, ctx: &BoardContext) -> ExecutionResult<Value, BoardError> {
        let start = std::time::Instant::now();
        let input = serde_json::to_value(self).unwrap_or(Value::Null);

        let result: Result<Outcome, BoardError> = async {
            let column = ctx.store().read_column(&self.owner, &self.id).await?;

            let key = ColumnKey::new(self.owner.clone(), self.id.clone());
            let count = ctx.store().list_tasks(&key).await?.len();
            if count > 0 {
                return Err(BoardError::ColumnNotEmpty {
                    id: self.id.to_string(),
                    count,
                });
            }

            let board = column.board_key();
            let previous: Vec<ColumnId> = ctx
                .store()
                .list_columns(&board)
                .await?
                .into_iter()
                .map(|c| c.id)
                .collect();
            ctx.store().delete_column(&self.owner, &self.id).await?;

            let remaining: Vec<ColumnId> =
                previous.iter().filter(|id| **id != self.id).cloned().collect();
            let writes = plan_reorder(&remaining, &previous);
            for write in &writes {
                ctx.store()
                    .write_container_position(&self.owner, &write.id, write.position)
                    .await?;
            }
            debug!(column = %self.id, written = writes.len(), "deleted column");

            let entry = LogEntry::new(self.op_string(), input.clone(), 0)
                .with_subject(self.id.as_str())
                .with_change(
                    Some(json!({ "name": column.name, "order": column.order })),
                    None,
                );
            Ok(Outcome::Changed {
                value: json!({
                    "deleted": true,
                    "id": self.id,
                    "written": writes.len(),
                    "order": remaining,
                }),
                entry,
            })
        }
        .await;

        finish(self.op_string(), input, start, result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::{AddColumn, ListColumns};
    use crate::store::MemoryStore;
    use crate::task::AddTask;
    use crate::types::ProjectId;
    use std::sync::Arc;

    fn owner() -> OwnerId {
        OwnerId::from_string("o")
    }

    async fn board(names: &[&str]) -> (Arc<MemoryStore>, BoardContext) {
        let store = Arc::new(MemoryStore::new());
        let ctx = BoardContext::new(store.clone());
        for name in names {
            AddColumn::new(owner(), ProjectId::from_string("p"), *name)
                .with_id(*name)
                .execute(&ctx)
                .await
                .into_result()
                .unwrap();
        }
        (store, ctx)
    }

    #[tokio::test]
    async fn test_delete_closes_the_gap() {
        let (store, ctx) = board(&["todo", "doing", "review", "done"]).await;

        let result = DeleteColumn::new(owner(), "doing").execute(&ctx).await;
        assert!(result.should_log());
        assert_eq!(result.log_entry().unwrap().op, "delete column");

        let value = result.into_result().unwrap();
        assert_eq!(value["written"], 2);
        assert_eq!(store.write_count(), 2);

        let columns = ListColumns::new(owner(), ProjectId::from_string("p"))
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        let positions: Vec<(String, u64)> = columns
            .as_array()
            .unwrap()
            .iter()
            .map(|c| {
                (
                    c["id"].as_str().unwrap().to_string(),
                    c["order"].as_u64().unwrap(),
                )
            })
            .collect();
        assert_eq!(
            positions,
            vec![("todo".into(), 0), ("review".into(), 1), ("done".into(), 2)]
        );
    }

    #[tokio::test]
    async fn test_delete_last_column_writes_nothing_else() {
        let (store, ctx) = board(&["todo", "done"]).await;

        let value = DeleteColumn::new(owner(), "done")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        assert_eq!(value["written"], 0);
        assert_eq!(value["order"], json!(["todo"]));
        assert_eq!(store.write_count(), 0);
    }

    #[tokio::test]
    async fn test_delete_refuses_column_with_tasks() {
        let (_, ctx) = board(&["todo"]).await;
        AddTask::new(owner(), ColumnId::from_string("todo"), "Keep me")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();

        let result = DeleteColumn::new(owner(), "todo").execute(&ctx).await;
        assert!(matches!(
            result.into_result(),
            Err(BoardError::ColumnNotEmpty { count: 1, .. })
        ));
        assert!(ctx
            .store()
            .read_column(&owner(), &ColumnId::from_string("todo"))
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_delete_unknown_column() {
        let (_, ctx) = board(&[]).await;
        let result = DeleteColumn::new(owner(), "ghost").execute(&ctx).await;
        assert!(matches!(
            result.into_result(),
            Err(BoardError::ColumnNotFound { .. })
        ));
    }
}
