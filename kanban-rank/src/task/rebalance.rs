//! RebalanceColumn command

use super::placement::rebalance_column;
use crate::context::BoardContext;
use crate::error::BoardError;
use crate::outcome::{finish, Outcome};
use crate::types::{ColumnId, ColumnKey, OwnerId};
use kanban_rank_operations::{async_trait, Execute, ExecutionResult, LogEntry, Operation};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Respace every rank in a column, keeping the order
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RebalanceColumn {
    pub owner: OwnerId,
    pub column: ColumnId,
}

impl RebalanceColumn {
    pub fn new(owner: OwnerId, column: impl Into<ColumnId>) -> Self {
        Self {
            owner,
            column: column.into(),
        }
    }
}

impl Operation for RebalanceColumn {
    fn verb(&self) -> &'static str {
        "rebalance"
    }

    fn noun(&self) -> &'static str {
        "column"
    }
}

#[async_trait]
impl Execute<BoardContext, BoardError> for RebalanceColumn {
    async fn execute(&self, ctx: &BoardContext) -> ExecutionResult<Value, BoardError> {
        let start = std::time::Instant::now();
        let input = serde_json::to_value(self).unwrap_or(Value::Null);

        let result: Result<Outcome, BoardError> = async {
            ctx.store().read_column(&self.owner, &self.column).await?;
            let key = ColumnKey::new(self.owner.clone(), self.column.clone());

            let written = rebalance_column(ctx, &key).await?;
            let members = ctx.store().list_members(&key).await?;
            let value = json!({
                "column": self.column,
                "written": written,
                "members": members,
            });

            if written == 0 {
                return Ok(Outcome::Unchanged { value });
            }

            let entry = LogEntry::new(self.op_string(), input.clone(), 0)
                .with_subject(self.column.as_str())
                .with_change(None, Some(json!({ "written": written })));
            Ok(Outcome::Changed { value, entry })
        }
        .await;

        finish(self.op_string(), input, start, result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rank::Rank;
    use crate::store::{BoardStore, MemoryStore};
    use crate::types::{Column, ProjectId, Task};
    use std::sync::Arc;

    fn owner() -> OwnerId {
        OwnerId::from_string("o")
    }

    async fn setup(ranks: &[&str]) -> (Arc<MemoryStore>, BoardContext) {
        let store = Arc::new(MemoryStore::new());
        let column = Column::new(owner(), ProjectId::from_string("p"), "To Do", 0)
            .with_id(ColumnId::from_string("todo"));
        store.insert_column(&column).await.unwrap();
        for r in ranks {
            let task = Task::new(
                owner(),
                column.project.clone(),
                column.id.clone(),
                *r,
                Rank::parse(*r).unwrap(),
            );
            store.insert_task(&task).await.unwrap();
        }
        let ctx = BoardContext::new(store.clone());
        (store, ctx)
    }

    #[tokio::test]
    async fn test_rebalance_respaces_ranks() {
        let (_, ctx) = setup(&["0", "01", "Uzzz"]).await;

        let result = RebalanceColumn::new(owner(), "todo").execute(&ctx).await;
        assert!(result.should_log());
        assert_eq!(result.log_entry().unwrap().op, "rebalance column");

        let value = result.into_result().unwrap();
        assert_eq!(value["written"], 3);
        let ranks: Vec<&str> = value["members"]
            .as_array()
            .unwrap()
            .iter()
            .map(|m| m["rank"].as_str().unwrap())
            .collect();
        assert_eq!(ranks, vec!["V", "W", "X"]);
    }

    #[tokio::test]
    async fn test_rebalance_already_sequential_is_unlogged() {
        let (store, ctx) = setup(&["V", "W"]).await;

        let result = RebalanceColumn::new(owner(), "todo").execute(&ctx).await;
        assert!(!result.should_log());
        assert_eq!(result.into_result().unwrap()["written"], 0);
        assert_eq!(store.write_count(), 0);
    }

    #[tokio::test]
    async fn test_rebalance_unknown_column() {
        let (_, ctx) = setup(&[]).await;
        let result = RebalanceColumn::new(owner(), "ghost").execute(&ctx).await;
        assert!(matches!(
            result.into_result(),
            Err(BoardError::ColumnNotFound { .. })
        ));
    }
}
