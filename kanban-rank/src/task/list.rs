//! ListTasks command

use crate::context::BoardContext;
use crate::error::BoardError;
use crate::types::{ColumnId, ColumnKey, OwnerId};
use kanban_rank_operations::{async_trait, Execute, ExecutionResult, Operation};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// List a column's tasks in rank order
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ListTasks {
    pub owner: OwnerId,
    pub column: ColumnId,
}

impl ListTasks {
    pub fn new(owner: OwnerId, column: ColumnId) -> Self {
        Self { owner, column }
    }
}

impl Operation for ListTasks {
    fn verb(&self) -> &'static str {
        "list"
    }

    fn noun(&self) -> &'static str {
        "tasks"
    }
}

#[async_trait]
impl Execute<BoardContext, BoardError> for ListTasks {
    async fn execute(&self, ctx: &BoardContext) -> ExecutionResult<Value, BoardError> {
        let key = ColumnKey::new(self.owner.clone(), self.column.clone());
        let result: Result<Value, BoardError> = async {
            let tasks = ctx.store().list_tasks(&key).await?;
            Ok(serde_json::to_value(tasks)?)
        }
        .await;
        result.into()
    }
}
