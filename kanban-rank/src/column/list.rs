//! ListColumns command

use crate::context::BoardContext;
use crate::error::BoardError;
use crate::types::{BoardKey, OwnerId, ProjectId};
use kanban_rank_operations::{async_trait, Execute, ExecutionResult, Operation};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// List a board's columns in position order
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ListColumns {
    pub owner: OwnerId,
    pub project: ProjectId,
}

impl ListColumns {
    pub fn new(owner: OwnerId, project: ProjectId) -> Self {
        Self { owner, project }
    }
}

impl Operation for ListColumns {
    fn verb(&self) -> &'static str {
        "list"
    }

    fn noun(&self) -> &'static str {
        "columns"
    }
}

#[async_trait]
impl Execute<BoardContext, BoardError> for ListColumns {
    async fn execute(&self, ctx: &BoardContext) -> ExecutionResult<Value, BoardError> {
        let key = BoardKey::new(self.owner.clone(), self.project.clone());
        let result: Result<Value, BoardError> = async {
            let columns = ctx.store().list_columns(&key).await?;
            Ok(serde_json::to_value(columns)?)
        }
        .await;
        result.into()
    }
}
