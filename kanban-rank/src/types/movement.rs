//! Move payloads as a board UI sends them

use super::ids::{ColumnId, OwnerId, ProjectId, TaskId};
use crate::column::ReorderColumns;
use crate::context::BoardContext;
use crate::error::BoardError;
use crate::task::MoveTask;
use kanban_rank_operations::{async_trait, Execute, ExecutionResult, Operation};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A drag-and-drop result: either a card changed place or the columns did
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MoveRequest {
    /// A task moved into a column, before another task or at the end
    TaskMove {
        owner: OwnerId,
        task_id: TaskId,
        to_column: ColumnId,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        before_task_id: Option<TaskId>,
    },
    /// The board's columns were put in a new full order
    ColumnMove {
        owner: OwnerId,
        project: ProjectId,
        ordered_column_ids: Vec<ColumnId>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        previous_ordered_column_ids: Option<Vec<ColumnId>>,
    },
}

impl MoveRequest {
    /// The owner the request acts for
    pub fn owner(&self) -> &OwnerId {
        match self {
            MoveRequest::TaskMove { owner, .. } | MoveRequest::ColumnMove { owner, .. } => owner,
        }
    }
}

impl Operation for MoveRequest {
    fn verb(&self) -> &'static str {
        match self {
            MoveRequest::TaskMove { .. } => "move",
            MoveRequest::ColumnMove { .. } => "reorder",
        }
    }

    fn noun(&self) -> &'static str {
        match self {
            MoveRequest::TaskMove { .. } => "task",
            MoveRequest::ColumnMove { .. } => "columns",
        }
    }
}

#[async_trait]
impl Execute<BoardContext, BoardError> for MoveRequest {
    async fn execute(&self, ctx: &BoardContext) -> ExecutionResult<Value, BoardError> {
        match self {
            MoveRequest::TaskMove {
                owner,
                task_id,
                to_column,
                before_task_id,
            } => {
                let cmd = MoveTask {
                    owner: owner.clone(),
                    id: task_id.clone(),
                    column: to_column.clone(),
                    before: before_task_id.clone(),
                };
                cmd.execute(ctx).await
            }
            MoveRequest::ColumnMove {
                owner,
                project,
                ordered_column_ids,
                previous_ordered_column_ids,
            } => {
                let cmd = ReorderColumns {
                    owner: owner.clone(),
                    project: project.clone(),
                    ordered: ordered_column_ids.clone(),
                    previous: previous_ordered_column_ids.clone(),
                };
                cmd.execute(ctx).await
            }
        }
    }
}
