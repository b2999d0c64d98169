//! MoveTask command

use super::placement::{assign_rank, locate};
use crate::context::BoardContext;
use crate::error::BoardError;
use crate::outcome::{finish, Outcome};
use crate::types::{ColumnId, ColumnKey, OwnerId, TaskId};
use kanban_rank_operations::{async_trait, Execute, ExecutionResult, LogEntry, Operation};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;
use tracing::{debug, trace, warn};

/// Where a move is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MovePhase {
    /// Reading membership and choosing a rank
    Resolving,
    /// Writing the new placement
    Applying,
    /// Placement written and log entry produced
    Logged,
    /// A storage or validation error ended the move
    Failed,
}

impl fmt::Display for MovePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MovePhase::Resolving => "resolving",
            MovePhase::Applying => "applying",
            MovePhase::Logged => "logged",
            MovePhase::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Move a task into a column, right before another task or at the end
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MoveTask {
    pub owner: OwnerId,
    /// The task to move
    pub id: TaskId,
    /// Target column (may be the task's current column)
    pub column: ColumnId,
    /// Place right before this task; appends when absent or not in the column
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before: Option<TaskId>,
}

impl MoveTask {
    /// Move to the end of `column`
    pub fn new(owner: OwnerId, id: impl Into<TaskId>, column: impl Into<ColumnId>) -> Self {
        Self {
            owner,
            id: id.into(),
            column: column.into(),
            before: None,
        }
    }

    /// Place right before another task
    pub fn before(mut self, id: impl Into<TaskId>) -> Self {
        self.before = Some(id.into());
        self
    }
}

impl Operation for MoveTask {
    fn verb(&self) -> &'static str {
        "move"
    }

    fn noun(&self) -> &'static str {
        "task"
    }
}

#[async_trait]
impl Execute<BoardContext, BoardError> for MoveTask {
    async fn execute(&self, ctx: &BoardContext) -> ExecutionResult<Value, BoardError> {
        let start = std::time::Instant::now();
        let input = serde_json::to_value(self).unwrap_or(Value::Null);

        let result: Result<Outcome, BoardError> = async {
            let task = ctx.store().read_task(&self.owner, &self.id).await?;

            if self.before.as_ref() == Some(&self.id) {
                trace!(task = %self.id, "move before itself, nothing to do");
                return Ok(Outcome::Unchanged {
                    value: serde_json::to_value(&task)?,
                });
            }

            debug!(phase = %MovePhase::Resolving, task = %self.id, column = %self.column, "moving task");
            ctx.store().read_column(&self.owner, &self.column).await?;
            let key = ColumnKey::new(self.owner.clone(), self.column.clone());

            let slot = locate(ctx, &key, Some(&self.id), self.before.as_ref()).await?;
            if task.column == self.column && slot.contains(&task.rank) {
                debug!(task = %self.id, rank = %task.rank, "task already in place");
                return Ok(Outcome::Unchanged {
                    value: serde_json::to_value(&task)?,
                });
            }

            let assignment =
                assign_rank(ctx, &key, Some(&self.id), self.before.as_ref(), Some(slot)).await?;

            debug!(phase = %MovePhase::Applying, task = %self.id, rank = %assignment.rank);
            let moved = ctx
                .store()
                .write_placement(&self.owner, &self.id, &self.column, &assignment.rank)
                .await?;

            let mut logged_input = input.clone();
            logged_input["rebalanced"] = json!(assignment.rebalanced);
            let entry = LogEntry::new(self.op_string(), logged_input, 0)
                .with_subject(self.id.as_str())
                .with_change(
                    Some(serde_json::to_value(task.placement())?),
                    Some(serde_json::to_value(moved.placement())?),
                );

            debug!(phase = %MovePhase::Logged, task = %self.id, rebalanced = assignment.rebalanced);
            Ok(Outcome::Changed {
                value: serde_json::to_value(&moved)?,
                entry,
            })
        }
        .await;

        if let Err(error) = &result {
            warn!(phase = %MovePhase::Failed, task = %self.id, %error, "move failed");
        }
        finish(self.op_string(), input, start, result)
    }
}
