//! Minimal-write reordering of integer-positioned columns

use crate::context::BoardContext;
use crate::error::BoardError;
use crate::outcome::{finish, Outcome};
use crate::types::{BoardKey, ColumnId, OwnerId, ProjectId};
use kanban_rank_operations::{async_trait, Execute, ExecutionResult, LogEntry, Operation};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::HashSet;
use tracing::debug;

/// One position update produced by [`plan_reorder`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionWrite {
    pub id: ColumnId,
    pub position: usize,
}

/// Compute the writes that turn `previous` into `ordered`.
///
/// Duplicate ids in `ordered` keep their first occurrence. An id that
/// already sits at its target index in `previous` produces no write.
pub fn plan_reorder(ordered: &[ColumnId], previous: &[ColumnId]) -> Vec<PositionWrite> {
    let mut seen = HashSet::new();
    ordered
        .iter()
        .filter(|id| seen.insert(*id))
        .enumerate()
        .filter(|(position, id)| previous.get(*position) != Some(*id))
        .map(|(position, id)| PositionWrite {
            id: id.clone(),
            position,
        })
        .collect()
}

/// Rewrite a board's column order, touching only columns that moved
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReorderColumns {
    pub owner: OwnerId,
    pub project: ProjectId,
    /// The complete desired order; must name every column of the board
    pub ordered: Vec<ColumnId>,
    /// The order the caller last saw; read from the store when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous: Option<Vec<ColumnId>>,
}

impl ReorderColumns {
    pub fn new(owner: OwnerId, project: ProjectId, ordered: Vec<ColumnId>) -> Self {
        Self {
            owner,
            project,
            ordered,
            previous: None,
        }
    }

    /// Diff against a caller-supplied previous order
    pub fn with_previous(mut self, previous: Vec<ColumnId>) -> Self {
        self.previous = Some(previous);
        self
    }
}

impl Operation for ReorderColumns {
    fn verb(&self) -> &'static str {
        "reorder"
    }

    fn noun(&self) -> &'static str {
        "columns"
    }
}

#[async_trait]
impl Execute<BoardContext, BoardError> for ReorderColumns {
    async fn execute(&self, ctx: &BoardContext) -> ExecutionResult<Value, BoardError> {
        let start = std::time::Instant::now();
        let input = serde_json::to_value(self).unwrap_or(Value::Null);

        let result: Result<Outcome, BoardError> = async {
            let key = BoardKey::new(self.owner.clone(), self.project.clone());
            let current: Vec<ColumnId> = ctx
                .store()
                .list_columns(&key)
                .await?
                .into_iter()
                .map(|c| c.id)
                .collect();

            if let Some(unknown) = self.ordered.iter().find(|id| !current.contains(id)) {
                return Err(BoardError::ColumnNotFound {
                    id: unknown.to_string(),
                });
            }
            let requested: HashSet<&ColumnId> = self.ordered.iter().collect();
            let missing: Vec<&str> = current
                .iter()
                .filter(|id| !requested.contains(id))
                .map(ColumnId::as_str)
                .collect();
            if !missing.is_empty() {
                return Err(BoardError::invalid_value(
                    "ordered",
                    format!("must list every column, missing: {}", missing.join(", ")),
                ));
            }

            let previous = self.previous.as_deref().unwrap_or(&current);
            let writes = plan_reorder(&self.ordered, previous);
            for write in &writes {
                ctx.store()
                    .write_container_position(&self.owner, &write.id, write.position)
                    .await?;
            }
            debug!(
                project = %self.project,
                written = writes.len(),
                "reordered columns"
            );

            let order: Vec<ColumnId> = ctx
                .store()
                .list_columns(&key)
                .await?
                .into_iter()
                .map(|c| c.id)
                .collect();
            let value = json!({ "written": writes.len(), "order": order });

            if writes.is_empty() {
                return Ok(Outcome::Unchanged { value });
            }

            let entry = LogEntry::new(self.op_string(), input.clone(), 0)
                .with_subject(self.project.as_str())
                .with_change(Some(json!(current)), Some(json!(order)));
            Ok(Outcome::Changed { value, entry })
        }
        .await;

        finish(self.op_string(), input, start, result)
    }
}
