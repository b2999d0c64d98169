//! UpdateColumn command

use crate::context::BoardContext;
use crate::error::BoardError;
use crate::outcome::{finish, Outcome};
use crate::types::{ColumnId, OwnerId};
use kanban_rank_operations::{async_trait, Execute, ExecutionResult, LogEntry, Operation};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Rename a column. Its position is changed only by reordering.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UpdateColumn {
    pub owner: OwnerId,
    /// The column to update
    pub id: ColumnId,
    /// New column name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl UpdateColumn {
    pub fn new(owner: OwnerId, id: impl Into<ColumnId>) -> Self {
        Self {
            owner,
            id: id.into(),
            name: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

impl Operation for UpdateColumn {
    fn verb(&self) -> &'static str {
        "update"
    }

    fn noun(&self) -> &'static str {
        "column"
    }
}

#[async_trait]
impl Execute<BoardContext, BoardError> for UpdateColumn {
    async fn execute(&self, ctx: &BoardContext) -> ExecutionResult<Value, BoardError> {
        let start = std::time::Instant::now();
        let input = serde_json::to_value(self).unwrap_or(Value::Null);

        let result: Result<Outcome, BoardError> = async {
            let name = match self.name.as_deref().map(str::trim) {
                Some("") => return Err(BoardError::missing_field("name")),
                other => other,
            };

            let mut column = ctx.store().read_column(&self.owner, &self.id).await?;
            let old_name = column.name.clone();
            match name {
                Some(name) if name != old_name => column.name = name.to_string(),
                _ => {
                    return Ok(Outcome::Unchanged {
                        value: serde_json::to_value(&column)?,
                    })
                }
            }
            ctx.store().write_column(&column).await?;

            let entry = LogEntry::new(self.op_string(), input.clone(), 0)
                .with_subject(column.id.as_str())
                .with_change(
                    Some(json!({ "name": old_name })),
                    Some(json!({ "name": column.name })),
                );
            Ok(Outcome::Changed {
                value: serde_json::to_value(&column)?,
                entry,
            })
        }
        .await;

        finish(self.op_string(), input, start, result)
    }
}
