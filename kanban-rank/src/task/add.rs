//! AddTask command

use super::placement::assign_rank;
use crate::context::BoardContext;
use crate::error::BoardError;
use crate::outcome::{finish, Outcome};
use crate::types::{normalize_text, parse_due_date, ColumnId, ColumnKey, OwnerId, Task, TaskId};
use kanban_rank_operations::{async_trait, Execute, ExecutionResult, LogEntry, Operation};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Add a new task to a column, at the end unless `before` is given
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AddTask {
    pub owner: OwnerId,
    pub column: ColumnId,
    /// The task title
    pub title: String,
    /// Optional description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Free-form priority label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    /// Due date as `YYYY-MM-DD`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    /// Insert right before this task; appends when absent or not in the column
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before: Option<TaskId>,
}

impl AddTask {
    /// Create a new AddTask command
    pub fn new(owner: OwnerId, column: ColumnId, title: impl Into<String>) -> Self {
        Self {
            owner,
            column,
            title: title.into(),
            description: None,
            priority: None,
            due_date: None,
            before: None,
        }
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_priority(mut self, priority: impl Into<String>) -> Self {
        self.priority = Some(priority.into());
        self
    }

    /// Set the due date (`YYYY-MM-DD`)
    pub fn with_due_date(mut self, due_date: impl Into<String>) -> Self {
        self.due_date = Some(due_date.into());
        self
    }

    /// Insert before another task
    pub fn before(mut self, id: impl Into<TaskId>) -> Self {
        self.before = Some(id.into());
        self
    }
}

impl Operation for AddTask {
    fn verb(&self) -> &'static str {
        "add"
    }

    fn noun(&self) -> &'static str {
        "task"
    }
}

#[async_trait]
impl Execute<BoardContext, BoardError> for AddTask {
    async fn execute(&self, ctx: &BoardContext) -> ExecutionResult<Value, BoardError> {
        let start = std::time::Instant::now();
        let input = serde_json::to_value(self).unwrap_or(Value::Null);

        let result: Result<Outcome, BoardError> = async {
            let title = self.title.trim();
            if title.is_empty() {
                return Err(BoardError::missing_field("title"));
            }
            let due_date = parse_due_date(self.due_date.as_deref())?;

            let column = ctx.store().read_column(&self.owner, &self.column).await?;
            let key = ColumnKey::new(self.owner.clone(), column.id.clone());
            let assignment = assign_rank(ctx, &key, None, self.before.as_ref(), None).await?;

            let task = Task::new(
                self.owner.clone(),
                column.project,
                column.id,
                title,
                assignment.rank,
            )
            .with_description(normalize_text(self.description.as_deref()))
            .with_priority(normalize_text(self.priority.as_deref()))
            .with_due_date(due_date);
            ctx.store().insert_task(&task).await?;

            let mut logged_input = input.clone();
            logged_input["rebalanced"] = json!(assignment.rebalanced);
            let entry = LogEntry::new(self.op_string(), logged_input, 0)
                .with_subject(task.id.as_str())
                .with_change(
                    None,
                    Some(json!({
                        "column": task.column,
                        "rank": task.rank,
                        "title": task.title,
                    })),
                );

            Ok(Outcome::Changed {
                value: serde_json::to_value(&task)?,
                entry,
            })
        }
        .await;

        finish(self.op_string(), input, start, result)
    }
}
