//! UpdateTask command

use crate::context::BoardContext;
use crate::error::BoardError;
use crate::outcome::{finish, Outcome};
use crate::types::{normalize_text, parse_due_date, OwnerId, Task, TaskId};
use chrono::Utc;
use kanban_rank_operations::{async_trait, Execute, ExecutionResult, LogEntry, Operation};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Edit a task's text fields. Placement changes go through `MoveTask`.
///
/// Absent fields are left alone. A blank description, priority or due date
/// clears it; a blank title is an error.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UpdateTask {
    pub owner: OwnerId,
    /// The task to update
    pub id: TaskId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    /// `YYYY-MM-DD`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
}

impl UpdateTask {
    pub fn new(owner: OwnerId, id: impl Into<TaskId>) -> Self {
        Self {
            owner,
            id: id.into(),
            title: None,
            description: None,
            priority: None,
            due_date: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_priority(mut self, priority: impl Into<String>) -> Self {
        self.priority = Some(priority.into());
        self
    }

    pub fn with_due_date(mut self, due_date: impl Into<String>) -> Self {
        self.due_date = Some(due_date.into());
        self
    }

    fn apply(&self, task: &mut Task) -> Result<(), BoardError> {
        if let Some(title) = &self.title {
            let title = title.trim();
            if title.is_empty() {
                return Err(BoardError::missing_field("title"));
            }
            task.title = title.to_string();
        }
        if let Some(description) = self.description.as_deref() {
            task.description = normalize_text(Some(description));
        }
        if let Some(priority) = self.priority.as_deref() {
            task.priority = normalize_text(Some(priority));
        }
        if let Some(due_date) = self.due_date.as_deref() {
            task.due_date = parse_due_date(Some(due_date))?;
        }
        Ok(())
    }
}

/// The edited fields, as recorded before and after an update
fn details(task: &Task) -> Value {
    json!({
        "title": task.title,
        "description": task.description,
        "priority": task.priority,
        "due_date": task.due_date,
    })
}

impl Operation for UpdateTask {
    fn verb(&self) -> &'static str {
        "update"
    }

    fn noun(&self) -> &'static str {
        "task"
    }
}

#[async_trait]
impl Execute<BoardContext, BoardError> for UpdateTask {
    async fn execute(&self, ctx: &BoardContext) -> ExecutionResult<Value, BoardError> {
        let start = std::time::Instant::now();
        let input = serde_json::to_value(self).unwrap_or(Value::Null);

        let result: Result<Outcome, BoardError> = async {
            let mut task = ctx.store().read_task(&self.owner, &self.id).await?;
            let before = details(&task);

            self.apply(&mut task)?;
            let after = details(&task);
            if after == before {
                return Ok(Outcome::Unchanged {
                    value: serde_json::to_value(&task)?,
                });
            }

            task.updated_at = Utc::now();
            ctx.store().write_task(&task).await?;

            let entry = LogEntry::new(self.op_string(), input.clone(), 0)
                .with_subject(task.id.as_str())
                .with_change(Some(before), Some(after));
            Ok(Outcome::Changed {
                value: serde_json::to_value(&task)?,
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
    use crate::column::AddColumn;
    use crate::store::MemoryStore;
    use crate::task::AddTask;
    use crate::types::{ColumnId, ProjectId};
    use std::sync::Arc;

    fn owner() -> OwnerId {
        OwnerId::from_string("o")
    }

    async fn setup() -> (BoardContext, TaskId) {
        let ctx = BoardContext::new(Arc::new(MemoryStore::new()));
        AddColumn::new(owner(), ProjectId::from_string("p"), "To Do")
            .with_id("todo")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        let task = AddTask::new(owner(), ColumnId::from_string("todo"), "Draft")
            .with_description("first pass")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        (ctx, TaskId::from_string(task["id"].as_str().unwrap()))
    }

    #[tokio::test]
    async fn test_update_logs_old_and_new_values() {
        let (ctx, id) = setup().await;

        let result = UpdateTask::new(owner(), id.clone())
            .with_title(" Final ")
            .with_priority("high")
            .with_due_date("2026-12-01")
            .execute(&ctx)
            .await;
        let entry = result.log_entry().unwrap().clone();
        assert_eq!(entry.op, "update task");
        assert_eq!(entry.subject.as_deref(), Some(id.as_str()));
        assert_eq!(
            entry.old_value,
            Some(json!({
                "title": "Draft",
                "description": "first pass",
                "priority": null,
                "due_date": null,
            }))
        );
        assert_eq!(
            entry.new_value,
            Some(json!({
                "title": "Final",
                "description": "first pass",
                "priority": "high",
                "due_date": "2026-12-01",
            }))
        );

        let task = result.into_result().unwrap();
        assert_eq!(task["rank"], "V");
        assert_eq!(task["column"], "todo");
    }

    #[tokio::test]
    async fn test_blank_fields_clear() {
        let (ctx, id) = setup().await;

        let task = UpdateTask::new(owner(), id)
            .with_description("   ")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        assert!(task.get("description").is_none());
        assert_eq!(task["title"], "Draft");
    }

    #[tokio::test]
    async fn test_no_change_is_unlogged() {
        let (ctx, id) = setup().await;

        let result = UpdateTask::new(owner(), id)
            .with_title("Draft")
            .execute(&ctx)
            .await;
        assert!(!result.should_log());
    }

    #[tokio::test]
    async fn test_update_errors() {
        let (ctx, id) = setup().await;

        let result = UpdateTask::new(owner(), id.clone())
            .with_title("  ")
            .execute(&ctx)
            .await;
        assert!(result.should_log());
        assert!(matches!(
            result.into_result(),
            Err(BoardError::MissingField { ref field }) if field == "title"
        ));

        let result = UpdateTask::new(owner(), id.clone())
            .with_due_date("tomorrow")
            .execute(&ctx)
            .await;
        assert!(matches!(
            result.into_result(),
            Err(BoardError::InvalidValue { ref field, .. }) if field == "due_date"
        ));

        let result = UpdateTask::new(OwnerId::from_string("other"), id)
            .with_title("Mine")
            .execute(&ctx)
            .await;
        assert!(matches!(
            result.into_result(),
            Err(BoardError::TaskNotFound { .. })
        ));
    }
}
