//! ListTaskLogs command

use crate::context::BoardContext;
use crate::error::BoardError;
use crate::store::entry_owner;
use crate::types::{BoardKey, ColumnKey, OwnerId, ProjectId};
use kanban_rank_operations::{async_trait, Execute, ExecutionResult, Operation};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::HashMap;

/// Recent log entries for the tasks of one project, newest first.
///
/// Each entry carries the task's current title as `task_title`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ListTaskLogs {
    pub owner: OwnerId,
    pub project: ProjectId,
    /// Defaults to the configured `activity_limit`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
}

impl ListTaskLogs {
    pub fn new(owner: OwnerId, project: ProjectId) -> Self {
        Self {
            owner,
            project,
            limit: None,
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

impl Operation for ListTaskLogs {
    fn verb(&self) -> &'static str {
        "list"
    }

    fn noun(&self) -> &'static str {
        "task logs"
    }
}

#[async_trait]
impl Execute<BoardContext, BoardError> for ListTaskLogs {
    async fn execute(&self, ctx: &BoardContext) -> ExecutionResult<Value, BoardError> {
        let result: Result<Value, BoardError> = async {
            let board = BoardKey::new(self.owner.clone(), self.project.clone());
            let mut titles = HashMap::new();
            for column in ctx.store().list_columns(&board).await? {
                let key = ColumnKey::new(self.owner.clone(), column.id);
                for task in ctx.store().list_tasks(&key).await? {
                    titles.insert(task.id.to_string(), task.title);
                }
            }

            let limit = self.limit.unwrap_or(ctx.config().activity_limit);
            let mut logs = Vec::new();
            for entry in ctx.store().read_activity(None).await? {
                if logs.len() == limit {
                    break;
                }
                if entry_owner(&entry).as_ref() != Some(&self.owner) {
                    continue;
                }
                let Some(title) = entry.subject.as_deref().and_then(|s| titles.get(s)) else {
                    continue;
                };
                let mut value = serde_json::to_value(&entry)?;
                value["task_title"] = json!(title);
                logs.push(value);
            }
            Ok(Value::Array(logs))
        }
        .await;
        result.into()
    }
}
