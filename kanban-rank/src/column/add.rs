//! AddColumn command

use crate::context::BoardContext;
use crate::error::BoardError;
use crate::outcome::{finish, Outcome};
use crate::types::{BoardKey, Column, ColumnId, OwnerId, ProjectId};
use kanban_rank_operations::{async_trait, Execute, ExecutionResult, LogEntry, Operation};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Add a column at the end of a project board
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AddColumn {
    pub owner: OwnerId,
    pub project: ProjectId,
    /// The column display name
    pub name: String,
    /// Optional slug; a ULID is generated when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ColumnId>,
}

impl AddColumn {
    /// Create a new AddColumn command
    pub fn new(owner: OwnerId, project: ProjectId, name: impl Into<String>) -> Self {
        Self {
            owner,
            project,
            name: name.into(),
            id: None,
        }
    }

    /// Use a fixed id instead of a generated one
    pub fn with_id(mut self, id: impl Into<ColumnId>) -> Self {
        self.id = Some(id.into());
        self
    }
}

impl Operation for AddColumn {
    fn verb(&self) -> &'static str {
        "add"
    }

    fn noun(&self) -> &'static str {
        "column"
    }
}

#[async_trait]
impl Execute<BoardContext, BoardError> for AddColumn {
    async fn execute(&self, ctx: &BoardContext) -> ExecutionResult<Value, BoardError> {
        let start = std::time::Instant::now();
        let input = serde_json::to_value(self).unwrap_or(Value::Null);

        let result: Result<Outcome, BoardError> = async {
            let name = self.name.trim();
            if name.is_empty() {
                return Err(BoardError::missing_field("name"));
            }
            if let Some(id) = &self.id {
                id.validate("id")?;
            }

            let key = BoardKey::new(self.owner.clone(), self.project.clone());
            let order = ctx
                .store()
                .list_columns(&key)
                .await?
                .iter()
                .map(|c| c.order)
                .max()
                .map(|o| o + 1)
                .unwrap_or(0);

            let mut column = Column::new(self.owner.clone(), self.project.clone(), name, order);
            if let Some(id) = &self.id {
                column = column.with_id(id.clone());
            }
            ctx.store().insert_column(&column).await?;

            let value = serde_json::to_value(&column)?;
            let entry = LogEntry::new(self.op_string(), input.clone(), 0)
                .with_subject(column.id.as_str())
                .with_change(None, Some(json!({ "name": column.name, "order": column.order })));
            Ok(Outcome::Changed { value, entry })
        }
        .await;

        finish(self.op_string(), input, start, result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use std::sync::Arc;

    fn setup() -> BoardContext {
        BoardContext::new(Arc::new(MemoryStore::new()))
    }

    fn add(name: &str) -> AddColumn {
        AddColumn::new(OwnerId::from_string("o"), ProjectId::from_string("p"), name)
    }

    #[tokio::test]
    async fn test_add_column_appends() {
        let ctx = setup();

        let first = add("To Do").execute(&ctx).await.into_result().unwrap();
        let second = add("Done").execute(&ctx).await.into_result().unwrap();

        assert_eq!(first["order"], 0);
        assert_eq!(second["order"], 1);
        assert_eq!(second["name"], "Done");
    }

    #[tokio::test]
    async fn test_add_column_with_slug() {
        let ctx = setup();
        let result = add("Blocked").with_id("blocked").execute(&ctx).await;

        assert!(result.should_log());
        assert_eq!(result.into_result().unwrap()["id"], "blocked");

        let duplicate = add("Blocked again").with_id("blocked").execute(&ctx).await;
        assert!(matches!(
            duplicate.into_result(),
            Err(BoardError::DuplicateId { .. })
        ));
    }

    #[tokio::test]
    async fn test_add_column_rejects_unsafe_slug() {
        let ctx = setup();
        for slug in ["../../escaped", "a/b", ""] {
            let result = add("Column").with_id(slug).execute(&ctx).await;
            assert!(result.should_log());
            assert!(matches!(
                result.into_result(),
                Err(BoardError::InvalidValue { ref field, .. }) if field == "id"
            ));
        }
    }

    #[tokio::test]
    async fn test_add_column_requires_name() {
        let ctx = setup();
        let result = add("   ").execute(&ctx).await;

        assert!(result.should_log());
        assert!(matches!(
            result.into_result(),
            Err(BoardError::MissingField { ref field }) if field == "name"
        ));
    }
}
