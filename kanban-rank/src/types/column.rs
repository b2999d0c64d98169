//! Column records

use super::ids::{ColumnId, OwnerId, ProjectId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A workflow stage on a project board, ordered by a dense 0-based `order`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub id: ColumnId,
    pub owner: OwnerId,
    pub project: ProjectId,
    pub name: String,
    pub order: usize,
    pub created_at: DateTime<Utc>,
}

impl Column {
    /// Create a new column at `order`
    pub fn new(owner: OwnerId, project: ProjectId, name: impl Into<String>, order: usize) -> Self {
        Self {
            id: ColumnId::new(),
            owner,
            project,
            name: name.into(),
            order,
            created_at: Utc::now(),
        }
    }

    /// Use a caller-chosen id (slug) instead of a generated one
    pub fn with_id(mut self, id: ColumnId) -> Self {
        self.id = id;
        self
    }

    /// The board this column belongs to
    pub fn board_key(&self) -> BoardKey {
        BoardKey::new(self.owner.clone(), self.project.clone())
    }
}

/// The scope in which column positions are compared
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoardKey {
    pub owner: OwnerId,
    pub project: ProjectId,
}

impl BoardKey {
    pub fn new(owner: OwnerId, project: ProjectId) -> Self {
        Self { owner, project }
    }
}
