//! Task records

use super::ids::{ColumnId, OwnerId, ProjectId, TaskId};
use crate::error::{BoardError, Result};
use crate::rank::Rank;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Trim free text; blank or absent text becomes `None`
pub fn normalize_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Parse a `YYYY-MM-DD` due date; blank or absent means no date
pub fn parse_due_date(value: Option<&str>) -> Result<Option<NaiveDate>> {
    normalize_text(value)
        .map(|text| {
            NaiveDate::parse_from_str(&text, "%Y-%m-%d").map_err(|e| {
                BoardError::invalid_value("due_date", format!("{text:?} is not YYYY-MM-DD: {e}"))
            })
        })
        .transpose()
}

/// A task card. Its `rank` orders it within `column`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub owner: OwnerId,
    pub project: ProjectId,
    pub column: ColumnId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    pub rank: Rank,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Create a new task at `rank` in `column`
    pub fn new(
        owner: OwnerId,
        project: ProjectId,
        column: ColumnId,
        title: impl Into<String>,
        rank: Rank,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: TaskId::new(),
            owner,
            project,
            column,
            title: title.into(),
            description: None,
            priority: None,
            due_date: None,
            rank,
            created_at: now,
            updated_at: now,
        }
    }

    /// Set the description
    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }

    pub fn with_priority(mut self, priority: Option<String>) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_due_date(mut self, due_date: Option<NaiveDate>) -> Self {
        self.due_date = due_date;
        self
    }

    /// Current column and rank
    pub fn placement(&self) -> Placement {
        Placement {
            column: self.column.clone(),
            rank: self.rank.clone(),
        }
    }

    /// The container this task is ordered in
    pub fn column_key(&self) -> ColumnKey {
        ColumnKey::new(self.owner.clone(), self.column.clone())
    }
}

/// Where a task sits: the before/after snapshot of a move
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub column: ColumnId,
    pub rank: Rank,
}

/// The scope in which task ranks are compared
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColumnKey {
    pub owner: OwnerId,
    pub column: ColumnId,
}

impl ColumnKey {
    pub fn new(owner: OwnerId, column: ColumnId) -> Self {
        Self { owner, column }
    }
}

/// A column member as seen by the ordering engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: TaskId,
    pub rank: Rank,
}

impl From<&Task> for Member {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id.clone(),
            rank: task.rank.clone(),
        }
    }
}
