//! Rank-based ordering engine for kanban boards
//!
//! Tasks inside a column are ordered by string ranks produced with
//! fractional indexing, so inserting or moving a card writes one row instead
//! of renumbering the column. Columns inside a project board are ordered by a
//! dense integer position that is rewritten only where it changed.
//!
//! ## Overview
//!
//! - [`rank`] - the rank alphabet, [`Rank`] and [`RankCodec`]
//! - [`policy`] - picking a rank for a slot, or asking for a rebalance
//! - [`column`] - column commands, including [`column::ReorderColumns`] and
//!   [`column::DeleteColumn`]
//! - [`task`] - task commands, including [`task::MoveTask`],
//!   [`task::UpdateTask`] and [`task::RebalanceColumn`]
//! - [`store`] - the [`BoardStore`] seam plus memory and file backends
//!
//! ## Basic Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use kanban_rank::{BoardContext, Execute, MemoryStore};
//! use kanban_rank::column::AddColumn;
//! use kanban_rank::task::{AddTask, MoveTask};
//! use kanban_rank::types::{ColumnId, OwnerId, ProjectId, TaskId};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let ctx = BoardContext::new(Arc::new(MemoryStore::new()));
//! let owner = OwnerId::from_string("acme");
//!
//! let todo = AddColumn::new(owner.clone(), ProjectId::from_string("site"), "To Do")
//!     .execute(&ctx).await.into_result()?;
//! let column = ColumnId::from_string(todo["id"].as_str().unwrap_or_default());
//!
//! let first = AddTask::new(owner.clone(), column.clone(), "Design")
//!     .execute(&ctx).await.into_result()?;
//! let second = AddTask::new(owner.clone(), column.clone(), "Build")
//!     .execute(&ctx).await.into_result()?;
//!
//! // Put "Build" before "Design"
//! let first_id = TaskId::from_string(first["id"].as_str().unwrap_or_default());
//! let second_id = TaskId::from_string(second["id"].as_str().unwrap_or_default());
//! MoveTask::new(owner, second_id, column)
//!     .before(first_id)
//!     .execute(&ctx).await.into_result()?;
//! # Ok(())
//! # }
//! ```

pub mod config;
mod context;
mod error;
mod outcome;
pub mod policy;
mod processor;
pub mod rank;
pub mod store;
pub mod types;

// Command modules
pub mod column;
pub mod task;

// Re-export Execute trait and types from operations crate
pub use kanban_rank_operations::{
    async_trait, Execute, ExecutionResult, LogEntry, Operation, OperationProcessor,
};

pub use config::{ConfigError, RankConfig};
pub use context::BoardContext;
pub use error::{BoardError, Result};
pub use policy::{rank_for_slot, RankDecision, Slot};
pub use processor::BoardOperationProcessor;
pub use rank::{Rank, RankCodec};
pub use store::{BoardStore, FileStore, MemoryStore, StoreLock};

// Re-export commonly used types
pub use types::{
    BoardKey, Column, ColumnId, ColumnKey, Member, MoveRequest, OwnerId, Placement, ProjectId,
    Task, TaskId,
};
