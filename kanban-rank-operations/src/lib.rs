//! # kanban-rank operations
//!
//! Every board command is a struct whose fields are its parameters. Commands
//! implement [`Operation`] for their canonical name and [`Execute`] for their
//! behavior. Mutating commands return [`ExecutionResult::Logged`] carrying the
//! [`LogEntry`] an [`OperationProcessor`] hands to the audit log.
//!
//! ## Example
//!
//! ```ignore
//! use kanban_rank_operations::*;
//!
//! #[derive(Debug, Deserialize, Serialize)]
//! pub struct MoveTask {
//!     pub id: TaskId,
//!     pub column: ColumnId,
//!     pub before: Option<TaskId>,
//! }
//!
//! impl Operation for MoveTask {
//!     fn verb(&self) -> &'static str { "move" }
//!     fn noun(&self) -> &'static str { "task" }
//! }
//!
//! #[async_trait]
//! impl Execute<BoardContext, BoardError> for MoveTask {
//!     async fn execute(&self, ctx: &BoardContext) -> ExecutionResult<Value, BoardError> {
//!         // returns ExecutionResult::Logged or Unlogged
//!     }
//! }
//! ```

mod execution_result;
mod log;
mod operation;
mod processor;

pub use execution_result::ExecutionResult;
pub use log::LogEntry;
pub use operation::{Execute, Operation};
pub use processor::OperationProcessor;

// Re-export for use in implementations
pub use async_trait::async_trait;
pub use serde_json::Value;
