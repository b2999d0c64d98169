//! Core types for the ordering engine

mod column;
mod ids;
mod movement;
mod task;

// Re-export all types
pub use column::{BoardKey, Column};
pub use ids::{is_valid_id, ColumnId, OwnerId, ProjectId, TaskId};
pub use movement::MoveRequest;
pub use task::{normalize_text, parse_due_date, ColumnKey, Member, Placement, Task};
