//! Column commands

mod add;
mod delete;
mod list;
mod reorder;
mod update;

pub use add::AddColumn;
pub use delete::DeleteColumn;
pub use list::ListColumns;
pub use reorder::{plan_reorder, PositionWrite, ReorderColumns};
pub use update::UpdateColumn;
