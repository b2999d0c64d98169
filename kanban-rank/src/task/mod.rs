//! Task commands

mod add;
mod list;
mod logs;
mod mv;
mod placement;
mod rebalance;
mod update;

pub use add::AddTask;
pub use list::ListTasks;
pub use logs::ListTaskLogs;
pub use mv::{MovePhase, MoveTask};
pub use rebalance::RebalanceColumn;
pub use update::UpdateTask;
