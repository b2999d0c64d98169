//! CLI definition for the kanban-rank command-line interface.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// kanban-rank - ordered kanban boards on disk.
///
/// Tasks inside a column are ordered by fractional ranks, so a move rewrites
/// a single task. Columns are ordered by integer position and only moved
/// columns are rewritten.
#[derive(Parser, Debug)]
#[command(name = "kanban-rank")]
#[command(version)]
#[command(about = "Rank-based ordering for kanban boards")]
#[command(
    long_about = "Manage columns and tasks of a file-backed kanban board.\n\n\
    Configuration is read from kanban-rank.toml, .yaml, .yml or .json in the \
    working directory.\n\n\
    Environment variables:\n  \
    KANBAN_RANK_MAX_DEPTH       Rank search depth before rebalancing\n  \
    KANBAN_RANK_ACTIVITY_LIMIT  Default number of log entries shown\n  \
    KANBAN_RANK_ROOT            Board directory"
)]
pub struct Cli {
    /// Enable debug output to stderr
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Board directory (overrides configuration)
    #[arg(long, global = true, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Explicit configuration file
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Owner whose board is being edited
    #[arg(long, global = true, default_value = "local")]
    pub owner: String,

    /// Name recorded on log entries
    #[arg(long, global = true)]
    pub actor: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the board directory structure
    Init,

    /// Manage columns
    Column {
        #[command(subcommand)]
        action: ColumnCommand,
    },

    /// Manage tasks
    Task {
        #[command(subcommand)]
        action: TaskCommand,
    },

    /// Respace every rank in a column
    Rebalance {
        /// Column id
        column: String,
    },

    /// Apply a move payload (JSON with a "type" of task_move or column_move)
    Apply {
        /// The JSON payload, or "-" to read it from stdin
        payload: String,
    },

    /// Show the activity log, newest first
    Log {
        /// Number of entries (defaults to the configured activity_limit)
        #[arg(long)]
        limit: Option<usize>,
        /// Show one task's log instead of the whole board's
        #[arg(long, conflicts_with = "project")]
        task: Option<String>,
        /// Show the task entries of one project, with task titles
        #[arg(long)]
        project: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum ColumnCommand {
    /// Add a column at the end of a board
    Add {
        /// Project the board belongs to
        project: String,
        /// Column name
        name: String,
        /// Column id (slug); generated when absent
        #[arg(long)]
        id: Option<String>,
    },

    /// List a board's columns in order
    List {
        /// Project the board belongs to
        project: String,
    },

    /// Rename a column
    Rename {
        /// Column id
        id: String,
        /// New column name
        name: String,
    },

    /// Delete an empty column and close the gap in the order
    Delete {
        /// Column id
        id: String,
    },

    /// Put a board's columns in a new full order
    Reorder {
        /// Project the board belongs to
        project: String,
        /// Column ids in the desired order
        #[arg(required = true, num_args = 1..)]
        ids: Vec<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum TaskCommand {
    /// Add a task to a column
    Add {
        /// Column id
        column: String,
        /// Task title
        title: String,
        /// Task description
        #[arg(long)]
        description: Option<String>,
        /// Priority label
        #[arg(long)]
        priority: Option<String>,
        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        due_date: Option<String>,
        /// Insert before this task instead of at the end
        #[arg(long)]
        before: Option<String>,
    },

    /// List a column's tasks in order
    List {
        /// Column id
        column: String,
    },

    /// Edit a task's text fields; an empty value clears an optional field
    Update {
        /// Task id
        id: String,
        /// New title
        #[arg(long)]
        title: Option<String>,
        /// New description
        #[arg(long)]
        description: Option<String>,
        /// New priority label
        #[arg(long)]
        priority: Option<String>,
        /// New due date (YYYY-MM-DD)
        #[arg(long)]
        due_date: Option<String>,
    },

    /// Move a task into a column
    Move {
        /// Task id
        id: String,
        /// Target column id
        column: String,
        /// Place before this task instead of at the end
        #[arg(long)]
        before: Option<String>,
    },
}

impl Commands {
    /// Whether the command writes to the board
    pub fn is_mutating(&self) -> bool {
        match self {
            Commands::Init | Commands::Log { .. } => false,
            Commands::Column { action } => !matches!(action, ColumnCommand::List { .. }),
            Commands::Task { action } => !matches!(action, TaskCommand::List { .. }),
            Commands::Rebalance { .. } | Commands::Apply { .. } => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_task_move() {
        let cli = Cli::parse_from([
            "kanban-rank",
            "--owner",
            "acme",
            "task",
            "move",
            "t1",
            "done",
            "--before",
            "t2",
        ]);
        assert_eq!(cli.owner, "acme");
        assert!(cli.command.is_mutating());
        match cli.command {
            Commands::Task {
                action: TaskCommand::Move { id, column, before },
            } => {
                assert_eq!(id, "t1");
                assert_eq!(column, "done");
                assert_eq!(before.as_deref(), Some("t2"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_reorder_requires_ids() {
        assert!(Cli::try_parse_from(["kanban-rank", "column", "reorder", "site"]).is_err());

        let cli = Cli::parse_from(["kanban-rank", "column", "reorder", "site", "b", "a"]);
        assert!(matches!(
            cli.command,
            Commands::Column {
                action: ColumnCommand::Reorder { ref ids, .. }
            } if ids == &["b", "a"]
        ));
    }

    #[test]
    fn test_defaults_and_read_only_commands() {
        let cli = Cli::parse_from(["kanban-rank", "log"]);
        assert_eq!(cli.owner, "local");
        assert!(!cli.debug);
        assert!(cli.root.is_none());
        assert!(!cli.command.is_mutating());

        let cli = Cli::parse_from(["kanban-rank", "task", "list", "todo"]);
        assert!(!cli.command.is_mutating());

        let cli = Cli::parse_from(["kanban-rank", "log", "--project", "site"]);
        assert!(matches!(
            cli.command,
            Commands::Log { project: Some(ref p), task: None, .. } if p == "site"
        ));
        assert!(Cli::try_parse_from(["kanban-rank", "log", "--project", "a", "--task", "b"]).is_err());
    }

    #[test]
    fn test_parse_edit_commands() {
        let cli = Cli::parse_from([
            "kanban-rank",
            "task",
            "update",
            "t1",
            "--priority",
            "",
            "--due-date",
            "2026-12-01",
        ]);
        assert!(cli.command.is_mutating());
        match cli.command {
            Commands::Task {
                action:
                    TaskCommand::Update {
                        id,
                        title,
                        priority,
                        due_date,
                        ..
                    },
            } => {
                assert_eq!(id, "t1");
                assert!(title.is_none());
                assert_eq!(priority.as_deref(), Some(""));
                assert_eq!(due_date.as_deref(), Some("2026-12-01"));
            }
            other => panic!("unexpected command: {other:?}"),
        }

        let cli = Cli::parse_from(["kanban-rank", "column", "delete", "doing"]);
        assert!(cli.command.is_mutating());
        let cli = Cli::parse_from(["kanban-rank", "column", "rename", "doing", "In Progress"]);
        assert!(matches!(
            cli.command,
            Commands::Column {
                action: ColumnCommand::Rename { ref name, .. }
            } if name == "In Progress"
        ));
    }
}
