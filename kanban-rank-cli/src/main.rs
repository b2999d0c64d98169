//! kanban-rank CLI - ordered kanban boards on disk.
//!
//! Commands:
//! - `kanban-rank init`: Create the board directory structure
//! - `kanban-rank column add|list|rename|delete|reorder`: Manage a project's columns
//! - `kanban-rank task add|list|update|move`: Manage a column's tasks
//! - `kanban-rank rebalance <column>`: Respace a column's ranks
//! - `kanban-rank apply <json>`: Apply a task_move or column_move payload
//! - `kanban-rank log [--task ID | --project ID]`: Show the activity log
//!
//! Exit codes:
//! - 0: Success
//! - 1: Error

mod cli;
mod commands;

use clap::Parser;
use kanban_rank::types::OwnerId;
use kanban_rank::RankConfig;
use tracing_subscriber::EnvFilter;

use cli::Cli;
use commands::Session;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize tracing with appropriate level
    let filter = if cli.debug {
        EnvFilter::new("kanban_rank=debug,kanban_rank_cli=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(std::io::stderr)
        .init();

    let exit_code = match execute(cli).await {
        Ok(output) => {
            println!("{}", output);
            0
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            1
        }
    };

    std::process::exit(exit_code);
}

async fn execute(cli: Cli) -> anyhow::Result<String> {
    let mut config = match &cli.config {
        Some(path) => RankConfig::load_from(path)?,
        None => RankConfig::load()?,
    };
    if let Some(root) = cli.root {
        config.root = root;
    }

    let session = Session {
        config,
        owner: OwnerId::from_string(cli.owner),
        actor: cli.actor,
    };
    let value = commands::run(&session, cli.command).await?;
    Ok(serde_json::to_string_pretty(&value)?)
}
