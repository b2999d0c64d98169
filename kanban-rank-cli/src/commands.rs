//! Runs parsed commands against a file-backed board

use anyhow::{bail, Context, Result};
use kanban_rank::column::{AddColumn, DeleteColumn, ListColumns, ReorderColumns, UpdateColumn};
use kanban_rank::task::{AddTask, ListTaskLogs, ListTasks, MoveTask, RebalanceColumn, UpdateTask};
use kanban_rank::types::{ColumnId, OwnerId, ProjectId, TaskId};
use kanban_rank::{
    BoardContext, BoardOperationProcessor, BoardStore, FileStore, MoveRequest, OperationProcessor,
    RankConfig,
};
use serde_json::{json, Value};
use std::io::Read;
use std::sync::Arc;
use tracing::debug;

use crate::cli::{ColumnCommand, Commands, TaskCommand};

/// Everything a command needs besides its own arguments
pub struct Session {
    pub config: RankConfig,
    pub owner: OwnerId,
    pub actor: Option<String>,
}

impl Session {
    fn store(&self) -> FileStore {
        FileStore::new(&self.config.root)
    }

    fn processor(&self) -> BoardOperationProcessor {
        match &self.actor {
            Some(actor) => BoardOperationProcessor::with_actor(actor.clone()),
            None => BoardOperationProcessor::new(),
        }
    }
}

/// Run one command and return the JSON to print
pub async fn run(session: &Session, command: Commands) -> Result<Value> {
    let store = session.store();

    // Held until the command finishes
    let _lock = if command.is_mutating() {
        Some(store.lock().await.context("board is busy")?)
    } else {
        None
    };

    let ctx = BoardContext::with_config(Arc::new(store.clone()), session.config.clone());
    let processor = session.processor();
    let owner = session.owner.clone();
    debug!(root = %store.root().display(), owner = %owner, ?command, "running command");

    let value = match command {
        Commands::Init => {
            store.create_directories().await?;
            json!({ "root": store.root(), "initialized": true })
        }

        Commands::Column { action } => match action {
            ColumnCommand::Add { project, name, id } => {
                let mut cmd = AddColumn::new(owner, ProjectId::from_string(project), name);
                if let Some(id) = id {
                    cmd = cmd.with_id(id);
                }
                processor.process(&cmd, &ctx).await?
            }
            ColumnCommand::List { project } => {
                let cmd = ListColumns::new(owner, ProjectId::from_string(project));
                processor.process(&cmd, &ctx).await?
            }
            ColumnCommand::Rename { id, name } => {
                let cmd = UpdateColumn::new(owner, id).with_name(name);
                processor.process(&cmd, &ctx).await?
            }
            ColumnCommand::Delete { id } => {
                processor.process(&DeleteColumn::new(owner, id), &ctx).await?
            }
            ColumnCommand::Reorder { project, ids } => {
                let ordered = ids.into_iter().map(ColumnId::from_string).collect();
                let cmd = ReorderColumns::new(owner, ProjectId::from_string(project), ordered);
                processor.process(&cmd, &ctx).await?
            }
        },

        Commands::Task { action } => match action {
            TaskCommand::Add {
                column,
                title,
                description,
                priority,
                due_date,
                before,
            } => {
                let mut cmd = AddTask::new(owner, ColumnId::from_string(column), title);
                cmd.description = description;
                cmd.priority = priority;
                cmd.due_date = due_date;
                if let Some(before) = before {
                    cmd = cmd.before(before);
                }
                processor.process(&cmd, &ctx).await?
            }
            TaskCommand::List { column } => {
                let cmd = ListTasks::new(owner, ColumnId::from_string(column));
                processor.process(&cmd, &ctx).await?
            }
            TaskCommand::Update {
                id,
                title,
                description,
                priority,
                due_date,
            } => {
                let cmd = UpdateTask {
                    owner,
                    id: TaskId::from_string(id),
                    title,
                    description,
                    priority,
                    due_date,
                };
                processor.process(&cmd, &ctx).await?
            }
            TaskCommand::Move { id, column, before } => {
                let mut cmd = MoveTask::new(owner, id, column);
                if let Some(before) = before {
                    cmd = cmd.before(before);
                }
                processor.process(&cmd, &ctx).await?
            }
        },

        Commands::Rebalance { column } => {
            processor
                .process(&RebalanceColumn::new(owner, column), &ctx)
                .await?
        }

        Commands::Apply { payload } => {
            let request = parse_request(&payload)?;
            if request.owner() != &owner {
                bail!(
                    "payload owner {} does not match --owner {}",
                    request.owner(),
                    owner
                );
            }
            processor.process(&request, &ctx).await?
        }

        Commands::Log {
            limit,
            task,
            project,
        } => {
            let limit = limit.unwrap_or(session.config.activity_limit);
            if let Some(project) = project {
                let cmd =
                    ListTaskLogs::new(owner, ProjectId::from_string(project)).with_limit(limit);
                processor.process(&cmd, &ctx).await?
            } else {
                let entries = match task {
                    Some(task) => {
                        store
                            .read_task_log(&owner, &TaskId::from_string(task), Some(limit))
                            .await?
                    }
                    None => store.read_activity(Some(limit)).await?,
                };
                serde_json::to_value(entries)?
            }
        }
    };

    Ok(value)
}

/// Parse a move payload given inline or as "-" for stdin
fn parse_request(payload: &str) -> Result<MoveRequest> {
    let text = if payload == "-" {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("failed to read payload from stdin")?;
        buffer
    } else {
        payload.to_string()
    };
    serde_json::from_str(&text).context("invalid move payload")
}
