//! Turning a command's result into an [`ExecutionResult`]

use crate::error::BoardError;
use kanban_rank_operations::{ExecutionResult, LogEntry};
use serde_json::Value;
use std::time::Instant;

/// What a mutating command did
pub(crate) enum Outcome {
    /// Something was written; `entry` records it
    Changed { value: Value, entry: LogEntry },
    /// Nothing was written
    Unchanged { value: Value },
}

/// Stamp the duration and pick Logged, Unlogged or Failed.
/// Failures are logged with the command's input and the error message.
pub(crate) fn finish(
    op: String,
    input: Value,
    started: Instant,
    result: Result<Outcome, BoardError>,
) -> ExecutionResult<Value, BoardError> {
    let duration_ms = started.elapsed().as_millis() as u64;

    match result {
        Ok(Outcome::Changed { value, mut entry }) => {
            entry.duration_ms = duration_ms;
            ExecutionResult::Logged {
                value,
                log_entry: entry,
            }
        }
        Ok(Outcome::Unchanged { value }) => ExecutionResult::Unlogged { value },
        Err(error) => {
            let log_entry = LogEntry::failure(op, input, error.to_string(), duration_ms);
            ExecutionResult::Failed {
                error,
                log_entry: Some(log_entry),
            }
        }
    }
}
