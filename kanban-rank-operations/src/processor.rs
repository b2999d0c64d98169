//! Processor seam between command execution and audit logging

use crate::Execute;
use async_trait::async_trait;
use serde_json::Value;

/// Executes operations and persists whatever log entries they produce
///
/// Implementations decide where log entries go and who the actor is.
#[async_trait]
pub trait OperationProcessor<C, E>: Send + Sync
where
    C: Send + Sync,
{
    async fn process<O>(&self, operation: &O, ctx: &C) -> Result<Value, E>
    where
        O: Execute<C, E> + 'static;
}
