//! Operation naming and execution traits

use crate::ExecutionResult;
use async_trait::async_trait;
use serde_json::Value;

/// Canonical identity of a command: a verb acting on a noun
pub trait Operation {
    /// The action, e.g. "move"
    fn verb(&self) -> &'static str;

    /// The target kind, e.g. "task"
    fn noun(&self) -> &'static str;

    /// Canonical op string used in logs, e.g. "move task"
    fn op_string(&self) -> String {
        format!("{} {}", self.verb(), self.noun())
    }
}

/// Run a command against a context `C`, failing with `E`
#[async_trait]
pub trait Execute<C, E>: Operation + Send + Sync
where
    C: Send + Sync,
{
    async fn execute(&self, ctx: &C) -> ExecutionResult<Value, E>;
}
