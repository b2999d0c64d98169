//! Log entry types for operation tracking

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A write-once record of one executed operation
///
/// For moves this is the move record: `subject` is the item, `op` the event
/// kind, and `old_value`/`new_value` the placement before and after.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Unique ID for this log entry (ULID format)
    pub id: String,

    /// When the operation occurred
    pub timestamp: DateTime<Utc>,

    /// Canonical op string (e.g., "move task", "reorder columns")
    pub op: String,

    /// Id of the record the operation touched, when there is exactly one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,

    /// The normalized input parameters (as JSON)
    pub input: Value,

    /// State before the operation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_value: Option<Value>,

    /// State after the operation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_value: Option<Value>,

    /// Error message for failed operations
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Who performed the operation (optional)
    /// Format: "user_id" or "agent_name[session_id]"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actor: Option<String>,

    /// How long the operation took (milliseconds)
    pub duration_ms: u64,
}

impl LogEntry {
    /// Create a new log entry
    pub fn new(op: impl Into<String>, input: Value, duration_ms: u64) -> Self {
        Self {
            id: ulid::Ulid::new().to_string(),
            timestamp: Utc::now(),
            op: op.into(),
            subject: None,
            input,
            old_value: None,
            new_value: None,
            error: None,
            actor: None,
            duration_ms,
        }
    }

    /// Create a log entry for a failed operation
    pub fn failure(
        op: impl Into<String>,
        input: Value,
        error: impl Into<String>,
        duration_ms: u64,
    ) -> Self {
        let mut entry = Self::new(op, input, duration_ms);
        entry.error = Some(error.into());
        entry
    }

    /// Set the record this entry is about
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Record the before/after state
    pub fn with_change(mut self, old_value: Option<Value>, new_value: Option<Value>) -> Self {
        self.old_value = old_value;
        self.new_value = new_value;
        self
    }

    /// Set the actor
    pub fn with_actor(mut self, actor: impl Into<String>) -> Self {
        self.actor = Some(actor.into());
        self
    }

    /// Whether this entry records a failure
    pub fn is_failure(&self) -> bool {
        self.error.is_some()
    }
}
