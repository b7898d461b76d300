//! Append-only audit log entries.
//!
//! Every mutating engine operation is paired with exactly one entry. Entries
//! carry before/after JSON snapshots and a correlation id so a request can be
//! traced across operations.

use super::AuditLogId;
use crate::directory::domain::UserId;
use crate::task::domain::TaskId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// A persisted audit log entry. Immutable after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditLog {
    /// Repository-assigned key.
    pub id: AuditLogId,
    /// Action name, e.g. `"task.status_changed"`.
    pub action: String,
    /// Acting user.
    pub actor: UserId,
    /// Affected task, when the action is task-scoped.
    pub task_id: Option<TaskId>,
    /// Free-text detail, when provided.
    pub details: Option<String>,
    /// Snapshot of the entity before the action, when applicable.
    pub old_values: Option<Value>,
    /// Snapshot of the entity after the action, when applicable.
    pub new_values: Option<Value>,
    /// Correlation id linking entries produced by one request.
    pub correlation_id: Option<Uuid>,
    /// Recording timestamp.
    pub timestamp: DateTime<Utc>,
}

/// Payload for appending an audit log entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEntry {
    /// Action name, e.g. `"task.status_changed"`.
    pub action: String,
    /// Acting user.
    pub actor: UserId,
    /// Affected task, when the action is task-scoped.
    pub task_id: Option<TaskId>,
    /// Free-text detail, when provided.
    pub details: Option<String>,
    /// Snapshot of the entity before the action, when applicable.
    pub old_values: Option<Value>,
    /// Snapshot of the entity after the action, when applicable.
    pub new_values: Option<Value>,
    /// Correlation id linking entries produced by one request.
    pub correlation_id: Option<Uuid>,
}

impl AuditEntry {
    /// Creates an entry with required fields.
    #[must_use]
    pub fn new(action: impl Into<String>, actor: UserId) -> Self {
        Self {
            action: action.into(),
            actor,
            task_id: None,
            details: None,
            old_values: None,
            new_values: None,
            correlation_id: None,
        }
    }

    /// Scopes the entry to a task.
    #[must_use]
    pub const fn for_task(mut self, task_id: TaskId) -> Self {
        self.task_id = Some(task_id);
        self
    }

    /// Adds free-text detail.
    #[must_use]
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Records the before-snapshot.
    #[must_use]
    pub fn with_old_values(mut self, old: Value) -> Self {
        self.old_values = Some(old);
        self
    }

    /// Records the after-snapshot.
    #[must_use]
    pub fn with_new_values(mut self, new: Value) -> Self {
        self.new_values = Some(new);
        self
    }

    /// Sets the correlation id.
    #[must_use]
    pub const fn with_correlation_id(mut self, id: Uuid) -> Self {
        self.correlation_id = Some(id);
        self
    }
}
