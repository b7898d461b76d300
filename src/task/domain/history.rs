//! Immutable history rows recorded alongside task mutations.

use super::{PriorityChangeId, StatusUpdateId, TaskId, TaskPriority, TaskStatus};
use crate::directory::domain::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One status transition, recorded exactly once per successful change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskStatusUpdate {
    /// Repository-assigned key.
    pub id: StatusUpdateId,
    /// The transitioned task.
    pub task_id: TaskId,
    /// Status before the transition.
    pub old_status: TaskStatus,
    /// Status after the transition.
    pub new_status: TaskStatus,
    /// Acting user.
    pub updated_by: UserId,
    /// Free-text comment, when provided.
    pub comment: Option<String>,
    /// Recording timestamp.
    pub timestamp: DateTime<Utc>,
}

/// One priority change, recorded exactly once per successful change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorityChange {
    /// Repository-assigned key.
    pub id: PriorityChangeId,
    /// The changed task.
    pub task_id: TaskId,
    /// Priority before the change.
    pub old_priority: TaskPriority,
    /// Priority after the change.
    pub new_priority: TaskPriority,
    /// Acting user.
    pub changed_by: UserId,
    /// Stated reason, when provided.
    pub reason: Option<String>,
    /// Recording timestamp.
    pub timestamp: DateTime<Utc>,
}
