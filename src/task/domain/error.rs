//! Domain errors for the task context.

use super::{TaskId, TaskPriority, TaskStatus};
use thiserror::Error;

/// Validation and state-machine errors raised by task domain types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaskDomainError {
    /// A pickup or drop-off location was empty or whitespace.
    #[error("task locations must not be empty")]
    EmptyLocation,
    /// A status transition outside the legal edge set.
    ///
    /// The mutation is rejected and the task is left unchanged.
    #[error("task {task_id}: illegal status transition {from} -> {to}")]
    InvalidStatusTransition {
        /// The affected task.
        task_id: TaskId,
        /// Status before the attempt.
        from: TaskStatus,
        /// The rejected target status.
        to: TaskStatus,
    },
    /// An attempt to start work on a task with no receiver assigned.
    #[error("task {0} cannot enter in_progress without a receiver")]
    ReceiverRequired(TaskId),
    /// A priority change against a completed or canceled task.
    #[error("task {task_id} is {status}; priority is frozen in terminal states")]
    TerminalPriorityChange {
        /// The affected task.
        task_id: TaskId,
        /// Its terminal status.
        status: TaskStatus,
    },
    /// A priority change that does not change the priority.
    #[error("task {task_id} already has priority {priority}")]
    UnchangedPriority {
        /// The affected task.
        task_id: TaskId,
        /// The current (and requested) priority.
        priority: TaskPriority,
    },
    /// A feedback rating outside the 1..=5 scale.
    #[error("feedback rating {0} is outside 1..=5")]
    InvalidRating(i16),
}

/// Failure to parse a stored task status string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognized task status: {0}")]
pub struct ParseTaskStatusError(pub String);

/// Failure to parse a stored task priority string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognized task priority: {0}")]
pub struct ParseTaskPriorityError(pub String);

/// Failure to parse a stored incident severity string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognized incident severity: {0}")]
pub struct ParseIncidentSeverityError(pub String);
