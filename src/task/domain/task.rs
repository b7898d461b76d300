//! The task aggregate and its status and priority state machines.

use super::{ParseTaskPriorityError, ParseTaskStatusError, TaskDomainError, TaskId};
use crate::directory::domain::{DepartmentId, JobTypeId, UserId, WardId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Created and awaiting assignment.
    Pending,
    /// Assigned and being worked.
    InProgress,
    /// Paused by the porter; work resumes later.
    Waiting,
    /// Finished successfully. Terminal.
    Completed,
    /// Abandoned. Terminal.
    Canceled,
}

impl TaskStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Waiting => "waiting",
            Self::Completed => "completed",
            Self::Canceled => "canceled",
        }
    }

    /// Returns `true` for statuses with no outgoing edges.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Canceled)
    }

    /// Returns `true` when the edge from `self` to `next` is legal.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::InProgress | Self::Canceled)
                | (Self::InProgress, Self::Waiting | Self::Completed | Self::Canceled)
                | (Self::Waiting, Self::InProgress | Self::Canceled)
        )
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseTaskStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "pending" => Ok(Self::Pending),
            "in_progress" => Ok(Self::InProgress),
            "waiting" => Ok(Self::Waiting),
            "completed" => Ok(Self::Completed),
            "canceled" => Ok(Self::Canceled),
            _ => Err(ParseTaskStatusError(value.to_owned())),
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Urgency of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    /// Routine work.
    Normal,
    /// Time-sensitive work.
    Urgent,
    /// Life-safety work; raising to this level records an escalation.
    Emergency,
}

impl TaskPriority {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Urgent => "urgent",
            Self::Emergency => "emergency",
        }
    }
}

impl TryFrom<&str> for TaskPriority {
    type Error = ParseTaskPriorityError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "normal" => Ok(Self::Normal),
            "urgent" => Ok(Self::Urgent),
            "emergency" => Ok(Self::Emergency),
            _ => Err(ParseTaskPriorityError(value.to_owned())),
        }
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A non-empty free-text location (pickup or drop-off point).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Location(String);

impl Location {
    /// Validates and wraps a location string.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyLocation`] for empty or
    /// whitespace-only input.
    pub fn new(value: impl Into<String>) -> Result<Self, TaskDomainError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(TaskDomainError::EmptyLocation);
        }
        Ok(Self(value))
    }

    /// Returns the location text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A persisted portering task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Repository-assigned key.
    pub id: TaskId,
    /// Requesting user.
    pub submitter: UserId,
    /// Assigned porter; `None` until dispatch.
    pub receiver: Option<UserId>,
    /// Collection point.
    pub pickup_location: Location,
    /// Delivery point.
    pub dropoff_location: Location,
    /// Urgency level.
    pub priority: TaskPriority,
    /// Lifecycle status.
    pub status: TaskStatus,
    /// Patient context, when the task moves a patient.
    pub patient_details: Option<String>,
    /// Item context, when the task moves equipment or samples.
    pub item_details: Option<String>,
    /// Free-text handling instructions.
    pub additional_instructions: Option<String>,
    /// Task category.
    pub job_type: Option<JobTypeId>,
    /// Owning department, when scoped.
    pub department: Option<DepartmentId>,
    /// Target ward, when scoped.
    pub ward: Option<WardId>,
    /// Planner's estimate, in minutes.
    pub estimated_duration: Option<i64>,
    /// Elapsed working time, in minutes. Set on terminal entry when a start
    /// time exists.
    pub actual_duration: Option<i64>,
    /// Moment work started.
    pub start_time: Option<DateTime<Utc>>,
    /// Moment the task reached a terminal status.
    pub end_time: Option<DateTime<Utc>>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last mutation timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Assigns a receiver. Idempotent for the same porter.
    pub const fn assign_receiver(&mut self, receiver: UserId) {
        self.receiver = Some(receiver);
    }

    /// Moves the task to `next`, applying the timestamp side effects of the
    /// edge.
    ///
    /// Entering `InProgress` requires a receiver and stamps `start_time`
    /// when it is unset. Entering a terminal status stamps `end_time` and,
    /// when a start time exists, derives `actual_duration` in whole minutes.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidStatusTransition`] for an illegal
    /// edge and [`TaskDomainError::ReceiverRequired`] when starting
    /// unassigned. The task is unchanged on error.
    pub fn transition_to(
        &mut self,
        next: TaskStatus,
        now: DateTime<Utc>,
    ) -> Result<(), TaskDomainError> {
        if !self.status.can_transition_to(next) {
            return Err(TaskDomainError::InvalidStatusTransition {
                task_id: self.id,
                from: self.status,
                to: next,
            });
        }
        if next == TaskStatus::InProgress && self.receiver.is_none() {
            return Err(TaskDomainError::ReceiverRequired(self.id));
        }
        if next == TaskStatus::InProgress && self.start_time.is_none() {
            self.start_time = Some(now);
        }
        if next.is_terminal() {
            self.end_time = Some(now);
            if let Some(start) = self.start_time {
                self.actual_duration = Some((now - start).num_minutes());
            }
        }
        self.status = next;
        Ok(())
    }

    /// Replaces the priority, returning the previous value.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::TerminalPriorityChange`] for completed or
    /// canceled tasks and [`TaskDomainError::UnchangedPriority`] when
    /// nothing would change.
    pub fn change_priority(
        &mut self,
        next: TaskPriority,
    ) -> Result<TaskPriority, TaskDomainError> {
        if self.status.is_terminal() {
            return Err(TaskDomainError::TerminalPriorityChange {
                task_id: self.id,
                status: self.status,
            });
        }
        if self.priority == next {
            return Err(TaskDomainError::UnchangedPriority {
                task_id: self.id,
                priority: self.priority,
            });
        }
        let previous = self.priority;
        self.priority = next;
        Ok(previous)
    }
}

/// Payload for creating a task. Status starts at Pending with no receiver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    /// Requesting user.
    pub submitter: UserId,
    /// Collection point.
    pub pickup_location: Location,
    /// Delivery point.
    pub dropoff_location: Location,
    /// Urgency level.
    pub priority: TaskPriority,
    /// Patient context.
    pub patient_details: Option<String>,
    /// Item context.
    pub item_details: Option<String>,
    /// Handling instructions.
    pub additional_instructions: Option<String>,
    /// Task category.
    pub job_type: Option<JobTypeId>,
    /// Owning department.
    pub department: Option<DepartmentId>,
    /// Target ward.
    pub ward: Option<WardId>,
    /// Planner's estimate, in minutes.
    pub estimated_duration: Option<i64>,
}

impl NewTask {
    /// Creates a payload with the required fields.
    #[must_use]
    pub const fn new(submitter: UserId, pickup: Location, dropoff: Location) -> Self {
        Self {
            submitter,
            pickup_location: pickup,
            dropoff_location: dropoff,
            priority: TaskPriority::Normal,
            patient_details: None,
            item_details: None,
            additional_instructions: None,
            job_type: None,
            department: None,
            ward: None,
            estimated_duration: None,
        }
    }

    /// Sets the urgency level.
    #[must_use]
    pub const fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = priority;
        self
    }

    /// Sets the patient context.
    #[must_use]
    pub fn with_patient_details(mut self, details: impl Into<String>) -> Self {
        self.patient_details = Some(details.into());
        self
    }

    /// Sets the item context.
    #[must_use]
    pub fn with_item_details(mut self, details: impl Into<String>) -> Self {
        self.item_details = Some(details.into());
        self
    }

    /// Sets handling instructions.
    #[must_use]
    pub fn with_additional_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.additional_instructions = Some(instructions.into());
        self
    }

    /// Sets the task category.
    #[must_use]
    pub const fn with_job_type(mut self, job_type: JobTypeId) -> Self {
        self.job_type = Some(job_type);
        self
    }

    /// Scopes the task to a department.
    #[must_use]
    pub const fn with_department(mut self, department: DepartmentId) -> Self {
        self.department = Some(department);
        self
    }

    /// Scopes the task to a ward.
    #[must_use]
    pub const fn with_ward(mut self, ward: WardId) -> Self {
        self.ward = Some(ward);
        self
    }

    /// Sets the planner's duration estimate, in minutes.
    #[must_use]
    pub const fn with_estimated_duration(mut self, minutes: i64) -> Self {
        self.estimated_duration = Some(minutes);
        self
    }
}
