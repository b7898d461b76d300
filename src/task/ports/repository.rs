//! Repository ports for tasks and their history rows.

use crate::directory::domain::UserId;
use crate::store::StoreResult;
use crate::task::domain::{
    AttachmentId, Escalation, EscalationId, Feedback, FeedbackId, Incident, IncidentId,
    IncidentSeverity, NewTask, PriorityChange, PriorityChangeId, Rating, StatusUpdateId, Task,
    TaskAttachment, TaskId, TaskPriority, TaskStatus, TaskStatusUpdate,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Persistence contract for the task aggregate.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Creates a task with status Pending and no receiver.
    async fn create_task(&self, new: NewTask, now: DateTime<Utc>) -> StoreResult<Task>;

    /// Finds a task by key.
    ///
    /// # Errors
    ///
    /// Returns a not-found error when the task does not exist.
    async fn find_task(&self, id: TaskId) -> StoreResult<Task>;

    /// Unconditionally replaces a task's stored state, refreshing
    /// `updated_at`. Used by compensation paths.
    ///
    /// # Errors
    ///
    /// Returns a not-found error when the task does not exist.
    async fn update_task(&self, task: Task, now: DateTime<Utc>) -> StoreResult<Task>;

    /// Replaces a task's stored state only while its stored status and
    /// priority still equal the expected values. Check and write happen
    /// inside one critical section, so a concurrent transition or
    /// re-prioritisation cannot be overwritten.
    ///
    /// # Errors
    ///
    /// Returns a conflict carrying the stored value of the first mismatched
    /// field, and a not-found error when the task does not exist.
    async fn update_task_if_current(
        &self,
        task: Task,
        expected_status: TaskStatus,
        expected_priority: TaskPriority,
        now: DateTime<Utc>,
    ) -> StoreResult<Task>;

    /// Removes a task. Only the create-compensation path calls this; tasks
    /// are otherwise never deleted.
    async fn remove_task(&self, id: TaskId) -> StoreResult<()>;

    /// Lists a porter's non-terminal assignments, lowest id first.
    async fn list_active_for_receiver(&self, receiver: UserId) -> StoreResult<Vec<Task>>;

    /// Lists tasks in a status, lowest id first.
    async fn list_by_status(&self, status: TaskStatus) -> StoreResult<Vec<Task>>;
}

/// Persistence contract for the append-only rows that trail a task.
#[async_trait]
pub trait TaskHistoryRepository: Send + Sync {
    /// Appends a status-update row.
    async fn append_status_update(
        &self,
        task_id: TaskId,
        old_status: TaskStatus,
        new_status: TaskStatus,
        updated_by: UserId,
        comment: Option<String>,
        now: DateTime<Utc>,
    ) -> StoreResult<TaskStatusUpdate>;

    /// Removes a status-update row. Only compensation paths call this; the
    /// rows are otherwise immutable.
    async fn remove_status_update(&self, id: StatusUpdateId) -> StoreResult<()>;

    /// Lists a task's status updates, oldest first.
    async fn list_status_updates(&self, task_id: TaskId) -> StoreResult<Vec<TaskStatusUpdate>>;

    /// Appends a priority-change row.
    async fn append_priority_change(
        &self,
        task_id: TaskId,
        old_priority: TaskPriority,
        new_priority: TaskPriority,
        changed_by: UserId,
        reason: Option<String>,
        now: DateTime<Utc>,
    ) -> StoreResult<PriorityChange>;

    /// Removes a priority-change row. Only compensation paths call this.
    async fn remove_priority_change(&self, id: PriorityChangeId) -> StoreResult<()>;

    /// Lists a task's priority changes, oldest first.
    async fn list_priority_changes(&self, task_id: TaskId) -> StoreResult<Vec<PriorityChange>>;

    /// Appends an escalation record.
    async fn append_escalation(
        &self,
        task_id: TaskId,
        escalated_by: UserId,
        reason: String,
        now: DateTime<Utc>,
    ) -> StoreResult<Escalation>;

    /// Removes an escalation record. Only compensation paths call this.
    async fn remove_escalation(&self, id: EscalationId) -> StoreResult<()>;

    /// Lists a task's escalations, oldest first.
    async fn list_escalations(&self, task_id: TaskId) -> StoreResult<Vec<Escalation>>;

    /// Appends an incident record.
    async fn append_incident(
        &self,
        task_id: TaskId,
        reported_by: UserId,
        description: String,
        severity: IncidentSeverity,
        now: DateTime<Utc>,
    ) -> StoreResult<Incident>;

    /// Removes an incident record. Only compensation paths call this.
    async fn remove_incident(&self, id: IncidentId) -> StoreResult<()>;

    /// Lists a task's incidents, oldest first.
    async fn list_incidents(&self, task_id: TaskId) -> StoreResult<Vec<Incident>>;

    /// Appends an attachment record.
    async fn append_attachment(
        &self,
        task_id: TaskId,
        uploaded_by: UserId,
        file_path: String,
        file_size: Option<i64>,
        content_type: Option<String>,
        now: DateTime<Utc>,
    ) -> StoreResult<TaskAttachment>;

    /// Removes an attachment record. Only compensation paths call this.
    async fn remove_attachment(&self, id: AttachmentId) -> StoreResult<()>;

    /// Lists a task's attachments, oldest first.
    async fn list_attachments(&self, task_id: TaskId) -> StoreResult<Vec<TaskAttachment>>;

    /// Appends a feedback record.
    async fn append_feedback(
        &self,
        task_id: TaskId,
        rated_by: UserId,
        rating: Rating,
        comments: Option<String>,
        now: DateTime<Utc>,
    ) -> StoreResult<Feedback>;

    /// Removes a feedback record. Only compensation paths call this.
    async fn remove_feedback(&self, id: FeedbackId) -> StoreResult<()>;

    /// Lists a task's feedback, oldest first.
    async fn list_feedback(&self, task_id: TaskId) -> StoreResult<Vec<Feedback>>;
}
