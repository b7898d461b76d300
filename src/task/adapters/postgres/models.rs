//! Diesel row models for task persistence.

use super::schema::{
    escalations, incidents, priority_changes, task_attachments, task_feedback,
    task_status_updates, tasks,
};
use crate::directory::domain::{DepartmentId, JobTypeId, UserId, WardId};
use crate::store::{StoreError, StoreResult};
use crate::task::domain::{
    AttachmentId, Escalation, EscalationId, Feedback, FeedbackId, Incident, IncidentId,
    IncidentSeverity, Location, PriorityChange, PriorityChangeId, Rating, StatusUpdateId, Task,
    TaskAttachment, TaskId, TaskPriority, TaskStatus, TaskStatusUpdate,
};
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for tasks.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskRow {
    pub id: i64,
    pub submitter_id: i64,
    pub receiver_id: Option<i64>,
    pub pickup_location: String,
    pub dropoff_location: String,
    pub priority: String,
    pub status: String,
    pub patient_details: Option<String>,
    pub item_details: Option<String>,
    pub additional_instructions: Option<String>,
    pub job_type_id: Option<i64>,
    pub department_id: Option<i64>,
    pub ward_id: Option<i64>,
    pub estimated_duration: Option<i64>,
    pub actual_duration: Option<i64>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert model for tasks; the key comes from `BIGSERIAL`.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = tasks)]
pub struct NewTaskRow {
    pub submitter_id: i64,
    pub receiver_id: Option<i64>,
    pub pickup_location: String,
    pub dropoff_location: String,
    pub priority: String,
    pub status: String,
    pub patient_details: Option<String>,
    pub item_details: Option<String>,
    pub additional_instructions: Option<String>,
    pub job_type_id: Option<i64>,
    pub department_id: Option<i64>,
    pub ward_id: Option<i64>,
    pub estimated_duration: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Query result row for status updates.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = task_status_updates)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct StatusUpdateRow {
    pub id: i64,
    pub task_id: i64,
    pub old_status: String,
    pub new_status: String,
    pub updated_by: i64,
    pub comment: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// Query result row for priority changes.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = priority_changes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct PriorityChangeRow {
    pub id: i64,
    pub task_id: i64,
    pub old_priority: String,
    pub new_priority: String,
    pub changed_by: i64,
    pub reason: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// Query result row for escalations.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = escalations)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct EscalationRow {
    pub id: i64,
    pub task_id: i64,
    pub escalated_by: i64,
    pub reason: String,
    pub timestamp: DateTime<Utc>,
}

/// Query result row for incidents.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = incidents)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct IncidentRow {
    pub id: i64,
    pub task_id: i64,
    pub reported_by: i64,
    pub description: String,
    pub severity: String,
    pub timestamp: DateTime<Utc>,
}

/// Query result row for attachments.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = task_attachments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct AttachmentRow {
    pub id: i64,
    pub task_id: i64,
    pub uploaded_by: i64,
    pub file_path: String,
    pub file_size: Option<i64>,
    pub content_type: Option<String>,
    pub uploaded_at: DateTime<Utc>,
}

/// Query result row for feedback.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = task_feedback)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct FeedbackRow {
    pub id: i64,
    pub task_id: i64,
    pub rated_by: i64,
    pub rating: i16,
    pub comments: Option<String>,
    pub timestamp: DateTime<Utc>,
}

pub fn row_to_task(row: TaskRow) -> StoreResult<Task> {
    Ok(Task {
        id: TaskId::new(row.id),
        submitter: UserId::new(row.submitter_id),
        receiver: row.receiver_id.map(UserId::new),
        pickup_location: Location::new(row.pickup_location).map_err(StoreError::persistence)?,
        dropoff_location: Location::new(row.dropoff_location).map_err(StoreError::persistence)?,
        priority: TaskPriority::try_from(row.priority.as_str()).map_err(StoreError::persistence)?,
        status: TaskStatus::try_from(row.status.as_str()).map_err(StoreError::persistence)?,
        patient_details: row.patient_details,
        item_details: row.item_details,
        additional_instructions: row.additional_instructions,
        job_type: row.job_type_id.map(JobTypeId::new),
        department: row.department_id.map(DepartmentId::new),
        ward: row.ward_id.map(WardId::new),
        estimated_duration: row.estimated_duration,
        actual_duration: row.actual_duration,
        start_time: row.start_time,
        end_time: row.end_time,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

pub fn row_to_status_update(row: StatusUpdateRow) -> StoreResult<TaskStatusUpdate> {
    Ok(TaskStatusUpdate {
        id: StatusUpdateId::new(row.id),
        task_id: TaskId::new(row.task_id),
        old_status: TaskStatus::try_from(row.old_status.as_str())
            .map_err(StoreError::persistence)?,
        new_status: TaskStatus::try_from(row.new_status.as_str())
            .map_err(StoreError::persistence)?,
        updated_by: UserId::new(row.updated_by),
        comment: row.comment,
        timestamp: row.timestamp,
    })
}

pub fn row_to_priority_change(row: PriorityChangeRow) -> StoreResult<PriorityChange> {
    Ok(PriorityChange {
        id: PriorityChangeId::new(row.id),
        task_id: TaskId::new(row.task_id),
        old_priority: TaskPriority::try_from(row.old_priority.as_str())
            .map_err(StoreError::persistence)?,
        new_priority: TaskPriority::try_from(row.new_priority.as_str())
            .map_err(StoreError::persistence)?,
        changed_by: UserId::new(row.changed_by),
        reason: row.reason,
        timestamp: row.timestamp,
    })
}

pub fn row_to_escalation(row: EscalationRow) -> Escalation {
    Escalation {
        id: EscalationId::new(row.id),
        task_id: TaskId::new(row.task_id),
        escalated_by: UserId::new(row.escalated_by),
        reason: row.reason,
        timestamp: row.timestamp,
    }
}

pub fn row_to_incident(row: IncidentRow) -> StoreResult<Incident> {
    Ok(Incident {
        id: IncidentId::new(row.id),
        task_id: TaskId::new(row.task_id),
        reported_by: UserId::new(row.reported_by),
        description: row.description,
        severity: IncidentSeverity::try_from(row.severity.as_str())
            .map_err(StoreError::persistence)?,
        timestamp: row.timestamp,
    })
}

pub fn row_to_attachment(row: AttachmentRow) -> TaskAttachment {
    TaskAttachment {
        id: AttachmentId::new(row.id),
        task_id: TaskId::new(row.task_id),
        uploaded_by: UserId::new(row.uploaded_by),
        file_path: row.file_path,
        file_size: row.file_size,
        content_type: row.content_type,
        uploaded_at: row.uploaded_at,
    }
}

pub fn row_to_feedback(row: FeedbackRow) -> StoreResult<Feedback> {
    Ok(Feedback {
        id: FeedbackId::new(row.id),
        task_id: TaskId::new(row.task_id),
        rated_by: UserId::new(row.rated_by),
        rating: Rating::new(row.rating).map_err(StoreError::persistence)?,
        comments: row.comments,
        timestamp: row.timestamp,
    })
}
