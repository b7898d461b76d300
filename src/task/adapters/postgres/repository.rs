//! `PostgreSQL` repository implementation for task persistence.

use super::models::{
    self, AttachmentRow, EscalationRow, FeedbackRow, IncidentRow, NewTaskRow, PriorityChangeRow,
    StatusUpdateRow, TaskRow,
};
use super::schema::{
    escalations, incidents, priority_changes, task_attachments, task_feedback,
    task_status_updates, tasks,
};
use crate::directory::domain::UserId;
use crate::store::{StoreError, StoreResult};
use crate::task::domain::{
    AttachmentId, Escalation, EscalationId, Feedback, FeedbackId, Incident, IncidentId,
    IncidentSeverity, NewTask, PriorityChange, PriorityChangeId, Rating, StatusUpdateId, Task,
    TaskAttachment, TaskId, TaskPriority, TaskStatus, TaskStatusUpdate,
};
use crate::task::ports::{TaskHistoryRepository, TaskRepository};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};

/// `PostgreSQL` connection pool type used by task adapters.
pub type TaskPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed task and task-history store.
#[derive(Debug, Clone)]
pub struct PostgresTaskStore {
    pool: TaskPgPool,
}

impl PostgresTaskStore {
    /// Creates a store from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: TaskPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> StoreResult<T>
    where
        F: FnOnce(&mut PgConnection) -> StoreResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(StoreError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(StoreError::persistence)?
    }
}

#[async_trait]
impl TaskRepository for PostgresTaskStore {
    async fn create_task(&self, new: NewTask, now: DateTime<Utc>) -> StoreResult<Task> {
        let row = NewTaskRow {
            submitter_id: new.submitter.value(),
            receiver_id: None,
            pickup_location: new.pickup_location.as_str().to_owned(),
            dropoff_location: new.dropoff_location.as_str().to_owned(),
            priority: new.priority.as_str().to_owned(),
            status: TaskStatus::Pending.as_str().to_owned(),
            patient_details: new.patient_details,
            item_details: new.item_details,
            additional_instructions: new.additional_instructions,
            job_type_id: new.job_type.map(|id| id.value()),
            department_id: new.department.map(|id| id.value()),
            ward_id: new.ward.map(|id| id.value()),
            estimated_duration: new.estimated_duration,
            created_at: now,
            updated_at: now,
        };
        self.run_blocking(move |connection| {
            let inserted: TaskRow = diesel::insert_into(tasks::table)
                .values(&row)
                .get_result(connection)
                .map_err(StoreError::persistence)?;
            models::row_to_task(inserted)
        })
        .await
    }

    async fn find_task(&self, id: TaskId) -> StoreResult<Task> {
        self.run_blocking(move |connection| {
            let row = tasks::table
                .filter(tasks::id.eq(id.value()))
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()
                .map_err(StoreError::persistence)?
                .ok_or(StoreError::not_found("task", id.value()))?;
            models::row_to_task(row)
        })
        .await
    }

    async fn update_task(&self, task: Task, now: DateTime<Utc>) -> StoreResult<Task> {
        self.run_blocking(move |connection| {
            let updated = diesel::update(tasks::table.filter(tasks::id.eq(task.id.value())))
                .set((
                tasks::receiver_id.eq(task.receiver.map(|id| id.value())),
                tasks::priority.eq(task.priority.as_str()),
                tasks::status.eq(task.status.as_str()),
                tasks::actual_duration.eq(task.actual_duration),
                tasks::start_time.eq(task.start_time),
                tasks::end_time.eq(task.end_time),
                tasks::updated_at.eq(now),
            ))
                .execute(connection)
                .map_err(StoreError::persistence)?;
            if updated == 0 {
                return Err(StoreError::not_found("task", task.id.value()));
            }
            let mut task = task;
            task.updated_at = now;
            Ok(task)
        })
        .await
    }

    async fn update_task_if_current(
        &self,
        task: Task,
        expected_status: TaskStatus,
        expected_priority: TaskPriority,
        now: DateTime<Utc>,
    ) -> StoreResult<Task> {
        self.run_blocking(move |connection| {
            // A single conditional UPDATE is the atomic unit; the follow-up
            // SELECT only improves the error report.
            let updated = diesel::update(
                tasks::table
                    .filter(tasks::id.eq(task.id.value()))
                    .filter(tasks::status.eq(expected_status.as_str()))
                    .filter(tasks::priority.eq(expected_priority.as_str())),
            )
            .set((
                tasks::receiver_id.eq(task.receiver.map(|id| id.value())),
                tasks::priority.eq(task.priority.as_str()),
                tasks::status.eq(task.status.as_str()),
                tasks::actual_duration.eq(task.actual_duration),
                tasks::start_time.eq(task.start_time),
                tasks::end_time.eq(task.end_time),
                tasks::updated_at.eq(now),
            ))
            .execute(connection)
            .map_err(StoreError::persistence)?;
            if updated == 0 {
                let stored = tasks::table
                    .filter(tasks::id.eq(task.id.value()))
                    .select((tasks::status, tasks::priority))
                    .first::<(String, String)>(connection)
                    .optional()
                    .map_err(StoreError::persistence)?;
                return Err(match stored {
                    Some((status, _)) if status != expected_status.as_str() => {
                        StoreError::conflict("task", "status", status)
                    }
                    Some((_, priority)) => StoreError::conflict("task", "priority", priority),
                    None => StoreError::not_found("task", task.id.value()),
                });
            }
            let mut task = task;
            task.updated_at = now;
            Ok(task)
        })
        .await
    }

    async fn remove_task(&self, id: TaskId) -> StoreResult<()> {
        self.run_blocking(move |connection| {
            let removed = diesel::delete(tasks::table.filter(tasks::id.eq(id.value())))
                .execute(connection)
                .map_err(StoreError::persistence)?;
            if removed == 0 {
                return Err(StoreError::not_found("task", id.value()));
            }
            Ok(())
        })
        .await
    }

    async fn list_active_for_receiver(&self, receiver: UserId) -> StoreResult<Vec<Task>> {
        self.run_blocking(move |connection| {
            let rows = tasks::table
                .filter(tasks::receiver_id.eq(receiver.value()))
                .filter(tasks::status.ne_all(vec![
                    TaskStatus::Completed.as_str(),
                    TaskStatus::Canceled.as_str(),
                ]))
                .order(tasks::id.asc())
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)
                .map_err(StoreError::persistence)?;
            rows.into_iter().map(models::row_to_task).collect()
        })
        .await
    }

    async fn list_by_status(&self, status: TaskStatus) -> StoreResult<Vec<Task>> {
        self.run_blocking(move |connection| {
            let rows = tasks::table
                .filter(tasks::status.eq(status.as_str()))
                .order(tasks::id.asc())
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)
                .map_err(StoreError::persistence)?;
            rows.into_iter().map(models::row_to_task).collect()
        })
        .await
    }
}

#[async_trait]
impl TaskHistoryRepository for PostgresTaskStore {
    async fn append_status_update(
        &self,
        task_id: TaskId,
        old_status: TaskStatus,
        new_status: TaskStatus,
        updated_by: UserId,
        comment: Option<String>,
        now: DateTime<Utc>,
    ) -> StoreResult<TaskStatusUpdate> {
        self.run_blocking(move |connection| {
            let inserted: StatusUpdateRow = diesel::insert_into(task_status_updates::table)
                .values((
                    task_status_updates::task_id.eq(task_id.value()),
                    task_status_updates::old_status.eq(old_status.as_str()),
                    task_status_updates::new_status.eq(new_status.as_str()),
                    task_status_updates::updated_by.eq(updated_by.value()),
                    task_status_updates::comment.eq(comment),
                    task_status_updates::timestamp.eq(now),
                ))
                .get_result(connection)
                .map_err(StoreError::persistence)?;
            models::row_to_status_update(inserted)
        })
        .await
    }

    async fn remove_status_update(&self, id: StatusUpdateId) -> StoreResult<()> {
        self.run_blocking(move |connection| {
            delete_by_id(
                connection,
                diesel::delete(
                    task_status_updates::table.filter(task_status_updates::id.eq(id.value())),
                ),
                "status update",
                id.value(),
            )
        })
        .await
    }

    async fn list_status_updates(&self, task_id: TaskId) -> StoreResult<Vec<TaskStatusUpdate>> {
        self.run_blocking(move |connection| {
            let rows = task_status_updates::table
                .filter(task_status_updates::task_id.eq(task_id.value()))
                .order(task_status_updates::id.asc())
                .select(StatusUpdateRow::as_select())
                .load::<StatusUpdateRow>(connection)
                .map_err(StoreError::persistence)?;
            rows.into_iter().map(models::row_to_status_update).collect()
        })
        .await
    }

    async fn append_priority_change(
        &self,
        task_id: TaskId,
        old_priority: TaskPriority,
        new_priority: TaskPriority,
        changed_by: UserId,
        reason: Option<String>,
        now: DateTime<Utc>,
    ) -> StoreResult<PriorityChange> {
        self.run_blocking(move |connection| {
            let inserted: PriorityChangeRow = diesel::insert_into(priority_changes::table)
                .values((
                    priority_changes::task_id.eq(task_id.value()),
                    priority_changes::old_priority.eq(old_priority.as_str()),
                    priority_changes::new_priority.eq(new_priority.as_str()),
                    priority_changes::changed_by.eq(changed_by.value()),
                    priority_changes::reason.eq(reason),
                    priority_changes::timestamp.eq(now),
                ))
                .get_result(connection)
                .map_err(StoreError::persistence)?;
            models::row_to_priority_change(inserted)
        })
        .await
    }

    async fn remove_priority_change(&self, id: PriorityChangeId) -> StoreResult<()> {
        self.run_blocking(move |connection| {
            delete_by_id(
                connection,
                diesel::delete(
                    priority_changes::table.filter(priority_changes::id.eq(id.value())),
                ),
                "priority change",
                id.value(),
            )
        })
        .await
    }

    async fn list_priority_changes(&self, task_id: TaskId) -> StoreResult<Vec<PriorityChange>> {
        self.run_blocking(move |connection| {
            let rows = priority_changes::table
                .filter(priority_changes::task_id.eq(task_id.value()))
                .order(priority_changes::id.asc())
                .select(PriorityChangeRow::as_select())
                .load::<PriorityChangeRow>(connection)
                .map_err(StoreError::persistence)?;
            rows.into_iter()
                .map(models::row_to_priority_change)
                .collect()
        })
        .await
    }

    async fn append_escalation(
        &self,
        task_id: TaskId,
        escalated_by: UserId,
        reason: String,
        now: DateTime<Utc>,
    ) -> StoreResult<Escalation> {
        self.run_blocking(move |connection| {
            let inserted: EscalationRow = diesel::insert_into(escalations::table)
                .values((
                    escalations::task_id.eq(task_id.value()),
                    escalations::escalated_by.eq(escalated_by.value()),
                    escalations::reason.eq(reason),
                    escalations::timestamp.eq(now),
                ))
                .get_result(connection)
                .map_err(StoreError::persistence)?;
            Ok(models::row_to_escalation(inserted))
        })
        .await
    }

    async fn remove_escalation(&self, id: EscalationId) -> StoreResult<()> {
        self.run_blocking(move |connection| {
            delete_by_id(
                connection,
                diesel::delete(escalations::table.filter(escalations::id.eq(id.value()))),
                "escalation",
                id.value(),
            )
        })
        .await
    }

    async fn list_escalations(&self, task_id: TaskId) -> StoreResult<Vec<Escalation>> {
        self.run_blocking(move |connection| {
            let rows = escalations::table
                .filter(escalations::task_id.eq(task_id.value()))
                .order(escalations::id.asc())
                .select(EscalationRow::as_select())
                .load::<EscalationRow>(connection)
                .map_err(StoreError::persistence)?;
            Ok(rows.into_iter().map(models::row_to_escalation).collect())
        })
        .await
    }

    async fn append_incident(
        &self,
        task_id: TaskId,
        reported_by: UserId,
        description: String,
        severity: IncidentSeverity,
        now: DateTime<Utc>,
    ) -> StoreResult<Incident> {
        self.run_blocking(move |connection| {
            let inserted: IncidentRow = diesel::insert_into(incidents::table)
                .values((
                    incidents::task_id.eq(task_id.value()),
                    incidents::reported_by.eq(reported_by.value()),
                    incidents::description.eq(description),
                    incidents::severity.eq(severity.as_str()),
                    incidents::timestamp.eq(now),
                ))
                .get_result(connection)
                .map_err(StoreError::persistence)?;
            models::row_to_incident(inserted)
        })
        .await
    }

    async fn remove_incident(&self, id: IncidentId) -> StoreResult<()> {
        self.run_blocking(move |connection| {
            delete_by_id(
                connection,
                diesel::delete(incidents::table.filter(incidents::id.eq(id.value()))),
                "incident",
                id.value(),
            )
        })
        .await
    }

    async fn list_incidents(&self, task_id: TaskId) -> StoreResult<Vec<Incident>> {
        self.run_blocking(move |connection| {
            let rows = incidents::table
                .filter(incidents::task_id.eq(task_id.value()))
                .order(incidents::id.asc())
                .select(IncidentRow::as_select())
                .load::<IncidentRow>(connection)
                .map_err(StoreError::persistence)?;
            rows.into_iter().map(models::row_to_incident).collect()
        })
        .await
    }

    async fn append_attachment(
        &self,
        task_id: TaskId,
        uploaded_by: UserId,
        file_path: String,
        file_size: Option<i64>,
        content_type: Option<String>,
        now: DateTime<Utc>,
    ) -> StoreResult<TaskAttachment> {
        self.run_blocking(move |connection| {
            let inserted: AttachmentRow = diesel::insert_into(task_attachments::table)
                .values((
                    task_attachments::task_id.eq(task_id.value()),
                    task_attachments::uploaded_by.eq(uploaded_by.value()),
                    task_attachments::file_path.eq(file_path),
                    task_attachments::file_size.eq(file_size),
                    task_attachments::content_type.eq(content_type),
                    task_attachments::uploaded_at.eq(now),
                ))
                .get_result(connection)
                .map_err(StoreError::persistence)?;
            Ok(models::row_to_attachment(inserted))
        })
        .await
    }

    async fn remove_attachment(&self, id: AttachmentId) -> StoreResult<()> {
        self.run_blocking(move |connection| {
            delete_by_id(
                connection,
                diesel::delete(task_attachments::table.filter(task_attachments::id.eq(id.value()))),
                "attachment",
                id.value(),
            )
        })
        .await
    }

    async fn list_attachments(&self, task_id: TaskId) -> StoreResult<Vec<TaskAttachment>> {
        self.run_blocking(move |connection| {
            let rows = task_attachments::table
                .filter(task_attachments::task_id.eq(task_id.value()))
                .order(task_attachments::id.asc())
                .select(AttachmentRow::as_select())
                .load::<AttachmentRow>(connection)
                .map_err(StoreError::persistence)?;
            Ok(rows.into_iter().map(models::row_to_attachment).collect())
        })
        .await
    }

    async fn append_feedback(
        &self,
        task_id: TaskId,
        rated_by: UserId,
        rating: Rating,
        comments: Option<String>,
        now: DateTime<Utc>,
    ) -> StoreResult<Feedback> {
        self.run_blocking(move |connection| {
            let inserted: FeedbackRow = diesel::insert_into(task_feedback::table)
                .values((
                    task_feedback::task_id.eq(task_id.value()),
                    task_feedback::rated_by.eq(rated_by.value()),
                    task_feedback::rating.eq(rating.value()),
                    task_feedback::comments.eq(comments),
                    task_feedback::timestamp.eq(now),
                ))
                .get_result(connection)
                .map_err(StoreError::persistence)?;
            models::row_to_feedback(inserted)
        })
        .await
    }

    async fn remove_feedback(&self, id: FeedbackId) -> StoreResult<()> {
        self.run_blocking(move |connection| {
            delete_by_id(
                connection,
                diesel::delete(task_feedback::table.filter(task_feedback::id.eq(id.value()))),
                "feedback",
                id.value(),
            )
        })
        .await
    }

    async fn list_feedback(&self, task_id: TaskId) -> StoreResult<Vec<Feedback>> {
        self.run_blocking(move |connection| {
            let rows = task_feedback::table
                .filter(task_feedback::task_id.eq(task_id.value()))
                .order(task_feedback::id.asc())
                .select(FeedbackRow::as_select())
                .load::<FeedbackRow>(connection)
                .map_err(StoreError::persistence)?;
            rows.into_iter().map(models::row_to_feedback).collect()
        })
        .await
    }
}

fn delete_by_id<D>(
    connection: &mut PgConnection,
    statement: D,
    entity: &'static str,
    id: i64,
) -> StoreResult<()>
where
    D: diesel::query_dsl::methods::ExecuteDsl<PgConnection>,
{
    let removed = D::execute(statement, connection).map_err(StoreError::persistence)?;
    if removed == 0 {
        return Err(StoreError::not_found(entity, id));
    }
    Ok(())
}
