//! In-memory task and task-history repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::directory::domain::UserId;
use crate::store::{IdSequence, StoreError, StoreResult};
use crate::task::domain::{
    AttachmentId, Escalation, EscalationId, Feedback, FeedbackId, Incident, IncidentId,
    IncidentSeverity, NewTask, PriorityChange, PriorityChangeId, Rating, StatusUpdateId, Task,
    TaskAttachment, TaskId, TaskPriority, TaskStatus, TaskStatusUpdate,
};
use crate::task::ports::{TaskHistoryRepository, TaskRepository};

/// Thread-safe in-memory task store.
///
/// Implements both the aggregate and the history contracts over one lock so
/// conditional updates observe a consistent view.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskStore {
    state: Arc<RwLock<TaskState>>,
}

#[derive(Debug, Default)]
struct TaskState {
    tasks: HashMap<TaskId, Task>,
    status_updates: Vec<TaskStatusUpdate>,
    priority_changes: Vec<PriorityChange>,
    escalations: Vec<Escalation>,
    incidents: Vec<Incident>,
    attachments: Vec<TaskAttachment>,
    feedback: Vec<Feedback>,
    task_seq: IdSequence,
    status_update_seq: IdSequence,
    priority_change_seq: IdSequence,
    escalation_seq: IdSequence,
    incident_seq: IdSequence,
    attachment_seq: IdSequence,
    feedback_seq: IdSequence,
}

impl InMemoryTaskStore {
    /// Creates an empty in-memory task store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, TaskState>> {
        self.state.read().map_err(StoreError::poisoned)
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, TaskState>> {
        self.state.write().map_err(StoreError::poisoned)
    }

    fn sorted_tasks(state: &TaskState, mut keep: impl FnMut(&Task) -> bool) -> Vec<Task> {
        let mut tasks: Vec<Task> = state.tasks.values().filter(|t| keep(t)).cloned().collect();
        tasks.sort_by_key(|t| t.id);
        tasks
    }

    fn remove_row<T>(
        rows: &mut Vec<T>,
        entity: &'static str,
        id: i64,
        mut matches: impl FnMut(&T) -> bool,
    ) -> StoreResult<()> {
        let Some(index) = rows.iter().position(|row| matches(row)) else {
            return Err(StoreError::not_found(entity, id));
        };
        rows.remove(index);
        Ok(())
    }
}

#[async_trait]
impl TaskRepository for InMemoryTaskStore {
    async fn create_task(&self, new: NewTask, now: DateTime<Utc>) -> StoreResult<Task> {
        let mut state = self.write()?;
        let task = Task {
            id: TaskId::new(state.task_seq.next()),
            submitter: new.submitter,
            receiver: None,
            pickup_location: new.pickup_location,
            dropoff_location: new.dropoff_location,
            priority: new.priority,
            status: TaskStatus::Pending,
            patient_details: new.patient_details,
            item_details: new.item_details,
            additional_instructions: new.additional_instructions,
            job_type: new.job_type,
            department: new.department,
            ward: new.ward,
            estimated_duration: new.estimated_duration,
            actual_duration: None,
            start_time: None,
            end_time: None,
            created_at: now,
            updated_at: now,
        };
        state.tasks.insert(task.id, task.clone());
        Ok(task)
    }

    async fn find_task(&self, id: TaskId) -> StoreResult<Task> {
        self.read()?
            .tasks
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("task", id.value()))
    }

    async fn update_task(&self, mut task: Task, now: DateTime<Utc>) -> StoreResult<Task> {
        let mut state = self.write()?;
        if !state.tasks.contains_key(&task.id) {
            return Err(StoreError::not_found("task", task.id.value()));
        }
        task.updated_at = now;
        state.tasks.insert(task.id, task.clone());
        Ok(task)
    }

    async fn update_task_if_current(
        &self,
        mut task: Task,
        expected_status: TaskStatus,
        expected_priority: TaskPriority,
        now: DateTime<Utc>,
    ) -> StoreResult<Task> {
        let mut state = self.write()?;
        let Some(stored) = state.tasks.get(&task.id) else {
            return Err(StoreError::not_found("task", task.id.value()));
        };
        if stored.status != expected_status {
            return Err(StoreError::conflict("task", "status", stored.status.as_str()));
        }
        if stored.priority != expected_priority {
            return Err(StoreError::conflict(
                "task",
                "priority",
                stored.priority.as_str(),
            ));
        }
        task.updated_at = now;
        state.tasks.insert(task.id, task.clone());
        Ok(task)
    }

    async fn remove_task(&self, id: TaskId) -> StoreResult<()> {
        let mut state = self.write()?;
        if state.tasks.remove(&id).is_none() {
            return Err(StoreError::not_found("task", id.value()));
        }
        Ok(())
    }

    async fn list_active_for_receiver(&self, receiver: UserId) -> StoreResult<Vec<Task>> {
        let state = self.read()?;
        Ok(Self::sorted_tasks(&state, |t| {
            t.receiver == Some(receiver) && !t.status.is_terminal()
        }))
    }

    async fn list_by_status(&self, status: TaskStatus) -> StoreResult<Vec<Task>> {
        let state = self.read()?;
        Ok(Self::sorted_tasks(&state, |t| t.status == status))
    }
}

#[async_trait]
impl TaskHistoryRepository for InMemoryTaskStore {
    async fn append_status_update(
        &self,
        task_id: TaskId,
        old_status: TaskStatus,
        new_status: TaskStatus,
        updated_by: UserId,
        comment: Option<String>,
        now: DateTime<Utc>,
    ) -> StoreResult<TaskStatusUpdate> {
        let mut state = self.write()?;
        let row = TaskStatusUpdate {
            id: StatusUpdateId::new(state.status_update_seq.next()),
            task_id,
            old_status,
            new_status,
            updated_by,
            comment,
            timestamp: now,
        };
        state.status_updates.push(row.clone());
        Ok(row)
    }

    async fn remove_status_update(&self, id: StatusUpdateId) -> StoreResult<()> {
        let mut state = self.write()?;
        Self::remove_row(&mut state.status_updates, "status update", id.value(), |r| {
            r.id == id
        })
    }

    async fn list_status_updates(&self, task_id: TaskId) -> StoreResult<Vec<TaskStatusUpdate>> {
        let state = self.read()?;
        Ok(state
            .status_updates
            .iter()
            .filter(|r| r.task_id == task_id)
            .cloned()
            .collect())
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
        let mut state = self.write()?;
        let row = PriorityChange {
            id: PriorityChangeId::new(state.priority_change_seq.next()),
            task_id,
            old_priority,
            new_priority,
            changed_by,
            reason,
            timestamp: now,
        };
        state.priority_changes.push(row.clone());
        Ok(row)
    }

    async fn remove_priority_change(&self, id: PriorityChangeId) -> StoreResult<()> {
        let mut state = self.write()?;
        Self::remove_row(
            &mut state.priority_changes,
            "priority change",
            id.value(),
            |r| r.id == id,
        )
    }

    async fn list_priority_changes(&self, task_id: TaskId) -> StoreResult<Vec<PriorityChange>> {
        let state = self.read()?;
        Ok(state
            .priority_changes
            .iter()
            .filter(|r| r.task_id == task_id)
            .cloned()
            .collect())
    }

    async fn append_escalation(
        &self,
        task_id: TaskId,
        escalated_by: UserId,
        reason: String,
        now: DateTime<Utc>,
    ) -> StoreResult<Escalation> {
        let mut state = self.write()?;
        let row = Escalation {
            id: EscalationId::new(state.escalation_seq.next()),
            task_id,
            escalated_by,
            reason,
            timestamp: now,
        };
        state.escalations.push(row.clone());
        Ok(row)
    }

    async fn remove_escalation(&self, id: EscalationId) -> StoreResult<()> {
        let mut state = self.write()?;
        Self::remove_row(&mut state.escalations, "escalation", id.value(), |r| {
            r.id == id
        })
    }

    async fn list_escalations(&self, task_id: TaskId) -> StoreResult<Vec<Escalation>> {
        let state = self.read()?;
        Ok(state
            .escalations
            .iter()
            .filter(|r| r.task_id == task_id)
            .cloned()
            .collect())
    }

    async fn append_incident(
        &self,
        task_id: TaskId,
        reported_by: UserId,
        description: String,
        severity: IncidentSeverity,
        now: DateTime<Utc>,
    ) -> StoreResult<Incident> {
        let mut state = self.write()?;
        let row = Incident {
            id: IncidentId::new(state.incident_seq.next()),
            task_id,
            reported_by,
            description,
            severity,
            timestamp: now,
        };
        state.incidents.push(row.clone());
        Ok(row)
    }

    async fn remove_incident(&self, id: IncidentId) -> StoreResult<()> {
        let mut state = self.write()?;
        Self::remove_row(&mut state.incidents, "incident", id.value(), |r| r.id == id)
    }

    async fn list_incidents(&self, task_id: TaskId) -> StoreResult<Vec<Incident>> {
        let state = self.read()?;
        Ok(state
            .incidents
            .iter()
            .filter(|r| r.task_id == task_id)
            .cloned()
            .collect())
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
        let mut state = self.write()?;
        let row = TaskAttachment {
            id: AttachmentId::new(state.attachment_seq.next()),
            task_id,
            uploaded_by,
            file_path,
            file_size,
            content_type,
            uploaded_at: now,
        };
        state.attachments.push(row.clone());
        Ok(row)
    }

    async fn remove_attachment(&self, id: AttachmentId) -> StoreResult<()> {
        let mut state = self.write()?;
        Self::remove_row(&mut state.attachments, "attachment", id.value(), |r| {
            r.id == id
        })
    }

    async fn list_attachments(&self, task_id: TaskId) -> StoreResult<Vec<TaskAttachment>> {
        let state = self.read()?;
        Ok(state
            .attachments
            .iter()
            .filter(|r| r.task_id == task_id)
            .cloned()
            .collect())
    }

    async fn append_feedback(
        &self,
        task_id: TaskId,
        rated_by: UserId,
        rating: Rating,
        comments: Option<String>,
        now: DateTime<Utc>,
    ) -> StoreResult<Feedback> {
        let mut state = self.write()?;
        let row = Feedback {
            id: FeedbackId::new(state.feedback_seq.next()),
            task_id,
            rated_by,
            rating,
            comments,
            timestamp: now,
        };
        state.feedback.push(row.clone());
        Ok(row)
    }

    async fn remove_feedback(&self, id: FeedbackId) -> StoreResult<()> {
        let mut state = self.write()?;
        Self::remove_row(&mut state.feedback, "feedback", id.value(), |r| r.id == id)
    }

    async fn list_feedback(&self, task_id: TaskId) -> StoreResult<Vec<Feedback>> {
        let state = self.read()?;
        Ok(state
            .feedback
            .iter()
            .filter(|r| r.task_id == task_id)
            .cloned()
            .collect())
    }
}
