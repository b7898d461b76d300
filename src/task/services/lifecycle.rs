//! Task lifecycle orchestration.
//!
//! Every mutating operation follows the same shape: load, apply the domain
//! state machine, commit through a conditional repository write, append the
//! history row, then record the audit entry. The audit append is the commit
//! point of record. When it fails the mutation and its history row are
//! rolled back and the caller sees [`TaskServiceError::AuditPersistence`].

use std::sync::Arc;

use chrono::{DateTime, Utc};
use mockable::Clock;
use serde_json::Value;
use thiserror::Error;
use tracing::{info, warn};

use crate::audit::domain::AuditEntry;
use crate::audit::ports::AuditSink;
use crate::directory::domain::{User, UserId};
use crate::directory::ports::{OrgDirectory, UserDirectory};
use crate::staffing::domain::AvailabilityStatus;
use crate::staffing::ports::StaffingRepository;
use crate::store::StoreError;
use crate::task::domain::{
    Escalation, Feedback, Incident, IncidentSeverity, NewTask, PriorityChange, Rating, Task,
    TaskAttachment, TaskDomainError, TaskId, TaskPriority, TaskStatus, TaskStatusUpdate,
};
use crate::task::ports::{TaskHistoryRepository, TaskRepository};
use crate::task::services::dispatch::DispatchPolicy;

/// Errors surfaced by the lifecycle and dispatch services.
#[derive(Debug, Error)]
pub enum TaskServiceError {
    /// A domain validation or state-machine rejection. State is unchanged.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),
    /// A repository failure, including stale-status conflicts from
    /// conditional writes.
    #[error(transparent)]
    Repository(#[from] StoreError),
    /// An explicit assignment to a porter who no longer qualifies.
    #[error("user {0} is not eligible for assignment")]
    IneligibleAssignee(UserId),
    /// The audit record could not be persisted; the originating mutation
    /// was rolled back.
    #[error("mutation rolled back: audit record could not be persisted")]
    AuditPersistence(#[source] StoreError),
}

/// Orchestrates task creation, transitions, and appended records.
#[derive(Debug)]
pub struct TaskLifecycleService<R, D, S, A, C> {
    tasks: Arc<R>,
    directory: Arc<D>,
    roster: Arc<S>,
    audit: Arc<A>,
    clock: Arc<C>,
    policy: DispatchPolicy,
}

impl<R, D, S, A, C> TaskLifecycleService<R, D, S, A, C>
where
    R: TaskRepository + TaskHistoryRepository,
    D: UserDirectory + OrgDirectory,
    S: StaffingRepository,
    A: AuditSink,
    C: Clock,
{
    /// Creates a service over the given ports.
    pub fn new(
        tasks: Arc<R>,
        directory: Arc<D>,
        roster: Arc<S>,
        audit: Arc<A>,
        clock: Arc<C>,
        policy: DispatchPolicy,
    ) -> Self {
        Self {
            tasks,
            directory,
            roster,
            audit,
            clock,
            policy,
        }
    }

    /// Creates a Pending task after resolving every reference it carries.
    ///
    /// # Errors
    ///
    /// Returns a referential-integrity error for a dangling submitter, job
    /// type, department, or ward, and [`TaskServiceError::AuditPersistence`]
    /// when the creation could not be audited (the task is removed again).
    pub async fn create_task(&self, new: NewTask) -> Result<Task, TaskServiceError> {
        let now = self.clock.utc();
        self.require_user(new.submitter, "submitter").await?;
        if let Some(job_type) = new.job_type
            && self.directory.find_job_type(job_type).await?.is_none()
        {
            return Err(StoreError::dangling("task", "job type", job_type.value()).into());
        }
        if let Some(department) = new.department
            && self.directory.find_department(department).await?.is_none()
        {
            return Err(StoreError::dangling("task", "department", department.value()).into());
        }
        if let Some(ward) = new.ward
            && self.directory.find_ward(ward).await?.is_none()
        {
            return Err(StoreError::dangling("task", "ward", ward.value()).into());
        }

        let task = self.tasks.create_task(new, now).await?;
        let entry = AuditEntry::new("task.created", task.submitter)
            .for_task(task.id)
            .with_new_values(snapshot(&task)?);
        if let Err(err) = self.audit.record(entry).await {
            self.tasks.remove_task(task.id).await?;
            return Err(TaskServiceError::AuditPersistence(err));
        }
        info!(task_id = %task.id, priority = %task.priority, "task created");
        Ok(task)
    }

    /// Returns a task by key.
    ///
    /// # Errors
    ///
    /// Returns a not-found error when the task does not exist.
    pub async fn task(&self, task_id: TaskId) -> Result<Task, TaskServiceError> {
        Ok(self.tasks.find_task(task_id).await?)
    }

    /// Lists a task's status transitions, oldest first.
    ///
    /// # Errors
    ///
    /// Returns repository errors.
    pub async fn status_history(
        &self,
        task_id: TaskId,
    ) -> Result<Vec<TaskStatusUpdate>, TaskServiceError> {
        Ok(self.tasks.list_status_updates(task_id).await?)
    }

    /// Lists a task's priority changes, oldest first.
    ///
    /// # Errors
    ///
    /// Returns repository errors.
    pub async fn priority_history(
        &self,
        task_id: TaskId,
    ) -> Result<Vec<PriorityChange>, TaskServiceError> {
        Ok(self.tasks.list_priority_changes(task_id).await?)
    }

    /// Moves a task along one legal status edge.
    ///
    /// The receiver is notified when one is assigned. The notification is
    /// best effort: a failure after the transition committed is logged and
    /// does not fail the call.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidStatusTransition`] for an illegal
    /// edge, [`TaskDomainError::ReceiverRequired`] when starting an
    /// unassigned task, a conflict when the status changed concurrently,
    /// and [`TaskServiceError::AuditPersistence`] on a failed audit append
    /// (the transition is rolled back).
    pub async fn change_status(
        &self,
        task_id: TaskId,
        new_status: TaskStatus,
        actor: UserId,
        comment: Option<String>,
    ) -> Result<TaskStatusUpdate, TaskServiceError> {
        let now = self.clock.utc();
        let previous = self.tasks.find_task(task_id).await?;
        let mut task = previous.clone();
        task.transition_to(new_status, now)?;
        let (task, update) = self
            .commit_transition(previous, task, actor, comment, now)
            .await?;
        if let Some(receiver) = task.receiver
            && let Err(err) = self
                .audit
                .notify(
                    receiver,
                    Some(task.id),
                    format!("Task {} is now {}", task.id, task.status),
                )
                .await
        {
            warn!(task_id = %task.id, error = %err, "receiver notification failed after commit");
        }
        info!(
            task_id = %task.id,
            from = %update.old_status,
            to = %update.new_status,
            "task status changed"
        );
        Ok(update)
    }

    /// Changes a task's priority, recording the change.
    ///
    /// A raise to Emergency also records an escalation and, while the task
    /// is still Pending, notifies on-duty dispatch-eligible staff in the
    /// task's department (or in any department when the task is unscoped).
    /// The staff notifications are best effort: a failure after the change
    /// committed is logged and does not fail the call.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::TerminalPriorityChange`] for completed or
    /// canceled tasks, a conflict when the status or priority changed
    /// concurrently, and [`TaskServiceError::AuditPersistence`] on a failed
    /// audit append (the change is rolled back).
    pub async fn change_priority(
        &self,
        task_id: TaskId,
        new_priority: TaskPriority,
        actor: UserId,
        reason: Option<String>,
    ) -> Result<PriorityChange, TaskServiceError> {
        let now = self.clock.utc();
        let previous = self.tasks.find_task(task_id).await?;
        let mut task = previous.clone();
        let old_priority = task.change_priority(new_priority)?;
        let task = self
            .tasks
            .update_task_if_current(task, previous.status, previous.priority, now)
            .await?;
        let change = match self
            .tasks
            .append_priority_change(task.id, old_priority, new_priority, actor, reason, now)
            .await
        {
            Ok(change) => change,
            Err(err) => {
                self.tasks.update_task(previous, now).await?;
                return Err(err.into());
            }
        };
        let escalation = if new_priority == TaskPriority::Emergency {
            let appended = self
                .tasks
                .append_escalation(
                    task.id,
                    actor,
                    change
                        .reason
                        .clone()
                        .unwrap_or_else(|| "priority raised to emergency".to_owned()),
                    now,
                )
                .await;
            match appended {
                Ok(escalation) => Some(escalation),
                Err(err) => {
                    self.tasks.update_task(previous, now).await?;
                    self.tasks.remove_priority_change(change.id).await?;
                    return Err(err.into());
                }
            }
        } else {
            None
        };
        let entry = AuditEntry::new("task.priority_changed", actor)
            .for_task(task.id)
            .with_details(format!("{old_priority} -> {new_priority}"))
            .with_old_values(snapshot(&previous)?)
            .with_new_values(snapshot(&task)?);
        if let Err(err) = self.audit.record(entry).await {
            self.tasks.update_task(previous, now).await?;
            self.tasks.remove_priority_change(change.id).await?;
            if let Some(escalation) = escalation {
                self.tasks.remove_escalation(escalation.id).await?;
            }
            return Err(TaskServiceError::AuditPersistence(err));
        }
        if new_priority == TaskPriority::Emergency
            && task.status == TaskStatus::Pending
            && let Err(err) = self.notify_department_staff(&task).await
        {
            warn!(task_id = %task.id, error = %err, "emergency notification failed after commit");
        }
        info!(
            task_id = %task.id,
            from = %old_priority,
            to = %new_priority,
            "task priority changed"
        );
        Ok(change)
    }

    /// Records an escalation against a task.
    ///
    /// # Errors
    ///
    /// Returns a not-found error for an unknown task and
    /// [`TaskServiceError::AuditPersistence`] on a failed audit append (the
    /// escalation is removed again).
    pub async fn escalate(
        &self,
        task_id: TaskId,
        actor: UserId,
        reason: impl Into<String>,
    ) -> Result<Escalation, TaskServiceError> {
        let now = self.clock.utc();
        self.tasks.find_task(task_id).await?;
        let escalation = self
            .tasks
            .append_escalation(task_id, actor, reason.into(), now)
            .await?;
        let entry = AuditEntry::new("task.escalated", actor)
            .for_task(task_id)
            .with_details(escalation.reason.clone());
        if let Err(err) = self.audit.record(entry).await {
            self.tasks.remove_escalation(escalation.id).await?;
            return Err(TaskServiceError::AuditPersistence(err));
        }
        Ok(escalation)
    }

    /// Records an operational incident against a task.
    ///
    /// # Errors
    ///
    /// Returns a not-found error for an unknown task and
    /// [`TaskServiceError::AuditPersistence`] on a failed audit append (the
    /// incident is removed again).
    pub async fn report_incident(
        &self,
        task_id: TaskId,
        actor: UserId,
        description: impl Into<String>,
        severity: IncidentSeverity,
    ) -> Result<Incident, TaskServiceError> {
        let now = self.clock.utc();
        self.tasks.find_task(task_id).await?;
        let incident = self
            .tasks
            .append_incident(task_id, actor, description.into(), severity, now)
            .await?;
        let entry = AuditEntry::new("task.incident_reported", actor)
            .for_task(task_id)
            .with_details(format!("severity {severity}"));
        if let Err(err) = self.audit.record(entry).await {
            self.tasks.remove_incident(incident.id).await?;
            return Err(TaskServiceError::AuditPersistence(err));
        }
        Ok(incident)
    }

    /// Records an attachment reference against a task. Bytes live elsewhere.
    ///
    /// # Errors
    ///
    /// Returns a not-found error for an unknown task and
    /// [`TaskServiceError::AuditPersistence`] on a failed audit append (the
    /// attachment record is removed again).
    pub async fn attach_file(
        &self,
        task_id: TaskId,
        actor: UserId,
        file_path: impl Into<String>,
        file_size: Option<i64>,
        content_type: Option<String>,
    ) -> Result<TaskAttachment, TaskServiceError> {
        let now = self.clock.utc();
        self.tasks.find_task(task_id).await?;
        let attachment = self
            .tasks
            .append_attachment(task_id, actor, file_path.into(), file_size, content_type, now)
            .await?;
        let entry = AuditEntry::new("task.file_attached", actor)
            .for_task(task_id)
            .with_details(attachment.file_path.clone());
        if let Err(err) = self.audit.record(entry).await {
            self.tasks.remove_attachment(attachment.id).await?;
            return Err(TaskServiceError::AuditPersistence(err));
        }
        Ok(attachment)
    }

    /// Records requester feedback against a task.
    ///
    /// # Errors
    ///
    /// Returns a not-found error for an unknown task and
    /// [`TaskServiceError::AuditPersistence`] on a failed audit append (the
    /// feedback is removed again).
    pub async fn record_feedback(
        &self,
        task_id: TaskId,
        actor: UserId,
        rating: Rating,
        comments: Option<String>,
    ) -> Result<Feedback, TaskServiceError> {
        let now = self.clock.utc();
        self.tasks.find_task(task_id).await?;
        let feedback = self
            .tasks
            .append_feedback(task_id, actor, rating, comments, now)
            .await?;
        let entry = AuditEntry::new("task.feedback_recorded", actor)
            .for_task(task_id)
            .with_details(format!("rating {}", rating.value()));
        if let Err(err) = self.audit.record(entry).await {
            self.tasks.remove_feedback(feedback.id).await?;
            return Err(TaskServiceError::AuditPersistence(err));
        }
        Ok(feedback)
    }

    /// Commits a prepared transition: conditional write, history row, audit
    /// entry, with rollback on the latter two.
    pub(crate) async fn commit_transition(
        &self,
        previous: Task,
        updated: Task,
        actor: UserId,
        comment: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<(Task, TaskStatusUpdate), TaskServiceError> {
        let task = self
            .tasks
            .update_task_if_current(updated, previous.status, previous.priority, now)
            .await?;
        let update = match self
            .tasks
            .append_status_update(task.id, previous.status, task.status, actor, comment, now)
            .await
        {
            Ok(update) => update,
            Err(err) => {
                self.tasks.update_task(previous, now).await?;
                return Err(err.into());
            }
        };
        let entry = AuditEntry::new("task.status_changed", actor)
            .for_task(task.id)
            .with_details(format!("{} -> {}", update.old_status, update.new_status))
            .with_old_values(snapshot(&previous)?)
            .with_new_values(snapshot(&task)?);
        if let Err(err) = self.audit.record(entry).await {
            self.tasks.update_task(previous, now).await?;
            self.tasks.remove_status_update(update.id).await?;
            return Err(TaskServiceError::AuditPersistence(err));
        }
        Ok((task, update))
    }

    /// Notifies on-duty dispatch-eligible staff scoped to the task's
    /// department.
    async fn notify_department_staff(&self, task: &Task) -> Result<(), TaskServiceError> {
        let Some(role) = self
            .directory
            .find_role_by_name(self.policy.eligible_role())
            .await?
        else {
            return Ok(());
        };
        let staff = self
            .directory
            .list_active_users(role.id, task.department)
            .await?;
        for member in staff {
            if self.is_on_duty(member.id).await? {
                self.audit
                    .notify(
                        member.id,
                        Some(task.id),
                        format!("Emergency task {} needs attention", task.id),
                    )
                    .await?;
            }
        }
        Ok(())
    }

    async fn is_on_duty(&self, user_id: UserId) -> Result<bool, TaskServiceError> {
        Ok(self
            .roster
            .current_availability(user_id)
            .await?
            .is_some_and(|a| a.status == AvailabilityStatus::OnDuty))
    }

    async fn require_user(
        &self,
        id: UserId,
        reference: &'static str,
    ) -> Result<User, TaskServiceError> {
        self.directory
            .find_user(id)
            .await?
            .ok_or_else(|| StoreError::dangling("task", reference, id.value()).into())
    }
}

pub(crate) fn snapshot(task: &Task) -> Result<Value, TaskServiceError> {
    serde_json::to_value(task)
        .map_err(|err| TaskServiceError::Repository(StoreError::persistence(err)))
}
