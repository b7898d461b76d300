//! Dispatch: matching Pending tasks to eligible porters.
//!
//! Candidate selection is a pure filter over directory, staffing, and
//! workload state. Assigning a Pending task reuses the lifecycle commit
//! path so the receiver write and the transition to InProgress land inside
//! one conditional repository write; an already-running task can be handed
//! over to another porter without touching its status. A task canceled
//! mid-dispatch loses the race and is never assigned.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use mockable::Clock;
use tracing::{debug, info, warn};

use crate::audit::domain::AuditEntry;
use crate::audit::ports::AuditSink;
use crate::directory::domain::{
    CapabilityName, DirectoryDomainError, RoleId, SettingsSnapshot, User, UserId,
};
use crate::directory::ports::{OrgDirectory, UserDirectory};
use crate::staffing::domain::AvailabilityStatus;
use crate::staffing::ports::StaffingRepository;
use crate::task::domain::{Task, TaskDomainError, TaskId, TaskStatus};
use crate::task::ports::{TaskHistoryRepository, TaskRepository};
use crate::task::services::lifecycle::{snapshot, TaskLifecycleService, TaskServiceError};

/// Setting key naming the dispatch-eligible role.
pub const ELIGIBLE_ROLE_KEY: &str = "dispatch.eligible_role";
/// Setting key bounding concurrent active assignments per porter.
pub const MAX_ACTIVE_TASKS_KEY: &str = "dispatch.max_active_tasks";

/// Dispatch tunables derived from the settings snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchPolicy {
    eligible_role: CapabilityName,
    max_active_tasks: usize,
}

impl DispatchPolicy {
    /// Creates a policy from explicit values.
    #[must_use]
    pub const fn new(eligible_role: CapabilityName, max_active_tasks: usize) -> Self {
        Self {
            eligible_role,
            max_active_tasks,
        }
    }

    /// Derives a policy from a settings snapshot, falling back to the
    /// `porter` role and a limit of one where keys are absent.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryDomainError::SettingTypeMismatch`] when the limit
    /// setting is present but not a positive integer.
    pub fn from_settings(snapshot: &SettingsSnapshot) -> Result<Self, DirectoryDomainError> {
        let eligible_role = match snapshot.get(ELIGIBLE_ROLE_KEY) {
            Some(name) => CapabilityName::new(name)?,
            None => Self::default().eligible_role,
        };
        let max_active_tasks = match snapshot.get_i64(MAX_ACTIVE_TASKS_KEY)? {
            Some(value) => usize::try_from(value).ok().filter(|v| *v >= 1).ok_or(
                DirectoryDomainError::SettingTypeMismatch {
                    key: MAX_ACTIVE_TASKS_KEY.to_owned(),
                    value: value.to_string(),
                    expected: "positive integer",
                },
            )?,
            None => Self::default().max_active_tasks,
        };
        Ok(Self {
            eligible_role,
            max_active_tasks,
        })
    }

    /// Returns the role name a porter must hold to receive work.
    #[must_use]
    pub const fn eligible_role(&self) -> &CapabilityName {
        &self.eligible_role
    }

    /// Returns the concurrent-assignment limit per porter.
    #[must_use]
    pub const fn max_active_tasks(&self) -> usize {
        self.max_active_tasks
    }
}

impl Default for DispatchPolicy {
    fn default() -> Self {
        #[expect(clippy::expect_used, reason = "literal role name is never empty")]
        let eligible_role = CapabilityName::new("porter").expect("valid literal");
        Self {
            eligible_role,
            max_active_tasks: 1,
        }
    }
}

/// A scored dispatch candidate.
#[derive(Debug, Clone)]
struct Candidate {
    user: User,
    active_count: usize,
    shift_start: DateTime<Utc>,
}

/// Resolves porters for Pending tasks and assigns or hands over open ones.
#[derive(Debug)]
pub struct DispatchService<R, D, S, A, C> {
    tasks: Arc<R>,
    directory: Arc<D>,
    roster: Arc<S>,
    audit: Arc<A>,
    clock: Arc<C>,
    lifecycle: Arc<TaskLifecycleService<R, D, S, A, C>>,
    policy: DispatchPolicy,
}

impl<R, D, S, A, C> DispatchService<R, D, S, A, C>
where
    R: TaskRepository + TaskHistoryRepository,
    D: UserDirectory + OrgDirectory,
    S: StaffingRepository,
    A: AuditSink,
    C: Clock,
{
    /// Creates a service over the given ports, sharing the lifecycle commit
    /// path.
    pub fn new(
        tasks: Arc<R>,
        directory: Arc<D>,
        roster: Arc<S>,
        audit: Arc<A>,
        clock: Arc<C>,
        lifecycle: Arc<TaskLifecycleService<R, D, S, A, C>>,
        policy: DispatchPolicy,
    ) -> Self {
        Self {
            tasks,
            directory,
            roster,
            audit,
            clock,
            lifecycle,
            policy,
        }
    }

    /// Picks the best eligible porter for a task, or `None` when the pool
    /// is empty. An empty pool is not an error.
    ///
    /// Eligible means: active account holding the configured role, on duty,
    /// on an active shift, scoped to the task's department (any department
    /// when the task is unscoped), and below the concurrent-assignment
    /// limit. Ties break by fewest active assignments, then earliest shift
    /// start, then lowest user id.
    ///
    /// # Errors
    ///
    /// Returns repository errors.
    pub async fn find_candidate(&self, task: &Task) -> Result<Option<User>, TaskServiceError> {
        let Some(role) = self
            .directory
            .find_role_by_name(self.policy.eligible_role())
            .await?
        else {
            debug!(role = %self.policy.eligible_role(), "eligible role not defined");
            return Ok(None);
        };
        let pool = self
            .directory
            .list_active_users(role.id, task.department)
            .await?;
        let mut candidates = Vec::new();
        for user in pool {
            let Some(candidate) = self.qualify(user, task, role.id).await? else {
                continue;
            };
            candidates.push(candidate);
        }
        candidates.sort_by(|a, b| {
            a.active_count
                .cmp(&b.active_count)
                .then(a.shift_start.cmp(&b.shift_start))
                .then(a.user.id.cmp(&b.user.id))
        });
        let chosen = candidates.into_iter().next().map(|c| c.user);
        match &chosen {
            Some(user) => debug!(task_id = %task.id, user_id = %user.id, "candidate selected"),
            None => debug!(task_id = %task.id, "no eligible candidate"),
        }
        Ok(chosen)
    }

    /// Assigns a porter to a task.
    ///
    /// Eligibility is re-checked first. A Pending task starts: the receiver
    /// write and the transition to InProgress commit together against the
    /// stored Pending status. An InProgress or Waiting task is handed over:
    /// only the receiver changes, through the same conditional write. The
    /// porter's notification is best effort and a failure after commit is
    /// logged, not returned.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::IneligibleAssignee`] when the porter no
    /// longer qualifies, an invalid-transition error when the task is
    /// completed or canceled, and a conflict when it changes concurrently.
    pub async fn assign(&self, task_id: TaskId, user: &User) -> Result<Task, TaskServiceError> {
        let now = self.clock.utc();
        let previous = self.tasks.find_task(task_id).await?;
        let role = self
            .directory
            .find_role_by_name(self.policy.eligible_role())
            .await?;
        let qualified = match role {
            Some(role) => self.qualify(user.clone(), &previous, role.id).await?,
            None => None,
        };
        if qualified.is_none() {
            return Err(TaskServiceError::IneligibleAssignee(user.id));
        }
        let committed = if previous.status == TaskStatus::Pending {
            let mut task = previous.clone();
            task.assign_receiver(user.id);
            task.transition_to(TaskStatus::InProgress, now)?;
            let (task, _) = self
                .lifecycle
                .commit_transition(previous, task, user.id, Some("dispatched".to_owned()), now)
                .await?;
            task
        } else {
            self.reassign(previous, user.id, now).await?
        };
        if let Err(err) = self
            .audit
            .notify(
                user.id,
                Some(committed.id),
                format!(
                    "You have been assigned task {}: {} to {}",
                    committed.id, committed.pickup_location, committed.dropoff_location
                ),
            )
            .await
        {
            warn!(task_id = %committed.id, error = %err, "assignee notification failed after commit");
        }
        info!(task_id = %committed.id, user_id = %user.id, "task assigned");
        Ok(committed)
    }

    /// Hands an open task over to another porter, leaving its status
    /// untouched.
    async fn reassign(
        &self,
        previous: Task,
        user_id: UserId,
        now: DateTime<Utc>,
    ) -> Result<Task, TaskServiceError> {
        if previous.status.is_terminal() {
            return Err(TaskDomainError::InvalidStatusTransition {
                task_id: previous.id,
                from: previous.status,
                to: TaskStatus::InProgress,
            }
            .into());
        }
        let mut updated = previous.clone();
        updated.assign_receiver(user_id);
        let committed = self
            .tasks
            .update_task_if_current(updated, previous.status, previous.priority, now)
            .await?;
        let entry = AuditEntry::new("task.reassigned", user_id)
            .for_task(committed.id)
            .with_old_values(snapshot(&previous)?)
            .with_new_values(snapshot(&committed)?);
        if let Err(err) = self.audit.record(entry).await {
            self.tasks.update_task(previous, now).await?;
            return Err(TaskServiceError::AuditPersistence(err));
        }
        Ok(committed)
    }

    /// Finds a candidate and assigns in one call. `Ok(None)` when no porter
    /// qualifies.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`Self::assign`].
    pub async fn dispatch(&self, task_id: TaskId) -> Result<Option<User>, TaskServiceError> {
        let task = self.tasks.find_task(task_id).await?;
        let Some(user) = self.find_candidate(&task).await? else {
            return Ok(None);
        };
        self.assign(task_id, &user).await?;
        Ok(Some(user))
    }

    /// Scores one porter against the policy and the task's scoping, or
    /// `None` when ineligible.
    async fn qualify(
        &self,
        user: User,
        task: &Task,
        role_id: RoleId,
    ) -> Result<Option<Candidate>, TaskServiceError> {
        if !user.is_active || user.role_id != Some(role_id) {
            return Ok(None);
        }
        if let Some(department) = task.department
            && user.department_id != Some(department)
        {
            return Ok(None);
        }
        let on_duty = self
            .roster
            .current_availability(user.id)
            .await?
            .is_some_and(|a| a.status == AvailabilityStatus::OnDuty);
        if !on_duty {
            return Ok(None);
        }
        let Some(shift) = self.roster.find_active_shift(user.id).await? else {
            return Ok(None);
        };
        let active_count = self.tasks.list_active_for_receiver(user.id).await?.len();
        if active_count >= self.policy.max_active_tasks() {
            return Ok(None);
        }
        Ok(Some(Candidate {
            user,
            active_count,
            shift_start: shift.shift_start,
        }))
    }
}
