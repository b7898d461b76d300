//! Shared harness for task service tests.

#![expect(
    clippy::expect_used,
    reason = "test setup uses expect for assertion clarity"
)]

use std::sync::Arc;

use chrono::Utc;
use mockable::DefaultClock;

use crate::audit::adapters::memory::InMemoryAuditTrail;
use crate::audit::services::AuditEmitter;
use crate::directory::adapters::memory::InMemoryDirectory;
use crate::directory::domain::{Department, NewUser, Role, User, Username};
use crate::directory::ports::{OrgDirectory, UserDirectory};
use crate::staffing::adapters::memory::InMemoryRoster;
use crate::staffing::domain::AvailabilityStatus;
use crate::staffing::ports::{ShiftOpening, StaffingRepository};
use crate::task::adapters::memory::InMemoryTaskStore;
use crate::task::domain::{Location, NewTask, Task, TaskId, TaskPriority, TaskStatus};
use crate::task::ports::TaskRepository;
use crate::task::services::{DispatchPolicy, DispatchService, TaskLifecycleService};

pub type Emitter =
    AuditEmitter<InMemoryAuditTrail, InMemoryAuditTrail, InMemoryAuditTrail, DefaultClock>;
pub type Lifecycle =
    TaskLifecycleService<InMemoryTaskStore, InMemoryDirectory, InMemoryRoster, Emitter, DefaultClock>;
pub type Dispatch =
    DispatchService<InMemoryTaskStore, InMemoryDirectory, InMemoryRoster, Emitter, DefaultClock>;

/// Fully wired in-memory service stack with one seeded requester.
pub struct Harness {
    pub tasks: Arc<InMemoryTaskStore>,
    pub directory: Arc<InMemoryDirectory>,
    pub roster: Arc<InMemoryRoster>,
    pub trail: Arc<InMemoryAuditTrail>,
    pub lifecycle: Arc<Lifecycle>,
    pub dispatch: Dispatch,
    pub submitter: User,
    pub porter_role: Role,
    pub department: Department,
}

pub async fn harness() -> Harness {
    harness_with_policy(DispatchPolicy::default()).await
}

pub async fn harness_with_policy(policy: DispatchPolicy) -> Harness {
    let tasks = Arc::new(InMemoryTaskStore::new());
    let directory = Arc::new(InMemoryDirectory::new());
    let roster = Arc::new(InMemoryRoster::new());
    let trail = Arc::new(InMemoryAuditTrail::new());
    let clock = Arc::new(DefaultClock);
    let emitter = Arc::new(Emitter::new(
        Arc::clone(&trail),
        Arc::clone(&trail),
        Arc::clone(&trail),
        Arc::clone(&clock),
    ));
    let lifecycle = Arc::new(Lifecycle::new(
        Arc::clone(&tasks),
        Arc::clone(&directory),
        Arc::clone(&roster),
        Arc::clone(&emitter),
        Arc::clone(&clock),
        policy.clone(),
    ));
    let dispatch = Dispatch::new(
        Arc::clone(&tasks),
        Arc::clone(&directory),
        Arc::clone(&roster),
        Arc::clone(&emitter),
        Arc::clone(&clock),
        Arc::clone(&lifecycle),
        policy,
    );

    let now = Utc::now();
    let porter_role = directory
        .create_role(
            crate::directory::domain::CapabilityName::new("porter").expect("valid role name"),
            None,
            now,
        )
        .await
        .expect("seed role");
    let department = directory
        .create_department("Radiology".to_owned(), None, now)
        .await
        .expect("seed department");
    let submitter = seed_user(&directory, "ward_clerk", None, None).await;

    Harness {
        tasks,
        directory,
        roster,
        trail,
        lifecycle,
        dispatch,
        submitter,
        porter_role,
        department,
    }
}

/// Registers an active user directly through the repository.
pub async fn seed_user(
    directory: &InMemoryDirectory,
    username: &str,
    role_id: Option<crate::directory::domain::RoleId>,
    department_id: Option<crate::directory::domain::DepartmentId>,
) -> User {
    directory
        .create_user(
            NewUser {
                username: Username::new(username).expect("valid username"),
                credential_hash: "hash".to_owned(),
                role_id,
                department_id,
                email: None,
                phone: None,
            },
            Utc::now(),
        )
        .await
        .expect("seed user")
}

impl Harness {
    /// Seeds an on-shift, on-duty porter in the harness department.
    pub async fn seed_porter(&self, username: &str) -> User {
        let porter = seed_user(
            &self.directory,
            username,
            Some(self.porter_role.id),
            Some(self.department.id),
        )
        .await;
        let opening = self
            .roster
            .open_shift(porter.id, Utc::now())
            .await
            .expect("open shift");
        assert!(matches!(opening, ShiftOpening::Opened(_)));
        self.roster
            .put_availability(porter.id, AvailabilityStatus::OnDuty, None, Utc::now())
            .await
            .expect("mark on duty");
        porter
    }

    /// Creates a Pending task scoped to the harness department.
    pub async fn create_task(&self) -> Task {
        let new = NewTask::new(
            self.submitter.id,
            Location::new("Ward 3").expect("valid location"),
            Location::new("X-ray").expect("valid location"),
        )
        .with_department(self.department.id);
        self.lifecycle.create_task(new).await.expect("create task")
    }

    /// Drives a task to InProgress for the given porter, bypassing dispatch.
    pub async fn start_task(&self, task_id: TaskId, porter: &User) -> Task {
        let now = Utc::now();
        let mut task = self.tasks.find_task(task_id).await.expect("find task");
        task.assign_receiver(porter.id);
        task.transition_to(TaskStatus::InProgress, now)
            .expect("legal transition");
        self.tasks
            .update_task(task, now)
            .await
            .expect("store transition")
    }
}

/// Builds a detached task record for pure state-machine tests.
pub fn task_with_status(status: TaskStatus) -> Task {
    let now = Utc::now();
    Task {
        id: TaskId::new(1),
        submitter: crate::directory::domain::UserId::new(10),
        receiver: None,
        pickup_location: Location::new("Ward 3").expect("valid location"),
        dropoff_location: Location::new("X-ray").expect("valid location"),
        priority: TaskPriority::Normal,
        status,
        patient_details: None,
        item_details: None,
        additional_instructions: None,
        job_type: None,
        department: None,
        ward: None,
        estimated_duration: None,
        actual_duration: None,
        start_time: None,
        end_time: None,
        created_at: now,
        updated_at: now,
    }
}
