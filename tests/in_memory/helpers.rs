//! Shared world state for in-memory integration tests.

use std::sync::Arc;

use mockable::DefaultClock;

use porterflow::audit::adapters::memory::InMemoryAuditTrail;
use porterflow::audit::domain::AuditLog;
use porterflow::audit::services::AuditEmitter;
use porterflow::directory::adapters::memory::InMemoryDirectory;
use porterflow::directory::domain::{Department, Role, User};
use porterflow::directory::services::{
    DirectoryService, RegisterUserRequest, SettingsService,
};
use porterflow::staffing::adapters::memory::InMemoryRoster;
use porterflow::staffing::services::AvailabilityService;
use porterflow::task::adapters::memory::InMemoryTaskStore;
use porterflow::task::domain::{Location, NewTask, Task};
use porterflow::task::services::{DispatchPolicy, DispatchService, TaskLifecycleService};

pub type Emitter =
    AuditEmitter<InMemoryAuditTrail, InMemoryAuditTrail, InMemoryAuditTrail, DefaultClock>;
pub type Lifecycle = TaskLifecycleService<
    InMemoryTaskStore,
    InMemoryDirectory,
    InMemoryRoster,
    Emitter,
    DefaultClock,
>;
pub type Dispatch =
    DispatchService<InMemoryTaskStore, InMemoryDirectory, InMemoryRoster, Emitter, DefaultClock>;
pub type Availability =
    AvailabilityService<InMemoryRoster, InMemoryTaskStore, Emitter, DefaultClock>;
pub type Settings = SettingsService<InMemoryDirectory, DefaultClock>;
pub type Registry = DirectoryService<InMemoryDirectory, DefaultClock>;

/// Asserts a task's audit trail carries exactly the expected actions in
/// order.
///
/// # Errors
///
/// Returns an error naming the first divergence between the trail and the
/// expected action list.
pub fn assert_trail_actions(logs: &[AuditLog], expected: &[&str]) -> Result<(), eyre::Report> {
    eyre::ensure!(
        logs.len() == expected.len(),
        "expected {} audit entries, found {}",
        expected.len(),
        logs.len()
    );
    for (log, action) in logs.iter().zip(expected) {
        eyre::ensure!(
            log.action == *action,
            "expected audit action '{}', found '{}'",
            action,
            log.action
        );
    }
    Ok(())
}

/// The full engine wired over in-memory adapters, with seeded reference data.
pub struct World {
    pub trail: Arc<InMemoryAuditTrail>,
    pub registry: Registry,
    pub emitter: Arc<Emitter>,
    pub lifecycle: Arc<Lifecycle>,
    pub dispatch: Dispatch,
    pub availability: Availability,
    pub porter_role: Role,
    pub department: Department,
    pub clerk: User,
    pub supervisor: User,
}

/// Builds a world with the default dispatch policy.
pub async fn world() -> World {
    world_with_policy(DispatchPolicy::default()).await
}

/// Builds a world with an explicit dispatch policy.
pub async fn world_with_policy(policy: DispatchPolicy) -> World {
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
    let registry = Registry::new(Arc::clone(&directory), Arc::clone(&clock));
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
    let availability = Availability::new(
        Arc::clone(&roster),
        Arc::clone(&tasks),
        Arc::clone(&emitter),
        clock,
    );

    let porter_role = registry
        .define_role("porter", Some("moves patients and items".into()))
        .await
        .expect("seed porter role");
    let staff_role = registry
        .define_role("supervisor", None)
        .await
        .expect("seed supervisor role");
    let department = registry
        .create_department("Radiology", Some("Block C".into()))
        .await
        .expect("seed department");
    let clerk = registry
        .register_user(RegisterUserRequest::new("ward_clerk", "hash"))
        .await
        .expect("seed clerk");
    let supervisor = registry
        .register_user(RegisterUserRequest::new("shift_lead", "hash").with_role(staff_role.id))
        .await
        .expect("seed supervisor");

    World {
        trail,
        registry,
        emitter,
        lifecycle,
        dispatch,
        availability,
        porter_role,
        department,
        clerk,
        supervisor,
    }
}

impl World {
    /// Registers a porter in the seeded department and clocks them in.
    pub async fn staffed_porter(&self, username: &str) -> User {
        let porter = self
            .registry
            .register_user(
                RegisterUserRequest::new(username, "hash")
                    .with_role(self.porter_role.id)
                    .with_department(self.department.id),
            )
            .await
            .expect("register porter");
        self.availability
            .clock_in(porter.id)
            .await
            .expect("clock in");
        porter
    }

    /// Submits a Pending transport request scoped to the seeded department.
    pub async fn submit_task(&self) -> Task {
        let new = NewTask::new(
            self.clerk.id,
            Location::new("Ward 3, bay 2").expect("valid location"),
            Location::new("X-ray reception").expect("valid location"),
        )
        .with_department(self.department.id);
        self.lifecycle
            .create_task(new)
            .await
            .expect("submit task")
    }
}
