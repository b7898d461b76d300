//! Unit tests for the fail-closed audit contract: when the audit append
//! fails, the originating mutation and its history row are rolled back.
//! Notifications sit after the commit point and are best effort.

#![expect(
    clippy::expect_used,
    reason = "test code uses expect for assertion clarity"
)]

use std::io;
use std::sync::Arc;

use chrono::Utc;
use mockable::DefaultClock;
use rstest::rstest;

use super::helpers::seed_user;
use crate::audit::domain::{AuditLog, AuditLogId};
use crate::audit::ports::MockAuditSink;
use crate::directory::adapters::memory::InMemoryDirectory;
use crate::directory::domain::{CapabilityName, User};
use crate::directory::ports::OrgDirectory;
use crate::staffing::adapters::memory::InMemoryRoster;
use crate::staffing::domain::AvailabilityStatus;
use crate::staffing::ports::StaffingRepository;
use crate::store::StoreError;
use crate::task::adapters::memory::InMemoryTaskStore;
use crate::task::domain::{Location, NewTask, Task, TaskPriority, TaskStatus};
use crate::task::ports::{TaskHistoryRepository, TaskRepository};
use crate::task::services::{DispatchPolicy, TaskLifecycleService, TaskServiceError};

type MockLifecycle =
    TaskLifecycleService<InMemoryTaskStore, InMemoryDirectory, InMemoryRoster, MockAuditSink, DefaultClock>;

struct MockHarness {
    tasks: Arc<InMemoryTaskStore>,
    lifecycle: MockLifecycle,
    submitter: User,
}

/// Wires the lifecycle service over a sink whose every append fails.
async fn failing_harness() -> MockHarness {
    let mut audit = MockAuditSink::new();
    audit
        .expect_record()
        .returning(|_| Err(StoreError::persistence(io::Error::other("audit store down"))));
    audit
        .expect_notify()
        .returning(|_, _, _| Err(StoreError::persistence(io::Error::other("audit store down"))));

    let tasks = Arc::new(InMemoryTaskStore::new());
    let directory = Arc::new(InMemoryDirectory::new());
    let submitter = seed_user(&directory, "ward_clerk", None, None).await;
    let lifecycle = MockLifecycle::new(
        Arc::clone(&tasks),
        directory,
        Arc::new(InMemoryRoster::new()),
        Arc::new(audit),
        Arc::new(DefaultClock),
        DispatchPolicy::default(),
    );
    MockHarness {
        tasks,
        lifecycle,
        submitter,
    }
}

/// Seeds a Pending task directly, bypassing the audited creation path.
async fn seeded_task(h: &MockHarness) -> Task {
    let new = NewTask::new(
        h.submitter.id,
        Location::new("Ward 3").expect("valid location"),
        Location::new("X-ray").expect("valid location"),
    );
    h.tasks
        .create_task(new, Utc::now())
        .await
        .expect("seed task")
}

/// Wires the lifecycle service over a sink that records but cannot notify.
async fn notify_failing_harness() -> MockHarness {
    let mut audit = MockAuditSink::new();
    audit.expect_record().returning(|entry| {
        Ok(AuditLog {
            id: AuditLogId::new(1),
            action: entry.action,
            actor: entry.actor,
            task_id: entry.task_id,
            details: entry.details,
            old_values: entry.old_values,
            new_values: entry.new_values,
            correlation_id: entry.correlation_id,
            timestamp: Utc::now(),
        })
    });
    audit
        .expect_notify()
        .returning(|_, _, _| Err(StoreError::persistence(io::Error::other("notifier down"))));

    let tasks = Arc::new(InMemoryTaskStore::new());
    let directory = Arc::new(InMemoryDirectory::new());
    let roster = Arc::new(InMemoryRoster::new());
    let submitter = seed_user(&directory, "ward_clerk", None, None).await;
    // An on-duty porter so an emergency raise actually attempts delivery.
    let role = directory
        .create_role(
            CapabilityName::new("porter").expect("valid role name"),
            None,
            Utc::now(),
        )
        .await
        .expect("seed role");
    let porter = seed_user(&directory, "porter_a", Some(role.id), None).await;
    roster
        .open_shift(porter.id, Utc::now())
        .await
        .expect("open shift");
    roster
        .put_availability(porter.id, AvailabilityStatus::OnDuty, None, Utc::now())
        .await
        .expect("mark on duty");

    let lifecycle = MockLifecycle::new(
        Arc::clone(&tasks),
        directory,
        roster,
        Arc::new(audit),
        Arc::new(DefaultClock),
        DispatchPolicy::default(),
    );
    MockHarness {
        tasks,
        lifecycle,
        submitter,
    }
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unaudited_creation_is_removed() {
    let h = failing_harness().await;
    let new = NewTask::new(
        h.submitter.id,
        Location::new("Ward 3").expect("valid location"),
        Location::new("X-ray").expect("valid location"),
    );

    let err = h
        .lifecycle
        .create_task(new)
        .await
        .expect_err("audit append fails");

    assert!(matches!(err, TaskServiceError::AuditPersistence(_)));
    // The only task the repository ever held was rolled back.
    let pending = h
        .tasks
        .list_by_status(TaskStatus::Pending)
        .await
        .expect("list");
    assert!(pending.is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unaudited_transition_is_rolled_back() {
    let h = failing_harness().await;
    let task = seeded_task(&h).await;

    let err = h
        .lifecycle
        .change_status(task.id, TaskStatus::Canceled, h.submitter.id, None)
        .await
        .expect_err("audit append fails");

    assert!(matches!(err, TaskServiceError::AuditPersistence(_)));
    let stored = h.tasks.find_task(task.id).await.expect("reload");
    assert_eq!(stored.status, TaskStatus::Pending);
    assert!(stored.end_time.is_none());
    let history = h
        .tasks
        .list_status_updates(task.id)
        .await
        .expect("history");
    assert!(history.is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unaudited_priority_change_is_rolled_back() {
    let h = failing_harness().await;
    let task = seeded_task(&h).await;

    let err = h
        .lifecycle
        .change_priority(task.id, TaskPriority::Urgent, h.submitter.id, None)
        .await
        .expect_err("audit append fails");

    assert!(matches!(err, TaskServiceError::AuditPersistence(_)));
    let stored = h.tasks.find_task(task.id).await.expect("reload");
    assert_eq!(stored.priority, TaskPriority::Normal);
    let history = h
        .tasks
        .list_priority_changes(task.id)
        .await
        .expect("history");
    assert!(history.is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unaudited_escalation_is_removed() {
    let h = failing_harness().await;
    let task = seeded_task(&h).await;

    let err = h
        .lifecycle
        .escalate(task.id, h.submitter.id, "porter unreachable")
        .await
        .expect_err("audit append fails");

    assert!(matches!(err, TaskServiceError::AuditPersistence(_)));
    let escalations = h
        .tasks
        .list_escalations(task.id)
        .await
        .expect("escalations");
    assert!(escalations.is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn committed_transition_survives_failed_notification() {
    let h = notify_failing_harness().await;
    let task = seeded_task(&h).await;
    let mut assigned = task.clone();
    assigned.assign_receiver(h.submitter.id);
    h.tasks
        .update_task(assigned, Utc::now())
        .await
        .expect("assign receiver");

    let update = h
        .lifecycle
        .change_status(task.id, TaskStatus::InProgress, h.submitter.id, None)
        .await
        .expect("transition commits despite the dead notifier");

    assert_eq!(update.new_status, TaskStatus::InProgress);
    let stored = h.tasks.find_task(task.id).await.expect("reload");
    assert_eq!(stored.status, TaskStatus::InProgress);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn committed_emergency_raise_survives_failed_alerts() {
    let h = notify_failing_harness().await;
    let task = seeded_task(&h).await;

    let change = h
        .lifecycle
        .change_priority(task.id, TaskPriority::Emergency, h.submitter.id, None)
        .await
        .expect("raise commits despite the dead notifier");

    assert_eq!(change.new_priority, TaskPriority::Emergency);
    let stored = h.tasks.find_task(task.id).await.expect("reload");
    assert_eq!(stored.priority, TaskPriority::Emergency);
    let escalations = h
        .tasks
        .list_escalations(task.id)
        .await
        .expect("escalations");
    assert_eq!(escalations.len(), 1);
}
