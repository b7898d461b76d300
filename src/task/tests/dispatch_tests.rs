//! Unit tests for dispatch candidate selection and assignment.

#![expect(
    clippy::expect_used,
    reason = "test code uses expect for assertion clarity"
)]
#![expect(
    clippy::indexing_slicing,
    reason = "test code indexes after length assertions"
)]

use chrono::{Duration, Utc};
use rstest::rstest;

use super::helpers::{harness, harness_with_policy, seed_user, Harness};
use crate::audit::ports::NotificationStore;
use crate::directory::domain::{CapabilityName, User};
use crate::directory::ports::OrgDirectory;
use crate::staffing::domain::AvailabilityStatus;
use crate::staffing::ports::StaffingRepository;
use crate::task::domain::{TaskDomainError, TaskStatus};
use crate::task::services::{DispatchPolicy, TaskServiceError};

/// Seeds a porter who holds the role and department but has no shift yet.
async fn seed_unstaffed_porter(h: &Harness, username: &str) -> User {
    seed_user(
        &h.directory,
        username,
        Some(h.porter_role.id),
        Some(h.department.id),
    )
    .await
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn empty_pool_yields_no_candidate() {
    let h = harness().await;
    let task = h.create_task().await;

    let chosen = h.dispatch.dispatch(task.id).await.expect("dispatch");

    assert!(chosen.is_none());
    let stored = h.lifecycle.task(task.id).await.expect("reload");
    assert_eq!(stored.status, TaskStatus::Pending);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn off_duty_and_on_break_porters_are_skipped() {
    let h = harness().await;
    seed_unstaffed_porter(&h, "porter_off").await;
    let on_break = h.seed_porter("porter_break").await;
    h.roster
        .put_availability(on_break.id, AvailabilityStatus::OnBreak, None, Utc::now())
        .await
        .expect("move on break");
    let task = h.create_task().await;

    let chosen = h
        .dispatch
        .find_candidate(&task)
        .await
        .expect("find candidate");

    assert!(chosen.is_none());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn department_scoping_excludes_other_departments() {
    let h = harness().await;
    let other_department = h
        .directory
        .create_department("Pharmacy".to_owned(), None, Utc::now())
        .await
        .expect("seed department");
    let outsider = seed_user(
        &h.directory,
        "porter_pharmacy",
        Some(h.porter_role.id),
        Some(other_department.id),
    )
    .await;
    h.roster
        .open_shift(outsider.id, Utc::now())
        .await
        .expect("open shift");
    h.roster
        .put_availability(outsider.id, AvailabilityStatus::OnDuty, None, Utc::now())
        .await
        .expect("mark on duty");
    let task = h.create_task().await;

    let chosen = h
        .dispatch
        .find_candidate(&task)
        .await
        .expect("find candidate");

    assert!(chosen.is_none());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn porter_at_assignment_limit_is_skipped() {
    let h = harness().await;
    let porter = h.seed_porter("porter_a").await;
    let busy_with = h.create_task().await;
    h.start_task(busy_with.id, &porter).await;
    let task = h.create_task().await;

    let chosen = h
        .dispatch
        .find_candidate(&task)
        .await
        .expect("find candidate");

    assert!(chosen.is_none());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn ties_break_by_fewest_active_assignments() {
    let policy = DispatchPolicy::new(
        CapabilityName::new("porter").expect("valid role name"),
        2,
    );
    let h = harness_with_policy(policy).await;
    let busy = h.seed_porter("porter_busy").await;
    let idle = h.seed_porter("porter_idle").await;
    let busy_with = h.create_task().await;
    h.start_task(busy_with.id, &busy).await;
    let task = h.create_task().await;

    let chosen = h
        .dispatch
        .find_candidate(&task)
        .await
        .expect("find candidate")
        .expect("candidate exists");

    assert_eq!(chosen.id, idle.id);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn ties_break_by_earliest_shift_start() {
    let h = harness().await;
    let early = seed_unstaffed_porter(&h, "porter_early").await;
    let late = seed_unstaffed_porter(&h, "porter_late").await;
    let now = Utc::now();
    h.roster
        .open_shift(late.id, now)
        .await
        .expect("open late shift");
    h.roster
        .open_shift(early.id, now - Duration::hours(2))
        .await
        .expect("open early shift");
    for porter in [&early, &late] {
        h.roster
            .put_availability(porter.id, AvailabilityStatus::OnDuty, None, now)
            .await
            .expect("mark on duty");
    }
    let task = h.create_task().await;

    let chosen = h
        .dispatch
        .find_candidate(&task)
        .await
        .expect("find candidate")
        .expect("candidate exists");

    assert_eq!(chosen.id, early.id);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn equal_shift_starts_fall_back_to_lowest_user_id() {
    let h = harness().await;
    let first = seed_unstaffed_porter(&h, "porter_first").await;
    let second = seed_unstaffed_porter(&h, "porter_second").await;
    let now = Utc::now();
    for porter in [&first, &second] {
        h.roster
            .open_shift(porter.id, now)
            .await
            .expect("open shift");
        h.roster
            .put_availability(porter.id, AvailabilityStatus::OnDuty, None, now)
            .await
            .expect("mark on duty");
    }
    let task = h.create_task().await;

    let chosen = h
        .dispatch
        .find_candidate(&task)
        .await
        .expect("find candidate")
        .expect("candidate exists");

    assert_eq!(chosen.id, first.id);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn dispatch_assigns_starts_and_notifies() {
    let h = harness().await;
    let porter = h.seed_porter("porter_a").await;
    let task = h.create_task().await;

    let chosen = h
        .dispatch
        .dispatch(task.id)
        .await
        .expect("dispatch")
        .expect("porter assigned");
    assert_eq!(chosen.id, porter.id);

    let stored = h.lifecycle.task(task.id).await.expect("reload");
    assert_eq!(stored.status, TaskStatus::InProgress);
    assert_eq!(stored.receiver, Some(porter.id));
    assert!(stored.start_time.is_some());

    let history = h.lifecycle.status_history(task.id).await.expect("history");
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].comment.as_deref(), Some("dispatched"));

    let inbox = h.trail.list_unread(porter.id).await.expect("inbox");
    assert!(inbox.iter().any(|n| n.task_id == Some(task.id)));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn explicit_assignment_rechecks_eligibility() {
    let h = harness().await;
    let civilian = seed_user(&h.directory, "ward_sister", None, None).await;
    let task = h.create_task().await;

    let err = h
        .dispatch
        .assign(task.id, &civilian)
        .await
        .expect_err("not a porter");

    assert!(matches!(err, TaskServiceError::IneligibleAssignee(id) if id == civilian.id));
    let stored = h.lifecycle.task(task.id).await.expect("reload");
    assert_eq!(stored.status, TaskStatus::Pending);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn canceled_task_is_never_assigned() {
    let h = harness().await;
    let porter = h.seed_porter("porter_a").await;
    let task = h.create_task().await;
    h.lifecycle
        .change_status(task.id, TaskStatus::Canceled, h.submitter.id, None)
        .await
        .expect("cancel");

    let err = h
        .dispatch
        .assign(task.id, &porter)
        .await
        .expect_err("terminal task");

    assert!(matches!(
        err,
        TaskServiceError::Domain(TaskDomainError::InvalidStatusTransition { .. })
    ));
    let stored = h.lifecycle.task(task.id).await.expect("reload");
    assert!(stored.receiver.is_none());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn in_progress_task_is_handed_over_without_restart() {
    let h = harness().await;
    let porter_a = h.seed_porter("porter_a").await;
    let porter_b = h.seed_porter("porter_b").await;
    let task = h.create_task().await;
    let started = h.dispatch.assign(task.id, &porter_a).await.expect("start");
    assert_eq!(started.status, TaskStatus::InProgress);

    let handed = h
        .dispatch
        .assign(task.id, &porter_b)
        .await
        .expect("handover");

    assert_eq!(handed.receiver, Some(porter_b.id));
    assert_eq!(handed.status, TaskStatus::InProgress);
    assert_eq!(handed.start_time, started.start_time);
    // Only the original start left a status edge.
    let history = h
        .lifecycle
        .status_history(task.id)
        .await
        .expect("history");
    assert_eq!(history.len(), 1);
    let inbox = h.trail.list_unread(porter_b.id).await.expect("inbox");
    assert!(inbox.iter().any(|n| n.task_id == Some(task.id)));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn waiting_task_is_handed_over_in_place() {
    let h = harness().await;
    let porter_a = h.seed_porter("porter_a").await;
    let porter_b = h.seed_porter("porter_b").await;
    let task = h.create_task().await;
    h.dispatch.assign(task.id, &porter_a).await.expect("start");
    h.lifecycle
        .change_status(task.id, TaskStatus::Waiting, porter_a.id, None)
        .await
        .expect("pause");

    let handed = h
        .dispatch
        .assign(task.id, &porter_b)
        .await
        .expect("handover");

    assert_eq!(handed.receiver, Some(porter_b.id));
    assert_eq!(handed.status, TaskStatus::Waiting);
}

#[rstest]
fn policy_defaults_and_settings_overrides() {
    use crate::directory::domain::{SettingsSnapshot, SystemSetting, SettingKey};
    use crate::task::services::dispatch::{ELIGIBLE_ROLE_KEY, MAX_ACTIVE_TASKS_KEY};

    let policy = DispatchPolicy::default();
    assert_eq!(policy.eligible_role().as_str(), "porter");
    assert_eq!(policy.max_active_tasks(), 1);

    let now = Utc::now();
    let settings = vec![
        SystemSetting {
            id: crate::directory::domain::SettingId::new(1),
            key: SettingKey::new(ELIGIBLE_ROLE_KEY).expect("valid key"),
            value: "courier".to_owned(),
            data_type: None,
            updated_at: now,
        },
        SystemSetting {
            id: crate::directory::domain::SettingId::new(2),
            key: SettingKey::new(MAX_ACTIVE_TASKS_KEY).expect("valid key"),
            value: "3".to_owned(),
            data_type: None,
            updated_at: now,
        },
    ];
    let snapshot = SettingsSnapshot::from_settings(&settings);
    let derived = DispatchPolicy::from_settings(&snapshot).expect("valid settings");
    assert_eq!(derived.eligible_role().as_str(), "courier");
    assert_eq!(derived.max_active_tasks(), 3);
}

#[rstest]
#[case("0")]
#[case("-2")]
fn policy_rejects_non_positive_limit(#[case] raw: &str) {
    use crate::directory::domain::{SettingsSnapshot, SystemSetting, SettingKey};
    use crate::task::services::dispatch::MAX_ACTIVE_TASKS_KEY;

    let settings = vec![SystemSetting {
        id: crate::directory::domain::SettingId::new(1),
        key: SettingKey::new(MAX_ACTIVE_TASKS_KEY).expect("valid key"),
        value: raw.to_owned(),
        data_type: None,
        updated_at: Utc::now(),
    }];
    let snapshot = SettingsSnapshot::from_settings(&settings);

    assert!(DispatchPolicy::from_settings(&snapshot).is_err());
}
