//! Unit tests for lifecycle orchestration: creation, transitions, history
//! rows, priority changes, and appended records.

#![expect(
    clippy::expect_used,
    reason = "test code uses expect for assertion clarity"
)]
#![expect(
    clippy::indexing_slicing,
    reason = "test code indexes after length assertions"
)]

use rstest::rstest;

use super::helpers::{harness, seed_user};
use crate::audit::ports::{AuditLogStore, NotificationStore};
use crate::directory::domain::UserId;
use crate::store::StoreError;
use crate::task::domain::{
    IncidentSeverity, Location, NewTask, Rating, TaskDomainError, TaskPriority, TaskStatus,
};
use crate::task::ports::{TaskHistoryRepository, TaskRepository};
use crate::task::services::TaskServiceError;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn created_task_starts_pending_and_is_audited() {
    let h = harness().await;

    let task = h.create_task().await;

    assert_eq!(task.status, TaskStatus::Pending);
    assert!(task.receiver.is_none());
    assert_eq!(task.submitter, h.submitter.id);

    let logs = h.trail.list_for_task(task.id).await.expect("audit logs");
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].action, "task.created");
    assert!(logs[0].new_values.is_some());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn creation_rejects_unknown_submitter() {
    let h = harness().await;
    let new = NewTask::new(
        UserId::new(9999),
        Location::new("Ward 3").expect("valid location"),
        Location::new("X-ray").expect("valid location"),
    );

    let err = h
        .lifecycle
        .create_task(new)
        .await
        .expect_err("dangling submitter");

    assert!(matches!(
        err,
        TaskServiceError::Repository(StoreError::ReferentialIntegrity { .. })
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn creation_rejects_unknown_department() {
    let h = harness().await;
    let new = NewTask::new(
        h.submitter.id,
        Location::new("Ward 3").expect("valid location"),
        Location::new("X-ray").expect("valid location"),
    )
    .with_department(crate::directory::domain::DepartmentId::new(404));

    let err = h
        .lifecycle
        .create_task(new)
        .await
        .expect_err("dangling department");

    assert!(matches!(
        err,
        TaskServiceError::Repository(StoreError::ReferentialIntegrity { .. })
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn status_change_appends_history_and_notifies_receiver() {
    let h = harness().await;
    let porter = h.seed_porter("porter_a").await;
    let task = h.create_task().await;
    let task = h.start_task(task.id, &porter).await;

    let update = h
        .lifecycle
        .change_status(task.id, TaskStatus::Completed, porter.id, None)
        .await
        .expect("complete task");

    assert_eq!(update.old_status, TaskStatus::InProgress);
    assert_eq!(update.new_status, TaskStatus::Completed);

    let history = h.lifecycle.status_history(task.id).await.expect("history");
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].updated_by, porter.id);

    let stored = h.lifecycle.task(task.id).await.expect("reload");
    assert_eq!(stored.status, TaskStatus::Completed);
    assert!(stored.end_time.is_some());

    let inbox = h.trail.list_unread(porter.id).await.expect("inbox");
    assert!(inbox.iter().any(|n| n.task_id == Some(task.id)));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn illegal_status_change_is_rejected_without_history() {
    let h = harness().await;
    let task = h.create_task().await;

    let err = h
        .lifecycle
        .change_status(task.id, TaskStatus::Completed, h.submitter.id, None)
        .await
        .expect_err("pending cannot complete");

    assert!(matches!(
        err,
        TaskServiceError::Domain(TaskDomainError::InvalidStatusTransition { .. })
    ));
    let history = h.lifecycle.status_history(task.id).await.expect("history");
    assert!(history.is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn conditional_write_rejects_stale_expected_status() {
    let h = harness().await;
    let task = h.create_task().await;

    // A cancellation races ahead of a writer that still believes the task
    // is Pending.
    h.lifecycle
        .change_status(task.id, TaskStatus::Canceled, h.submitter.id, None)
        .await
        .expect("cancel");

    let mut stale = task.clone();
    stale.priority = TaskPriority::Urgent;
    let err = h
        .tasks
        .update_task_if_current(
            stale,
            TaskStatus::Pending,
            TaskPriority::Normal,
            chrono::Utc::now(),
        )
        .await
        .expect_err("stored status moved on");

    assert!(matches!(
        err,
        StoreError::Conflict { entity: "task", field: "status", .. }
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn racing_priority_changes_conflict_instead_of_clobbering() {
    let h = harness().await;
    let task = h.create_task().await;

    // A raise to Urgent lands while another writer still believes the task
    // is Normal.
    h.lifecycle
        .change_priority(task.id, TaskPriority::Urgent, h.submitter.id, None)
        .await
        .expect("first raise");

    let mut stale = task.clone();
    stale.priority = TaskPriority::Emergency;
    let err = h
        .tasks
        .update_task_if_current(
            stale,
            TaskStatus::Pending,
            TaskPriority::Normal,
            chrono::Utc::now(),
        )
        .await
        .expect_err("stored priority moved on");

    assert!(matches!(
        err,
        StoreError::Conflict { entity: "task", field: "priority", .. }
    ));
    // The winning change is intact.
    let stored = h.tasks.find_task(task.id).await.expect("reload");
    assert_eq!(stored.priority, TaskPriority::Urgent);
    let history = h
        .lifecycle
        .priority_history(task.id)
        .await
        .expect("priority history");
    assert_eq!(history.len(), 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn priority_change_records_old_and_new() {
    let h = harness().await;
    let task = h.create_task().await;

    let change = h
        .lifecycle
        .change_priority(task.id, TaskPriority::Urgent, h.submitter.id, None)
        .await
        .expect("raise priority");

    assert_eq!(change.old_priority, TaskPriority::Normal);
    assert_eq!(change.new_priority, TaskPriority::Urgent);

    let history = h
        .lifecycle
        .priority_history(task.id)
        .await
        .expect("priority history");
    assert_eq!(history.len(), 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn emergency_raise_escalates_and_alerts_on_duty_staff() {
    let h = harness().await;
    let porter = h.seed_porter("porter_a").await;
    let off_duty = seed_user(
        &h.directory,
        "porter_b",
        Some(h.porter_role.id),
        Some(h.department.id),
    )
    .await;
    let task = h.create_task().await;

    h.lifecycle
        .change_priority(
            task.id,
            TaskPriority::Emergency,
            h.submitter.id,
            Some("patient deteriorating".to_owned()),
        )
        .await
        .expect("raise to emergency");

    let escalations = h.tasks.list_escalations(task.id).await.expect("escalations");
    assert_eq!(escalations.len(), 1);
    assert_eq!(escalations[0].reason, "patient deteriorating");

    let alerted = h.trail.list_unread(porter.id).await.expect("inbox");
    assert!(alerted.iter().any(|n| n.task_id == Some(task.id)));
    let silent = h.trail.list_unread(off_duty.id).await.expect("inbox");
    assert!(silent.is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn priority_change_on_completed_task_is_rejected() {
    let h = harness().await;
    let porter = h.seed_porter("porter_a").await;
    let task = h.create_task().await;
    h.start_task(task.id, &porter).await;
    h.lifecycle
        .change_status(task.id, TaskStatus::Completed, porter.id, None)
        .await
        .expect("complete");

    let err = h
        .lifecycle
        .change_priority(task.id, TaskPriority::Urgent, h.submitter.id, None)
        .await
        .expect_err("terminal task");

    assert!(matches!(
        err,
        TaskServiceError::Domain(TaskDomainError::TerminalPriorityChange { .. })
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn escalation_and_incident_are_recorded_and_audited() {
    let h = harness().await;
    let task = h.create_task().await;

    let escalation = h
        .lifecycle
        .escalate(task.id, h.submitter.id, "porter unreachable")
        .await
        .expect("escalate");
    assert_eq!(escalation.task_id, task.id);

    let incident = h
        .lifecycle
        .report_incident(
            task.id,
            h.submitter.id,
            "trolley wheel jammed",
            IncidentSeverity::Medium,
        )
        .await
        .expect("report incident");
    assert_eq!(incident.severity, IncidentSeverity::Medium);

    let logs = h.trail.list_for_task(task.id).await.expect("audit logs");
    let actions: Vec<&str> = logs.iter().map(|l| l.action.as_str()).collect();
    assert!(actions.contains(&"task.escalated"));
    assert!(actions.contains(&"task.incident_reported"));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn attachment_and_feedback_append_against_existing_task() {
    let h = harness().await;
    let task = h.create_task().await;

    let attachment = h
        .lifecycle
        .attach_file(
            task.id,
            h.submitter.id,
            "scans/consent.pdf",
            Some(20_480),
            Some("application/pdf".to_owned()),
        )
        .await
        .expect("attach");
    assert_eq!(attachment.file_path, "scans/consent.pdf");

    let feedback = h
        .lifecycle
        .record_feedback(
            task.id,
            h.submitter.id,
            Rating::new(4).expect("valid rating"),
            Some("quick pickup".to_owned()),
        )
        .await
        .expect("feedback");
    assert_eq!(feedback.rating.value(), 4);

    let attachments = h.tasks.list_attachments(task.id).await.expect("attachments");
    assert_eq!(attachments.len(), 1);
    let feedback_rows = h.tasks.list_feedback(task.id).await.expect("feedback rows");
    assert_eq!(feedback_rows.len(), 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn appends_against_missing_task_fail_closed() {
    let h = harness().await;
    let missing = crate::task::domain::TaskId::new(777);

    let err = h
        .lifecycle
        .escalate(missing, h.submitter.id, "nobody came")
        .await
        .expect_err("unknown task");

    assert!(matches!(
        err,
        TaskServiceError::Repository(StoreError::NotFound { .. })
    ));
    let escalations = h.tasks.list_escalations(missing).await.expect("escalations");
    assert!(escalations.is_empty());
}
