//! End-to-end flow: submission, dispatch, transport, completion.

use porterflow::audit::ports::AuditLogStore;
use porterflow::task::domain::{TaskDomainError, TaskPriority, TaskStatus};
use porterflow::task::services::TaskServiceError;
use rstest::rstest;

use super::helpers::{assert_trail_actions, world};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn task_travels_from_submission_to_completion() {
    let w = world().await;
    let porter = w.staffed_porter("p.jones").await;
    let task = w.submit_task().await;
    assert_eq!(task.status, TaskStatus::Pending);

    let chosen = w
        .dispatch
        .dispatch(task.id)
        .await
        .expect("dispatch")
        .expect("candidate found");
    assert_eq!(chosen.id, porter.id);

    let started = w.lifecycle.task(task.id).await.expect("reload");
    assert_eq!(started.status, TaskStatus::InProgress);
    assert_eq!(started.receiver, Some(porter.id));
    assert!(started.start_time.is_some());

    w.lifecycle
        .change_status(
            task.id,
            TaskStatus::Completed,
            porter.id,
            Some("delivered to reception".into()),
        )
        .await
        .expect("complete");

    let completed = w.lifecycle.task(task.id).await.expect("reload");
    assert_eq!(completed.status, TaskStatus::Completed);
    assert!(completed.end_time.is_some());
    assert!(completed.actual_duration.is_some());

    let history = w
        .lifecycle
        .status_history(task.id)
        .await
        .expect("history");
    let edges: Vec<(TaskStatus, TaskStatus)> = history
        .iter()
        .map(|u| (u.old_status, u.new_status))
        .collect();
    assert_eq!(
        edges,
        vec![
            (TaskStatus::Pending, TaskStatus::InProgress),
            (TaskStatus::InProgress, TaskStatus::Completed),
        ]
    );

    let trail = w.trail.list_for_task(task.id).await.expect("audit trail");
    assert_trail_actions(
        &trail,
        &["task.created", "task.status_changed", "task.status_changed"],
    )
    .expect("complete audit trail");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn porter_is_notified_of_assignment() {
    let w = world().await;
    let porter = w.staffed_porter("p.jones").await;
    let task = w.submit_task().await;

    w.dispatch.dispatch(task.id).await.expect("dispatch");

    let inbox = w
        .emitter
        .unread_notifications(porter.id)
        .await
        .expect("inbox");
    assert_eq!(inbox.len(), 1);
    assert!(inbox[0].message.contains("assigned"));
    assert_eq!(inbox[0].task_id, Some(task.id));

    let read = w
        .emitter
        .mark_notification_read(inbox[0].id)
        .await
        .expect("mark read");
    assert!(read.is_read);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn canceled_task_is_withheld_from_dispatch() {
    let w = world().await;
    w.staffed_porter("p.jones").await;
    let task = w.submit_task().await;

    w.lifecycle
        .change_status(
            task.id,
            TaskStatus::Canceled,
            w.clerk.id,
            Some("duplicate request".into()),
        )
        .await
        .expect("cancel");

    let err = w.dispatch.dispatch(task.id).await.expect_err("terminal");
    assert!(matches!(
        err,
        TaskServiceError::Domain(TaskDomainError::InvalidStatusTransition { .. })
    ));
    let stored = w.lifecycle.task(task.id).await.expect("reload");
    assert_eq!(stored.status, TaskStatus::Canceled);
    assert_eq!(stored.receiver, None);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn emergency_raise_alerts_the_staffed_porter() {
    let w = world().await;
    let porter = w.staffed_porter("p.jones").await;
    let task = w.submit_task().await;

    w.lifecycle
        .change_priority(
            task.id,
            TaskPriority::Emergency,
            w.supervisor.id,
            Some("patient deteriorating".into()),
        )
        .await
        .expect("raise");

    let inbox = w
        .emitter
        .unread_notifications(porter.id)
        .await
        .expect("inbox");
    assert!(inbox.iter().any(|n| n.task_id == Some(task.id)));

    let changes = w
        .lifecycle
        .priority_history(task.id)
        .await
        .expect("priority history");
    assert_eq!(changes.len(), 1);
    assert_eq!(changes[0].old_priority, TaskPriority::Normal);
    assert_eq!(changes[0].new_priority, TaskPriority::Emergency);
}
