//! Unit tests for the audit and notification emitter.

#![expect(
    clippy::expect_used,
    reason = "test code uses expect for assertion clarity"
)]
#![expect(
    clippy::indexing_slicing,
    reason = "test code indexes after length assertions"
)]

use std::sync::Arc;

use mockable::DefaultClock;
use rstest::rstest;
use serde_json::json;

use crate::audit::adapters::memory::InMemoryAuditTrail;
use crate::audit::domain::{AuditEntry, MessageId, NewMessage, NotificationId};
use crate::audit::ports::{AuditLogStore, AuditSink, MessageStore};
use crate::audit::services::AuditEmitter;
use crate::directory::domain::UserId;
use crate::store::StoreError;
use crate::task::domain::TaskId;

type Emitter =
    AuditEmitter<InMemoryAuditTrail, InMemoryAuditTrail, InMemoryAuditTrail, DefaultClock>;

const ACTOR: UserId = UserId::new(3);
const RECIPIENT: UserId = UserId::new(8);

fn emitter() -> (Emitter, Arc<InMemoryAuditTrail>) {
    let trail = Arc::new(InMemoryAuditTrail::new());
    let emitter = Emitter::new(
        Arc::clone(&trail),
        Arc::clone(&trail),
        Arc::clone(&trail),
        Arc::new(DefaultClock),
    );
    (emitter, trail)
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn recorded_entry_is_listed_by_task_and_actor() {
    let (emitter, trail) = emitter();
    let task_id = TaskId::new(12);

    let log = emitter
        .record(
            AuditEntry::new("task.status_changed", ACTOR)
                .for_task(task_id)
                .with_old_values(json!({"status": "pending"}))
                .with_new_values(json!({"status": "in_progress"})),
        )
        .await
        .expect("record");

    assert_eq!(log.action, "task.status_changed");
    assert_eq!(log.actor, ACTOR);
    assert_eq!(log.task_id, Some(task_id));
    assert_eq!(log.old_values, Some(json!({"status": "pending"})));
    assert_eq!(log.new_values, Some(json!({"status": "in_progress"})));

    let by_task = trail.list_for_task(task_id).await.expect("list by task");
    assert_eq!(by_task, vec![log.clone()]);
    let by_actor = trail.list_for_actor(ACTOR).await.expect("list by actor");
    assert_eq!(by_actor, vec![log]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn entries_are_listed_oldest_first() {
    let (emitter, trail) = emitter();
    let task_id = TaskId::new(5);

    for action in ["task.created", "task.assigned", "task.status_changed"] {
        emitter
            .record(AuditEntry::new(action, ACTOR).for_task(task_id))
            .await
            .expect("record");
    }

    let logs = trail.list_for_task(task_id).await.expect("list");
    let actions: Vec<&str> = logs.iter().map(|l| l.action.as_str()).collect();
    assert_eq!(
        actions,
        vec!["task.created", "task.assigned", "task.status_changed"]
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn notification_starts_unread_and_can_be_marked_read() {
    let (emitter, _trail) = emitter();

    let sent = emitter
        .notify(RECIPIENT, Some(TaskId::new(4)), "New task assigned".into())
        .await
        .expect("notify");
    assert!(!sent.is_read);

    let unread = emitter
        .unread_notifications(RECIPIENT)
        .await
        .expect("unread");
    assert_eq!(unread.len(), 1);
    assert_eq!(unread[0].id, sent.id);

    let read = emitter
        .mark_notification_read(sent.id)
        .await
        .expect("mark read");
    assert!(read.is_read);
    assert!(emitter
        .unread_notifications(RECIPIENT)
        .await
        .expect("unread")
        .is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn notifications_are_scoped_to_their_recipient() {
    let (emitter, _trail) = emitter();

    emitter
        .notify(RECIPIENT, None, "for the porter".into())
        .await
        .expect("notify");
    emitter
        .notify(ACTOR, None, "for the supervisor".into())
        .await
        .expect("notify");

    let unread = emitter
        .unread_notifications(RECIPIENT)
        .await
        .expect("unread");
    assert_eq!(unread.len(), 1);
    assert_eq!(unread[0].message, "for the porter");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn marking_missing_notification_is_not_found() {
    let (emitter, _trail) = emitter();

    let err = emitter
        .mark_notification_read(NotificationId::new(99))
        .await
        .expect_err("absent id");

    assert!(matches!(
        err,
        StoreError::NotFound {
            entity: "notification",
            id: 99
        }
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn message_round_trip_with_attachment() {
    let (emitter, trail) = emitter();

    let sent = emitter
        .send_message(
            NewMessage::new(ACTOR, RECIPIENT, "Bed 4 transfer ready")
                .for_task(TaskId::new(7))
                .with_attachment("uploads/handover.pdf"),
        )
        .await
        .expect("send");
    assert!(!sent.is_read);
    assert_eq!(sent.attachment_path.as_deref(), Some("uploads/handover.pdf"));

    let inbox = trail.list_received(RECIPIENT).await.expect("inbox");
    assert_eq!(inbox.len(), 1);
    assert_eq!(inbox[0].body, "Bed 4 transfer ready");
    assert_eq!(inbox[0].sender_id, ACTOR);

    let read = emitter.mark_message_read(sent.id).await.expect("mark read");
    assert!(read.is_read);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn marking_missing_message_is_not_found() {
    let (emitter, _trail) = emitter();

    let err = emitter
        .mark_message_read(MessageId::new(17))
        .await
        .expect_err("absent id");

    assert!(matches!(
        err,
        StoreError::NotFound {
            entity: "message",
            id: 17
        }
    ));
}
