//! Port contracts for audit, notification, and message persistence.

use crate::audit::domain::{AuditEntry, AuditLog, Message, MessageId, NewMessage, Notification, NotificationId};
use crate::directory::domain::UserId;
use crate::store::StoreResult;
use crate::task::domain::TaskId;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Persistence contract for append-only audit log entries.
#[async_trait]
pub trait AuditLogStore: Send + Sync {
    /// Appends an entry. Failures propagate to the caller; they are never
    /// swallowed.
    async fn append(&self, entry: AuditEntry, now: DateTime<Utc>) -> StoreResult<AuditLog>;

    /// Lists entries recorded against a task, oldest first.
    async fn list_for_task(&self, task_id: TaskId) -> StoreResult<Vec<AuditLog>>;

    /// Lists entries recorded by an actor, oldest first.
    async fn list_for_actor(&self, actor: UserId) -> StoreResult<Vec<AuditLog>>;
}

/// Persistence contract for notifications.
#[async_trait]
pub trait NotificationStore: Send + Sync {
    /// Appends an unread notification.
    async fn append(
        &self,
        user_id: UserId,
        task_id: Option<TaskId>,
        message: String,
        now: DateTime<Utc>,
    ) -> StoreResult<Notification>;

    /// Marks a notification read.
    ///
    /// # Errors
    ///
    /// Returns a not-found error when the notification does not exist.
    async fn mark_read(&self, id: NotificationId) -> StoreResult<Notification>;

    /// Lists unread notifications for a user, oldest first.
    async fn list_unread(&self, user_id: UserId) -> StoreResult<Vec<Notification>>;
}

/// Persistence contract for user-to-user messages.
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Appends an unread message.
    async fn append(&self, new: NewMessage, now: DateTime<Utc>) -> StoreResult<Message>;

    /// Marks a message read.
    ///
    /// # Errors
    ///
    /// Returns a not-found error when the message does not exist.
    async fn mark_read(&self, id: MessageId) -> StoreResult<Message>;

    /// Lists messages received by a user, oldest first.
    async fn list_received(&self, user_id: UserId) -> StoreResult<Vec<Message>>;
}

/// Combined audit-and-notify facade consumed by the other contexts.
///
/// Lifecycle, dispatch, and staffing services depend on this trait rather
/// than the individual stores so the fail-closed audit contract has a single
/// choke point (and a single mock in tests).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuditSink: Send + Sync {
    /// Records one audit entry for a successful mutating operation.
    ///
    /// A failure here must abort the originating operation: callers roll
    /// back their mutation and surface the error.
    async fn record(&self, entry: AuditEntry) -> StoreResult<AuditLog>;

    /// Delivers a notification to a user.
    async fn notify(
        &self,
        user_id: UserId,
        task_id: Option<TaskId>,
        message: String,
    ) -> StoreResult<Notification>;
}
