//! The audit and notification emitter.

use crate::audit::domain::{AuditEntry, AuditLog, Message, MessageId, NewMessage, Notification, NotificationId};
use crate::audit::ports::{AuditLogStore, AuditSink, MessageStore, NotificationStore};
use crate::directory::domain::UserId;
use crate::store::StoreResult;
use crate::task::domain::TaskId;
use async_trait::async_trait;
use mockable::Clock;
use std::sync::Arc;

/// Records audit entries and delivers notifications and messages.
///
/// This is the only writer to the audit stores; every mutating operation in
/// the engine funnels through it. Store failures propagate unchanged so
/// callers can roll back (fail-closed audit trail).
#[derive(Clone)]
pub struct AuditEmitter<L, N, M, C>
where
    L: AuditLogStore,
    N: NotificationStore,
    M: MessageStore,
    C: Clock + Send + Sync,
{
    logs: Arc<L>,
    notifications: Arc<N>,
    messages: Arc<M>,
    clock: Arc<C>,
}

impl<L, N, M, C> AuditEmitter<L, N, M, C>
where
    L: AuditLogStore,
    N: NotificationStore,
    M: MessageStore,
    C: Clock + Send + Sync,
{
    /// Creates a new emitter.
    #[must_use]
    pub const fn new(logs: Arc<L>, notifications: Arc<N>, messages: Arc<M>, clock: Arc<C>) -> Self {
        Self {
            logs,
            notifications,
            messages,
            clock,
        }
    }

    /// Sends a direct message between users.
    ///
    /// # Errors
    ///
    /// Propagates the store failure when the append is rejected.
    pub async fn send_message(&self, new: NewMessage) -> StoreResult<Message> {
        self.messages.append(new, self.clock.utc()).await
    }

    /// Marks a message read.
    ///
    /// # Errors
    ///
    /// Returns a not-found error when the message does not exist.
    pub async fn mark_message_read(&self, id: MessageId) -> StoreResult<Message> {
        self.messages.mark_read(id).await
    }

    /// Marks a notification read.
    ///
    /// # Errors
    ///
    /// Returns a not-found error when the notification does not exist.
    pub async fn mark_notification_read(&self, id: NotificationId) -> StoreResult<Notification> {
        self.notifications.mark_read(id).await
    }

    /// Lists unread notifications for a user.
    ///
    /// # Errors
    ///
    /// Propagates the store failure when the lookup is rejected.
    pub async fn unread_notifications(&self, user_id: UserId) -> StoreResult<Vec<Notification>> {
        self.notifications.list_unread(user_id).await
    }
}

#[async_trait]
impl<L, N, M, C> AuditSink for AuditEmitter<L, N, M, C>
where
    L: AuditLogStore,
    N: NotificationStore,
    M: MessageStore,
    C: Clock + Send + Sync,
{
    async fn record(&self, entry: AuditEntry) -> StoreResult<AuditLog> {
        let action = entry.action.clone();
        let log = self.logs.append(entry, self.clock.utc()).await?;
        tracing::debug!(action = %action, audit_id = log.id.value(), "audit entry recorded");
        Ok(log)
    }

    async fn notify(
        &self,
        user_id: UserId,
        task_id: Option<TaskId>,
        message: String,
    ) -> StoreResult<Notification> {
        self.notifications
            .append(user_id, task_id, message, self.clock.utc())
            .await
    }
}
