//! In-memory store for audit entries, notifications, and messages.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::audit::domain::{
    AuditEntry, AuditLog, AuditLogId, Message, MessageId, NewMessage, Notification, NotificationId,
};
use crate::audit::ports::{AuditLogStore, MessageStore, NotificationStore};
use crate::directory::domain::UserId;
use crate::store::{IdSequence, StoreError, StoreResult};
use crate::task::domain::TaskId;

/// Thread-safe in-memory audit trail.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAuditTrail {
    state: Arc<RwLock<TrailState>>,
}

#[derive(Debug, Default)]
struct TrailState {
    logs: Vec<AuditLog>,
    notifications: Vec<Notification>,
    messages: Vec<Message>,
    log_seq: IdSequence,
    notification_seq: IdSequence,
    message_seq: IdSequence,
}

impl InMemoryAuditTrail {
    /// Creates an empty in-memory audit trail.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, TrailState>> {
        self.state.read().map_err(StoreError::poisoned)
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, TrailState>> {
        self.state.write().map_err(StoreError::poisoned)
    }
}

#[async_trait]
impl AuditLogStore for InMemoryAuditTrail {
    async fn append(&self, entry: AuditEntry, now: DateTime<Utc>) -> StoreResult<AuditLog> {
        let mut state = self.write()?;
        let log = AuditLog {
            id: AuditLogId::new(state.log_seq.next()),
            action: entry.action,
            actor: entry.actor,
            task_id: entry.task_id,
            details: entry.details,
            old_values: entry.old_values,
            new_values: entry.new_values,
            correlation_id: entry.correlation_id,
            timestamp: now,
        };
        state.logs.push(log.clone());
        Ok(log)
    }

    async fn list_for_task(&self, task_id: TaskId) -> StoreResult<Vec<AuditLog>> {
        Ok(self
            .read()?
            .logs
            .iter()
            .filter(|log| log.task_id == Some(task_id))
            .cloned()
            .collect())
    }

    async fn list_for_actor(&self, actor: UserId) -> StoreResult<Vec<AuditLog>> {
        Ok(self
            .read()?
            .logs
            .iter()
            .filter(|log| log.actor == actor)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl NotificationStore for InMemoryAuditTrail {
    async fn append(
        &self,
        user_id: UserId,
        task_id: Option<TaskId>,
        message: String,
        now: DateTime<Utc>,
    ) -> StoreResult<Notification> {
        let mut state = self.write()?;
        let notification = Notification {
            id: NotificationId::new(state.notification_seq.next()),
            user_id,
            task_id,
            message,
            sent_at: now,
            is_read: false,
        };
        state.notifications.push(notification.clone());
        Ok(notification)
    }

    async fn mark_read(&self, id: NotificationId) -> StoreResult<Notification> {
        let mut state = self.write()?;
        let notification = state
            .notifications
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or(StoreError::not_found("notification", id.value()))?;
        notification.is_read = true;
        Ok(notification.clone())
    }

    async fn list_unread(&self, user_id: UserId) -> StoreResult<Vec<Notification>> {
        Ok(self
            .read()?
            .notifications
            .iter()
            .filter(|n| n.user_id == user_id && !n.is_read)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl MessageStore for InMemoryAuditTrail {
    async fn append(&self, new: NewMessage, now: DateTime<Utc>) -> StoreResult<Message> {
        let mut state = self.write()?;
        let message = Message {
            id: MessageId::new(state.message_seq.next()),
            task_id: new.task_id,
            sender_id: new.sender_id,
            receiver_id: new.receiver_id,
            body: new.body,
            attachment_path: new.attachment_path,
            sent_at: now,
            is_read: false,
        };
        state.messages.push(message.clone());
        Ok(message)
    }

    async fn mark_read(&self, id: MessageId) -> StoreResult<Message> {
        let mut state = self.write()?;
        let message = state
            .messages
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or(StoreError::not_found("message", id.value()))?;
        message.is_read = true;
        Ok(message.clone())
    }

    async fn list_received(&self, user_id: UserId) -> StoreResult<Vec<Message>> {
        Ok(self
            .read()?
            .messages
            .iter()
            .filter(|m| m.receiver_id == user_id)
            .cloned()
            .collect())
    }
}
