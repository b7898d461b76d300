//! Notifications and user-to-user messages.
//!
//! Both are append-only; only the `is_read` flag mutates after creation.

use super::{MessageId, NotificationId};
use crate::directory::domain::UserId;
use crate::task::domain::TaskId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A notification delivered to a single user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Repository-assigned key.
    pub id: NotificationId,
    /// Recipient.
    pub user_id: UserId,
    /// Related task, when task-scoped.
    pub task_id: Option<TaskId>,
    /// Notification body.
    pub message: String,
    /// Delivery timestamp.
    pub sent_at: DateTime<Utc>,
    /// Read flag; the only mutable field.
    pub is_read: bool,
}

/// A direct message between two users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Repository-assigned key.
    pub id: MessageId,
    /// Related task, when task-scoped.
    pub task_id: Option<TaskId>,
    /// Sending user.
    pub sender_id: UserId,
    /// Receiving user.
    pub receiver_id: UserId,
    /// Message body.
    pub body: String,
    /// Opaque attachment path, when present.
    pub attachment_path: Option<String>,
    /// Delivery timestamp.
    pub sent_at: DateTime<Utc>,
    /// Read flag; the only mutable field.
    pub is_read: bool,
}

/// Payload for sending a direct message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMessage {
    /// Related task, when task-scoped.
    pub task_id: Option<TaskId>,
    /// Sending user.
    pub sender_id: UserId,
    /// Receiving user.
    pub receiver_id: UserId,
    /// Message body.
    pub body: String,
    /// Opaque attachment path, when present.
    pub attachment_path: Option<String>,
}

impl NewMessage {
    /// Creates a payload with required fields.
    #[must_use]
    pub fn new(sender_id: UserId, receiver_id: UserId, body: impl Into<String>) -> Self {
        Self {
            task_id: None,
            sender_id,
            receiver_id,
            body: body.into(),
            attachment_path: None,
        }
    }

    /// Scopes the message to a task.
    #[must_use]
    pub const fn for_task(mut self, task_id: TaskId) -> Self {
        self.task_id = Some(task_id);
        self
    }

    /// Attaches an opaque file path.
    #[must_use]
    pub fn with_attachment(mut self, path: impl Into<String>) -> Self {
        self.attachment_path = Some(path.into());
        self
    }
}
