//! Diesel row models for audit persistence.

use super::schema::{audit_logs, messages, notifications};
use crate::audit::domain::{AuditLog, AuditLogId, Message, MessageId, Notification, NotificationId};
use crate::directory::domain::UserId;
use crate::task::domain::TaskId;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value;
use uuid::Uuid;

/// Query result row for audit log entries.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = audit_logs)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct AuditLogRow {
    pub id: i64,
    pub action: String,
    pub actor_id: i64,
    pub task_id: Option<i64>,
    pub details: Option<String>,
    pub old_values: Option<Value>,
    pub new_values: Option<Value>,
    pub correlation_id: Option<Uuid>,
    pub timestamp: DateTime<Utc>,
}

/// Query result row for notifications.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = notifications)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NotificationRow {
    pub id: i64,
    pub user_id: i64,
    pub task_id: Option<i64>,
    pub message: String,
    pub sent_at: DateTime<Utc>,
    pub is_read: bool,
}

/// Query result row for messages.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = messages)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct MessageRow {
    pub id: i64,
    pub task_id: Option<i64>,
    pub sender_id: i64,
    pub receiver_id: i64,
    pub body: String,
    pub attachment_path: Option<String>,
    pub sent_at: DateTime<Utc>,
    pub is_read: bool,
}

pub fn row_to_log(row: AuditLogRow) -> AuditLog {
    AuditLog {
        id: AuditLogId::new(row.id),
        action: row.action,
        actor: UserId::new(row.actor_id),
        task_id: row.task_id.map(TaskId::new),
        details: row.details,
        old_values: row.old_values,
        new_values: row.new_values,
        correlation_id: row.correlation_id,
        timestamp: row.timestamp,
    }
}

pub fn row_to_notification(row: NotificationRow) -> Notification {
    Notification {
        id: NotificationId::new(row.id),
        user_id: UserId::new(row.user_id),
        task_id: row.task_id.map(TaskId::new),
        message: row.message,
        sent_at: row.sent_at,
        is_read: row.is_read,
    }
}

pub fn row_to_message(row: MessageRow) -> Message {
    Message {
        id: MessageId::new(row.id),
        task_id: row.task_id.map(TaskId::new),
        sender_id: UserId::new(row.sender_id),
        receiver_id: UserId::new(row.receiver_id),
        body: row.body,
        attachment_path: row.attachment_path,
        sent_at: row.sent_at,
        is_read: row.is_read,
    }
}
