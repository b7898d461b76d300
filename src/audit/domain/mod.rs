//! Domain model for the audit trail, notifications, and messages.

mod ids;
mod log;
mod notification;

pub use ids::{AuditLogId, MessageId, NotificationId};
pub use log::{AuditEntry, AuditLog};
pub use notification::{Message, NewMessage, Notification};
