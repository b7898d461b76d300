//! Identifier newtypes for the audit domain.

use crate::ids::entity_id;

entity_id! {
    /// Unique identifier for an audit log entry.
    AuditLogId
}

entity_id! {
    /// Unique identifier for a notification.
    NotificationId
}

entity_id! {
    /// Unique identifier for a user-to-user message.
    MessageId
}
