//! Port contracts for the audit context.

pub mod store;

pub use store::{AuditLogStore, AuditSink, MessageStore, NotificationStore};

#[cfg(test)]
pub use store::MockAuditSink;
