//! Application services for the audit context.

mod emitter;

pub use emitter::AuditEmitter;
