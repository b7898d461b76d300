//! Thread-safe in-memory audit trail.

mod trail;

pub use trail::InMemoryAuditTrail;
