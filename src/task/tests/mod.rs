//! Unit tests for the task context.
//!
//! Tests are organised by concern: the domain state machine, lifecycle
//! orchestration, dispatch candidate selection, and audit-failure rollback.

pub mod helpers;

mod audit_rollback_tests;
mod dispatch_tests;
mod lifecycle_tests;
