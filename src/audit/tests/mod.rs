//! Unit tests for the audit context.

mod emitter_tests;
