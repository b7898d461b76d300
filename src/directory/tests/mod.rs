//! Unit tests for the directory context.

mod registry_tests;
