//! Unit tests for the staffing context.
