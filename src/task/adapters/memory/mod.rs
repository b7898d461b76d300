//! In-memory task adapter.

pub mod task;

pub use task::InMemoryTaskStore;
