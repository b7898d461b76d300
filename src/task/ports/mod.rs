//! Ports exposed by the task context.

pub mod repository;

pub use repository::{TaskHistoryRepository, TaskRepository};
