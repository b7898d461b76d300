//! Application services for the task context.

pub mod dispatch;
pub mod lifecycle;

pub use dispatch::{DispatchPolicy, DispatchService};
pub use lifecycle::{TaskLifecycleService, TaskServiceError};
