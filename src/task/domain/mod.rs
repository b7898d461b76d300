//! Domain model for tasks, their state machines, and their history.

mod attachment;
mod error;
mod escalation;
mod history;
mod ids;
mod task;

pub use attachment::{Feedback, Rating, TaskAttachment};
pub use error::{
    ParseIncidentSeverityError, ParseTaskPriorityError, ParseTaskStatusError, TaskDomainError,
};
pub use escalation::{Escalation, Incident, IncidentSeverity};
pub use history::{PriorityChange, TaskStatusUpdate};
pub use ids::{
    AttachmentId, EscalationId, FeedbackId, IncidentId, PriorityChangeId, StatusUpdateId, TaskId,
};
pub use task::{Location, NewTask, Task, TaskPriority, TaskStatus};
