//! Identifier newtypes for the task domain.

use crate::ids::entity_id;

entity_id! {
    /// Unique identifier for a task.
    TaskId
}

entity_id! {
    /// Unique identifier for a status-update history row.
    StatusUpdateId
}

entity_id! {
    /// Unique identifier for a priority-change history row.
    PriorityChangeId
}

entity_id! {
    /// Unique identifier for an escalation record.
    EscalationId
}

entity_id! {
    /// Unique identifier for an incident record.
    IncidentId
}

entity_id! {
    /// Unique identifier for a task attachment.
    AttachmentId
}

entity_id! {
    /// Unique identifier for a feedback record.
    FeedbackId
}
