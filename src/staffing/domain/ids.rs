//! Identifier newtypes for the staffing domain.

use crate::ids::entity_id;

entity_id! {
    /// Unique identifier for a shift.
    ShiftId
}

entity_id! {
    /// Unique identifier for a staff availability record.
    AvailabilityId
}
