//! Application services for the staffing context.

pub mod arbiter;

pub use arbiter::{
    AvailabilityService, ClockOutSummary, ReassignmentAdvisory, StaffingServiceError,
};
