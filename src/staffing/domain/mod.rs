//! Domain model for shifts and porter availability.

mod availability;
mod error;
mod ids;
mod shift;

pub use availability::{AvailabilityStatus, BreakApproval, BreakRequest, StaffAvailability};
pub use error::ParseAvailabilityStatusError;
pub use ids::{AvailabilityId, ShiftId};
pub use shift::Shift;
