//! Ports exposed by the staffing context.

pub mod repository;

pub use repository::{ShiftOpening, StaffingRepository};
