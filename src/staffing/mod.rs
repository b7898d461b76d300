//! Staffing context: shifts, availability, and break arbitration.
//!
//! A porter must be on shift and on duty to receive work. Breaks are
//! requested, arbitrated by a supervisor, and ended explicitly; the arbiter
//! keeps dispatch eligibility consistent with that cycle.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
