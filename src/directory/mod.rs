//! Organizational reference data for the portering engine.
//!
//! The directory is the entity store behind every other context: users and
//! their roles, departments and wards, task/break catalogs, vehicles, public
//! submission links, report references, and system settings. The module
//! follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
