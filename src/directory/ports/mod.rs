//! Port contracts for the directory context.

pub mod repository;

pub use repository::{FleetDirectory, OrgDirectory, ReportStore, SettingsStore, UserDirectory};
