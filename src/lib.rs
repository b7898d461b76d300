//! Porterflow: hospital task lifecycle and dispatch engine.
//!
//! This crate is the data and domain layer of a hospital portering
//! application: transport tasks are submitted, tracked through a validated
//! lifecycle, dispatched to on-duty porters, and audited.
//!
//! # Architecture
//!
//! Porterflow follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for persistence and side effects
//! - **Adapters**: Concrete implementations of ports (in-memory, `PostgreSQL`)
//!
//! # Modules
//!
//! - [`directory`]: Organizational reference data (users, roles, departments,
//!   wards, vehicles, settings)
//! - [`task`]: Task lifecycle state machine, history records, and dispatch
//! - [`staffing`]: Shifts, availability, and break arbitration
//! - [`audit`]: Append-only audit trail, notifications, and messages

pub mod audit;
pub mod directory;
pub mod staffing;
pub mod store;
pub mod task;

pub(crate) mod ids;
