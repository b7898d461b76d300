//! Audit trail, notifications, and messaging.
//!
//! A pure side-effect recorder: append-only audit entries with before/after
//! snapshots, plus notification and message delivery. Audit failures are
//! fail-closed: they propagate to the originating operation, which rolls
//! back. The module follows hexagonal architecture:
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
