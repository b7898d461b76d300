//! In-memory staffing adapter.

pub mod roster;

pub use roster::InMemoryRoster;
