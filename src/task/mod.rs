//! Task context: the task aggregate, its state machines, and dispatch.
//!
//! Tasks move through a fixed status graph with terminal Completed and
//! Canceled states. Every mutation leaves an immutable history row and an
//! audit record; dispatch matches Pending tasks to eligible porters.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
