//! Error types for the staffing domain.

use thiserror::Error;

/// Error returned while parsing an availability status from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown availability status: {0}")]
pub struct ParseAvailabilityStatusError(pub String);
