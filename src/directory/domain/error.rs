//! Error types for directory domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing directory domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DirectoryDomainError {
    /// The username is empty or contains whitespace.
    #[error("invalid username '{0}', expected a non-empty token without whitespace")]
    InvalidUsername(String),

    /// The email address is malformed.
    #[error("invalid email address '{0}'")]
    InvalidEmail(String),

    /// A required name field is empty after trimming.
    #[error("{0} name must not be empty")]
    EmptyName(&'static str),

    /// The vehicle registration is empty after trimming.
    #[error("vehicle registration must not be empty")]
    EmptyRegistration,

    /// The setting key is empty or contains whitespace.
    #[error("invalid setting key '{0}'")]
    InvalidSettingKey(String),

    /// The setting value does not parse as its declared data type.
    #[error("setting '{key}' value '{value}' is not a valid {expected}")]
    SettingTypeMismatch {
        /// Offending setting key.
        key: String,
        /// Raw stored value.
        value: String,
        /// Expected data type label.
        expected: &'static str,
    },
}

/// Error returned while parsing a vehicle status from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown vehicle status: {0}")]
pub struct ParseVehicleStatusError(pub String);
