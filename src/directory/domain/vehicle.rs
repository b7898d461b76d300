//! Transport vehicles and their operational status.

use super::{DirectoryDomainError, ParseVehicleStatusError, UserId, VehicleId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Operational status of a vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VehicleStatus {
    /// Parked and assignable.
    Available,
    /// Currently out on a task.
    InUse,
    /// Temporarily withdrawn for maintenance.
    UnderMaintenance,
    /// Permanently withdrawn from service.
    Retired,
}

impl VehicleStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::InUse => "in_use",
            Self::UnderMaintenance => "under_maintenance",
            Self::Retired => "retired",
        }
    }
}

impl TryFrom<&str> for VehicleStatus {
    type Error = ParseVehicleStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "available" => Ok(Self::Available),
            "in_use" => Ok(Self::InUse),
            "under_maintenance" => Ok(Self::UnderMaintenance),
            "retired" => Ok(Self::Retired),
            _ => Err(ParseVehicleStatusError(value.to_owned())),
        }
    }
}

impl fmt::Display for VehicleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A transport vehicle (van, cart, ambulance, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vehicle {
    /// Repository-assigned key.
    pub id: VehicleId,
    /// Registration plate or asset tag.
    pub registration: String,
    /// Free-form vehicle kind, e.g. `"van"`.
    pub kind: String,
    /// Operational status.
    pub status: VehicleStatus,
    /// User currently holding the vehicle, when assigned.
    pub assigned_to: Option<UserId>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last mutation timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Payload for registering a vehicle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewVehicle {
    /// Registration plate or asset tag.
    pub registration: String,
    /// Free-form vehicle kind.
    pub kind: String,
}

impl NewVehicle {
    /// Creates a validated vehicle payload.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryDomainError::EmptyRegistration`] or
    /// [`DirectoryDomainError::EmptyName`] when either field is empty after
    /// trimming.
    pub fn new(
        registration: impl Into<String>,
        kind: impl Into<String>,
    ) -> Result<Self, DirectoryDomainError> {
        let registration = registration.into().trim().to_owned();
        if registration.is_empty() {
            return Err(DirectoryDomainError::EmptyRegistration);
        }
        let kind = kind.into().trim().to_owned();
        if kind.is_empty() {
            return Err(DirectoryDomainError::EmptyName("vehicle kind"));
        }
        Ok(Self { registration, kind })
    }
}
