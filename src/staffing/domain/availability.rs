//! Porter availability and break-request state.

use super::{AvailabilityId, ParseAvailabilityStatusError};
use crate::directory::domain::{BreakTypeId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Duty status of a porter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AvailabilityStatus {
    /// Not staffed; ineligible for dispatch and breaks.
    OffDuty,
    /// Staffed and dispatchable.
    OnDuty,
    /// Staffed but paused on an approved break.
    OnBreak,
}

impl AvailabilityStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OffDuty => "off_duty",
            Self::OnDuty => "on_duty",
            Self::OnBreak => "on_break",
        }
    }
}

impl TryFrom<&str> for AvailabilityStatus {
    type Error = ParseAvailabilityStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "off_duty" => Ok(Self::OffDuty),
            "on_duty" => Ok(Self::OnDuty),
            "on_break" => Ok(Self::OnBreak),
            _ => Err(ParseAvailabilityStatusError(value.to_owned())),
        }
    }
}

impl fmt::Display for AvailabilityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Approval state of a break request.
///
/// Modeled as an explicit enum rather than a nullable boolean so that all
/// three states are first-class and exhaustively handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BreakApproval {
    /// Awaiting a supervisor decision.
    Pending,
    /// Approved; the porter may go on break.
    Approved,
    /// Rejected; the porter stays on duty.
    Rejected,
}

impl BreakApproval {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

/// An outstanding or resolved break request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakRequest {
    /// Requested break category, when given.
    pub break_type: Option<BreakTypeId>,
    /// Approval state.
    pub approval: BreakApproval,
}

impl BreakRequest {
    /// Creates a pending request.
    #[must_use]
    pub const fn pending(break_type: Option<BreakTypeId>) -> Self {
        Self {
            break_type,
            approval: BreakApproval::Pending,
        }
    }
}

/// The current availability record for one porter.
///
/// Superseded records are kept as history by the repository; this type always
/// describes the latest state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffAvailability {
    /// Repository-assigned key.
    pub id: AvailabilityId,
    /// The porter this record describes.
    pub porter_id: UserId,
    /// Duty status.
    pub status: AvailabilityStatus,
    /// Outstanding break request, when one exists.
    pub break_request: Option<BreakRequest>,
    /// Last mutation timestamp.
    pub updated_at: DateTime<Utc>,
}

impl StaffAvailability {
    /// Returns `true` when a break request is awaiting resolution.
    #[must_use]
    pub fn break_pending(&self) -> bool {
        self.break_request
            .is_some_and(|request| request.approval == BreakApproval::Pending)
    }
}
