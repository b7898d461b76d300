//! Escalations and incidents raised against tasks.

use super::{EscalationId, IncidentId, ParseIncidentSeverityError, TaskId};
use crate::directory::domain::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A record of a task being raised to emergency attention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Escalation {
    /// Repository-assigned key.
    pub id: EscalationId,
    /// The escalated task.
    pub task_id: TaskId,
    /// Escalating user.
    pub escalated_by: UserId,
    /// Stated reason.
    pub reason: String,
    /// Recording timestamp.
    pub timestamp: DateTime<Utc>,
}

/// Impact level of an incident.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncidentSeverity {
    /// Minor disruption.
    Low,
    /// Noticeable disruption.
    Medium,
    /// Serious disruption.
    High,
    /// Danger to patients or staff.
    Critical,
}

impl IncidentSeverity {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

impl TryFrom<&str> for IncidentSeverity {
    type Error = ParseIncidentSeverityError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "critical" => Ok(Self::Critical),
            _ => Err(ParseIncidentSeverityError(value.to_owned())),
        }
    }
}

impl fmt::Display for IncidentSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An operational incident reported against a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Incident {
    /// Repository-assigned key.
    pub id: IncidentId,
    /// The affected task.
    pub task_id: TaskId,
    /// Reporting user.
    pub reported_by: UserId,
    /// What happened.
    pub description: String,
    /// Impact level.
    pub severity: IncidentSeverity,
    /// Recording timestamp.
    pub timestamp: DateTime<Utc>,
}
