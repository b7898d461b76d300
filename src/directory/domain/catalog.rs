//! Categorization catalogs (job types, break types) and report records.

use super::{BreakTypeId, JobTypeId, ReportId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Categorization of a transport task, e.g. patient transfer or specimen run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobType {
    /// Repository-assigned key.
    pub id: JobTypeId,
    /// Job type name.
    pub name: String,
    /// Human-readable description, when provided.
    pub description: Option<String>,
    /// Soft-delete flag; inactive job types reject new tasks.
    pub is_active: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Categorization of a staff break, e.g. lunch or rest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakType {
    /// Repository-assigned key.
    pub id: BreakTypeId,
    /// Break type name.
    pub name: String,
    /// Human-readable description, when provided.
    pub description: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// A generated report reference; file bytes live outside this crate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    /// Repository-assigned key.
    pub id: ReportId,
    /// Generating user.
    pub generated_by: UserId,
    /// Report type label, e.g. `"daily_task_summary"`.
    pub report_type: String,
    /// Opaque storage path.
    pub file_path: String,
    /// Generation timestamp.
    pub generated_at: DateTime<Utc>,
}
