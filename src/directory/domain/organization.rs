//! Departments and the wards they own.

use super::{DepartmentId, WardId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An organizational department, e.g. Radiology.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    /// Repository-assigned key.
    pub id: DepartmentId,
    /// Department name.
    pub name: String,
    /// Physical location, when recorded.
    pub location: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last mutation timestamp.
    pub updated_at: DateTime<Utc>,
}

/// A ward belonging to exactly one department.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ward {
    /// Repository-assigned key.
    pub id: WardId,
    /// Owning department.
    pub department_id: DepartmentId,
    /// Ward name.
    pub name: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last mutation timestamp.
    pub updated_at: DateTime<Utc>,
}
