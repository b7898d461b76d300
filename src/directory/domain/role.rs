//! Roles, permissions, and role-permission grants.

use super::{DirectoryDomainError, PermissionId, RoleId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Validated unique role or permission name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CapabilityName(String);

impl CapabilityName {
    /// Creates a validated capability name.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryDomainError::EmptyName`] when the value is empty
    /// after trimming.
    pub fn new(value: impl Into<String>) -> Result<Self, DirectoryDomainError> {
        let raw = value.into();
        let normalized = raw.trim();
        if normalized.is_empty() {
            return Err(DirectoryDomainError::EmptyName("capability"));
        }
        Ok(Self(normalized.to_owned()))
    }

    /// Returns the name as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CapabilityName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A named role users can hold, e.g. `porter` or `admin`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    /// Repository-assigned key.
    pub id: RoleId,
    /// Unique role name.
    pub name: CapabilityName,
    /// Human-readable description, when provided.
    pub description: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// A named capability grantable to roles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permission {
    /// Repository-assigned key.
    pub id: PermissionId,
    /// Unique permission name.
    pub name: CapabilityName,
    /// Human-readable description, when provided.
    pub description: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// A role-permission grant; pairs are unique.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PermissionGrant {
    /// Granted role.
    pub role_id: RoleId,
    /// Granted permission.
    pub permission_id: PermissionId,
}
