//! User accounts and profiles.
//!
//! Credential hashes are stored as opaque strings; hashing and verification
//! belong to the authentication collaborator, not this crate.

use super::{DepartmentId, DirectoryDomainError, ProfileId, RoleId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Validated unique login name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Username(String);

impl Username {
    /// Creates a validated username.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryDomainError::InvalidUsername`] when the value is
    /// empty after trimming or contains whitespace.
    pub fn new(value: impl Into<String>) -> Result<Self, DirectoryDomainError> {
        let raw = value.into();
        let normalized = raw.trim();
        if normalized.is_empty() || normalized.chars().any(char::is_whitespace) {
            return Err(DirectoryDomainError::InvalidUsername(raw));
        }
        Ok(Self(normalized.to_owned()))
    }

    /// Returns the username as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validated email address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Creates a validated email address.
    ///
    /// Validation is intentionally shallow: a non-empty local part and domain
    /// separated by a single `@`. Deliverability is not this crate's concern.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryDomainError::InvalidEmail`] when the shape does not
    /// hold.
    pub fn new(value: impl Into<String>) -> Result<Self, DirectoryDomainError> {
        let raw = value.into();
        let normalized = raw.trim();
        let mut parts = normalized.split('@');
        let local = parts.next().unwrap_or_default();
        let domain = parts.next().unwrap_or_default();
        let valid = !local.is_empty()
            && !domain.is_empty()
            && parts.next().is_none()
            && !normalized.chars().any(char::is_whitespace);
        if !valid {
            return Err(DirectoryDomainError::InvalidEmail(raw));
        }
        Ok(Self(normalized.to_owned()))
    }

    /// Returns the address as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A user account: porter, staff member, admin, or submission station.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Repository-assigned key.
    pub id: UserId,
    /// Unique login name.
    pub username: Username,
    /// Opaque credential hash.
    pub credential_hash: String,
    /// Role reference, when assigned.
    pub role_id: Option<RoleId>,
    /// Home department, when scoped.
    pub department_id: Option<DepartmentId>,
    /// Soft-delete flag; inactive users are excluded from dispatch.
    pub is_active: bool,
    /// Unique contact email, when known.
    pub email: Option<EmailAddress>,
    /// Contact phone, when known.
    pub phone: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last mutation timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Payload for creating a user; the repository assigns id and timestamps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    /// Unique login name.
    pub username: Username,
    /// Opaque credential hash.
    pub credential_hash: String,
    /// Role reference, when assigned.
    pub role_id: Option<RoleId>,
    /// Home department, when scoped.
    pub department_id: Option<DepartmentId>,
    /// Unique contact email, when known.
    pub email: Option<EmailAddress>,
    /// Contact phone, when known.
    pub phone: Option<String>,
}

impl NewUser {
    /// Creates a payload with required fields.
    #[must_use]
    pub const fn new(username: Username, credential_hash: String) -> Self {
        Self {
            username,
            credential_hash,
            role_id: None,
            department_id: None,
            email: None,
            phone: None,
        }
    }

    /// Sets the role reference.
    #[must_use]
    pub const fn with_role(mut self, role_id: RoleId) -> Self {
        self.role_id = Some(role_id);
        self
    }

    /// Sets the home department.
    #[must_use]
    pub const fn with_department(mut self, department_id: DepartmentId) -> Self {
        self.department_id = Some(department_id);
        self
    }

    /// Sets the contact email.
    #[must_use]
    pub fn with_email(mut self, email: EmailAddress) -> Self {
        self.email = Some(email);
        self
    }

    /// Sets the contact phone.
    #[must_use]
    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }
}

/// Optional per-user profile record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Repository-assigned key.
    pub id: ProfileId,
    /// Owning user.
    pub user_id: UserId,
    /// Given name, when known.
    pub first_name: Option<String>,
    /// Family name, when known.
    pub last_name: Option<String>,
    /// Postal address, when known.
    pub address: Option<String>,
    /// Contact phone, when known.
    pub phone: Option<String>,
    /// Unique profile contact email, when known.
    pub email: Option<EmailAddress>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last mutation timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Payload for creating or replacing a user profile.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewUserProfile {
    /// Given name, when known.
    pub first_name: Option<String>,
    /// Family name, when known.
    pub last_name: Option<String>,
    /// Postal address, when known.
    pub address: Option<String>,
    /// Contact phone, when known.
    pub phone: Option<String>,
    /// Unique profile contact email, when known.
    pub email: Option<EmailAddress>,
}
