//! System settings and the immutable snapshot served to call sites.
//!
//! Settings are loaded once into a [`SettingsSnapshot`] and refreshed only
//! through an explicit reload, never read ad hoc per call.

use super::{DirectoryDomainError, SettingId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Validated unique setting key, e.g. `dispatch.max_active_tasks`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SettingKey(String);

impl SettingKey {
    /// Creates a validated setting key.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryDomainError::InvalidSettingKey`] when the value is
    /// empty after trimming or contains whitespace.
    pub fn new(value: impl Into<String>) -> Result<Self, DirectoryDomainError> {
        let raw = value.into();
        let normalized = raw.trim();
        if normalized.is_empty() || normalized.chars().any(char::is_whitespace) {
            return Err(DirectoryDomainError::InvalidSettingKey(raw));
        }
        Ok(Self(normalized.to_owned()))
    }

    /// Returns the key as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SettingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Declared data type of a setting value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettingType {
    /// Free text.
    Text,
    /// Base-10 integer.
    Integer,
    /// `true` / `false`.
    Boolean,
}

impl SettingType {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
        }
    }
}

/// A persisted key-value configuration entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemSetting {
    /// Repository-assigned key.
    pub id: SettingId,
    /// Unique setting key.
    pub key: SettingKey,
    /// Raw stored value.
    pub value: String,
    /// Declared data type, when recorded.
    pub data_type: Option<SettingType>,
    /// Last mutation timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Immutable view over all settings at one point in time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsSnapshot {
    values: HashMap<String, String>,
}

impl SettingsSnapshot {
    /// Builds a snapshot from persisted settings.
    #[must_use]
    pub fn from_settings(settings: &[SystemSetting]) -> Self {
        let values = settings
            .iter()
            .map(|s| (s.key.as_str().to_owned(), s.value.clone()))
            .collect();
        Self { values }
    }

    /// Returns the raw value for a key, when present.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Returns a key parsed as an integer.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryDomainError::SettingTypeMismatch`] when the stored
    /// value does not parse.
    pub fn get_i64(&self, key: &str) -> Result<Option<i64>, DirectoryDomainError> {
        self.get(key)
            .map(|value| {
                value
                    .trim()
                    .parse::<i64>()
                    .map_err(|_| DirectoryDomainError::SettingTypeMismatch {
                        key: key.to_owned(),
                        value: value.to_owned(),
                        expected: "integer",
                    })
            })
            .transpose()
    }

    /// Returns a key parsed as a boolean (`true`/`false`, case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryDomainError::SettingTypeMismatch`] when the stored
    /// value does not parse.
    pub fn get_bool(&self, key: &str) -> Result<Option<bool>, DirectoryDomainError> {
        self.get(key)
            .map(|value| match value.trim().to_ascii_lowercase().as_str() {
                "true" => Ok(true),
                "false" => Ok(false),
                _ => Err(DirectoryDomainError::SettingTypeMismatch {
                    key: key.to_owned(),
                    value: value.to_owned(),
                    expected: "boolean",
                }),
            })
            .transpose()
    }

    /// Returns the number of settings captured in this snapshot.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` when the snapshot holds no settings.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
