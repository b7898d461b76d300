//! Shared persistence error taxonomy used by every repository port.
//!
//! All contexts report the same four failure classes: a missing record, a
//! uniqueness breach, a dangling cross-entity reference, and an opaque
//! persistence-layer failure. A rejected write never leaves partial state
//! behind.

use std::sync::Arc;
use thiserror::Error;

/// Result type for repository operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors returned by repository implementations.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// No record of the given kind exists under the given key.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Entity kind, e.g. `"task"`.
        entity: &'static str,
        /// The key that failed to resolve.
        id: i64,
    },

    /// A uniqueness constraint was violated.
    #[error("{entity} with {field} '{value}' already exists")]
    Conflict {
        /// Entity kind carrying the constraint.
        entity: &'static str,
        /// Constrained field name.
        field: &'static str,
        /// Conflicting value.
        value: String,
    },

    /// A write referenced a foreign key that does not exist.
    #[error("{entity} references missing {reference}: {id}")]
    ReferentialIntegrity {
        /// Entity kind being written.
        entity: &'static str,
        /// Referenced entity kind.
        reference: &'static str,
        /// The dangling key.
        id: i64,
    },

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl StoreError {
    /// Builds a [`StoreError::NotFound`].
    #[must_use]
    pub const fn not_found(entity: &'static str, id: i64) -> Self {
        Self::NotFound { entity, id }
    }

    /// Builds a [`StoreError::Conflict`].
    #[must_use]
    pub fn conflict(entity: &'static str, field: &'static str, value: impl Into<String>) -> Self {
        Self::Conflict {
            entity,
            field,
            value: value.into(),
        }
    }

    /// Builds a [`StoreError::ReferentialIntegrity`].
    #[must_use]
    pub const fn dangling(entity: &'static str, reference: &'static str, id: i64) -> Self {
        Self::ReferentialIntegrity {
            entity,
            reference,
            id,
        }
    }

    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }

    /// Wraps a poisoned-lock failure from an in-memory adapter.
    pub(crate) fn poisoned(err: impl std::fmt::Display) -> Self {
        Self::persistence(std::io::Error::other(err.to_string()))
    }
}

/// Monotonic key allocator used by the in-memory adapters.
#[derive(Debug, Clone, Default)]
pub(crate) struct IdSequence(i64);

impl IdSequence {
    /// Returns the next key, starting from 1.
    pub(crate) const fn next(&mut self) -> i64 {
        self.0 += 1;
        self.0
    }
}
