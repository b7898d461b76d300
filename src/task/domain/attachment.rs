//! Attachments and feedback appended to tasks.
//!
//! File paths are opaque references; bytes are stored and served elsewhere.

use super::{AttachmentId, FeedbackId, TaskDomainError, TaskId};
use crate::directory::domain::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A file attached to a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskAttachment {
    /// Repository-assigned key.
    pub id: AttachmentId,
    /// The owning task.
    pub task_id: TaskId,
    /// Uploading user.
    pub uploaded_by: UserId,
    /// Opaque storage path.
    pub file_path: String,
    /// Size in bytes, when known.
    pub file_size: Option<i64>,
    /// MIME type, when known.
    pub content_type: Option<String>,
    /// Upload timestamp.
    pub uploaded_at: DateTime<Utc>,
}

/// A validated 1..=5 satisfaction rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rating(i16);

impl Rating {
    /// Validates and wraps a rating.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidRating`] outside 1..=5.
    pub fn new(value: i16) -> Result<Self, TaskDomainError> {
        if !(1..=5).contains(&value) {
            return Err(TaskDomainError::InvalidRating(value));
        }
        Ok(Self(value))
    }

    /// Returns the rating value.
    #[must_use]
    pub const fn value(self) -> i16 {
        self.0
    }
}

/// Requester feedback recorded against a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feedback {
    /// Repository-assigned key.
    pub id: FeedbackId,
    /// The rated task.
    pub task_id: TaskId,
    /// Rating user.
    pub rated_by: UserId,
    /// Satisfaction score.
    pub rating: Rating,
    /// Free-text comments, when provided.
    pub comments: Option<String>,
    /// Recording timestamp.
    pub timestamp: DateTime<Utc>,
}
