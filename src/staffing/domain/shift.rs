//! Shifts: bounded periods during which a user is staffed.

use super::ShiftId;
use crate::directory::domain::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A staffed period for one user. At most one shift per user is active at a
/// time; the repository enforces this inside its critical section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shift {
    /// Repository-assigned key.
    pub id: ShiftId,
    /// Staffed user.
    pub user_id: UserId,
    /// Shift opening time.
    pub shift_start: DateTime<Utc>,
    /// Shift closing time; `None` while the shift is open.
    pub shift_end: Option<DateTime<Utc>>,
    /// Active flag; cleared on clock-out.
    pub is_active: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Shift {
    /// Returns `true` while the shift is open.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.is_active && self.shift_end.is_none()
    }
}
