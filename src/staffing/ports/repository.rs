//! Repository port for shifts and availability records.

use crate::directory::domain::UserId;
use crate::staffing::domain::{AvailabilityStatus, BreakRequest, Shift, ShiftId, StaffAvailability};
use crate::store::StoreResult;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Outcome of an attempt to open a shift.
///
/// Opening is conditional: the check for an existing active shift and the
/// insert happen inside one critical section, so two racing clock-ins cannot
/// both succeed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShiftOpening {
    /// A new shift was opened.
    Opened(Shift),
    /// An active shift already exists; nothing was written.
    AlreadyActive(Shift),
}

/// Persistence contract for staffing state.
#[async_trait]
pub trait StaffingRepository: Send + Sync {
    /// Opens a shift for the user unless one is already active.
    async fn open_shift(&self, user_id: UserId, now: DateTime<Utc>) -> StoreResult<ShiftOpening>;

    /// Closes the user's active shift, setting its end time and clearing the
    /// active flag. Returns `None` when no shift is active.
    async fn close_shift(&self, user_id: UserId, now: DateTime<Utc>)
    -> StoreResult<Option<Shift>>;

    /// Finds the user's active shift. Returns `None` when off shift.
    async fn find_active_shift(&self, user_id: UserId) -> StoreResult<Option<Shift>>;

    /// Removes a shift. Only the clock-in compensation path calls this;
    /// shifts are otherwise never deleted.
    async fn remove_shift(&self, id: ShiftId) -> StoreResult<()>;

    /// Rewrites a stored shift, reinstating its end time and active flag.
    /// Only the clock-out compensation path calls this.
    async fn restore_shift(&self, shift: Shift) -> StoreResult<Shift>;

    /// Returns the current availability record for a porter. Returns `None`
    /// for porters that have never been staffed.
    async fn current_availability(
        &self,
        user_id: UserId,
    ) -> StoreResult<Option<StaffAvailability>>;

    /// Writes a new current availability record, superseding the previous
    /// one (which is retained as history).
    async fn put_availability(
        &self,
        user_id: UserId,
        status: AvailabilityStatus,
        break_request: Option<BreakRequest>,
        now: DateTime<Utc>,
    ) -> StoreResult<StaffAvailability>;
}
