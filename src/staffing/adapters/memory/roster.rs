//! In-memory staffing repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::directory::domain::UserId;
use crate::staffing::domain::{
    AvailabilityId, AvailabilityStatus, BreakRequest, Shift, ShiftId, StaffAvailability,
};
use crate::staffing::ports::{ShiftOpening, StaffingRepository};
use crate::store::{IdSequence, StoreError, StoreResult};

/// Thread-safe in-memory staffing repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRoster {
    state: Arc<RwLock<RosterState>>,
}

#[derive(Debug, Default)]
struct RosterState {
    shifts: Vec<Shift>,
    active_shift_index: HashMap<UserId, ShiftId>,
    current_availability: HashMap<UserId, StaffAvailability>,
    availability_history: Vec<StaffAvailability>,
    shift_seq: IdSequence,
    availability_seq: IdSequence,
}

impl InMemoryRoster {
    /// Creates an empty in-memory roster.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, RosterState>> {
        self.state.read().map_err(StoreError::poisoned)
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, RosterState>> {
        self.state.write().map_err(StoreError::poisoned)
    }
}

#[async_trait]
impl StaffingRepository for InMemoryRoster {
    async fn open_shift(&self, user_id: UserId, now: DateTime<Utc>) -> StoreResult<ShiftOpening> {
        let mut state = self.write()?;
        if let Some(shift_id) = state.active_shift_index.get(&user_id)
            && let Some(existing) = state.shifts.iter().find(|s| s.id == *shift_id)
        {
            return Ok(ShiftOpening::AlreadyActive(existing.clone()));
        }

        let shift = Shift {
            id: ShiftId::new(state.shift_seq.next()),
            user_id,
            shift_start: now,
            shift_end: None,
            is_active: true,
            created_at: now,
        };
        state.active_shift_index.insert(user_id, shift.id);
        state.shifts.push(shift.clone());
        Ok(ShiftOpening::Opened(shift))
    }

    async fn close_shift(
        &self,
        user_id: UserId,
        now: DateTime<Utc>,
    ) -> StoreResult<Option<Shift>> {
        let mut state = self.write()?;
        let Some(shift_id) = state.active_shift_index.remove(&user_id) else {
            return Ok(None);
        };
        let Some(shift) = state.shifts.iter_mut().find(|s| s.id == shift_id) else {
            return Err(StoreError::not_found("shift", shift_id.value()));
        };
        shift.shift_end = Some(now);
        shift.is_active = false;
        Ok(Some(shift.clone()))
    }

    async fn find_active_shift(&self, user_id: UserId) -> StoreResult<Option<Shift>> {
        let state = self.read()?;
        Ok(state
            .active_shift_index
            .get(&user_id)
            .and_then(|shift_id| state.shifts.iter().find(|s| s.id == *shift_id))
            .cloned())
    }

    async fn remove_shift(&self, id: ShiftId) -> StoreResult<()> {
        let mut state = self.write()?;
        let Some(index) = state.shifts.iter().position(|s| s.id == id) else {
            return Err(StoreError::not_found("shift", id.value()));
        };
        let removed = state.shifts.remove(index);
        if state.active_shift_index.get(&removed.user_id) == Some(&id) {
            state.active_shift_index.remove(&removed.user_id);
        }
        Ok(())
    }

    async fn restore_shift(&self, shift: Shift) -> StoreResult<Shift> {
        let mut state = self.write()?;
        let Some(stored) = state.shifts.iter_mut().find(|s| s.id == shift.id) else {
            return Err(StoreError::not_found("shift", shift.id.value()));
        };
        *stored = shift.clone();
        if shift.is_open() {
            state.active_shift_index.insert(shift.user_id, shift.id);
        } else if state.active_shift_index.get(&shift.user_id) == Some(&shift.id) {
            state.active_shift_index.remove(&shift.user_id);
        }
        Ok(shift)
    }

    async fn current_availability(
        &self,
        user_id: UserId,
    ) -> StoreResult<Option<StaffAvailability>> {
        Ok(self.read()?.current_availability.get(&user_id).cloned())
    }

    async fn put_availability(
        &self,
        user_id: UserId,
        status: AvailabilityStatus,
        break_request: Option<BreakRequest>,
        now: DateTime<Utc>,
    ) -> StoreResult<StaffAvailability> {
        let mut state = self.write()?;
        let record = StaffAvailability {
            id: AvailabilityId::new(state.availability_seq.next()),
            porter_id: user_id,
            status,
            break_request,
            updated_at: now,
        };
        if let Some(superseded) = state.current_availability.insert(user_id, record.clone()) {
            state.availability_history.push(superseded);
        }
        Ok(record)
    }
}
