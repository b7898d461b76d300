//! `PostgreSQL` repository implementation for staffing persistence.

use super::models::{self, AvailabilityRow, ShiftRow};
use super::schema::{shifts, staff_availability};
use crate::directory::domain::UserId;
use crate::staffing::domain::{AvailabilityStatus, BreakRequest, Shift, ShiftId, StaffAvailability};
use crate::staffing::ports::{ShiftOpening, StaffingRepository};
use crate::store::{StoreError, StoreResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};

/// `PostgreSQL` connection pool type used by staffing adapters.
pub type StaffingPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed staffing repository.
#[derive(Debug, Clone)]
pub struct PostgresRoster {
    pool: StaffingPgPool,
}

impl PostgresRoster {
    /// Creates a repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: StaffingPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> StoreResult<T>
    where
        F: FnOnce(&mut PgConnection) -> StoreResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(StoreError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(StoreError::persistence)?
    }
}

fn active_shift_row(
    connection: &mut PgConnection,
    user_id: UserId,
) -> StoreResult<Option<ShiftRow>> {
    shifts::table
        .filter(shifts::user_id.eq(user_id.value()))
        .filter(shifts::is_active.eq(true))
        .select(ShiftRow::as_select())
        .first::<ShiftRow>(connection)
        .optional()
        .map_err(StoreError::persistence)
}

#[async_trait]
impl StaffingRepository for PostgresRoster {
    async fn open_shift(&self, user_id: UserId, now: DateTime<Utc>) -> StoreResult<ShiftOpening> {
        self.run_blocking(move |connection| {
            // The partial unique index on (user_id) WHERE is_active closes
            // the window between this check and the insert.
            if let Some(existing) = active_shift_row(connection, user_id)? {
                return Ok(ShiftOpening::AlreadyActive(models::row_to_shift(existing)));
            }
            let inserted: ShiftRow = diesel::insert_into(shifts::table)
                .values((
                    shifts::user_id.eq(user_id.value()),
                    shifts::shift_start.eq(now),
                    shifts::is_active.eq(true),
                    shifts::created_at.eq(now),
                ))
                .get_result(connection)
                .map_err(|err| match err {
                    diesel::result::Error::DatabaseError(
                        diesel::result::DatabaseErrorKind::UniqueViolation,
                        _,
                    ) => StoreError::conflict("shift", "active", user_id.value().to_string()),
                    _ => StoreError::persistence(err),
                })?;
            Ok(ShiftOpening::Opened(models::row_to_shift(inserted)))
        })
        .await
    }

    async fn close_shift(
        &self,
        user_id: UserId,
        now: DateTime<Utc>,
    ) -> StoreResult<Option<Shift>> {
        self.run_blocking(move |connection| {
            let updated: Option<ShiftRow> = diesel::update(
                shifts::table
                    .filter(shifts::user_id.eq(user_id.value()))
                    .filter(shifts::is_active.eq(true)),
            )
            .set((shifts::shift_end.eq(Some(now)), shifts::is_active.eq(false)))
            .get_result(connection)
            .optional()
            .map_err(StoreError::persistence)?;
            Ok(updated.map(models::row_to_shift))
        })
        .await
    }

    async fn find_active_shift(&self, user_id: UserId) -> StoreResult<Option<Shift>> {
        self.run_blocking(move |connection| {
            Ok(active_shift_row(connection, user_id)?.map(models::row_to_shift))
        })
        .await
    }

    async fn remove_shift(&self, id: ShiftId) -> StoreResult<()> {
        self.run_blocking(move |connection| {
            let removed = diesel::delete(shifts::table.filter(shifts::id.eq(id.value())))
                .execute(connection)
                .map_err(StoreError::persistence)?;
            if removed == 0 {
                return Err(StoreError::not_found("shift", id.value()));
            }
            Ok(())
        })
        .await
    }

    async fn restore_shift(&self, shift: Shift) -> StoreResult<Shift> {
        self.run_blocking(move |connection| {
            let updated = diesel::update(shifts::table.filter(shifts::id.eq(shift.id.value())))
                .set((
                    shifts::shift_end.eq(shift.shift_end),
                    shifts::is_active.eq(shift.is_active),
                ))
                .execute(connection)
                .map_err(StoreError::persistence)?;
            if updated == 0 {
                return Err(StoreError::not_found("shift", shift.id.value()));
            }
            Ok(shift)
        })
        .await
    }

    async fn current_availability(
        &self,
        user_id: UserId,
    ) -> StoreResult<Option<StaffAvailability>> {
        self.run_blocking(move |connection| {
            let row = staff_availability::table
                .filter(staff_availability::porter_id.eq(user_id.value()))
                .filter(staff_availability::is_current.eq(true))
                .select(AvailabilityRow::as_select())
                .first::<AvailabilityRow>(connection)
                .optional()
                .map_err(StoreError::persistence)?;
            row.map(models::row_to_availability).transpose()
        })
        .await
    }

    async fn put_availability(
        &self,
        user_id: UserId,
        status: AvailabilityStatus,
        break_request: Option<BreakRequest>,
        now: DateTime<Utc>,
    ) -> StoreResult<StaffAvailability> {
        self.run_blocking(move |connection| {
            diesel::update(
                staff_availability::table
                    .filter(staff_availability::porter_id.eq(user_id.value()))
                    .filter(staff_availability::is_current.eq(true)),
            )
            .set(staff_availability::is_current.eq(false))
            .execute(connection)
            .map_err(StoreError::persistence)?;
            let inserted: AvailabilityRow = diesel::insert_into(staff_availability::table)
                .values((
                    staff_availability::porter_id.eq(user_id.value()),
                    staff_availability::status.eq(status.as_str()),
                    staff_availability::break_requested.eq(break_request.is_some()),
                    staff_availability::break_approval
                        .eq(break_request.map(|r| r.approval.as_str())),
                    staff_availability::break_type_id
                        .eq(break_request.and_then(|r| r.break_type).map(|id| id.value())),
                    staff_availability::is_current.eq(true),
                    staff_availability::updated_at.eq(now),
                ))
                .get_result(connection)
                .map_err(StoreError::persistence)?;
            models::row_to_availability(inserted)
        })
        .await
    }
}
