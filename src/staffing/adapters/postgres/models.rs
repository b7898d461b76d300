//! Diesel row models for staffing persistence.

use super::schema::{shifts, staff_availability};
use crate::directory::domain::{BreakTypeId, UserId};
use crate::staffing::domain::{
    AvailabilityId, AvailabilityStatus, BreakApproval, BreakRequest, Shift, ShiftId,
    StaffAvailability,
};
use crate::store::{StoreError, StoreResult};
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for shifts.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = shifts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ShiftRow {
    pub id: i64,
    pub user_id: i64,
    pub shift_start: DateTime<Utc>,
    pub shift_end: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Query result row for availability records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = staff_availability)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct AvailabilityRow {
    pub id: i64,
    pub porter_id: i64,
    pub status: String,
    pub break_requested: bool,
    pub break_approval: Option<String>,
    pub break_type_id: Option<i64>,
    pub is_current: bool,
    pub updated_at: DateTime<Utc>,
}

pub fn row_to_shift(row: ShiftRow) -> Shift {
    Shift {
        id: ShiftId::new(row.id),
        user_id: UserId::new(row.user_id),
        shift_start: row.shift_start,
        shift_end: row.shift_end,
        is_active: row.is_active,
        created_at: row.created_at,
    }
}

pub fn row_to_availability(row: AvailabilityRow) -> StoreResult<StaffAvailability> {
    let break_request = if row.break_requested {
        let approval = match row.break_approval.as_deref() {
            Some("pending") | None => BreakApproval::Pending,
            Some("approved") => BreakApproval::Approved,
            Some("rejected") => BreakApproval::Rejected,
            Some(other) => {
                return Err(StoreError::persistence(std::io::Error::other(format!(
                    "unrecognized break approval: {other}"
                ))));
            }
        };
        Some(BreakRequest {
            break_type: row.break_type_id.map(BreakTypeId::new),
            approval,
        })
    } else {
        None
    };
    Ok(StaffAvailability {
        id: AvailabilityId::new(row.id),
        porter_id: UserId::new(row.porter_id),
        status: AvailabilityStatus::try_from(row.status.as_str())
            .map_err(StoreError::persistence)?,
        break_request,
        updated_at: row.updated_at,
    })
}
