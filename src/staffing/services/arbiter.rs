//! Availability and break arbitration.
//!
//! Clock-in and clock-out bound a porter's staffed period; break requests
//! move through an explicit pending/approved/rejected cycle. Clock-out never
//! blocks on the porter's workload, but it reports every task still open
//! against them so a coordinator can reassign.
//!
//! The audit append is the commit point of record. When it fails the shift
//! and availability writes are rolled back and the caller sees
//! [`StaffingServiceError::AuditPersistence`].

use std::sync::Arc;

use chrono::{DateTime, Utc};
use mockable::Clock;
use thiserror::Error;
use tracing::{info, warn};

use crate::audit::domain::AuditEntry;
use crate::audit::ports::AuditSink;
use crate::directory::domain::{BreakTypeId, UserId};
use crate::staffing::domain::{
    AvailabilityStatus, BreakApproval, BreakRequest, Shift, StaffAvailability,
};
use crate::staffing::ports::{ShiftOpening, StaffingRepository};
use crate::store::StoreError;
use crate::task::domain::{TaskId, TaskStatus};
use crate::task::ports::TaskRepository;

/// A task still open against a porter at clock-out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReassignmentAdvisory {
    /// The open task.
    pub task_id: TaskId,
    /// Its status at clock-out.
    pub status: TaskStatus,
}

/// Result of a clock-out: the closed shift plus any open-task advisories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClockOutSummary {
    /// The shift that was closed.
    pub shift: Shift,
    /// Tasks still assigned to the porter in a non-terminal status. The
    /// clock-out itself never reassigns them.
    pub advisories: Vec<ReassignmentAdvisory>,
}

/// Errors surfaced by [`AvailabilityService`].
#[derive(Debug, Error)]
pub enum StaffingServiceError {
    /// Clock-in with a shift already open.
    #[error("user {0} already has an active shift")]
    AlreadyActiveShift(UserId),
    /// Clock-out with no shift open.
    #[error("user {0} has no active shift")]
    NoActiveShift(UserId),
    /// A break operation in a status that does not permit it.
    #[error("user {user_id} is {status}; {operation} requires {required}")]
    InvalidState {
        /// The affected porter.
        user_id: UserId,
        /// Their current status.
        status: AvailabilityStatus,
        /// The rejected operation.
        operation: &'static str,
        /// The status the operation requires.
        required: &'static str,
    },
    /// A break resolution with no pending request to resolve.
    #[error("user {0} has no pending break request")]
    NoPendingBreak(UserId),
    /// A repository failure.
    #[error(transparent)]
    Repository(#[from] StoreError),
    /// The audit record could not be persisted; the originating mutation
    /// was rolled back.
    #[error("mutation rolled back: audit record could not be persisted")]
    AuditPersistence(#[source] StoreError),
}

/// Arbitrates shifts, availability, and break requests.
#[derive(Debug)]
pub struct AvailabilityService<R, T, A, C> {
    roster: Arc<R>,
    tasks: Arc<T>,
    audit: Arc<A>,
    clock: Arc<C>,
}

impl<R, T, A, C> AvailabilityService<R, T, A, C>
where
    R: StaffingRepository,
    T: TaskRepository,
    A: AuditSink,
    C: Clock,
{
    /// Creates a service over the given ports.
    pub fn new(roster: Arc<R>, tasks: Arc<T>, audit: Arc<A>, clock: Arc<C>) -> Self {
        Self {
            roster,
            tasks,
            audit,
            clock,
        }
    }

    /// Opens a shift and marks the porter on duty.
    ///
    /// # Errors
    ///
    /// Returns [`StaffingServiceError::AlreadyActiveShift`] when a shift is
    /// already open, [`StaffingServiceError::AuditPersistence`] on a failed
    /// audit append (the shift is discarded again), and repository errors
    /// otherwise.
    pub async fn clock_in(&self, user_id: UserId) -> Result<Shift, StaffingServiceError> {
        let now = self.clock.utc();
        let prior = self.roster.current_availability(user_id).await?;
        let shift = match self.roster.open_shift(user_id, now).await? {
            ShiftOpening::Opened(shift) => shift,
            ShiftOpening::AlreadyActive(_) => {
                return Err(StaffingServiceError::AlreadyActiveShift(user_id));
            }
        };
        self.roster
            .put_availability(user_id, AvailabilityStatus::OnDuty, None, now)
            .await?;
        if let Err(err) = self
            .audit
            .record(AuditEntry::new("staffing.clocked_in", user_id))
            .await
        {
            self.roster.remove_shift(shift.id).await?;
            self.restore_availability(user_id, prior.as_ref(), now).await?;
            return Err(StaffingServiceError::AuditPersistence(err));
        }
        info!(user_id = %user_id, shift_id = %shift.id, "shift opened");
        Ok(shift)
    }

    /// Closes the porter's shift and marks them off duty.
    ///
    /// Tasks still open against the porter are reported as advisories, never
    /// reassigned here.
    ///
    /// # Errors
    ///
    /// Returns [`StaffingServiceError::NoActiveShift`] when no shift is open,
    /// [`StaffingServiceError::AuditPersistence`] on a failed audit append
    /// (the shift is reopened), and repository errors otherwise.
    pub async fn clock_out(
        &self,
        user_id: UserId,
    ) -> Result<ClockOutSummary, StaffingServiceError> {
        let now = self.clock.utc();
        let advisories: Vec<ReassignmentAdvisory> = self
            .tasks
            .list_active_for_receiver(user_id)
            .await?
            .into_iter()
            .map(|task| ReassignmentAdvisory {
                task_id: task.id,
                status: task.status,
            })
            .collect();
        let prior = self.roster.current_availability(user_id).await?;
        let Some(shift) = self.roster.close_shift(user_id, now).await? else {
            return Err(StaffingServiceError::NoActiveShift(user_id));
        };
        self.roster
            .put_availability(user_id, AvailabilityStatus::OffDuty, None, now)
            .await?;
        if !advisories.is_empty() {
            warn!(
                user_id = %user_id,
                open_tasks = advisories.len(),
                "porter clocked out with open tasks"
            );
        }
        if let Err(err) = self
            .audit
            .record(
                AuditEntry::new("staffing.clocked_out", user_id)
                    .with_details(format!("{} open task(s) at clock-out", advisories.len())),
            )
            .await
        {
            let reopened = Shift {
                shift_end: None,
                is_active: true,
                ..shift.clone()
            };
            self.roster.restore_shift(reopened).await?;
            self.restore_availability(user_id, prior.as_ref(), now).await?;
            return Err(StaffingServiceError::AuditPersistence(err));
        }
        info!(user_id = %user_id, shift_id = %shift.id, "shift closed");
        Ok(ClockOutSummary { shift, advisories })
    }

    /// Files a pending break request for an on-duty porter.
    ///
    /// # Errors
    ///
    /// Returns [`StaffingServiceError::InvalidState`] unless the porter is on
    /// duty with no break request already pending, and
    /// [`StaffingServiceError::AuditPersistence`] on a failed audit append
    /// (the request is withdrawn again).
    pub async fn request_break(
        &self,
        user_id: UserId,
        break_type: Option<BreakTypeId>,
    ) -> Result<StaffAvailability, StaffingServiceError> {
        let now = self.clock.utc();
        let current = self.availability_or_off_duty(user_id).await?;
        if current.status != AvailabilityStatus::OnDuty || current.break_pending() {
            return Err(StaffingServiceError::InvalidState {
                user_id,
                status: current.status,
                operation: "break request",
                required: "on duty with no pending request",
            });
        }
        let record = self
            .roster
            .put_availability(
                user_id,
                AvailabilityStatus::OnDuty,
                Some(BreakRequest::pending(break_type)),
                now,
            )
            .await?;
        if let Err(err) = self
            .audit
            .record(AuditEntry::new("staffing.break_requested", user_id))
            .await
        {
            self.restore_availability(user_id, Some(&current), now).await?;
            return Err(StaffingServiceError::AuditPersistence(err));
        }
        Ok(record)
    }

    /// Resolves a pending break request.
    ///
    /// Approval moves the porter on break; rejection keeps them on duty. The
    /// porter is notified of the outcome either way; the notification is
    /// best effort and a failure after the audited resolution is logged, not
    /// returned.
    ///
    /// # Errors
    ///
    /// Returns [`StaffingServiceError::NoPendingBreak`] when there is nothing
    /// to resolve, and [`StaffingServiceError::AuditPersistence`] on a
    /// failed audit append (the request returns to pending).
    pub async fn resolve_break(
        &self,
        supervisor: UserId,
        user_id: UserId,
        approve: bool,
    ) -> Result<StaffAvailability, StaffingServiceError> {
        let now = self.clock.utc();
        let current = self.availability_or_off_duty(user_id).await?;
        let Some(request) = current.break_request.filter(|_| current.break_pending()) else {
            return Err(StaffingServiceError::NoPendingBreak(user_id));
        };
        let (status, approval, action, outcome) = if approve {
            (
                AvailabilityStatus::OnBreak,
                BreakApproval::Approved,
                "staffing.break_approved",
                "approved",
            )
        } else {
            (
                AvailabilityStatus::OnDuty,
                BreakApproval::Rejected,
                "staffing.break_rejected",
                "rejected",
            )
        };
        let record = self
            .roster
            .put_availability(
                user_id,
                status,
                Some(BreakRequest {
                    break_type: request.break_type,
                    approval,
                }),
                now,
            )
            .await?;
        if let Err(err) = self
            .audit
            .record(
                AuditEntry::new(action, supervisor)
                    .with_details(format!("break request for user {user_id} {outcome}")),
            )
            .await
        {
            self.restore_availability(user_id, Some(&current), now).await?;
            return Err(StaffingServiceError::AuditPersistence(err));
        }
        if let Err(err) = self
            .audit
            .notify(user_id, None, format!("Your break request was {outcome}"))
            .await
        {
            warn!(user_id = %user_id, error = %err, "break outcome notification failed after commit");
        }
        Ok(record)
    }

    /// Ends an approved break, returning the porter to duty.
    ///
    /// # Errors
    ///
    /// Returns [`StaffingServiceError::InvalidState`] unless the porter is on
    /// break, and [`StaffingServiceError::AuditPersistence`] on a failed
    /// audit append (the break resumes).
    pub async fn end_break(
        &self,
        user_id: UserId,
    ) -> Result<StaffAvailability, StaffingServiceError> {
        let now = self.clock.utc();
        let current = self.availability_or_off_duty(user_id).await?;
        if current.status != AvailabilityStatus::OnBreak {
            return Err(StaffingServiceError::InvalidState {
                user_id,
                status: current.status,
                operation: "break end",
                required: "on break",
            });
        }
        let record = self
            .roster
            .put_availability(user_id, AvailabilityStatus::OnDuty, None, now)
            .await?;
        if let Err(err) = self
            .audit
            .record(AuditEntry::new("staffing.break_ended", user_id))
            .await
        {
            self.restore_availability(user_id, Some(&current), now).await?;
            return Err(StaffingServiceError::AuditPersistence(err));
        }
        Ok(record)
    }

    /// Returns the porter's current availability record.
    ///
    /// # Errors
    ///
    /// Returns repository errors.
    pub async fn availability(
        &self,
        user_id: UserId,
    ) -> Result<Option<StaffAvailability>, StaffingServiceError> {
        Ok(self.roster.current_availability(user_id).await?)
    }

    /// Rewrites the porter's current availability from a captured prior
    /// record, or back to off duty when none existed.
    async fn restore_availability(
        &self,
        user_id: UserId,
        prior: Option<&StaffAvailability>,
        now: DateTime<Utc>,
    ) -> Result<(), StaffingServiceError> {
        let (status, break_request) = prior.map_or((AvailabilityStatus::OffDuty, None), |record| {
            (record.status, record.break_request)
        });
        self.roster
            .put_availability(user_id, status, break_request, now)
            .await?;
        Ok(())
    }

    /// Loads the current record, synthesizing an off-duty view for porters
    /// that have never been staffed.
    async fn availability_or_off_duty(
        &self,
        user_id: UserId,
    ) -> Result<StaffAvailability, StaffingServiceError> {
        match self.roster.current_availability(user_id).await? {
            Some(record) => Ok(record),
            None => Ok(StaffAvailability {
                id: crate::staffing::domain::AvailabilityId::new(0),
                porter_id: user_id,
                status: AvailabilityStatus::OffDuty,
                break_request: None,
                updated_at: self.clock.utc(),
            }),
        }
    }
}
