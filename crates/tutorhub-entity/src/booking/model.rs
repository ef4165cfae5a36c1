//! Booking entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use tutorhub_core::types::{BookingId, SessionId, SlotId, SubjectId};
use tutorhub_core::{AppError, AppResult};

use super::status::BookingStatus;
use crate::slot::SlotDescriptor;

/// A student's claim on a session, and optionally on its slot.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: BookingId,
    pub session_id: SessionId,
    pub slot_id: Option<SlotId>,
    /// Tutor running the session, copied from the session at creation.
    pub tutor_id: SubjectId,
    pub student_id: SubjectId,
    pub student_name: Option<String>,
    pub student_email: Option<String>,
    pub message: Option<String>,
    pub status: BookingStatus,
    /// Schedule copied from the session at creation.
    pub schedule: Option<SlotDescriptor>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub confirmed_at: Option<DateTime<Utc>>,
    pub confirmed_by: Option<SubjectId>,
    pub rejected_at: Option<DateTime<Utc>>,
    pub rejected_by: Option<SubjectId>,
    pub reject_reason: Option<String>,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub cancelled_by: Option<SubjectId>,
    pub cancel_reason: Option<String>,
    pub completed_at: Option<DateTime<Utc>>,
    pub completed_by: Option<SubjectId>,
}

/// Data required to open a pending booking.
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub session_id: SessionId,
    pub slot_id: Option<SlotId>,
    pub tutor_id: SubjectId,
    pub student_id: SubjectId,
    pub student_name: Option<String>,
    pub student_email: Option<String>,
    pub message: Option<String>,
    pub schedule: Option<SlotDescriptor>,
}

impl Booking {
    /// Open a pending booking.
    pub fn pending(new: NewBooking, now: DateTime<Utc>) -> Self {
        Self {
            id: BookingId::new(),
            session_id: new.session_id,
            slot_id: new.slot_id,
            tutor_id: new.tutor_id,
            student_id: new.student_id,
            student_name: new.student_name,
            student_email: new.student_email,
            message: new.message,
            status: BookingStatus::Pending,
            schedule: new.schedule,
            created_at: now,
            updated_at: None,
            confirmed_at: None,
            confirmed_by: None,
            rejected_at: None,
            rejected_by: None,
            reject_reason: None,
            cancelled_at: None,
            cancelled_by: None,
            cancel_reason: None,
            completed_at: None,
            completed_by: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    /// Fail with `InvalidState` unless `next` is reachable from the current status.
    pub fn ensure_transition(&self, next: BookingStatus) -> AppResult<()> {
        if self.status.can_transition_to(next) {
            Ok(())
        } else {
            Err(AppError::invalid_state(format!(
                "Booking {} is {} and cannot become {}",
                self.id, self.status, next
            )))
        }
    }

    pub fn ensure_tutor(&self, tutor_id: &SubjectId) -> AppResult<()> {
        if &self.tutor_id != tutor_id {
            return Err(AppError::authorization(format!(
                "Booking {} belongs to another tutor",
                self.id
            )));
        }
        Ok(())
    }

    pub fn ensure_student(&self, student_id: &SubjectId) -> AppResult<()> {
        if &self.student_id != student_id {
            return Err(AppError::authorization(format!(
                "Booking {} belongs to another student",
                self.id
            )));
        }
        Ok(())
    }

    /// Record a transition to `next` made by `actor`.
    ///
    /// Callers check [`Booking::ensure_transition`] first.
    pub fn mark(
        &mut self,
        next: BookingStatus,
        actor: &SubjectId,
        reason: Option<String>,
        now: DateTime<Utc>,
    ) {
        let actor = Some(actor.clone());
        match next {
            BookingStatus::Confirmed => {
                self.confirmed_at = Some(now);
                self.confirmed_by = actor;
            }
            BookingStatus::Rejected => {
                self.rejected_at = Some(now);
                self.rejected_by = actor;
                self.reject_reason = reason;
            }
            BookingStatus::Cancelled => {
                self.cancelled_at = Some(now);
                self.cancelled_by = actor;
                self.cancel_reason = reason;
            }
            BookingStatus::Completed => {
                self.completed_at = Some(now);
                self.completed_by = actor;
            }
            BookingStatus::Pending => {}
        }
        self.status = next;
        self.updated_at = Some(now);
    }
}
