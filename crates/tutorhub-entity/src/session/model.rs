//! Session entity model and its seat holders.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use tutorhub_core::types::{BookingId, SessionId, SlotId, SubjectId};
use tutorhub_core::{AppError, AppResult};

use crate::slot::{Slot, SlotDescriptor, SlotMode};

/// Seat availability of a session, derived from its holders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    #[default]
    Open,
    Full,
}

/// The bookable unit derived from a published slot.
///
/// Each seat is held by one booking. `enrolled` is always `holders.len()`
/// and stays within `0..=capacity`; both only move through
/// [`Session::try_enroll`] and [`Session::unenroll`], so repeating either
/// for the same booking changes nothing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: SessionId,
    pub tutor_id: SubjectId,
    pub tutor_name: Option<String>,
    pub course_code: Option<String>,
    pub course_title: Option<String>,
    pub capacity: u32,
    pub enrolled: u32,
    pub status: SessionStatus,
    /// Bookings currently holding a seat.
    #[serde(default, skip_serializing)]
    pub holders: BTreeSet<BookingId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    /// Schedule of the slot(s) this session runs in.
    pub slots: Vec<SlotDescriptor>,
    /// The slot this session was published from.
    pub source_slot_id: Option<SlotId>,
}

impl Session {
    /// Materialize the session for a freshly published slot.
    pub fn from_slot(slot: &Slot, tutor_name: Option<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: SessionId::for_slot(slot.id),
            tutor_id: slot.tutor_id.clone(),
            tutor_name,
            course_code: slot.course_code.clone(),
            course_title: slot.course_title.clone(),
            capacity: slot.capacity,
            enrolled: 0,
            status: SessionStatus::Open,
            holders: BTreeSet::new(),
            created_at: now,
            updated_at: None,
            slots: vec![slot.descriptor()],
            source_slot_id: Some(slot.id),
        }
    }

    pub fn holds(&self, booking_id: BookingId) -> bool {
        self.holders.contains(&booking_id)
    }

    /// Seats still open.
    pub fn available_seats(&self) -> u32 {
        self.capacity.saturating_sub(self.enrolled)
    }

    /// Delivery mode of the first scheduled slot.
    pub fn mode(&self) -> Option<SlotMode> {
        self.slots.first().map(|s| s.mode)
    }

    /// Take a seat for `booking_id`, returning the enrolled count.
    ///
    /// A booking that already holds a seat gets the current count back.
    pub fn try_enroll(&mut self, booking_id: BookingId, now: DateTime<Utc>) -> AppResult<u32> {
        if self.holds(booking_id) {
            return Ok(self.enrolled);
        }
        if self.enrolled >= self.capacity {
            return Err(AppError::full(format!(
                "Session {} is full ({}/{})",
                self.id, self.enrolled, self.capacity
            )));
        }
        self.holders.insert(booking_id);
        self.touch(now);
        Ok(self.enrolled)
    }

    /// Release the seat held by `booking_id`, if any.
    pub fn unenroll(&mut self, booking_id: BookingId, now: DateTime<Utc>) -> u32 {
        if self.holders.remove(&booking_id) {
            self.touch(now);
        }
        self.enrolled
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.enrolled = self.holders.len() as u32;
        self.status = if self.enrolled >= self.capacity {
            SessionStatus::Full
        } else {
            SessionStatus::Open
        };
        self.updated_at = Some(now);
    }
}
