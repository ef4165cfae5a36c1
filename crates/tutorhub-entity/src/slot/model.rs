//! Slot entity model.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Utc, Weekday};
use serde::{Deserialize, Serialize};

use tutorhub_core::types::{SessionId, SlotId, SubjectId};
use tutorhub_core::{AppError, AppResult};

use super::status::{Recurrence, SlotMode, SlotStatus};
use crate::time_format;

/// A tutor-defined bookable time window.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Slot {
    /// Unique slot identifier.
    pub id: SlotId,
    /// Owning tutor.
    pub tutor_id: SubjectId,
    /// Day of week for weekly or undated slots.
    pub day: Option<Weekday>,
    /// Explicit calendar date for one-off slots.
    pub date: Option<NaiveDate>,
    /// Start time of day.
    #[serde(with = "time_format")]
    pub start_time: NaiveTime,
    /// End time of day.
    #[serde(with = "time_format")]
    pub end_time: NaiveTime,
    /// Length in minutes.
    #[serde(rename = "duration")]
    pub duration_minutes: u32,
    /// Online or offline.
    pub mode: SlotMode,
    /// Room or address; required for offline slots.
    pub location: Option<String>,
    /// Seats offered (at least 1).
    pub capacity: u32,
    /// Minimum notice for a booking, in hours.
    #[serde(rename = "leadTime")]
    pub lead_time_hours: u32,
    /// Cancellation cut-off before start, in hours.
    #[serde(rename = "cancelWindow")]
    pub cancel_window_hours: u32,
    /// Once or weekly.
    pub recurrence: Recurrence,
    /// Course code carried into the derived session.
    pub course_code: Option<String>,
    /// Course title carried into the derived session.
    pub course_title: Option<String>,
    /// Publication status.
    pub status: SlotStatus,
    /// Whether a confirmed booking holds the slot.
    pub booked: bool,
    /// Student holding the slot.
    pub booked_by: Option<SubjectId>,
    /// When the slot was booked.
    pub booked_at: Option<DateTime<Utc>>,
    /// Session derived at publish time.
    pub session_id: Option<SessionId>,
    /// When the slot was created.
    pub created_at: DateTime<Utc>,
    /// When the slot was first published.
    pub published_at: Option<DateTime<Utc>>,
    /// Last edit.
    pub updated_at: Option<DateTime<Utc>>,
}

impl Slot {
    /// Whether the slot is offered to students.
    pub fn is_published(&self) -> bool {
        self.status == SlotStatus::Published
    }

    /// Deletion is refused while a booking holds the slot.
    pub fn ensure_deletable(&self) -> AppResult<()> {
        if self.booked {
            return Err(AppError::invalid_state(format!(
                "Slot {} is booked and cannot be deleted",
                self.id
            )));
        }
        Ok(())
    }

    /// Edits are allowed only on unbooked drafts.
    pub fn ensure_editable(&self) -> AppResult<()> {
        if self.booked {
            return Err(AppError::invalid_state(format!(
                "Slot {} is booked and cannot be edited",
                self.id
            )));
        }
        if self.is_published() {
            return Err(AppError::invalid_state(format!(
                "Slot {} is published and cannot be edited",
                self.id
            )));
        }
        Ok(())
    }

    /// The day of week the slot falls on.
    pub fn weekday(&self) -> Option<Weekday> {
        self.date.map(|d| d.weekday()).or(self.day)
    }

    /// Check field-level invariants.
    pub fn validate(&self) -> AppResult<()> {
        if self.capacity < 1 {
            return Err(AppError::validation("Capacity must be at least 1"));
        }
        if self.duration_minutes == 0 {
            return Err(AppError::validation("Duration must be positive"));
        }
        if self.day.is_none() && self.date.is_none() {
            return Err(AppError::validation("A slot needs a day of week or a date"));
        }
        if self.mode == SlotMode::Offline
            && self.location.as_deref().is_none_or(|l| l.trim().is_empty())
        {
            return Err(AppError::validation("Offline slots require a location"));
        }
        if self.end_time <= self.start_time {
            return Err(AppError::validation("Slot must end after it starts"));
        }
        Ok(())
    }

    /// The schedule facts a session and its bookings need.
    pub fn descriptor(&self) -> SlotDescriptor {
        SlotDescriptor {
            slot_id: self.id,
            day: self.weekday(),
            date: self.date,
            start_time: self.start_time,
            end_time: self.end_time,
            duration_minutes: self.duration_minutes,
            mode: self.mode,
            location: self.location.clone(),
            lead_time_hours: self.lead_time_hours,
            cancel_window_hours: self.cancel_window_hours,
            recurrence: self.recurrence,
        }
    }
}

/// Schedule summary of a slot, embedded in sessions and copied onto bookings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotDescriptor {
    /// Source slot.
    pub slot_id: SlotId,
    /// Day of week.
    pub day: Option<Weekday>,
    /// Explicit date, if one-off.
    pub date: Option<NaiveDate>,
    /// Start time.
    #[serde(with = "time_format")]
    pub start_time: NaiveTime,
    /// End time.
    #[serde(with = "time_format")]
    pub end_time: NaiveTime,
    /// Length in minutes.
    #[serde(rename = "duration")]
    pub duration_minutes: u32,
    /// Online or offline.
    pub mode: SlotMode,
    /// Location for offline slots.
    pub location: Option<String>,
    /// Lead time in hours.
    #[serde(rename = "leadTime")]
    pub lead_time_hours: u32,
    /// Cancel window in hours.
    #[serde(rename = "cancelWindow")]
    pub cancel_window_hours: u32,
    /// Once or weekly.
    pub recurrence: Recurrence,
}

impl SlotDescriptor {
    /// The next time this slot starts at or after `now`.
    ///
    /// Dated slots return their single start even if it already passed.
    pub fn next_start(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        if let Some(date) = self.date {
            return Some(date.and_time(self.start_time).and_utc());
        }
        let day = self.day?;
        let today = now.date_naive();
        let ahead = (7 + day.num_days_from_monday() as i64
            - today.weekday().num_days_from_monday() as i64)
            % 7;
        let candidate = (today + Duration::days(ahead))
            .and_time(self.start_time)
            .and_utc();
        if candidate < now {
            Some(candidate + Duration::days(7))
        } else {
            Some(candidate)
        }
    }
}
