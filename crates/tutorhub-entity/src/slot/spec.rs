//! Tutor-supplied slot input: creation specs and draft patches.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc, Weekday};
use serde::{Deserialize, Serialize};

use tutorhub_core::types::{SlotId, SubjectId};
use tutorhub_core::{AppError, AppResult};

use super::model::Slot;
use super::status::{Recurrence, SlotMode, SlotStatus};
use crate::time_format;

const DEFAULT_DURATION_MINUTES: u32 = 60;
const DEFAULT_CAPACITY: u32 = 1;
const DEFAULT_LEAD_TIME_HOURS: u32 = 24;
const DEFAULT_CANCEL_WINDOW_HOURS: u32 = 12;

/// Input for creating a slot. Absent fields take the platform defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotSpec {
    #[serde(default)]
    pub day: Option<Weekday>,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(with = "time_format")]
    pub start_time: NaiveTime,
    #[serde(default, with = "time_format::option")]
    pub end_time: Option<NaiveTime>,
    #[serde(default, rename = "duration")]
    pub duration_minutes: Option<u32>,
    #[serde(default)]
    pub mode: Option<SlotMode>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub capacity: Option<u32>,
    #[serde(default, rename = "leadTime")]
    pub lead_time_hours: Option<u32>,
    #[serde(default, rename = "cancelWindow")]
    pub cancel_window_hours: Option<u32>,
    #[serde(default)]
    pub recurrence: Option<Recurrence>,
    #[serde(default)]
    pub course_code: Option<String>,
    #[serde(default)]
    pub course_title: Option<String>,
}

impl SlotSpec {
    /// Build an unpublished slot for `tutor_id`, applying defaults and
    /// checking field invariants.
    pub fn into_slot(self, tutor_id: SubjectId, now: DateTime<Utc>) -> AppResult<Slot> {
        let (end_time, duration_minutes) =
            resolve_end(self.start_time, self.end_time, self.duration_minutes)?;

        let slot = Slot {
            id: SlotId::new(),
            tutor_id,
            day: self.day,
            date: self.date,
            start_time: self.start_time,
            end_time,
            duration_minutes,
            mode: self.mode.unwrap_or_default(),
            location: normalize(self.location),
            capacity: self.capacity.unwrap_or(DEFAULT_CAPACITY),
            lead_time_hours: self.lead_time_hours.unwrap_or(DEFAULT_LEAD_TIME_HOURS),
            cancel_window_hours: self
                .cancel_window_hours
                .unwrap_or(DEFAULT_CANCEL_WINDOW_HOURS),
            recurrence: self.recurrence.unwrap_or_default(),
            course_code: normalize(self.course_code),
            course_title: normalize(self.course_title),
            status: SlotStatus::Unpublished,
            booked: false,
            booked_by: None,
            booked_at: None,
            session_id: None,
            created_at: now,
            published_at: None,
            updated_at: None,
        };
        slot.validate()?;
        Ok(slot)
    }
}

/// Partial update for a draft slot. Only present fields change.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotPatch {
    #[serde(default)]
    pub day: Option<Weekday>,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default, with = "time_format::option")]
    pub start_time: Option<NaiveTime>,
    #[serde(default, with = "time_format::option")]
    pub end_time: Option<NaiveTime>,
    #[serde(default, rename = "duration")]
    pub duration_minutes: Option<u32>,
    #[serde(default)]
    pub mode: Option<SlotMode>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub capacity: Option<u32>,
    #[serde(default, rename = "leadTime")]
    pub lead_time_hours: Option<u32>,
    #[serde(default, rename = "cancelWindow")]
    pub cancel_window_hours: Option<u32>,
    #[serde(default)]
    pub recurrence: Option<Recurrence>,
    #[serde(default)]
    pub course_code: Option<String>,
    #[serde(default)]
    pub course_title: Option<String>,
}

impl SlotPatch {
    /// Apply the patch to a copy of `slot` and return it if still valid.
    ///
    /// A new start or duration recomputes the end time unless an end time
    /// is supplied explicitly.
    pub fn apply(&self, slot: &Slot, now: DateTime<Utc>) -> AppResult<Slot> {
        let mut next = slot.clone();

        if let Some(day) = self.day {
            next.day = Some(day);
        }
        if let Some(date) = self.date {
            next.date = Some(date);
        }

        let start_time = self.start_time.unwrap_or(slot.start_time);
        let timing_changed = self.start_time.is_some()
            || self.end_time.is_some()
            || self.duration_minutes.is_some();
        if timing_changed {
            let duration = match (self.duration_minutes, self.end_time) {
                (None, Some(_)) => None,
                (d, _) => Some(d.unwrap_or(slot.duration_minutes)),
            };
            let (end_time, duration_minutes) = resolve_end(start_time, self.end_time, duration)?;
            next.start_time = start_time;
            next.end_time = end_time;
            next.duration_minutes = duration_minutes;
        }

        if let Some(mode) = self.mode {
            next.mode = mode;
        }
        if self.location.is_some() {
            next.location = normalize(self.location.clone());
        }
        if let Some(capacity) = self.capacity {
            next.capacity = capacity;
        }
        if let Some(hours) = self.lead_time_hours {
            next.lead_time_hours = hours;
        }
        if let Some(hours) = self.cancel_window_hours {
            next.cancel_window_hours = hours;
        }
        if let Some(recurrence) = self.recurrence {
            next.recurrence = recurrence;
        }
        if self.course_code.is_some() {
            next.course_code = normalize(self.course_code.clone());
        }
        if self.course_title.is_some() {
            next.course_title = normalize(self.course_title.clone());
        }

        next.updated_at = Some(now);
        next.validate()?;
        Ok(next)
    }
}

/// Reconcile start, end and duration. Missing duration and end default to
/// an hour; an explicit end with no duration derives the duration.
fn resolve_end(
    start: NaiveTime,
    end: Option<NaiveTime>,
    duration_minutes: Option<u32>,
) -> AppResult<(NaiveTime, u32)> {
    match (end, duration_minutes) {
        (Some(end), None) => {
            if end <= start {
                return Err(AppError::validation("Slot must end after it starts"));
            }
            let minutes = (end - start).num_minutes();
            Ok((end, minutes as u32))
        }
        (end, duration) => {
            let minutes = duration.unwrap_or(DEFAULT_DURATION_MINUTES);
            if minutes == 0 {
                return Err(AppError::validation("Duration must be positive"));
            }
            let (computed, overflow) =
                start.overflowing_add_signed(Duration::minutes(i64::from(minutes)));
            if overflow != 0 {
                return Err(AppError::validation("Slot may not run past midnight"));
            }
            if let Some(end) = end
                && end != computed
            {
                return Err(AppError::validation(format!(
                    "End time {} does not match start plus {minutes} minutes",
                    end.format("%H:%M")
                )));
            }
            Ok((computed, minutes))
        }
    }
}

fn normalize(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
