//! Per-tutor availability limits.

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use tutorhub_core::config::AvailabilityConfig;
use tutorhub_core::{AppError, AppResult};

/// Limits checked whenever a tutor adds a slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityPolicy {
    /// Earliest hour a slot may start.
    pub allowed_hours_start: u32,
    /// Latest hour a slot may end.
    pub allowed_hours_end: u32,
    pub max_slots_per_day: u32,
    pub max_slots_per_week: u32,
}

impl AvailabilityPolicy {
    /// Reject windows that are empty or extend past 24:00.
    pub fn validate(&self) -> AppResult<()> {
        if self.allowed_hours_start >= self.allowed_hours_end || self.allowed_hours_end > 24 {
            return Err(AppError::validation(format!(
                "Invalid allowed hours {}..{}",
                self.allowed_hours_start, self.allowed_hours_end
            )));
        }
        if self.max_slots_per_day == 0 || self.max_slots_per_week == 0 {
            return Err(AppError::validation("Slot limits must be at least 1"));
        }
        Ok(())
    }

    /// Whether `start..end` lies inside the allowed hours.
    pub fn check_hours(&self, start: NaiveTime, end: NaiveTime) -> AppResult<()> {
        let start_minutes = start.hour() * 60 + start.minute();
        let end_minutes = end.hour() * 60 + end.minute();
        if start_minutes < self.allowed_hours_start * 60
            || end_minutes > self.allowed_hours_end * 60
        {
            return Err(AppError::policy_violation(format!(
                "Slots must fall between {:02}:00 and {:02}:00",
                self.allowed_hours_start, self.allowed_hours_end
            )));
        }
        Ok(())
    }
}

impl From<&AvailabilityConfig> for AvailabilityPolicy {
    fn from(config: &AvailabilityConfig) -> Self {
        Self {
            allowed_hours_start: config.allowed_hours_start,
            allowed_hours_end: config.allowed_hours_end,
            max_slots_per_day: config.max_slots_per_day,
            max_slots_per_week: config.max_slots_per_week,
        }
    }
}

impl Default for AvailabilityPolicy {
    fn default() -> Self {
        Self::from(&AvailabilityConfig::default())
    }
}
