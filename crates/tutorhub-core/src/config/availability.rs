//! Default tutor availability policy.

use serde::{Deserialize, Serialize};

/// Limits applied to a tutor's slots unless the tutor overrides them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityConfig {
    /// Earliest hour of day (0-23) a slot may start.
    #[serde(default = "default_allowed_hours_start")]
    pub allowed_hours_start: u32,
    /// Latest hour of day (1-24) a slot may end.
    #[serde(default = "default_allowed_hours_end")]
    pub allowed_hours_end: u32,
    /// Maximum slots on a single day.
    #[serde(default = "default_max_slots_per_day")]
    pub max_slots_per_day: u32,
    /// Maximum slots a tutor may hold in total.
    #[serde(default = "default_max_slots_per_week")]
    pub max_slots_per_week: u32,
}

impl Default for AvailabilityConfig {
    fn default() -> Self {
        Self {
            allowed_hours_start: default_allowed_hours_start(),
            allowed_hours_end: default_allowed_hours_end(),
            max_slots_per_day: default_max_slots_per_day(),
            max_slots_per_week: default_max_slots_per_week(),
        }
    }
}

fn default_allowed_hours_start() -> u32 {
    7
}

fn default_allowed_hours_end() -> u32 {
    22
}

fn default_max_slots_per_day() -> u32 {
    8
}

fn default_max_slots_per_week() -> u32 {
    30
}
