//! Booking ledger policy switches.

use serde::{Deserialize, Serialize};

/// Booking-side policy configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingConfig {
    /// Reject new bookings early when the session is evidently full.
    #[serde(default = "default_true")]
    pub preflight_capacity_check: bool,
    /// Reject bookings made closer to the slot start than its lead time.
    #[serde(default)]
    pub enforce_lead_time: bool,
    /// Reject cancellation of confirmed bookings inside the cancel window.
    #[serde(default)]
    pub enforce_cancel_window: bool,
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            preflight_capacity_check: true,
            enforce_lead_time: false,
            enforce_cancel_window: false,
        }
    }
}

fn default_true() -> bool {
    true
}
