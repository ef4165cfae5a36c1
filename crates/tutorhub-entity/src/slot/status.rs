//! Slot status, delivery mode, and recurrence enumerations.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Publication status of a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotStatus {
    /// Draft, visible only to the tutor and still editable.
    #[default]
    Unpublished,
    /// Offered to students through its derived session.
    Published,
}

impl SlotStatus {
    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unpublished => "unpublished",
            Self::Published => "published",
        }
    }
}

impl fmt::Display for SlotStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where the session takes place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotMode {
    /// Remote session.
    #[default]
    Online,
    /// In-person session; requires a location.
    Offline,
}

/// Whether a slot repeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Recurrence {
    /// A single occurrence.
    #[default]
    Once,
    /// Repeats every week on the same day.
    Weekly,
}
