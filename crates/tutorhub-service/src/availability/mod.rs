//! Tutor availability management.

pub mod service;

pub use service::{AvailabilityOverview, AvailabilityService, PublishedSlot};
