//! # tutorhub-store
//!
//! In-memory stores for the booking and availability subsystem. Each store
//! owns its records behind a single `tokio::sync::Mutex`, so every
//! operation is linearized per store. Handles are cheap to clone and are
//! passed explicitly to the services that own them.
//!
//! ## Stores
//!
//! - `slot`: tutor slots, blackout exceptions, and per-tutor policy
//! - `catalog`: sessions and their enrollment counters
//! - `booking`: the booking ledger records and in-flight transition markers
//! - `stats`: denormalized tutor teaching counters

pub mod booking;
pub mod catalog;
pub mod slot;
pub mod stats;

pub use booking::BookingStore;
pub use catalog::SessionCatalog;
pub use slot::SlotStore;
pub use stats::TutorStatsStore;
