//! # tutorhub-entity
//!
//! Domain entity models for TutorHub. Every struct in this crate is either
//! a stored record (slot, exception, session, booking, tutor stats) or a
//! value object exchanged between the sessions and bookings sides. All
//! entities derive `Debug`, `Clone`, `Serialize`, and `Deserialize`, and
//! serialize in the camelCase shape the web client expects.

pub mod booking;
pub mod exception;
pub mod policy;
pub mod role;
pub mod session;
pub mod slot;
pub mod time_format;
pub mod tutor;
