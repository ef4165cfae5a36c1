//! Route handlers organized by domain.

pub mod availability;
pub mod bookings;
pub mod health;
pub mod internal;
pub mod sessions;
pub mod tutor;
