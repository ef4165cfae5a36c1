//! Booking entities and the booking state machine.

pub mod model;
pub mod status;

pub use model::{Booking, NewBooking};
pub use status::BookingStatus;
