//! Booking state-machine events.

use serde::{Deserialize, Serialize};

use crate::types::{BookingId, SessionId, SubjectId};

/// Events raised by the booking ledger, one per committed transition.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum BookingEvent {
    /// A student requested a seat.
    Requested {
        /// The booking.
        booking_id: BookingId,
        /// Target session.
        session_id: SessionId,
        /// Requesting student.
        student_id: SubjectId,
    },
    /// The tutor confirmed; the seat is enrolled.
    Confirmed {
        /// The booking.
        booking_id: BookingId,
        /// Target session.
        session_id: SessionId,
        /// Enrollment after the confirm.
        enrolled: u32,
    },
    /// The tutor rejected a pending request.
    Rejected {
        /// The booking.
        booking_id: BookingId,
    },
    /// The student cancelled.
    Cancelled {
        /// The booking.
        booking_id: BookingId,
        /// Whether a seat was released.
        released_seat: bool,
    },
    /// The tutor marked the session held.
    Completed {
        /// The booking.
        booking_id: BookingId,
    },
}
