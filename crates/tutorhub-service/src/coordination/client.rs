//! The internal RPC contract of the sessions side.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use tutorhub_core::AppResult;
use tutorhub_core::types::{BookingId, SessionId, SlotId, SubjectId};
use tutorhub_entity::session::{EnrollmentCount, SessionSnapshot};
use tutorhub_entity::slot::Slot;

/// Operations the bookings side may invoke on slots and sessions.
///
/// Every mutation is idempotent at the receiving store. Seats are keyed by
/// booking id, so a retry after a lost response takes or releases nothing
/// twice.
#[async_trait]
pub trait SessionsClient: Send + Sync + std::fmt::Debug {
    /// Take a seat for `booking_id`; `Full` at capacity.
    async fn enroll(
        &self,
        session_id: SessionId,
        booking_id: BookingId,
    ) -> AppResult<EnrollmentCount>;

    /// Release the seat held by `booking_id`, if any.
    async fn unenroll(
        &self,
        session_id: SessionId,
        booking_id: BookingId,
    ) -> AppResult<EnrollmentCount>;

    async fn snapshot(&self, session_id: SessionId) -> AppResult<SessionSnapshot>;

    async fn book_slot(
        &self,
        slot_id: SlotId,
        tutor_id: &SubjectId,
        student_id: &SubjectId,
    ) -> AppResult<Slot>;

    /// Clear the slot's booking; unbooking an unbooked slot succeeds.
    async fn unbook_slot(&self, slot_id: SlotId, tutor_id: &SubjectId) -> AppResult<Slot>;

    async fn slot(&self, slot_id: SlotId) -> AppResult<Slot>;
}

/// Body of `POST /internal/enroll/{sessionId}` and `/internal/unenroll/{sessionId}`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeatRequest {
    pub booking_id: BookingId,
}

/// Body of `PUT /internal/slots/{slotId}/book`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookSlotRequest {
    pub tutor_id: SubjectId,
    pub student_id: SubjectId,
}

/// Body of `PUT /internal/slots/{slotId}/unbook`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnbookSlotRequest {
    pub tutor_id: SubjectId,
}
