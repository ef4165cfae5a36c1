//! In-process implementation of the sessions RPC contract.
//!
//! Serves the `/internal/*` routes on the sessions side, and is handed to
//! the ledger directly when both sides share a process.

use async_trait::async_trait;

use tutorhub_core::AppResult;
use tutorhub_core::events::{EventBus, EventPayload, SlotEvent};
use tutorhub_core::types::{BookingId, SessionId, SlotId, SubjectId};
use tutorhub_entity::session::{EnrollmentCount, SessionSnapshot};
use tutorhub_entity::slot::Slot;
use tutorhub_store::{SessionCatalog, SlotStore};

use super::client::SessionsClient;

#[derive(Debug, Clone)]
pub struct LocalSessionsClient {
    slots: SlotStore,
    catalog: SessionCatalog,
    events: EventBus,
}

impl LocalSessionsClient {
    pub fn new(slots: SlotStore, catalog: SessionCatalog, events: EventBus) -> Self {
        Self {
            slots,
            catalog,
            events,
        }
    }
}

#[async_trait]
impl SessionsClient for LocalSessionsClient {
    async fn enroll(
        &self,
        session_id: SessionId,
        booking_id: BookingId,
    ) -> AppResult<EnrollmentCount> {
        self.catalog.enroll(session_id, booking_id).await
    }

    async fn unenroll(
        &self,
        session_id: SessionId,
        booking_id: BookingId,
    ) -> AppResult<EnrollmentCount> {
        self.catalog.unenroll(session_id, booking_id).await
    }

    async fn snapshot(&self, session_id: SessionId) -> AppResult<SessionSnapshot> {
        self.catalog.snapshot(session_id).await
    }

    async fn book_slot(
        &self,
        slot_id: SlotId,
        tutor_id: &SubjectId,
        student_id: &SubjectId,
    ) -> AppResult<Slot> {
        let slot = self
            .slots
            .book_slot(slot_id, Some(tutor_id), student_id)
            .await?;
        self.events.publish(
            Some(tutor_id.clone()),
            EventPayload::Slot(SlotEvent::Booked {
                slot_id,
                student_id: student_id.clone(),
            }),
        );
        Ok(slot)
    }

    async fn unbook_slot(&self, slot_id: SlotId, tutor_id: &SubjectId) -> AppResult<Slot> {
        let slot = self.slots.unbook_slot(slot_id, Some(tutor_id)).await?;
        self.events.publish(
            Some(tutor_id.clone()),
            EventPayload::Slot(SlotEvent::Unbooked { slot_id }),
        );
        Ok(slot)
    }

    async fn slot(&self, slot_id: SlotId) -> AppResult<Slot> {
        self.slots.get_slot(slot_id).await
    }
}
