//! Domain events emitted by availability and booking operations.
//!
//! Events are published on the in-process [`EventBus`] and consumed by
//! whoever cares to observe state changes (logging, tests, future
//! notification fan-out).

pub mod booking;
pub mod bus;
pub mod slot;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use booking::BookingEvent;
pub use bus::EventBus;
pub use slot::SlotEvent;

use crate::types::SubjectId;

/// Wrapper for all domain events with metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainEvent {
    /// Unique event ID.
    pub id: Uuid,
    /// When the event occurred.
    pub timestamp: DateTime<Utc>,
    /// The subject who caused the event, if any.
    pub actor_id: Option<SubjectId>,
    /// The event payload.
    pub payload: EventPayload,
}

/// Union of all domain event types.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "domain", content = "event")]
pub enum EventPayload {
    /// A slot lifecycle event.
    Slot(SlotEvent),
    /// A booking state-machine event.
    Booking(BookingEvent),
}

impl DomainEvent {
    /// Create a new domain event.
    pub fn new(actor_id: Option<SubjectId>, payload: EventPayload) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            actor_id,
            payload,
        }
    }
}
