//! Slot lifecycle events.

use serde::{Deserialize, Serialize};

use crate::types::{SessionId, SlotId, SubjectId};

/// Events raised by the slot store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SlotEvent {
    /// A slot was published and its session materialized.
    Published {
        /// The published slot.
        slot_id: SlotId,
        /// The derived session.
        session_id: SessionId,
        /// Owning tutor.
        tutor_id: SubjectId,
        /// Seats offered.
        capacity: u32,
    },
    /// A slot was deleted, cascading to its session if it had one.
    Deleted {
        /// The deleted slot.
        slot_id: SlotId,
        /// The session removed with it.
        session_id: Option<SessionId>,
    },
    /// A slot was marked booked.
    Booked {
        /// The slot.
        slot_id: SlotId,
        /// The student now holding it.
        student_id: SubjectId,
    },
    /// A slot was released.
    Unbooked {
        /// The slot.
        slot_id: SlotId,
    },
}
