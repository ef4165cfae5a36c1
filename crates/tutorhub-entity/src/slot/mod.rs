//! Availability slot entities.

pub mod model;
pub mod spec;
pub mod status;

pub use model::{Slot, SlotDescriptor};
pub use spec::{SlotPatch, SlotSpec};
pub use status::{Recurrence, SlotMode, SlotStatus};
