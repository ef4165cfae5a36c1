//! In-process event bus backed by a Tokio broadcast channel.

use tokio::sync::broadcast;

use super::{DomainEvent, EventPayload};
use crate::types::SubjectId;

/// Fan-out of [`DomainEvent`]s to any number of subscribers.
///
/// Publishing never blocks and never fails; events published with no
/// subscribers are dropped.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<DomainEvent>,
}

impl EventBus {
    /// Create a bus buffering up to `capacity` events per lagging subscriber.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Publish an event.
    pub fn publish(&self, actor_id: Option<SubjectId>, payload: EventPayload) {
        let event = DomainEvent::new(actor_id, payload);
        tracing::debug!(event_id = %event.id, "Domain event published");
        let _ = self.sender.send(event);
    }

    /// Subscribe to all events published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<DomainEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(256)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::SlotEvent;
    use crate::types::SlotId;

    #[tokio::test]
    async fn test_subscriber_receives_published_event() {
        let bus = EventBus::default();
        let mut rx = bus.subscribe();
        let slot_id = SlotId::new();

        bus.publish(
            Some(SubjectId::new("tut-001")),
            EventPayload::Slot(SlotEvent::Unbooked { slot_id }),
        );

        let event = rx.recv().await.expect("event");
        assert_eq!(event.actor_id, Some(SubjectId::new("tut-001")));
        assert!(matches!(
            event.payload,
            EventPayload::Slot(SlotEvent::Unbooked { slot_id: id }) if id == slot_id
        ));
    }

    #[test]
    fn test_publish_without_subscribers_is_silent() {
        let bus = EventBus::new(4);
        bus.publish(
            None,
            EventPayload::Slot(SlotEvent::Unbooked {
                slot_id: SlotId::new(),
            }),
        );
    }
}
