//! Slot lifecycle, blackout exceptions, and publishing into the catalog.

use serde::Serialize;
use tracing::info;

use tutorhub_core::AppResult;
use tutorhub_core::events::{EventBus, EventPayload, SlotEvent};
use tutorhub_core::types::{ExceptionId, SlotId};
use tutorhub_entity::exception::{AvailabilityException, ExceptionSpec};
use tutorhub_entity::policy::AvailabilityPolicy;
use tutorhub_entity::role::SubjectRole;
use tutorhub_entity::session::Session;
use tutorhub_entity::slot::{Slot, SlotPatch, SlotSpec};
use tutorhub_store::{SessionCatalog, SlotStore};

use crate::context::RequestContext;

/// Everything a tutor sees on the availability page.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityOverview {
    pub slots: Vec<Slot>,
    pub exceptions: Vec<AvailabilityException>,
    pub policy: AvailabilityPolicy,
    /// Number of published slots.
    pub week_usage: usize,
}

/// A published slot together with its catalog session.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishedSlot {
    pub slot: Slot,
    pub session: Session,
}

/// Tutor-facing availability service on the sessions side.
#[derive(Debug, Clone)]
pub struct AvailabilityService {
    slots: SlotStore,
    catalog: SessionCatalog,
    events: EventBus,
}

impl AvailabilityService {
    pub fn new(slots: SlotStore, catalog: SessionCatalog, events: EventBus) -> Self {
        Self {
            slots,
            catalog,
            events,
        }
    }

    pub async fn overview(&self, ctx: &RequestContext) -> AppResult<AvailabilityOverview> {
        ctx.require_role(SubjectRole::Tutor)?;
        let tutor = &ctx.subject_id;
        Ok(AvailabilityOverview {
            slots: self.slots.list_slots(tutor).await,
            exceptions: self.slots.list_exceptions(tutor).await,
            policy: self.slots.policy(tutor).await,
            week_usage: self.slots.week_usage(tutor).await,
        })
    }

    pub async fn add_slot(&self, ctx: &RequestContext, spec: SlotSpec) -> AppResult<Slot> {
        ctx.require_role(SubjectRole::Tutor)?;
        self.slots.add_slot(&ctx.subject_id, spec).await
    }

    pub async fn update_slot(
        &self,
        ctx: &RequestContext,
        slot_id: SlotId,
        patch: SlotPatch,
    ) -> AppResult<Slot> {
        ctx.require_role(SubjectRole::Tutor)?;
        self.slots.update_slot(&ctx.subject_id, slot_id, &patch).await
    }

    /// Delete an unbooked slot and its derived session.
    ///
    /// Refused with `InvalidState` while the slot is booked or its session
    /// has enrolled students.
    pub async fn delete_slot(&self, ctx: &RequestContext, slot_id: SlotId) -> AppResult<Slot> {
        ctx.require_role(SubjectRole::Tutor)?;
        let tutor = &ctx.subject_id;
        let slot = self.slots.ensure_deletable(tutor, slot_id).await?;

        let removed_session = match slot.session_id {
            Some(session_id) => self.catalog.remove_unenrolled(session_id).await?,
            None => None,
        };

        match self.slots.remove_slot(tutor, slot_id).await {
            Ok(slot) => {
                self.events.publish(
                    Some(tutor.clone()),
                    EventPayload::Slot(SlotEvent::Deleted {
                        slot_id,
                        session_id: removed_session.map(|s| s.id),
                    }),
                );
                Ok(slot)
            }
            Err(err) => {
                if let Some(session) = removed_session {
                    self.catalog.restore(session).await;
                }
                Err(err)
            }
        }
    }

    /// Publish a slot and materialize its session. Republishing returns
    /// the same session.
    pub async fn publish_slot(
        &self,
        ctx: &RequestContext,
        slot_id: SlotId,
    ) -> AppResult<PublishedSlot> {
        ctx.require_role(SubjectRole::Tutor)?;
        let (slot, changed) = self.slots.publish_slot(&ctx.subject_id, slot_id).await?;
        let session = self.materialize(ctx, &slot, changed).await;
        Ok(PublishedSlot { slot, session })
    }

    /// Publish every draft slot of the tutor.
    pub async fn publish_all(&self, ctx: &RequestContext) -> AppResult<Vec<PublishedSlot>> {
        ctx.require_role(SubjectRole::Tutor)?;
        let slots = self.slots.publish_all(&ctx.subject_id).await;
        let mut published = Vec::with_capacity(slots.len());
        for slot in slots {
            let session = self.materialize(ctx, &slot, true).await;
            published.push(PublishedSlot { slot, session });
        }
        Ok(published)
    }

    pub async fn bulk_delete_unpublished(&self, ctx: &RequestContext) -> AppResult<usize> {
        ctx.require_role(SubjectRole::Tutor)?;
        Ok(self.slots.bulk_delete_unpublished(&ctx.subject_id).await)
    }

    pub async fn add_exception(
        &self,
        ctx: &RequestContext,
        spec: ExceptionSpec,
    ) -> AppResult<AvailabilityException> {
        ctx.require_role(SubjectRole::Tutor)?;
        self.slots.add_exception(&ctx.subject_id, spec).await
    }

    pub async fn remove_exception(
        &self,
        ctx: &RequestContext,
        exception_id: ExceptionId,
    ) -> AppResult<AvailabilityException> {
        ctx.require_role(SubjectRole::Tutor)?;
        self.slots.remove_exception(&ctx.subject_id, exception_id).await
    }

    pub async fn set_policy(
        &self,
        ctx: &RequestContext,
        policy: AvailabilityPolicy,
    ) -> AppResult<AvailabilityPolicy> {
        ctx.require_role(SubjectRole::Tutor)?;
        self.slots.set_policy(&ctx.subject_id, policy).await
    }

    async fn materialize(&self, ctx: &RequestContext, slot: &Slot, newly_published: bool) -> Session {
        let session = self.catalog.materialize(slot, ctx.name.clone()).await;
        if newly_published {
            info!(slot_id = %slot.id, session_id = %session.id, "Slot published to catalog");
            self.events.publish(
                Some(ctx.subject_id.clone()),
                EventPayload::Slot(SlotEvent::Published {
                    slot_id: slot.id,
                    session_id: session.id,
                    tutor_id: slot.tutor_id.clone(),
                    capacity: session.capacity,
                }),
            );
        }
        session
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveTime, Weekday};
    use tutorhub_core::ErrorKind;
    use tutorhub_core::types::{BookingId, SubjectId};

    fn tutor_ctx() -> RequestContext {
        RequestContext::new(
            SubjectId::new("tut-1"),
            SubjectRole::Tutor,
            Some("Ada".to_string()),
            None,
        )
    }

    fn spec() -> SlotSpec {
        SlotSpec {
            day: Some(Weekday::Fri),
            start_time: NaiveTime::from_hms_opt(15, 0, 0).unwrap(),
            capacity: Some(2),
            ..SlotSpec::default()
        }
    }

    fn service() -> (AvailabilityService, SessionCatalog) {
        let catalog = SessionCatalog::new();
        let service = AvailabilityService::new(
            SlotStore::new(AvailabilityPolicy::default()),
            catalog.clone(),
            EventBus::default(),
        );
        (service, catalog)
    }

    #[tokio::test]
    async fn test_publish_twice_same_session() {
        let (service, catalog) = service();
        let ctx = tutor_ctx();
        let slot = service.add_slot(&ctx, spec()).await.unwrap();

        let first = service.publish_slot(&ctx, slot.id).await.unwrap();
        let second = service.publish_slot(&ctx, slot.id).await.unwrap();
        assert_eq!(first.session.id, second.session.id);
        assert_eq!(first.session.capacity, 2);
        assert_eq!(first.session.tutor_name.as_deref(), Some("Ada"));
        assert_eq!(catalog.list_for_tutor(&ctx.subject_id).await.len(), 1);
    }

    #[tokio::test]
    async fn test_publish_emits_event_once() {
        let catalog = SessionCatalog::new();
        let events = EventBus::default();
        let mut rx = events.subscribe();
        let service = AvailabilityService::new(
            SlotStore::new(AvailabilityPolicy::default()),
            catalog,
            events,
        );
        let ctx = tutor_ctx();
        let slot = service.add_slot(&ctx, spec()).await.unwrap();
        service.publish_slot(&ctx, slot.id).await.unwrap();
        service.publish_slot(&ctx, slot.id).await.unwrap();

        let event = rx.recv().await.unwrap();
        assert!(matches!(
            event.payload,
            EventPayload::Slot(SlotEvent::Published { slot_id, .. }) if slot_id == slot.id
        ));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_delete_unpublished_slot_leaves_no_session() {
        let (service, catalog) = service();
        let ctx = tutor_ctx();
        let slot = service.add_slot(&ctx, spec()).await.unwrap();
        service.delete_slot(&ctx, slot.id).await.unwrap();

        let session_id = tutorhub_core::types::SessionId::for_slot(slot.id);
        assert_eq!(catalog.get(session_id).await.unwrap_err().kind, ErrorKind::NotFound);
        assert!(service.overview(&ctx).await.unwrap().slots.is_empty());
    }

    #[tokio::test]
    async fn test_delete_cascades_to_empty_session() {
        let (service, catalog) = service();
        let ctx = tutor_ctx();
        let slot = service.add_slot(&ctx, spec()).await.unwrap();
        let published = service.publish_slot(&ctx, slot.id).await.unwrap();

        service.delete_slot(&ctx, slot.id).await.unwrap();
        assert!(catalog.get(published.session.id).await.is_err());
    }

    #[tokio::test]
    async fn test_delete_blocked_while_enrolled() {
        let (service, catalog) = service();
        let ctx = tutor_ctx();
        let slot = service.add_slot(&ctx, spec()).await.unwrap();
        let published = service.publish_slot(&ctx, slot.id).await.unwrap();
        catalog
            .enroll(published.session.id, BookingId::new())
            .await
            .unwrap();

        let err = service.delete_slot(&ctx, slot.id).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidState);
        assert_eq!(service.overview(&ctx).await.unwrap().slots.len(), 1);
    }

    #[tokio::test]
    async fn test_publish_all_and_week_usage() {
        let (service, _) = service();
        let ctx = tutor_ctx();
        service.add_slot(&ctx, spec()).await.unwrap();
        service
            .add_slot(
                &ctx,
                SlotSpec {
                    day: Some(Weekday::Sat),
                    ..spec()
                },
            )
            .await
            .unwrap();

        assert_eq!(service.publish_all(&ctx).await.unwrap().len(), 2);
        assert!(service.publish_all(&ctx).await.unwrap().is_empty());
        assert_eq!(service.overview(&ctx).await.unwrap().week_usage, 2);
    }

    #[tokio::test]
    async fn test_students_cannot_manage_slots() {
        let (service, _) = service();
        let ctx = RequestContext::new(SubjectId::new("stu-1"), SubjectRole::Student, None, None);
        let err = service.add_slot(&ctx, spec()).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authorization);
    }
}
