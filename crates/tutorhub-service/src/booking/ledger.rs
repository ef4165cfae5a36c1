//! The booking state machine and its side effects.

use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use tracing::{error, info, warn};

use tutorhub_core::config::BookingConfig;
use tutorhub_core::events::{BookingEvent, EventBus, EventPayload};
use tutorhub_core::types::{BookingId, SessionId, SlotId};
use tutorhub_core::{AppError, AppResult};
use tutorhub_entity::booking::{Booking, BookingStatus, NewBooking};
use tutorhub_entity::role::SubjectRole;
use tutorhub_entity::slot::SlotDescriptor;
use tutorhub_entity::tutor::TutorStats;
use tutorhub_store::{BookingStore, TutorStatsStore};

use crate::context::RequestContext;
use crate::coordination::CoordinationFacade;

/// A student's booking request.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    pub session_id: SessionId,
    #[serde(default)]
    pub slot_id: Option<SlotId>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Authoritative record of bookings on the bookings side.
///
/// The ledger never touches slots or sessions directly; every downstream
/// effect goes through the [`CoordinationFacade`].
#[derive(Debug, Clone)]
pub struct BookingLedger {
    store: BookingStore,
    stats: TutorStatsStore,
    facade: CoordinationFacade,
    config: BookingConfig,
    events: EventBus,
}

impl BookingLedger {
    pub fn new(
        store: BookingStore,
        stats: TutorStatsStore,
        facade: CoordinationFacade,
        config: BookingConfig,
        events: EventBus,
    ) -> Self {
        Self {
            store,
            stats,
            facade,
            config,
            events,
        }
    }

    /// Open a pending booking.
    ///
    /// The session snapshot supplies the tutor and schedule. With the
    /// pre-flight check enabled, evidently full sessions are refused here;
    /// the binding capacity check happens at confirm time.
    pub async fn create(&self, ctx: &RequestContext, request: BookingRequest) -> AppResult<Booking> {
        ctx.require_role(SubjectRole::Student)?;
        let snapshot = self.facade.snapshot(request.session_id).await?;

        if self.config.preflight_capacity_check && snapshot.is_full() {
            return Err(AppError::full(format!("Session {} is full", snapshot.id)));
        }

        let source_slot = snapshot.schedule.as_ref().map(|s| s.slot_id);
        let slot_id = match (request.slot_id, source_slot) {
            (Some(requested), Some(source)) if requested != source => {
                return Err(AppError::validation(format!(
                    "Slot {requested} does not belong to session {}",
                    snapshot.id
                )));
            }
            (requested, source) => requested.or(source),
        };

        if self.config.enforce_lead_time {
            check_notice(
                snapshot.schedule.as_ref(),
                |s| s.lead_time_hours,
                Utc::now(),
                "Bookings close",
            )?;
        }

        let booking = self
            .store
            .insert_pending(NewBooking {
                session_id: snapshot.id,
                slot_id,
                tutor_id: snapshot.tutor_id,
                student_id: ctx.subject_id.clone(),
                student_name: ctx.name.clone(),
                student_email: ctx.email.clone(),
                message: request.message.filter(|m| !m.trim().is_empty()),
                schedule: snapshot.schedule,
            })
            .await?;

        self.events.publish(
            Some(ctx.subject_id.clone()),
            EventPayload::Booking(BookingEvent::Requested {
                booking_id: booking.id,
                session_id: booking.session_id,
                student_id: booking.student_id.clone(),
            }),
        );
        Ok(booking)
    }

    /// Confirm a pending booking, taking a seat and the slot.
    ///
    /// If the seat cannot be taken the booking stays pending and the
    /// enroll error (`Full`, `NotFound`, or retryable
    /// `UpstreamUnavailable`) is returned. After a retryable failure the
    /// booking's hold is released, in case the enroll landed unseen.
    pub async fn confirm(&self, ctx: &RequestContext, booking_id: BookingId) -> AppResult<Booking> {
        ctx.require_role(SubjectRole::Tutor)?;
        let booking = self
            .store
            .begin_transition(booking_id, BookingStatus::Confirmed, |b| {
                authorize_tutor(ctx, b)
            })
            .await?;

        let outcome = match self.facade.on_confirm(&booking).await {
            Ok(outcome) => outcome,
            Err(err) => {
                // A lost response may have left the seat taken.
                if err.is_retryable() {
                    self.facade.release_seat(&booking).await;
                }
                self.store.abort(booking_id).await;
                warn!(
                    booking_id = %booking_id,
                    error = %err,
                    "Confirm rolled back to pending"
                );
                return Err(err);
            }
        };

        let confirmed = match self
            .store
            .commit(booking_id, BookingStatus::Confirmed, &ctx.subject_id, None)
            .await
        {
            Ok(confirmed) => confirmed,
            Err(err) => {
                error!(
                    booking_id = %booking_id,
                    error = %err,
                    "Confirm could not be recorded; releasing seat"
                );
                self.facade.on_cancel(&booking, false).await;
                return Err(err);
            }
        };

        info!(
            booking_id = %booking_id,
            enrolled = outcome.enrollment.enrolled,
            capacity = outcome.enrollment.capacity,
            slot_booked = outcome.slot_booked,
            "Booking confirmed"
        );
        self.events.publish(
            Some(ctx.subject_id.clone()),
            EventPayload::Booking(BookingEvent::Confirmed {
                booking_id,
                session_id: confirmed.session_id,
                enrolled: outcome.enrollment.enrolled,
            }),
        );
        Ok(confirmed)
    }

    /// Reject a pending booking. Nothing downstream was reserved.
    pub async fn reject(
        &self,
        ctx: &RequestContext,
        booking_id: BookingId,
        reason: Option<String>,
    ) -> AppResult<Booking> {
        ctx.require_role(SubjectRole::Tutor)?;
        self.store
            .begin_transition(booking_id, BookingStatus::Rejected, |b| {
                authorize_tutor(ctx, b)
            })
            .await?;
        let rejected = self
            .store
            .commit(booking_id, BookingStatus::Rejected, &ctx.subject_id, reason)
            .await?;
        self.events.publish(
            Some(ctx.subject_id.clone()),
            EventPayload::Booking(BookingEvent::Rejected { booking_id }),
        );
        Ok(rejected)
    }

    /// Cancel a pending or confirmed booking on behalf of its student.
    ///
    /// A confirmed booking releases its seat and slot first. The slot stays
    /// booked if another confirmed booking still holds it.
    pub async fn cancel(
        &self,
        ctx: &RequestContext,
        booking_id: BookingId,
        reason: Option<String>,
    ) -> AppResult<Booking> {
        ctx.require_role(SubjectRole::Student)?;
        let booking = self
            .store
            .begin_transition(booking_id, BookingStatus::Cancelled, |b| {
                if ctx.is_admin() {
                    Ok(())
                } else {
                    b.ensure_student(&ctx.subject_id)
                }
            })
            .await?;

        if booking.status == BookingStatus::Confirmed
            && self.config.enforce_cancel_window
            && let Err(err) = check_notice(
                booking.schedule.as_ref(),
                |s| s.cancel_window_hours,
                Utc::now(),
                "Cancellation closes",
            )
        {
            self.store.abort(booking_id).await;
            return Err(err);
        }

        self.finish_cancel(ctx, booking, reason).await
    }

    /// Cancel a pending or confirmed booking on behalf of its tutor.
    ///
    /// Releases the seat and slot like a student cancellation. The cancel
    /// window does not apply.
    pub async fn cancel_as_tutor(
        &self,
        ctx: &RequestContext,
        booking_id: BookingId,
        reason: Option<String>,
    ) -> AppResult<Booking> {
        ctx.require_role(SubjectRole::Tutor)?;
        let booking = self
            .store
            .begin_transition(booking_id, BookingStatus::Cancelled, |b| {
                authorize_tutor(ctx, b)
            })
            .await?;
        self.finish_cancel(ctx, booking, reason).await
    }

    /// Release downstream holds of a booking claimed for cancellation, then
    /// record the cancellation.
    async fn finish_cancel(
        &self,
        ctx: &RequestContext,
        booking: Booking,
        reason: Option<String>,
    ) -> AppResult<Booking> {
        let booking_id = booking.id;
        let mut released_seat = false;
        if booking.status == BookingStatus::Confirmed {
            let slot_still_held = match booking.slot_id {
                Some(slot_id) => self
                    .store
                    .other_slot_holder(slot_id, booking_id)
                    .await
                    .is_some(),
                None => false,
            };
            let outcome = self.facade.on_cancel(&booking, slot_still_held).await;
            released_seat = outcome.released_seat;
        }

        let cancelled = self
            .store
            .commit(booking_id, BookingStatus::Cancelled, &ctx.subject_id, reason)
            .await?;
        info!(
            booking_id = %booking_id,
            cancelled_by = %ctx.subject_id,
            released_seat = released_seat,
            "Booking cancelled"
        );
        self.events.publish(
            Some(ctx.subject_id.clone()),
            EventPayload::Booking(BookingEvent::Cancelled {
                booking_id,
                released_seat,
            }),
        );
        Ok(cancelled)
    }

    /// Mark a confirmed booking completed and credit the tutor's stats.
    pub async fn complete(&self, ctx: &RequestContext, booking_id: BookingId) -> AppResult<Booking> {
        ctx.require_role(SubjectRole::Tutor)?;
        self.store
            .begin_transition(booking_id, BookingStatus::Completed, |b| {
                authorize_tutor(ctx, b)
            })
            .await?;
        let completed = self
            .store
            .commit(booking_id, BookingStatus::Completed, &ctx.subject_id, None)
            .await?;

        let minutes = completed
            .schedule
            .as_ref()
            .map(|s| s.duration_minutes)
            .unwrap_or(0);
        self.stats
            .record_completion(&completed.tutor_id, &completed.student_id, minutes)
            .await;
        self.events.publish(
            Some(ctx.subject_id.clone()),
            EventPayload::Booking(BookingEvent::Completed { booking_id }),
        );
        Ok(completed)
    }

    /// A booking visible to the caller: its student, its tutor, or an admin.
    pub async fn get(&self, ctx: &RequestContext, booking_id: BookingId) -> AppResult<Booking> {
        let booking = self.store.get(booking_id).await?;
        if ctx.is_admin()
            || booking.student_id == ctx.subject_id
            || booking.tutor_id == ctx.subject_id
        {
            Ok(booking)
        } else {
            Err(AppError::not_found(format!("Booking {booking_id} not found")))
        }
    }

    pub async fn list_for_student(&self, ctx: &RequestContext) -> AppResult<Vec<Booking>> {
        ctx.require_role(SubjectRole::Student)?;
        Ok(self.store.list_for_student(&ctx.subject_id).await)
    }

    pub async fn list_for_tutor(
        &self,
        ctx: &RequestContext,
        status: Option<BookingStatus>,
    ) -> AppResult<Vec<Booking>> {
        ctx.require_role(SubjectRole::Tutor)?;
        Ok(self.store.list_for_tutor(&ctx.subject_id, status).await)
    }

    pub async fn tutor_stats(&self, ctx: &RequestContext) -> AppResult<TutorStats> {
        ctx.require_role(SubjectRole::Tutor)?;
        Ok(self.stats.get(&ctx.subject_id).await)
    }
}

fn authorize_tutor(ctx: &RequestContext, booking: &Booking) -> AppResult<()> {
    if ctx.is_admin() {
        Ok(())
    } else {
        booking.ensure_tutor(&ctx.subject_id)
    }
}

/// Fail with `PolicyViolation` when the next start of `schedule` is closer
/// than the notice period picked by `hours`.
fn check_notice(
    schedule: Option<&SlotDescriptor>,
    hours: impl Fn(&SlotDescriptor) -> u32,
    now: DateTime<Utc>,
    what: &str,
) -> AppResult<()> {
    let Some(schedule) = schedule else {
        return Ok(());
    };
    let Some(start) = schedule.next_start(now) else {
        return Ok(());
    };
    let notice = hours(schedule);
    if start - now < Duration::hours(i64::from(notice)) {
        return Err(AppError::policy_violation(format!(
            "{what} {notice}h before the session starts"
        )));
    }
    Ok(())
}
