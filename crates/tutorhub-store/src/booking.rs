//! Booking ledger records.
//!
//! Besides the bookings themselves the store tracks which bookings have a
//! transition in flight. A transition is opened with
//! [`BookingStore::begin_transition`] and closed with either
//! [`BookingStore::commit`] or [`BookingStore::abort`]; while it is open
//! the booking keeps its previous status and any second transition on it
//! is refused with `Conflict`.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Mutex;
use tracing::{debug, info};

use tutorhub_core::types::{BookingId, SessionId, SlotId, SubjectId};
use tutorhub_core::{AppError, AppResult};
use tutorhub_entity::booking::{Booking, BookingStatus, NewBooking};

#[derive(Debug, Default)]
struct InnerState {
    bookings: HashMap<BookingId, Booking>,
    in_flight: HashSet<BookingId>,
}

impl InnerState {
    fn booking(&self, booking_id: BookingId) -> AppResult<&Booking> {
        self.bookings
            .get(&booking_id)
            .ok_or_else(|| AppError::not_found(format!("Booking {booking_id} not found")))
    }
}

/// Mutex-guarded booking records.
#[derive(Debug, Clone, Default)]
pub struct BookingStore {
    state: Arc<Mutex<InnerState>>,
}

impl BookingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a pending booking unless the student already holds an
    /// active one for the same session.
    pub async fn insert_pending(&self, new: NewBooking) -> AppResult<Booking> {
        let mut state = self.state.lock().await;
        let duplicate = state.bookings.values().any(|b| {
            b.student_id == new.student_id && b.session_id == new.session_id && b.is_active()
        });
        if duplicate {
            return Err(AppError::conflict(format!(
                "Student {} already has an active booking for session {}",
                new.student_id, new.session_id
            )));
        }
        let booking = Booking::pending(new, Utc::now());
        state.bookings.insert(booking.id, booking.clone());
        info!(
            booking_id = %booking.id,
            session_id = %booking.session_id,
            student_id = %booking.student_id,
            "Booking requested"
        );
        Ok(booking)
    }

    pub async fn get(&self, booking_id: BookingId) -> AppResult<Booking> {
        let state = self.state.lock().await;
        state.booking(booking_id).cloned()
    }

    /// Claim the booking for a transition to `next`.
    ///
    /// Fails with `NotFound`, `Conflict` if another transition is open, or
    /// `InvalidState` if `next` is not reachable. `authorize` runs under the
    /// lock before the claim is taken.
    pub async fn begin_transition<F>(
        &self,
        booking_id: BookingId,
        next: BookingStatus,
        authorize: F,
    ) -> AppResult<Booking>
    where
        F: FnOnce(&Booking) -> AppResult<()>,
    {
        let mut state = self.state.lock().await;
        let booking = state.booking(booking_id)?;
        authorize(booking)?;
        if state.in_flight.contains(&booking_id) {
            return Err(AppError::conflict(format!(
                "Booking {booking_id} has a transition in progress"
            )));
        }
        booking.ensure_transition(next)?;
        let booking = booking.clone();
        state.in_flight.insert(booking_id);
        debug!(booking_id = %booking_id, next = %next, "Transition started");
        Ok(booking)
    }

    /// Apply the claimed transition and release the claim.
    pub async fn commit(
        &self,
        booking_id: BookingId,
        next: BookingStatus,
        actor: &SubjectId,
        reason: Option<String>,
    ) -> AppResult<Booking> {
        let mut state = self.state.lock().await;
        state.in_flight.remove(&booking_id);
        let booking = state
            .bookings
            .get_mut(&booking_id)
            .ok_or_else(|| AppError::not_found(format!("Booking {booking_id} not found")))?;
        booking.ensure_transition(next)?;
        booking.mark(next, actor, reason, Utc::now());
        info!(
            booking_id = %booking_id,
            status = %next,
            actor_id = %actor,
            "Booking transitioned"
        );
        Ok(booking.clone())
    }

    /// Release the claim, leaving the booking as it was.
    pub async fn abort(&self, booking_id: BookingId) {
        let mut state = self.state.lock().await;
        if state.in_flight.remove(&booking_id) {
            debug!(booking_id = %booking_id, "Transition aborted");
        }
    }

    /// Whether another confirmed booking (not `excluding`) holds `slot_id`.
    pub async fn other_slot_holder(
        &self,
        slot_id: SlotId,
        excluding: BookingId,
    ) -> Option<SubjectId> {
        let state = self.state.lock().await;
        state
            .bookings
            .values()
            .filter(|b| b.id != excluding && b.slot_id == Some(slot_id))
            .filter(|b| b.status == BookingStatus::Confirmed)
            .min_by_key(|b| b.confirmed_at)
            .map(|b| b.student_id.clone())
    }

    /// A student's bookings, newest first.
    pub async fn list_for_student(&self, student_id: &SubjectId) -> Vec<Booking> {
        self.collect(|b| &b.student_id == student_id).await
    }

    /// A tutor's bookings, optionally filtered by status, newest first.
    pub async fn list_for_tutor(
        &self,
        tutor_id: &SubjectId,
        status: Option<BookingStatus>,
    ) -> Vec<Booking> {
        self.collect(|b| &b.tutor_id == tutor_id && status.is_none_or(|s| b.status == s))
            .await
    }

    /// Bookings on one session, newest first.
    pub async fn list_for_session(&self, session_id: SessionId) -> Vec<Booking> {
        self.collect(|b| b.session_id == session_id).await
    }

    pub async fn all(&self) -> Vec<Booking> {
        self.collect(|_| true).await
    }

    /// Every booking together with the open transitions, read under one lock.
    pub async fn all_with_in_flight(&self) -> (Vec<Booking>, HashSet<BookingId>) {
        let state = self.state.lock().await;
        (
            state.bookings.values().cloned().collect(),
            state.in_flight.clone(),
        )
    }

    /// Whether any booking on `slot_id` holds a seat or is mid-transition.
    pub async fn slot_in_use(&self, slot_id: SlotId) -> bool {
        let state = self.state.lock().await;
        state.bookings.values().any(|b| {
            b.slot_id == Some(slot_id)
                && (b.status.holds_seat() || state.in_flight.contains(&b.id))
        })
    }

    async fn collect<P>(&self, predicate: P) -> Vec<Booking>
    where
        P: Fn(&Booking) -> bool,
    {
        let state = self.state.lock().await;
        let mut bookings: Vec<Booking> = state
            .bookings
            .values()
            .filter(|b| predicate(b))
            .cloned()
            .collect();
        bookings.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        bookings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tutorhub_core::ErrorKind;

    fn new_booking(student: &str, session_id: SessionId) -> NewBooking {
        NewBooking {
            session_id,
            slot_id: None,
            tutor_id: SubjectId::new("tut-1"),
            student_id: SubjectId::new(student),
            student_name: None,
            student_email: None,
            message: None,
            schedule: None,
        }
    }

    #[tokio::test]
    async fn test_one_active_booking_per_student_session() {
        let store = BookingStore::new();
        let session = SessionId::new();
        let first = store.insert_pending(new_booking("stu-1", session)).await.unwrap();

        let err = store
            .insert_pending(new_booking("stu-1", session))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);

        store.insert_pending(new_booking("stu-2", session)).await.unwrap();

        store
            .begin_transition(first.id, BookingStatus::Cancelled, |_| Ok(()))
            .await
            .unwrap();
        store
            .commit(first.id, BookingStatus::Cancelled, &SubjectId::new("stu-1"), None)
            .await
            .unwrap();
        store.insert_pending(new_booking("stu-1", session)).await.unwrap();
    }

    #[tokio::test]
    async fn test_in_flight_transition_conflicts() {
        let store = BookingStore::new();
        let booking = store
            .insert_pending(new_booking("stu-1", SessionId::new()))
            .await
            .unwrap();

        let claimed = store
            .begin_transition(booking.id, BookingStatus::Confirmed, |_| Ok(()))
            .await
            .unwrap();
        assert_eq!(claimed.status, BookingStatus::Pending);

        let err = store
            .begin_transition(booking.id, BookingStatus::Rejected, |_| Ok(()))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);

        store.abort(booking.id).await;
        assert_eq!(store.get(booking.id).await.unwrap().status, BookingStatus::Pending);
        store
            .begin_transition(booking.id, BookingStatus::Rejected, |_| Ok(()))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_open_transition_marks_slot_in_use() {
        let store = BookingStore::new();
        let slot_id = SlotId::new();
        let booking = store
            .insert_pending(NewBooking {
                slot_id: Some(slot_id),
                ..new_booking("stu-1", SessionId::new())
            })
            .await
            .unwrap();
        assert!(!store.slot_in_use(slot_id).await);

        store
            .begin_transition(booking.id, BookingStatus::Confirmed, |_| Ok(()))
            .await
            .unwrap();
        let (_, in_flight) = store.all_with_in_flight().await;
        assert!(in_flight.contains(&booking.id));
        assert!(store.slot_in_use(slot_id).await);

        store.abort(booking.id).await;
        assert!(store.all_with_in_flight().await.1.is_empty());
        assert!(!store.slot_in_use(slot_id).await);
    }

    #[tokio::test]
    async fn test_illegal_transition_is_invalid_state() {
        let store = BookingStore::new();
        let booking = store
            .insert_pending(new_booking("stu-1", SessionId::new()))
            .await
            .unwrap();
        let err = store
            .begin_transition(booking.id, BookingStatus::Completed, |_| Ok(()))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidState);

        let err = store
            .begin_transition(BookingId::new(), BookingStatus::Confirmed, |_| Ok(()))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_list_for_tutor_by_status() {
        let store = BookingStore::new();
        let a = store
            .insert_pending(new_booking("stu-1", SessionId::new()))
            .await
            .unwrap();
        store
            .insert_pending(new_booking("stu-2", SessionId::new()))
            .await
            .unwrap();
        store
            .begin_transition(a.id, BookingStatus::Rejected, |_| Ok(()))
            .await
            .unwrap();
        store
            .commit(a.id, BookingStatus::Rejected, &SubjectId::new("tut-1"), None)
            .await
            .unwrap();

        let tutor = SubjectId::new("tut-1");
        assert_eq!(store.list_for_tutor(&tutor, None).await.len(), 2);
        assert_eq!(
            store
                .list_for_tutor(&tutor, Some(BookingStatus::Pending))
                .await
                .len(),
            1
        );
    }
}
