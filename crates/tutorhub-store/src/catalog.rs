//! Session catalog with atomic, booking-keyed enrollment.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use tutorhub_core::types::{BookingId, SessionId, SubjectId};
use tutorhub_core::{AppError, AppResult};
use tutorhub_entity::session::{
    EnrollmentCount, Session, SessionFilter, SessionSnapshot, SessionView,
};
use tutorhub_entity::slot::Slot;

#[derive(Debug, Default)]
struct InnerState {
    sessions: HashMap<SessionId, Session>,
}

impl InnerState {
    fn session_mut(&mut self, session_id: SessionId) -> AppResult<&mut Session> {
        self.sessions
            .get_mut(&session_id)
            .ok_or_else(|| AppError::not_found(format!("Session {session_id} not found")))
    }
}

/// Mutex-guarded catalog of bookable sessions.
///
/// The capacity check and the seat grant in [`SessionCatalog::enroll`] run
/// under one lock acquisition, so concurrent enrollments for the last seat
/// have exactly one winner. Seats are keyed by booking, so a retried
/// enroll or unenroll for the same booking is a no-op.
#[derive(Debug, Clone, Default)]
pub struct SessionCatalog {
    state: Arc<Mutex<InnerState>>,
}

impl SessionCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the session for a published slot, or return the existing one.
    pub async fn materialize(&self, slot: &Slot, tutor_name: Option<String>) -> Session {
        let mut state = self.state.lock().await;
        let session_id = SessionId::for_slot(slot.id);
        if let Some(existing) = state.sessions.get(&session_id) {
            debug!(session_id = %session_id, "Session already materialized");
            return existing.clone();
        }
        let session = Session::from_slot(slot, tutor_name, Utc::now());
        state.sessions.insert(session.id, session.clone());
        info!(
            session_id = %session.id,
            slot_id = %slot.id,
            capacity = session.capacity,
            "Session materialized"
        );
        session
    }

    /// Take a seat for `booking_id`. Fails with `Full` at capacity unless
    /// the booking already holds one.
    pub async fn enroll(
        &self,
        session_id: SessionId,
        booking_id: BookingId,
    ) -> AppResult<EnrollmentCount> {
        let mut state = self.state.lock().await;
        let session = state.session_mut(session_id)?;
        match session.try_enroll(booking_id, Utc::now()) {
            Ok(enrolled) => {
                info!(
                    session_id = %session_id,
                    booking_id = %booking_id,
                    enrolled = enrolled,
                    capacity = session.capacity,
                    "Seat enrolled"
                );
                Ok(EnrollmentCount {
                    enrolled,
                    capacity: session.capacity,
                })
            }
            Err(err) => {
                warn!(
                    session_id = %session_id,
                    booking_id = %booking_id,
                    error = %err,
                    "Enrollment refused"
                );
                Err(err)
            }
        }
    }

    /// Release the seat held by `booking_id`. Releasing an absent hold
    /// succeeds with the unchanged count.
    pub async fn unenroll(
        &self,
        session_id: SessionId,
        booking_id: BookingId,
    ) -> AppResult<EnrollmentCount> {
        let mut state = self.state.lock().await;
        let session = state.session_mut(session_id)?;
        let enrolled = session.unenroll(booking_id, Utc::now());
        info!(
            session_id = %session_id,
            booking_id = %booking_id,
            enrolled = enrolled,
            "Seat released"
        );
        Ok(EnrollmentCount {
            enrolled,
            capacity: session.capacity,
        })
    }

    pub async fn get(&self, session_id: SessionId) -> AppResult<Session> {
        let state = self.state.lock().await;
        state
            .sessions
            .get(&session_id)
            .cloned()
            .ok_or_else(|| AppError::not_found(format!("Session {session_id} not found")))
    }

    pub async fn snapshot(&self, session_id: SessionId) -> AppResult<SessionSnapshot> {
        let state = self.state.lock().await;
        state
            .sessions
            .get(&session_id)
            .map(SessionSnapshot::from)
            .ok_or_else(|| AppError::not_found(format!("Session {session_id} not found")))
    }

    /// Active sessions matching `filter`, newest first.
    pub async fn browse(&self, filter: &SessionFilter) -> impl Iterator<Item = SessionView> {
        let mut matched: Vec<Session> = {
            let state = self.state.lock().await;
            state
                .sessions
                .values()
                .filter(|s| filter.matches(s))
                .cloned()
                .collect()
        };
        matched.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        matched.into_iter().map(SessionView::from)
    }

    /// Sessions run by `tutor_id`, newest first.
    pub async fn list_for_tutor(&self, tutor_id: &SubjectId) -> Vec<Session> {
        let state = self.state.lock().await;
        let mut sessions: Vec<Session> = state
            .sessions
            .values()
            .filter(|s| &s.tutor_id == tutor_id)
            .cloned()
            .collect();
        sessions.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        sessions
    }

    /// Remove a session that holds no enrollments.
    ///
    /// Returns `Ok(None)` when the session does not exist and
    /// `InvalidState` while seats are taken.
    pub async fn remove_unenrolled(&self, session_id: SessionId) -> AppResult<Option<Session>> {
        let mut state = self.state.lock().await;
        match state.sessions.get(&session_id) {
            None => return Ok(None),
            Some(s) if s.enrolled > 0 => {
                return Err(AppError::invalid_state(format!(
                    "Session {session_id} has {} enrolled student(s)",
                    s.enrolled
                )));
            }
            Some(_) => {}
        }
        let removed = state.sessions.remove(&session_id);
        info!(session_id = %session_id, "Session removed");
        Ok(removed)
    }

    /// Put back a session removed by a delete that could not complete.
    pub async fn restore(&self, session: Session) {
        let mut state = self.state.lock().await;
        warn!(session_id = %session.id, "Session restored");
        state.sessions.entry(session.id).or_insert(session);
    }
}
