//! Read models of a session: the catalog view, the internal snapshot, and
//! the enrollment counter returned by enroll/unenroll.

use serde::{Deserialize, Serialize};

use tutorhub_core::types::{SessionId, SubjectId};

use super::model::{Session, SessionStatus};
use crate::slot::{SlotDescriptor, SlotMode};

/// A session as students browse it, with open seats computed on read.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    #[serde(flatten)]
    pub session: Session,
    pub available_slots: u32,
}

impl From<Session> for SessionView {
    fn from(session: Session) -> Self {
        let available_slots = session.available_seats();
        Self {
            session,
            available_slots,
        }
    }
}

/// Capacity facts exchanged over the internal boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub id: SessionId,
    pub tutor_id: SubjectId,
    pub capacity: u32,
    pub enrolled: u32,
    pub status: SessionStatus,
    pub schedule: Option<SlotDescriptor>,
}

impl SessionSnapshot {
    /// Whether a new enrollment would evidently fail.
    pub fn is_full(&self) -> bool {
        self.enrolled >= self.capacity
    }
}

impl From<&Session> for SessionSnapshot {
    fn from(session: &Session) -> Self {
        Self {
            id: session.id,
            tutor_id: session.tutor_id.clone(),
            capacity: session.capacity,
            enrolled: session.enrolled,
            status: session.status,
            schedule: session.slots.first().cloned(),
        }
    }
}

/// Result of an enroll or unenroll call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrollmentCount {
    pub enrolled: u32,
    pub capacity: u32,
}

/// Catalog filter. Empty fields match everything.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionFilter {
    #[serde(default)]
    pub course_code: Option<String>,
    #[serde(default)]
    pub tutor_id: Option<SubjectId>,
    #[serde(default)]
    pub mode: Option<SlotMode>,
    #[serde(default)]
    pub only_available: bool,
}

impl SessionFilter {
    pub fn matches(&self, session: &Session) -> bool {
        if let Some(code) = &self.course_code
            && !session
                .course_code
                .as_deref()
                .is_some_and(|c| c.eq_ignore_ascii_case(code))
        {
            return false;
        }
        if let Some(tutor) = &self.tutor_id
            && &session.tutor_id != tutor
        {
            return false;
        }
        if let Some(mode) = self.mode
            && session.mode() != Some(mode)
        {
            return false;
        }
        !self.only_available || session.available_seats() > 0
    }
}
