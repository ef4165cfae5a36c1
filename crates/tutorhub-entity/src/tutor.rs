//! Denormalized tutor teaching statistics.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use tutorhub_core::types::SubjectId;

/// Counters bumped whenever a tutor completes a booking.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TutorStats {
    pub tutor_id: Option<SubjectId>,
    pub total_sessions: u32,
    pub minutes_teaching: u64,
    /// Distinct students taught.
    pub total_students: u32,
    #[serde(skip)]
    students: BTreeSet<SubjectId>,
}

impl TutorStats {
    pub fn new(tutor_id: SubjectId) -> Self {
        Self {
            tutor_id: Some(tutor_id),
            ..Self::default()
        }
    }

    /// Record one completed session with `student_id`.
    pub fn record_completion(&mut self, student_id: &SubjectId, minutes: u32) {
        self.total_sessions += 1;
        self.minutes_teaching += u64::from(minutes);
        if self.students.insert(student_id.clone()) {
            self.total_students = self.students.len() as u32;
        }
    }

    /// Teaching time in hours, one decimal.
    pub fn hours_teaching(&self) -> f64 {
        (self.minutes_teaching as f64 / 6.0).round() / 10.0
    }
}
