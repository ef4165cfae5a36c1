//! Tutor teaching counters.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::info;

use tutorhub_core::types::SubjectId;
use tutorhub_entity::tutor::TutorStats;

#[derive(Debug, Clone, Default)]
pub struct TutorStatsStore {
    state: Arc<Mutex<HashMap<SubjectId, TutorStats>>>,
}

impl TutorStatsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one completed session for `tutor_id`.
    pub async fn record_completion(
        &self,
        tutor_id: &SubjectId,
        student_id: &SubjectId,
        minutes: u32,
    ) -> TutorStats {
        let mut state = self.state.lock().await;
        let stats = state
            .entry(tutor_id.clone())
            .or_insert_with(|| TutorStats::new(tutor_id.clone()));
        stats.record_completion(student_id, minutes);
        info!(
            tutor_id = %tutor_id,
            total_sessions = stats.total_sessions,
            minutes_teaching = stats.minutes_teaching,
            "Tutor stats updated"
        );
        stats.clone()
    }

    pub async fn get(&self, tutor_id: &SubjectId) -> TutorStats {
        let state = self.state.lock().await;
        state
            .get(tutor_id)
            .cloned()
            .unwrap_or_else(|| TutorStats::new(tutor_id.clone()))
    }
}
