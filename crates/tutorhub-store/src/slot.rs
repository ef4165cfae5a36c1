//! Tutor slots, blackout exceptions, and availability policy.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tracing::{debug, info};

use tutorhub_core::types::{ExceptionId, SessionId, SlotId, SubjectId};
use tutorhub_core::{AppError, AppResult};
use tutorhub_entity::exception::{AvailabilityException, ExceptionSpec};
use tutorhub_entity::policy::AvailabilityPolicy;
use tutorhub_entity::slot::{Slot, SlotPatch, SlotSpec, SlotStatus};

/// Internal state for the slot store.
#[derive(Debug, Default)]
struct InnerState {
    slots: HashMap<SlotId, Slot>,
    exceptions: HashMap<ExceptionId, AvailabilityException>,
    /// Tutor overrides of the default policy.
    policies: HashMap<SubjectId, AvailabilityPolicy>,
}

impl InnerState {
    fn policy_for(&self, tutor_id: &SubjectId, default: &AvailabilityPolicy) -> AvailabilityPolicy {
        self.policies
            .get(tutor_id)
            .cloned()
            .unwrap_or_else(|| default.clone())
    }

    fn owned_slot(&self, tutor_id: &SubjectId, slot_id: SlotId) -> AppResult<&Slot> {
        let slot = self
            .slots
            .get(&slot_id)
            .ok_or_else(|| AppError::not_found(format!("Slot {slot_id} not found")))?;
        if &slot.tutor_id != tutor_id {
            return Err(AppError::authorization(format!(
                "Slot {slot_id} belongs to another tutor"
            )));
        }
        Ok(slot)
    }

    fn slot_mut(&mut self, slot_id: SlotId, tutor_id: Option<&SubjectId>) -> AppResult<&mut Slot> {
        let slot = self
            .slots
            .get_mut(&slot_id)
            .ok_or_else(|| AppError::not_found(format!("Slot {slot_id} not found")))?;
        if let Some(tutor_id) = tutor_id
            && &slot.tutor_id != tutor_id
        {
            return Err(AppError::authorization(format!(
                "Slot {slot_id} belongs to another tutor"
            )));
        }
        Ok(slot)
    }
}

/// Mutex-guarded store of every tutor's slots and exceptions.
#[derive(Debug, Clone)]
pub struct SlotStore {
    state: Arc<Mutex<InnerState>>,
    default_policy: AvailabilityPolicy,
}

impl SlotStore {
    /// Create an empty store applying `default_policy` to tutors without overrides.
    pub fn new(default_policy: AvailabilityPolicy) -> Self {
        Self {
            state: Arc::new(Mutex::new(InnerState::default())),
            default_policy,
        }
    }

    /// Create an unpublished slot, enforcing the tutor's policy.
    pub async fn add_slot(&self, tutor_id: &SubjectId, spec: SlotSpec) -> AppResult<Slot> {
        let slot = spec.into_slot(tutor_id.clone(), Utc::now())?;
        let mut state = self.state.lock().await;
        let policy = state.policy_for(tutor_id, &self.default_policy);

        let tutor_slots: Vec<&Slot> = state
            .slots
            .values()
            .filter(|s| &s.tutor_id == tutor_id)
            .collect();
        if tutor_slots.len() as u32 >= policy.max_slots_per_week {
            return Err(AppError::policy_violation(format!(
                "Weekly slot limit of {} reached",
                policy.max_slots_per_week
            )));
        }

        policy.check_hours(slot.start_time, slot.end_time)?;

        let weekday = slot.weekday();
        let same_day = tutor_slots
            .iter()
            .filter(|s| s.weekday() == weekday)
            .count() as u32;
        if same_day >= policy.max_slots_per_day {
            return Err(AppError::policy_violation(format!(
                "Daily slot limit of {} reached",
                policy.max_slots_per_day
            )));
        }

        state.slots.insert(slot.id, slot.clone());
        info!(slot_id = %slot.id, tutor_id = %tutor_id, "Slot created");
        Ok(slot)
    }

    pub async fn get_slot(&self, slot_id: SlotId) -> AppResult<Slot> {
        let state = self.state.lock().await;
        state
            .slots
            .get(&slot_id)
            .cloned()
            .ok_or_else(|| AppError::not_found(format!("Slot {slot_id} not found")))
    }

    /// Slot owned by `tutor_id`.
    pub async fn get_owned(&self, tutor_id: &SubjectId, slot_id: SlotId) -> AppResult<Slot> {
        let state = self.state.lock().await;
        state.owned_slot(tutor_id, slot_id).cloned()
    }

    /// A tutor's slots, oldest first.
    pub async fn list_slots(&self, tutor_id: &SubjectId) -> Vec<Slot> {
        let state = self.state.lock().await;
        let mut slots: Vec<Slot> = state
            .slots
            .values()
            .filter(|s| &s.tutor_id == tutor_id)
            .cloned()
            .collect();
        slots.sort_by_key(|s| s.created_at);
        slots
    }

    /// Edit an unbooked draft slot.
    pub async fn update_slot(
        &self,
        tutor_id: &SubjectId,
        slot_id: SlotId,
        patch: &SlotPatch,
    ) -> AppResult<Slot> {
        let mut state = self.state.lock().await;
        let policy = state.policy_for(tutor_id, &self.default_policy);
        let current = state.owned_slot(tutor_id, slot_id)?;
        current.ensure_editable()?;

        let next = patch.apply(current, Utc::now())?;
        policy.check_hours(next.start_time, next.end_time)?;

        state.slots.insert(slot_id, next.clone());
        info!(slot_id = %slot_id, "Slot updated");
        Ok(next)
    }

    /// Fail unless the slot exists, belongs to `tutor_id`, and is unbooked.
    pub async fn ensure_deletable(&self, tutor_id: &SubjectId, slot_id: SlotId) -> AppResult<Slot> {
        let state = self.state.lock().await;
        let slot = state.owned_slot(tutor_id, slot_id)?;
        slot.ensure_deletable()?;
        Ok(slot.clone())
    }

    /// Remove an unbooked slot and return it.
    pub async fn remove_slot(&self, tutor_id: &SubjectId, slot_id: SlotId) -> AppResult<Slot> {
        let mut state = self.state.lock().await;
        state.owned_slot(tutor_id, slot_id)?.ensure_deletable()?;
        let slot = state
            .slots
            .remove(&slot_id)
            .ok_or_else(|| AppError::not_found(format!("Slot {slot_id} not found")))?;
        info!(slot_id = %slot_id, tutor_id = %tutor_id, "Slot deleted");
        Ok(slot)
    }

    /// Mark a slot published. Returns the slot and whether this call
    /// changed it; republishing is a no-op.
    pub async fn publish_slot(
        &self,
        tutor_id: &SubjectId,
        slot_id: SlotId,
    ) -> AppResult<(Slot, bool)> {
        let mut state = self.state.lock().await;
        let slot = state.slot_mut(slot_id, Some(tutor_id))?;
        if slot.is_published() {
            return Ok((slot.clone(), false));
        }
        publish(slot, Utc::now());
        info!(slot_id = %slot_id, "Slot published");
        Ok((slot.clone(), true))
    }

    /// Publish every unpublished slot of the tutor, returning the newly published ones.
    pub async fn publish_all(&self, tutor_id: &SubjectId) -> Vec<Slot> {
        let mut state = self.state.lock().await;
        let now = Utc::now();
        let published: Vec<Slot> = state
            .slots
            .values_mut()
            .filter(|s| &s.tutor_id == tutor_id && !s.is_published())
            .map(|slot| {
                publish(slot, now);
                slot.clone()
            })
            .collect();
        info!(tutor_id = %tutor_id, count = published.len(), "Slots published");
        published
    }

    /// Mark a slot held by `student_id`.
    ///
    /// Repeating the call for the same student is a no-op. A single-seat
    /// slot held by someone else fails with `Full`.
    pub async fn book_slot(
        &self,
        slot_id: SlotId,
        tutor_id: Option<&SubjectId>,
        student_id: &SubjectId,
    ) -> AppResult<Slot> {
        let mut state = self.state.lock().await;
        let slot = state.slot_mut(slot_id, tutor_id)?;
        if slot.booked {
            if slot.booked_by.as_ref() == Some(student_id) || slot.capacity > 1 {
                return Ok(slot.clone());
            }
            return Err(AppError::full(format!("Slot {slot_id} is already booked")));
        }
        let now = Utc::now();
        slot.booked = true;
        slot.booked_by = Some(student_id.clone());
        slot.booked_at = Some(now);
        slot.updated_at = Some(now);
        info!(slot_id = %slot_id, student_id = %student_id, "Slot booked");
        Ok(slot.clone())
    }

    /// Clear the booking on a slot. Unbooking an unbooked slot succeeds.
    pub async fn unbook_slot(&self, slot_id: SlotId, tutor_id: Option<&SubjectId>) -> AppResult<Slot> {
        let mut state = self.state.lock().await;
        let slot = state.slot_mut(slot_id, tutor_id)?;
        if !slot.booked {
            debug!(slot_id = %slot_id, "Unbook on unbooked slot ignored");
            return Ok(slot.clone());
        }
        slot.booked = false;
        slot.booked_by = None;
        slot.booked_at = None;
        slot.updated_at = Some(Utc::now());
        info!(slot_id = %slot_id, "Slot unbooked");
        Ok(slot.clone())
    }

    /// Delete every unpublished, unbooked slot of the tutor.
    pub async fn bulk_delete_unpublished(&self, tutor_id: &SubjectId) -> usize {
        let mut state = self.state.lock().await;
        let before = state.slots.len();
        state
            .slots
            .retain(|_, s| &s.tutor_id != tutor_id || s.is_published() || s.booked);
        let removed = before - state.slots.len();
        info!(tutor_id = %tutor_id, removed = removed, "Unpublished slots deleted");
        removed
    }

    /// Number of published slots the tutor holds.
    pub async fn week_usage(&self, tutor_id: &SubjectId) -> usize {
        let state = self.state.lock().await;
        state
            .slots
            .values()
            .filter(|s| &s.tutor_id == tutor_id && s.is_published())
            .count()
    }

    pub async fn add_exception(
        &self,
        tutor_id: &SubjectId,
        spec: ExceptionSpec,
    ) -> AppResult<AvailabilityException> {
        let exception = spec.into_exception(tutor_id.clone(), Utc::now())?;
        let mut state = self.state.lock().await;
        state.exceptions.insert(exception.id, exception.clone());
        info!(exception_id = %exception.id, tutor_id = %tutor_id, "Exception added");
        Ok(exception)
    }

    pub async fn remove_exception(
        &self,
        tutor_id: &SubjectId,
        exception_id: ExceptionId,
    ) -> AppResult<AvailabilityException> {
        let mut state = self.state.lock().await;
        match state.exceptions.get(&exception_id) {
            None => {
                return Err(AppError::not_found(format!(
                    "Exception {exception_id} not found"
                )));
            }
            Some(e) if &e.tutor_id != tutor_id => {
                return Err(AppError::authorization(format!(
                    "Exception {exception_id} belongs to another tutor"
                )));
            }
            Some(_) => {}
        }
        let removed = state
            .exceptions
            .remove(&exception_id)
            .ok_or_else(|| AppError::not_found(format!("Exception {exception_id} not found")))?;
        info!(exception_id = %exception_id, "Exception removed");
        Ok(removed)
    }

    /// A tutor's exceptions ordered by start date.
    pub async fn list_exceptions(&self, tutor_id: &SubjectId) -> Vec<AvailabilityException> {
        let state = self.state.lock().await;
        let mut exceptions: Vec<AvailabilityException> = state
            .exceptions
            .values()
            .filter(|e| &e.tutor_id == tutor_id)
            .cloned()
            .collect();
        exceptions.sort_by_key(|e| (e.start_date, e.created_at));
        exceptions
    }

    /// The tutor's effective policy.
    pub async fn policy(&self, tutor_id: &SubjectId) -> AvailabilityPolicy {
        let state = self.state.lock().await;
        state.policy_for(tutor_id, &self.default_policy)
    }

    pub async fn set_policy(
        &self,
        tutor_id: &SubjectId,
        policy: AvailabilityPolicy,
    ) -> AppResult<AvailabilityPolicy> {
        policy.validate()?;
        let mut state = self.state.lock().await;
        state.policies.insert(tutor_id.clone(), policy.clone());
        info!(tutor_id = %tutor_id, "Availability policy updated");
        Ok(policy)
    }
}

fn publish(slot: &mut Slot, now: DateTime<Utc>) {
    slot.status = SlotStatus::Published;
    slot.published_at = Some(now);
    slot.updated_at = Some(now);
    slot.session_id = Some(SessionId::for_slot(slot.id));
}
