//! Drift repair between the booking ledger and slot/session state.
//!
//! A confirm may enroll a seat but fail to book the slot, and a cancel may
//! fail to release either. The reconciler periodically compares the
//! ledger's view with the sessions side and repairs slot flags. Enrollment
//! counts are only reported: rewriting a counter from the bookings side
//! could race with live confirms. Slots and sessions touched by a booking
//! with a transition in flight are skipped until the next pass.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use tutorhub_core::types::{SessionId, SlotId, SubjectId};
use tutorhub_core::{AppResult, ErrorKind};
use tutorhub_entity::booking::Booking;
use tutorhub_store::BookingStore;

use crate::coordination::SessionsClient;

/// Outcome of one reconciliation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconcileReport {
    pub slots_checked: usize,
    pub slots_booked: usize,
    pub slots_unbooked: usize,
    /// Sessions whose enrolled count disagrees with the ledger.
    pub enrollment_drift: usize,
    /// Slots or sessions that could not be read.
    pub errors: usize,
    /// Slots left alone because a booking on them was mid-transition.
    pub skipped: usize,
}

impl ReconcileReport {
    pub fn repaired(&self) -> usize {
        self.slots_booked + self.slots_unbooked
    }
}

#[derive(Debug, Clone)]
pub struct BookingReconciler {
    store: BookingStore,
    client: Arc<dyn SessionsClient>,
    interval: Duration,
}

impl BookingReconciler {
    pub fn new(store: BookingStore, client: Arc<dyn SessionsClient>, interval: Duration) -> Self {
        Self {
            store,
            client,
            interval,
        }
    }

    /// Run one full pass over every slot and session the ledger references.
    pub async fn reconcile(&self) -> AppResult<ReconcileReport> {
        let (bookings, in_flight) = self.store.all_with_in_flight().await;
        let mut report = ReconcileReport::default();

        let mut by_slot: BTreeMap<SlotId, Vec<&Booking>> = BTreeMap::new();
        let mut by_session: BTreeMap<SessionId, Vec<&Booking>> = BTreeMap::new();
        for booking in &bookings {
            if let Some(slot_id) = booking.slot_id {
                by_slot.entry(slot_id).or_default().push(booking);
            }
            by_session.entry(booking.session_id).or_default().push(booking);
        }
        let busy = |bookings: &[&Booking]| bookings.iter().any(|b| in_flight.contains(&b.id));

        for (slot_id, bookings) in &by_slot {
            if busy(bookings.as_slice()) {
                debug!(slot_id = %slot_id, "Slot has a transition in flight; skipped");
                report.skipped += 1;
                continue;
            }
            report.slots_checked += 1;
            self.reconcile_slot(*slot_id, bookings, &mut report).await;
        }

        for (session_id, bookings) in &by_session {
            if busy(bookings.as_slice()) {
                debug!(session_id = %session_id, "Session has a transition in flight; skipped");
                continue;
            }
            self.check_enrollment(*session_id, bookings, &mut report).await;
        }

        if report.repaired() > 0 || report.enrollment_drift > 0 {
            warn!(
                slots_checked = report.slots_checked,
                slots_booked = report.slots_booked,
                slots_unbooked = report.slots_unbooked,
                enrollment_drift = report.enrollment_drift,
                "Booking drift detected"
            );
        } else {
            debug!(slots_checked = report.slots_checked, "Booking state consistent");
        }
        Ok(report)
    }

    async fn reconcile_slot(&self, slot_id: SlotId, bookings: &[&Booking], report: &mut ReconcileReport) {
        let slot = match self.client.slot(slot_id).await {
            Ok(slot) => slot,
            Err(err) if err.kind == ErrorKind::NotFound => {
                debug!(slot_id = %slot_id, "Slot no longer exists");
                return;
            }
            Err(err) => {
                warn!(slot_id = %slot_id, error = %err, "Slot lookup failed");
                report.errors += 1;
                return;
            }
        };

        let holder = bookings
            .iter()
            .filter(|b| b.status.holds_seat())
            .min_by_key(|b| b.confirmed_at)
            .map(|b| &b.student_id);

        match holder {
            Some(student_id) if !slot.booked => {
                match self.client.book_slot(slot_id, &slot.tutor_id, student_id).await {
                    Ok(_) => {
                        info!(slot_id = %slot_id, student_id = %student_id, "Slot re-booked");
                        report.slots_booked += 1;
                    }
                    Err(err) => {
                        warn!(slot_id = %slot_id, error = %err, "Slot re-book failed");
                        report.errors += 1;
                    }
                }
            }
            None if slot.booked => {
                let students: HashSet<&SubjectId> =
                    bookings.iter().map(|b| &b.student_id).collect();
                let held_by_ledger_student = slot
                    .booked_by
                    .as_ref()
                    .is_some_and(|s| students.contains(s));
                if !held_by_ledger_student {
                    return;
                }
                if self.store.slot_in_use(slot_id).await {
                    debug!(slot_id = %slot_id, "Slot claimed since the pass started; skipped");
                    report.skipped += 1;
                    return;
                }
                match self.client.unbook_slot(slot_id, &slot.tutor_id).await {
                    Ok(_) => {
                        info!(slot_id = %slot_id, "Stale slot booking released");
                        report.slots_unbooked += 1;
                    }
                    Err(err) => {
                        warn!(slot_id = %slot_id, error = %err, "Slot release failed");
                        report.errors += 1;
                    }
                }
            }
            _ => {}
        }
    }

    async fn check_enrollment(
        &self,
        session_id: SessionId,
        bookings: &[&Booking],
        report: &mut ReconcileReport,
    ) {
        let snapshot = match self.client.snapshot(session_id).await {
            Ok(snapshot) => snapshot,
            Err(err) if err.kind == ErrorKind::NotFound => return,
            Err(err) => {
                warn!(session_id = %session_id, error = %err, "Session lookup failed");
                report.errors += 1;
                return;
            }
        };
        let expected = bookings.iter().filter(|b| b.status.holds_seat()).count() as u32;
        if snapshot.enrolled != expected {
            warn!(
                session_id = %session_id,
                enrolled = snapshot.enrolled,
                expected = expected,
                "Enrollment drift"
            );
            report.enrollment_drift += 1;
        }
    }

    /// Reconcile every `interval` until `cancel` flips to true.
    pub async fn run(&self, mut cancel: watch::Receiver<bool>) {
        info!(interval_secs = self.interval.as_secs(), "Booking reconciler started");
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                changed = cancel.changed() => {
                    if changed.is_err() || *cancel.borrow() {
                        info!("Booking reconciler received shutdown signal");
                        break;
                    }
                }
                _ = ticker.tick() => {
                    if let Err(err) = self.reconcile().await {
                        error!(error = %err, "Reconciliation pass failed");
                    }
                }
            }
        }

        info!("Booking reconciler stopped");
    }
}
