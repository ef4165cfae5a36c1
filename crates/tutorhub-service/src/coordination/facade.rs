//! Sequencing of the downstream effects of booking transitions.
//!
//! Each outbound call runs under a per-attempt timeout and is retried with
//! backoff while it fails with a retryable error. Seat calls carry the
//! booking id, so a retry after a lost response is absorbed by the
//! catalog. Once the enroll step of a confirm has succeeded the facade
//! only moves forward: a failed slot update is logged and left for the
//! reconciler.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::time::timeout;
use tracing::{debug, warn};

use tutorhub_core::config::CoordinationConfig;
use tutorhub_core::retry::RetryPolicy;
use tutorhub_core::types::SessionId;
use tutorhub_core::{AppError, AppResult};
use tutorhub_entity::booking::Booking;
use tutorhub_entity::session::{EnrollmentCount, SessionSnapshot};

use super::client::SessionsClient;

/// What a confirm changed downstream.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmOutcome {
    pub enrollment: EnrollmentCount,
    /// False when the booking has no slot or the slot update failed.
    pub slot_booked: bool,
}

/// What a cancel changed downstream.
#[derive(Debug, Clone, Copy, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelOutcome {
    pub released_seat: bool,
    pub slot_released: bool,
}

#[derive(Debug, Clone)]
pub struct CoordinationFacade {
    client: Arc<dyn SessionsClient>,
    retry: RetryPolicy,
    call_timeout: Duration,
}

impl CoordinationFacade {
    pub fn new(client: Arc<dyn SessionsClient>, retry: RetryPolicy, call_timeout: Duration) -> Self {
        Self {
            client,
            retry,
            call_timeout,
        }
    }

    pub fn from_config(client: Arc<dyn SessionsClient>, config: &CoordinationConfig) -> Self {
        Self::new(
            client,
            RetryPolicy::from_config(config),
            config.request_timeout(),
        )
    }

    /// The client this facade calls through.
    pub fn client(&self) -> &Arc<dyn SessionsClient> {
        &self.client
    }

    /// Run `op` with a timeout per attempt and retries on retryable failures.
    async fn call<T, F, Fut>(&self, operation: &'static str, op: F) -> AppResult<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = AppResult<T>>,
    {
        let limit = self.call_timeout;
        self.retry
            .retry(|attempt| {
                let fut = op();
                async move {
                    debug!(operation = operation, attempt = attempt, "Sessions call");
                    match timeout(limit, fut).await {
                        Ok(result) => result,
                        Err(_) => Err(AppError::upstream_unavailable(format!(
                            "{operation} timed out after {}ms",
                            limit.as_millis()
                        ))),
                    }
                }
            })
            .await
    }

    pub async fn snapshot(&self, session_id: SessionId) -> AppResult<SessionSnapshot> {
        self.call("snapshot", || self.client.snapshot(session_id))
            .await
    }

    /// Enroll the booking's session, then book its slot.
    ///
    /// An enroll failure is returned untouched and nothing else is called.
    /// A slot failure after a successful enroll is logged and tolerated.
    pub async fn on_confirm(&self, booking: &Booking) -> AppResult<ConfirmOutcome> {
        let enrollment = self
            .call("enroll", || self.client.enroll(booking.session_id, booking.id))
            .await?;

        let slot_booked = match booking.slot_id {
            None => false,
            Some(slot_id) => match self
                .call("book_slot", || {
                    self.client
                        .book_slot(slot_id, &booking.tutor_id, &booking.student_id)
                })
                .await
            {
                Ok(_) => true,
                Err(err) => {
                    warn!(
                        booking_id = %booking.id,
                        slot_id = %slot_id,
                        error = %err,
                        "Slot booking failed after enrollment; leaving for reconciliation"
                    );
                    false
                }
            },
        };

        Ok(ConfirmOutcome {
            enrollment,
            slot_booked,
        })
    }

    /// Release the seat held by `booking`, if any. Best-effort.
    ///
    /// Also used after a confirm whose enroll outcome is unknown: the
    /// release is keyed by booking, so it cannot free anyone else's seat.
    pub async fn release_seat(&self, booking: &Booking) -> bool {
        match self
            .call("unenroll", || {
                self.client.unenroll(booking.session_id, booking.id)
            })
            .await
        {
            Ok(_) => true,
            Err(err) => {
                warn!(
                    booking_id = %booking.id,
                    session_id = %booking.session_id,
                    error = %err,
                    "Seat release failed"
                );
                false
            }
        }
    }

    /// Release the booking's seat and slot. Both steps are best-effort.
    ///
    /// With `slot_still_held` the slot stays booked for another confirmed
    /// booking and only the seat is released.
    pub async fn on_cancel(&self, booking: &Booking, slot_still_held: bool) -> CancelOutcome {
        let released_seat = self.release_seat(booking).await;

        let slot_released = match booking.slot_id {
            Some(slot_id) if !slot_still_held => match self
                .call("unbook_slot", || {
                    self.client.unbook_slot(slot_id, &booking.tutor_id)
                })
                .await
            {
                Ok(_) => true,
                Err(err) => {
                    warn!(
                        booking_id = %booking.id,
                        slot_id = %slot_id,
                        error = %err,
                        "Slot release failed; leaving for reconciliation"
                    );
                    false
                }
            },
            _ => false,
        };

        CancelOutcome {
            released_seat,
            slot_released,
        }
    }
}
