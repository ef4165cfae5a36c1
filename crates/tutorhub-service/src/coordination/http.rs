//! HTTP implementation of the sessions RPC contract.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use tutorhub_core::config::CoordinationConfig;
use tutorhub_core::types::{BookingId, SessionId, SlotId, SubjectId};
use tutorhub_core::{AppError, AppResult, ErrorKind};
use tutorhub_entity::session::{EnrollmentCount, SessionSnapshot};
use tutorhub_entity::slot::Slot;

use super::client::{BookSlotRequest, SeatRequest, SessionsClient, UnbookSlotRequest};

/// Success body of every API response.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: T,
}

/// Error body of every API response.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
    message: String,
}

/// Calls a remote sessions service over `/internal/*`.
#[derive(Debug, Clone)]
pub struct HttpSessionsClient {
    http: Client,
    base_url: String,
}

impl HttpSessionsClient {
    /// Build a client for `base_url`, bounding each request by `timeout`.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> AppResult<Self> {
        let http = Client::builder().timeout(timeout).build().map_err(|e| {
            AppError::with_source(ErrorKind::Configuration, "Failed to build HTTP client", e)
        })?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &CoordinationConfig) -> AppResult<Self> {
        let base_url = config.sessions_base_url.as_deref().ok_or_else(|| {
            AppError::configuration("coordination.sessions_base_url is not set")
        })?;
        Self::new(base_url, config.request_timeout())
    }

    fn url(&self, path: &str) -> String {
        format!("{}/internal/{path}", self.base_url)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> AppResult<T> {
        let response = request.send().await.map_err(transport_error)?;
        let status = response.status();
        debug!(status = status.as_u16(), url = %response.url(), "Sessions RPC response");

        if status.is_success() {
            let envelope: Envelope<T> = response.json().await.map_err(transport_error)?;
            return Ok(envelope.data);
        }

        let body = response.json::<ErrorBody>().await.ok();
        Err(remote_error(status, body))
    }
}

#[async_trait]
impl SessionsClient for HttpSessionsClient {
    async fn enroll(
        &self,
        session_id: SessionId,
        booking_id: BookingId,
    ) -> AppResult<EnrollmentCount> {
        self.send(
            self.http
                .post(self.url(&format!("enroll/{session_id}")))
                .json(&SeatRequest { booking_id }),
        )
        .await
    }

    async fn unenroll(
        &self,
        session_id: SessionId,
        booking_id: BookingId,
    ) -> AppResult<EnrollmentCount> {
        self.send(
            self.http
                .post(self.url(&format!("unenroll/{session_id}")))
                .json(&SeatRequest { booking_id }),
        )
        .await
    }

    async fn snapshot(&self, session_id: SessionId) -> AppResult<SessionSnapshot> {
        self.send(self.http.get(self.url(&session_id.to_string())))
            .await
    }

    async fn book_slot(
        &self,
        slot_id: SlotId,
        tutor_id: &SubjectId,
        student_id: &SubjectId,
    ) -> AppResult<Slot> {
        let body = BookSlotRequest {
            tutor_id: tutor_id.clone(),
            student_id: student_id.clone(),
        };
        self.send(
            self.http
                .put(self.url(&format!("slots/{slot_id}/book")))
                .json(&body),
        )
        .await
    }

    async fn unbook_slot(&self, slot_id: SlotId, tutor_id: &SubjectId) -> AppResult<Slot> {
        let body = UnbookSlotRequest {
            tutor_id: tutor_id.clone(),
        };
        self.send(
            self.http
                .put(self.url(&format!("slots/{slot_id}/unbook")))
                .json(&body),
        )
        .await
    }

    async fn slot(&self, slot_id: SlotId) -> AppResult<Slot> {
        self.send(self.http.get(self.url(&format!("slots/{slot_id}"))))
            .await
    }
}

fn transport_error(err: reqwest::Error) -> AppError {
    if err.is_decode() {
        return AppError::with_source(
            ErrorKind::Serialization,
            "Malformed sessions service response",
            err,
        );
    }
    let message = if err.is_timeout() {
        "Sessions service timed out"
    } else {
        "Sessions service unreachable"
    };
    AppError::with_source(ErrorKind::UpstreamUnavailable, message, err)
}

/// Rebuild the remote `AppError` from its status and body.
fn remote_error(status: StatusCode, body: Option<ErrorBody>) -> AppError {
    if let Some(body) = body
        && let Ok(kind) = body.error.parse::<ErrorKind>()
    {
        return AppError::new(kind, body.message);
    }
    let kind = match status {
        StatusCode::NOT_FOUND => ErrorKind::NotFound,
        StatusCode::CONFLICT => ErrorKind::Conflict,
        s if s.is_server_error() => ErrorKind::UpstreamUnavailable,
        _ => ErrorKind::Internal,
    };
    AppError::new(kind, format!("Sessions service returned {status}"))
}
