//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use validator::Validate;

use tutorhub_core::AppError;
use tutorhub_core::types::{SessionId, SlotId, SubjectId};
use tutorhub_entity::booking::BookingStatus;
use tutorhub_entity::session::SessionFilter;
use tutorhub_entity::slot::SlotMode;
use tutorhub_service::booking::BookingRequest;

/// Run the derived validation rules, mapping failures to `Validation`.
pub fn validated<T: Validate>(value: T) -> Result<T, AppError> {
    value
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;
    Ok(value)
}

/// Student booking request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    /// Session to book.
    pub session_id: SessionId,
    /// Slot within the session; defaults to the session's source slot.
    #[serde(default)]
    pub slot_id: Option<SlotId>,
    /// Note to the tutor.
    #[serde(default)]
    #[validate(length(max = 1000, message = "Message is too long"))]
    pub message: Option<String>,
}

impl From<CreateBookingRequest> for BookingRequest {
    fn from(req: CreateBookingRequest) -> Self {
        Self {
            session_id: req.session_id,
            slot_id: req.slot_id,
            message: req.message,
        }
    }
}

/// Optional reason attached to a reject or cancel.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct ReasonRequest {
    #[serde(default)]
    #[validate(length(max = 500, message = "Reason is too long"))]
    pub reason: Option<String>,
}

/// `?status=` filter on the tutor's booking list.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookingStatusQuery {
    pub status: Option<String>,
}

impl BookingStatusQuery {
    pub fn status(&self) -> Result<Option<BookingStatus>, AppError> {
        self.status
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(str::parse)
            .transpose()
    }
}

/// Catalog browse query string.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BrowseQuery {
    #[validate(length(min = 1, max = 32))]
    pub course_code: Option<String>,
    pub tutor_id: Option<String>,
    pub mode: Option<SlotMode>,
    #[serde(default)]
    pub only_available: bool,
}

impl From<BrowseQuery> for SessionFilter {
    fn from(query: BrowseQuery) -> Self {
        Self {
            course_code: query.course_code,
            tutor_id: query.tutor_id.map(SubjectId::new),
            mode: query.mode,
            only_available: query.only_available,
        }
    }
}
