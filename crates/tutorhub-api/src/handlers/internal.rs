//! Internal sessions RPC surface, called by a remote bookings process.
//!
//! These routes carry no caller identity; they must only be reachable on
//! the private network.

use axum::Json;
use axum::extract::{Path, State};
use serde_json::{Value, json};

use tutorhub_core::types::{SessionId, SlotId};
use tutorhub_service::SessionsClient;
use tutorhub_service::coordination::{BookSlotRequest, SeatRequest, UnbookSlotRequest};

use crate::error::ApiError;
use crate::extractors::parse_id;
use crate::state::AppState;

/// POST /internal/enroll/{sessionId}
pub async fn enroll(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<SeatRequest>,
) -> Result<Json<Value>, ApiError> {
    let session_id: SessionId = parse_id(&id)?;
    let count = state
        .sessions()?
        .rpc
        .enroll(session_id, req.booking_id)
        .await?;
    Ok(Json(json!({ "success": true, "data": count })))
}

/// POST /internal/unenroll/{sessionId}
pub async fn unenroll(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<SeatRequest>,
) -> Result<Json<Value>, ApiError> {
    let session_id: SessionId = parse_id(&id)?;
    let count = state
        .sessions()?
        .rpc
        .unenroll(session_id, req.booking_id)
        .await?;
    Ok(Json(json!({ "success": true, "data": count })))
}

/// GET /internal/{sessionId}
pub async fn snapshot(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let session_id: SessionId = parse_id(&id)?;
    let snapshot = state.sessions()?.rpc.snapshot(session_id).await?;
    Ok(Json(json!({ "success": true, "data": snapshot })))
}

/// GET /internal/slots/{slotId}
pub async fn get_slot(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let slot_id: SlotId = parse_id(&id)?;
    let slot = state.sessions()?.rpc.slot(slot_id).await?;
    Ok(Json(json!({ "success": true, "data": slot })))
}

/// PUT /internal/slots/{slotId}/book
pub async fn book_slot(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<BookSlotRequest>,
) -> Result<Json<Value>, ApiError> {
    let slot_id: SlotId = parse_id(&id)?;
    let slot = state
        .sessions()?
        .rpc
        .book_slot(slot_id, &req.tutor_id, &req.student_id)
        .await?;
    Ok(Json(json!({ "success": true, "data": slot })))
}

/// PUT /internal/slots/{slotId}/unbook
pub async fn unbook_slot(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UnbookSlotRequest>,
) -> Result<Json<Value>, ApiError> {
    let slot_id: SlotId = parse_id(&id)?;
    let slot = state
        .sessions()?
        .rpc
        .unbook_slot(slot_id, &req.tutor_id)
        .await?;
    Ok(Json(json!({ "success": true, "data": slot })))
}
