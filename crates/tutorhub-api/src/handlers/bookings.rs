//! Student booking handlers.

use axum::Json;
use axum::extract::{Path, State};
use serde_json::{Value, json};

use tutorhub_core::types::BookingId;

use crate::dto::request::{CreateBookingRequest, ReasonRequest, validated};
use crate::error::ApiError;
use crate::extractors::{Identity, parse_id};
use crate::state::AppState;

/// POST /bookings
pub async fn create_booking(
    State(state): State<AppState>,
    auth: Identity,
    Json(req): Json<CreateBookingRequest>,
) -> Result<Json<Value>, ApiError> {
    let req = validated(req)?;
    let booking = state
        .bookings()?
        .ledger
        .create(&auth, req.into())
        .await?;
    Ok(Json(json!({ "success": true, "data": booking })))
}

/// GET /bookings
pub async fn list_my_bookings(
    State(state): State<AppState>,
    auth: Identity,
) -> Result<Json<Value>, ApiError> {
    let bookings = state.bookings()?.ledger.list_for_student(&auth).await?;
    Ok(Json(json!({ "success": true, "data": bookings })))
}

/// GET /bookings/{id}
pub async fn get_booking(
    State(state): State<AppState>,
    auth: Identity,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let booking_id: BookingId = parse_id(&id)?;
    let booking = state.bookings()?.ledger.get(&auth, booking_id).await?;
    Ok(Json(json!({ "success": true, "data": booking })))
}

/// POST /bookings/{id}/cancel
pub async fn cancel_booking(
    State(state): State<AppState>,
    auth: Identity,
    Path(id): Path<String>,
    body: Option<Json<ReasonRequest>>,
) -> Result<Json<Value>, ApiError> {
    let booking_id: BookingId = parse_id(&id)?;
    let req = validated(body.map(|Json(b)| b).unwrap_or_default())?;
    let booking = state
        .bookings()?
        .ledger
        .cancel(&auth, booking_id, req.reason)
        .await?;
    Ok(Json(json!({ "success": true, "data": booking })))
}
