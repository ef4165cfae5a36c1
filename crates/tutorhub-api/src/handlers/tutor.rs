//! Tutor booking-decision and stats handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use serde_json::{Value, json};

use tutorhub_core::types::BookingId;

use crate::dto::request::{BookingStatusQuery, ReasonRequest, validated};
use crate::error::ApiError;
use crate::extractors::{Identity, parse_id};
use crate::state::AppState;

/// GET /tutor/bookings?status=
pub async fn list_bookings(
    State(state): State<AppState>,
    auth: Identity,
    Query(query): Query<BookingStatusQuery>,
) -> Result<Json<Value>, ApiError> {
    let status = query.status()?;
    let bookings = state.bookings()?.ledger.list_for_tutor(&auth, status).await?;
    Ok(Json(json!({ "success": true, "data": bookings })))
}

/// POST /tutor/bookings/{id}/confirm
pub async fn confirm_booking(
    State(state): State<AppState>,
    auth: Identity,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let booking_id: BookingId = parse_id(&id)?;
    let booking = state.bookings()?.ledger.confirm(&auth, booking_id).await?;
    Ok(Json(json!({ "success": true, "data": booking })))
}

/// POST /tutor/bookings/{id}/reject
pub async fn reject_booking(
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
        .reject(&auth, booking_id, req.reason)
        .await?;
    Ok(Json(json!({ "success": true, "data": booking })))
}

/// POST /tutor/bookings/{id}/cancel
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
        .cancel_as_tutor(&auth, booking_id, req.reason)
        .await?;
    Ok(Json(json!({ "success": true, "data": booking })))
}

/// POST /tutor/bookings/{id}/complete
pub async fn complete_booking(
    State(state): State<AppState>,
    auth: Identity,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let booking_id: BookingId = parse_id(&id)?;
    let booking = state.bookings()?.ledger.complete(&auth, booking_id).await?;
    Ok(Json(json!({ "success": true, "data": booking })))
}

/// GET /tutor/stats
pub async fn stats(
    State(state): State<AppState>,
    auth: Identity,
) -> Result<Json<Value>, ApiError> {
    let stats = state.bookings()?.ledger.tutor_stats(&auth).await?;
    Ok(Json(json!({ "success": true, "data": stats })))
}
