//! Tutor availability handlers.

use axum::Json;
use axum::extract::{Path, State};
use serde_json::{Value, json};

use tutorhub_core::types::{ExceptionId, SlotId};
use tutorhub_entity::exception::ExceptionSpec;
use tutorhub_entity::policy::AvailabilityPolicy;
use tutorhub_entity::slot::{SlotPatch, SlotSpec};

use crate::dto::response::{DeletedCountResponse, PublishAllResponse};
use crate::error::ApiError;
use crate::extractors::{Identity, parse_id};
use crate::state::AppState;

/// GET /availability
pub async fn overview(
    State(state): State<AppState>,
    auth: Identity,
) -> Result<Json<Value>, ApiError> {
    let overview = state.sessions()?.availability.overview(&auth).await?;
    Ok(Json(json!({ "success": true, "data": overview })))
}

/// POST /availability/slots
pub async fn add_slot(
    State(state): State<AppState>,
    auth: Identity,
    Json(spec): Json<SlotSpec>,
) -> Result<Json<Value>, ApiError> {
    let slot = state.sessions()?.availability.add_slot(&auth, spec).await?;
    Ok(Json(json!({ "success": true, "data": slot })))
}

/// PUT /availability/slots/{id}
pub async fn update_slot(
    State(state): State<AppState>,
    auth: Identity,
    Path(id): Path<String>,
    Json(patch): Json<SlotPatch>,
) -> Result<Json<Value>, ApiError> {
    let slot_id: SlotId = parse_id(&id)?;
    let slot = state
        .sessions()?
        .availability
        .update_slot(&auth, slot_id, patch)
        .await?;
    Ok(Json(json!({ "success": true, "data": slot })))
}

/// DELETE /availability/slots/{id}
pub async fn delete_slot(
    State(state): State<AppState>,
    auth: Identity,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let slot_id: SlotId = parse_id(&id)?;
    let slot = state.sessions()?.availability.delete_slot(&auth, slot_id).await?;
    Ok(Json(json!({ "success": true, "data": slot })))
}

/// POST /availability/slots/{id}/publish
pub async fn publish_slot(
    State(state): State<AppState>,
    auth: Identity,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let slot_id: SlotId = parse_id(&id)?;
    let published = state
        .sessions()?
        .availability
        .publish_slot(&auth, slot_id)
        .await?;
    Ok(Json(json!({ "success": true, "data": published })))
}

/// POST /availability/publish-all
pub async fn publish_all(
    State(state): State<AppState>,
    auth: Identity,
) -> Result<Json<Value>, ApiError> {
    let published = state.sessions()?.availability.publish_all(&auth).await?;
    let data = PublishAllResponse {
        count: published.len(),
        published,
    };
    Ok(Json(json!({ "success": true, "data": data })))
}

/// DELETE /availability/bulk-delete-unpublished
pub async fn bulk_delete_unpublished(
    State(state): State<AppState>,
    auth: Identity,
) -> Result<Json<Value>, ApiError> {
    let deleted = state
        .sessions()?
        .availability
        .bulk_delete_unpublished(&auth)
        .await?;
    Ok(Json(
        json!({ "success": true, "data": DeletedCountResponse { deleted } }),
    ))
}

/// POST /availability/exceptions
pub async fn add_exception(
    State(state): State<AppState>,
    auth: Identity,
    Json(spec): Json<ExceptionSpec>,
) -> Result<Json<Value>, ApiError> {
    let exception = state
        .sessions()?
        .availability
        .add_exception(&auth, spec)
        .await?;
    Ok(Json(json!({ "success": true, "data": exception })))
}

/// DELETE /availability/exceptions/{id}
pub async fn remove_exception(
    State(state): State<AppState>,
    auth: Identity,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let exception_id: ExceptionId = parse_id(&id)?;
    let exception = state
        .sessions()?
        .availability
        .remove_exception(&auth, exception_id)
        .await?;
    Ok(Json(json!({ "success": true, "data": exception })))
}

/// PUT /availability/policy
pub async fn set_policy(
    State(state): State<AppState>,
    auth: Identity,
    Json(policy): Json<AvailabilityPolicy>,
) -> Result<Json<Value>, ApiError> {
    let policy = state.sessions()?.availability.set_policy(&auth, policy).await?;
    Ok(Json(json!({ "success": true, "data": policy })))
}
