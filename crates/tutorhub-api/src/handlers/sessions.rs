//! Student catalog handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use serde_json::{Value, json};

use tutorhub_core::types::SessionId;
use tutorhub_entity::session::SessionFilter;

use crate::dto::request::{BrowseQuery, validated};
use crate::error::ApiError;
use crate::extractors::{Identity, parse_id};
use crate::state::AppState;

/// GET /sessions/browse
pub async fn browse(
    State(state): State<AppState>,
    _auth: Identity,
    Query(query): Query<BrowseQuery>,
) -> Result<Json<Value>, ApiError> {
    let filter = SessionFilter::from(validated(query)?);
    let sessions = state.sessions()?.catalog.browse(&filter).await;
    Ok(Json(json!({ "success": true, "data": sessions })))
}

/// GET /sessions/{id}
pub async fn get_session(
    State(state): State<AppState>,
    _auth: Identity,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let session_id: SessionId = parse_id(&id)?;
    let session = state.sessions()?.catalog.get(session_id).await?;
    Ok(Json(json!({ "success": true, "data": session })))
}
