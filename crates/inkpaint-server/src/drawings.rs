//! Drawing CRUD, scoped to the authenticated user.

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use inkpaint_core::api::{
    Drawing, DrawingId, DrawingSummary, MessageResponse, NewDrawing, SavedDrawing, non_empty,
};
use tracing::{info, warn};

use crate::AppState;
use crate::auth::Claims;
use crate::error::ApiError;

fn not_found() -> ApiError {
    ApiError::NotFound("Drawing not found".to_string())
}

/// Path ids that are not integers cannot name a drawing.
fn parse_id(raw: &str) -> Result<DrawingId, ApiError> {
    raw.parse().map_err(|_| not_found())
}

pub async fn create(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<NewDrawing>,
) -> Result<Json<SavedDrawing>, ApiError> {
    let (Some(name), Some(data)) = (non_empty(&req.name), non_empty(&req.data)) else {
        return Err(ApiError::BadRequest("Name and data are required".to_string()));
    };

    let id = state
        .db
        .insert_drawing(claims.id, name, data)
        .await
        .map_err(|e| ApiError::storage("Error saving drawing", e))?;

    info!(user_id = claims.id, drawing_id = id, "Saved drawing {:?} ({} bytes)", name, data.len());
    Ok(Json(SavedDrawing {
        id,
        message: "Drawing saved".to_string(),
    }))
}

pub async fn list(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Vec<DrawingSummary>>, ApiError> {
    let drawings = state
        .db
        .list_drawings(claims.id)
        .await
        .map_err(|e| ApiError::storage("Error loading drawings", e))?;
    Ok(Json(drawings))
}

pub async fn get(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(raw_id): Path<String>,
) -> Result<Json<Drawing>, ApiError> {
    let id = parse_id(&raw_id)?;
    let drawing = state
        .db
        .get_drawing(id, claims.id)
        .await
        .map_err(|e| ApiError::storage("Error loading drawing", e))?
        .ok_or_else(not_found)?;
    Ok(Json(drawing))
}

pub async fn delete(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(raw_id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = parse_id(&raw_id)?;
    let removed = state
        .db
        .delete_drawing(id, claims.id)
        .await
        .map_err(|e| ApiError::storage("Error deleting drawing", e))?;

    if !removed {
        warn!(user_id = claims.id, drawing_id = id, "Delete of missing drawing");
        return Err(not_found());
    }

    info!(user_id = claims.id, drawing_id = id, "Deleted drawing");
    Ok(Json(MessageResponse {
        message: "Drawing deleted".to_string(),
    }))
}
