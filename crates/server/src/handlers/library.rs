//! Personal library handlers

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;
use uuid::Uuid;

use crate::envelope::{ApiError, ApiResult, Envelope};
use crate::session::CurrentUser;
use crate::state::AppState;

/// GET /api/library
pub async fn list(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> ApiResult<impl IntoResponse> {
    let games = state.db().library().list_for_user(user.id)?;
    Ok(Json(Envelope::with_data(
        "User library",
        json!({ "count": games.len(), "games": games }),
    )))
}

/// POST /api/library/{id}
pub async fn add(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(game_id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    state.db().library().add(user.id, game_id)?;
    Ok(Json(Envelope::ok("Game added to library")))
}

/// DELETE /api/library/{id}
pub async fn remove(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(game_id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let removed = state.db().library().remove(user.id, game_id)?;
    if !removed {
        return Err(ApiError::NotFound("game not found in library".to_string()));
    }
    Ok(Json(Envelope::ok("Game removed from library")))
}
