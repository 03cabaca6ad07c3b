//! Game catalog handlers

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use arcadia_core::{Error, GameFilter, NewGame};

use crate::envelope::{ApiError, ApiResult, Envelope};
use crate::session::CurrentUser;
use crate::state::AppState;

const DEFAULT_PAGE_SIZE: u32 = 50;
const MAX_PAGE_SIZE: u32 = 100;

/// Treat absent and blank query values the same
fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    search: Option<String>,
    category: Option<String>,
    limit: Option<u32>,
    offset: Option<u32>,
}

/// GET /api/games
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<impl IntoResponse> {
    let filter = GameFilter {
        search: non_empty(query.search),
        category: non_empty(query.category),
        limit: query.limit.unwrap_or(DEFAULT_PAGE_SIZE).min(MAX_PAGE_SIZE),
        offset: query.offset.unwrap_or(0),
    };

    let games = state.db().games().list(&filter)?;
    Ok(Json(Envelope::with_data(
        "Games found",
        json!({ "count": games.len(), "games": games }),
    )))
}

#[derive(Debug, Deserialize)]
pub struct AddGameRequest {
    title: String,
    description: String,
    category: String,
    image_url: String,
    game_url: String,
}

/// POST /api/games
pub async fn add(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(req): Json<AddGameRequest>,
) -> ApiResult<impl IntoResponse> {
    let db = state.db();
    let id = db.games().add(&NewGame {
        title: req.title,
        description: req.description,
        category: req.category,
        image_url: req.image_url,
        game_url: req.game_url,
        added_by: user.id,
    })?;
    let game = db.games().find_by_id(id)?;

    Ok((
        StatusCode::CREATED,
        Json(Envelope::with_data("Game added", json!({ "game": game }))),
    ))
}

/// GET /api/games/{id}
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let game = state
        .db()
        .games()
        .find_by_id(id)?
        .ok_or_else(|| ApiError::NotFound("game not found".to_string()))?;

    Ok(Json(Envelope::with_data("Game found", json!(game))))
}

/// POST /api/games/{id}/play
///
/// The play-count increment and the library insert are two separate
/// store calls, not one transaction; a concurrent duplicate library
/// entry is rejected by the schema and tolerated here.
pub async fn play(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let db = state.db();
    let game = db
        .games()
        .find_by_id(id)?
        .ok_or_else(|| ApiError::NotFound("game not found".to_string()))?;

    db.games().record_play(id)?;
    match db.library().add(user.id, id) {
        Ok(()) | Err(Error::Duplicate(_)) => {}
        Err(e) => return Err(e.into()),
    }

    Ok(Json(Envelope::with_data(
        "Game started",
        json!({ "game_url": game.game_url, "title": game.title }),
    )))
}
