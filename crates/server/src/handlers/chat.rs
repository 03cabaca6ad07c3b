//! Community chat handlers

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use crate::envelope::{ApiError, ApiResult, Envelope};
use crate::session::{AdminUser, CurrentUser};
use crate::state::AppState;

const DEFAULT_HISTORY: u32 = 50;
const MAX_HISTORY: u32 = 100;

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    limit: Option<u32>,
}

/// GET /api/chat/messages
pub async fn history(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> ApiResult<impl IntoResponse> {
    let limit = query.limit.unwrap_or(DEFAULT_HISTORY).min(MAX_HISTORY);
    let messages = state.db().chat().list_recent(limit)?;

    Ok(Json(Envelope::with_data(
        "Chat messages",
        json!({ "count": messages.len(), "messages": messages }),
    )))
}

#[derive(Debug, Deserialize)]
pub struct SendRequest {
    message: String,
}

/// POST /api/chat/messages
pub async fn send(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(req): Json<SendRequest>,
) -> ApiResult<impl IntoResponse> {
    state.db().chat().send(user.id, &req.message)?;
    Ok(Json(Envelope::ok("Message sent")))
}

/// DELETE /api/chat/messages/{id}
///
/// Admin moderation: messages are flagged, never hard-deleted.
pub async fn delete(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Path(message_id): Path<i64>,
) -> ApiResult<impl IntoResponse> {
    let deleted = state.db().chat().delete(message_id)?;
    if !deleted {
        return Err(ApiError::NotFound("message not found".to_string()));
    }
    Ok(Json(Envelope::ok("Message deleted")))
}
