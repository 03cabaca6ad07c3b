//! Category and statistics handlers

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use crate::envelope::{ApiResult, Envelope};
use crate::state::AppState;

/// GET /api/categories
pub async fn categories(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let categories = state.db().categories().list()?;
    Ok(Json(Envelope::with_data(
        "Categories found",
        json!({ "categories": categories }),
    )))
}

/// GET /api/stats
pub async fn stats(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let stats = state.db().stats().summary()?;
    Ok(Json(Envelope::with_data("Platform statistics", json!(stats))))
}
