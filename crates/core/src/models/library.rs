//! Library models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A game in a user's library, joined with its catalog data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LibraryView {
    pub game_id: Uuid,
    pub title: String,
    pub description: String,
    pub category: String,
    pub category_color: String,
    pub image_url: String,
    pub game_url: String,
    pub play_count: i64,
    pub rating: f64,
    pub added_at: DateTime<Utc>,
    pub status: String,
    pub last_played: Option<DateTime<Utc>>,
    pub play_time: i64,
}
