//! Game models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Input for adding a game to the catalog
#[derive(Debug, Clone)]
pub struct NewGame {
    pub title: String,
    pub description: String,
    /// Category name, resolved against the categories table
    pub category: String,
    pub image_url: String,
    pub game_url: String,
    pub added_by: Uuid,
}

/// Filters for catalog listing
#[derive(Debug, Clone, Default)]
pub struct GameFilter {
    /// Case-insensitive substring match against title or description
    pub search: Option<String>,
    /// Exact category name
    pub category: Option<String>,
    pub limit: u32,
    pub offset: u32,
}

/// Denormalized catalog entry: a game joined with its category and the
/// username of the user who added it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameView {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub category: String,
    pub category_color: String,
    pub image_url: String,
    pub game_url: String,
    pub added_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub play_count: i64,
    pub rating: f64,
}

/// The most-played game, as reported by the stats summary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PopularGame {
    pub title: String,
    pub play_count: i64,
}
