//! Aggregate statistics

use serde::{Deserialize, Serialize};

use super::PopularGame;

/// Platform-wide counters plus the most-played game
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stats {
    pub total_users: i64,
    pub total_games: i64,
    pub total_messages: i64,
    pub popular_game: Option<PopularGame>,
}
