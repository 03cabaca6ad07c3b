//! Aggregate statistics

use rusqlite::Connection;
use tracing::instrument;

use super::games::GameStore;
use crate::error::Result;
use crate::models::Stats;

pub struct StatsStore<'a> {
    conn: &'a Connection,
}

impl<'a> StatsStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Platform-wide counters plus the most-played game
    #[instrument(skip(self))]
    pub fn summary(&self) -> Result<Stats> {
        let total_users: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM users WHERE is_active = 1",
            [],
            |row| row.get(0),
        )?;
        let total_games: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM games WHERE is_active = 1",
            [],
            |row| row.get(0),
        )?;
        let total_messages: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM chat_messages WHERE is_deleted = 0",
            [],
            |row| row.get(0),
        )?;
        let popular_game = GameStore::new(self.conn).most_played()?;

        Ok(Stats {
            total_users,
            total_games,
            total_messages,
            popular_game,
        })
    }
}
