//! Personal library storage operations

use chrono::Utc;
use rusqlite::{params, Connection};
use tracing::instrument;
use uuid::Uuid;

use super::parse::{parse_datetime, parse_datetime_opt, parse_uuid, OptionalExt};
use crate::error::{Error, Result};
use crate::models::LibraryView;

pub struct LibraryStore<'a> {
    conn: &'a Connection,
}

impl<'a> LibraryStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Add a game to a user's library
    ///
    /// The game must exist and be active, and a user holds at most one
    /// entry per game; a repeat add is rejected, not silently ignored.
    #[instrument(skip(self))]
    pub fn add(&self, user_id: Uuid, game_id: Uuid) -> Result<()> {
        let game_exists: Option<i64> = self
            .conn
            .query_row(
                "SELECT 1 FROM games WHERE id = ?1 AND is_active = 1",
                params![game_id.to_string()],
                |row| row.get(0),
            )
            .optional()?;
        if game_exists.is_none() {
            return Err(Error::NotFound("game"));
        }

        let in_library: Option<i64> = self
            .conn
            .query_row(
                "SELECT 1 FROM library_entries WHERE user_id = ?1 AND game_id = ?2",
                params![user_id.to_string(), game_id.to_string()],
                |row| row.get(0),
            )
            .optional()?;
        if in_library.is_some() {
            return Err(Error::Duplicate("library entry"));
        }

        self.conn
            .execute(
                "INSERT INTO library_entries (user_id, game_id, added_at) VALUES (?1, ?2, ?3)",
                params![
                    user_id.to_string(),
                    game_id.to_string(),
                    Utc::now().to_rfc3339(),
                ],
            )
            .map_err(|e| Error::duplicate_on_constraint(e, "library entry"))?;

        Ok(())
    }

    /// List a user's library, most recently added first
    #[instrument(skip(self))]
    pub fn list_for_user(&self, user_id: Uuid) -> Result<Vec<LibraryView>> {
        let mut stmt = self.conn.prepare(
            "SELECT g.id, g.title, g.description, c.name, c.color, g.image_url,
                    g.game_url, g.play_count, g.rating, le.added_at, le.status,
                    le.last_played, le.play_time
             FROM library_entries le
             JOIN games g ON le.game_id = g.id
             JOIN categories c ON g.category_id = c.id
             WHERE le.user_id = ?1 AND g.is_active = 1
             ORDER BY le.added_at DESC",
        )?;

        let entries = stmt
            .query_map(params![user_id.to_string()], |row| {
                Ok(LibraryView {
                    game_id: parse_uuid(&row.get::<_, String>(0)?)?,
                    title: row.get(1)?,
                    description: row.get(2)?,
                    category: row.get(3)?,
                    category_color: row.get(4)?,
                    image_url: row.get(5)?,
                    game_url: row.get(6)?,
                    play_count: row.get(7)?,
                    rating: row.get(8)?,
                    added_at: parse_datetime(&row.get::<_, String>(9)?)?,
                    status: row.get(10)?,
                    last_played: parse_datetime_opt(row.get::<_, Option<String>>(11)?)?,
                    play_time: row.get(12)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(entries)
    }

    /// Remove a game from a user's library; reports whether a row was
    /// actually deleted
    #[instrument(skip(self))]
    pub fn remove(&self, user_id: Uuid, game_id: Uuid) -> Result<bool> {
        let deleted = self.conn.execute(
            "DELETE FROM library_entries WHERE user_id = ?1 AND game_id = ?2",
            params![user_id.to_string(), game_id.to_string()],
        )?;
        Ok(deleted > 0)
    }
}
