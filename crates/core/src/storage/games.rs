//! Game catalog storage operations

use chrono::Utc;
use rusqlite::{params, Connection, ToSql};
use tracing::instrument;
use uuid::Uuid;

use super::categories::CategoryStore;
use super::parse::{parse_datetime, parse_uuid, OptionalExt};
use crate::error::{Error, Result};
use crate::models::{GameFilter, GameView, NewGame, PopularGame};

/// Denormalized projection shared by the listing and single-game queries
const GAME_VIEW_SELECT: &str = "SELECT g.id, g.title, g.description, c.name, c.color,
            g.image_url, g.game_url, u.username, g.created_at, g.updated_at,
            g.play_count, g.rating
     FROM games g
     JOIN categories c ON g.category_id = c.id
     JOIN users u ON g.added_by = u.id";

pub struct GameStore<'a> {
    conn: &'a Connection,
}

impl<'a> GameStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Add a game to the catalog
    ///
    /// All string fields must be non-empty after trimming, the category
    /// must resolve by exact name, and a user cannot add two games with
    /// the same title.
    #[instrument(skip(self, game), fields(title = %game.title))]
    pub fn add(&self, game: &NewGame) -> Result<Uuid> {
        let title = game.title.trim();
        let description = game.description.trim();
        let category = game.category.trim();
        let image_url = game.image_url.trim();
        let game_url = game.game_url.trim();

        for (field, value) in [
            ("title", title),
            ("description", description),
            ("category", category),
            ("image_url", image_url),
            ("game_url", game_url),
        ] {
            if value.is_empty() {
                return Err(Error::invalid(field, "cannot be empty"));
            }
        }

        let category_id = CategoryStore::new(self.conn)
            .find_by_name(category)?
            .ok_or_else(|| Error::Constraint(format!("unknown category: {category}")))?
            .id;

        let exists: Option<i64> = self
            .conn
            .query_row(
                "SELECT 1 FROM games WHERE added_by = ?1 AND title = ?2",
                params![game.added_by.to_string(), title],
                |row| row.get(0),
            )
            .optional()?;
        if exists.is_some() {
            return Err(Error::Duplicate("game title"));
        }

        let id = Uuid::new_v4();
        let now = Utc::now().to_rfc3339();
        self.conn
            .execute(
                "INSERT INTO games (id, title, description, category_id, image_url,
                                    game_url, added_by, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)",
                params![
                    id.to_string(),
                    title,
                    description,
                    category_id,
                    image_url,
                    game_url,
                    game.added_by.to_string(),
                    now,
                ],
            )
            .map_err(|e| Error::duplicate_on_constraint(e, "game title"))?;

        Ok(id)
    }

    /// List active games, most recent first
    ///
    /// `search` is a case-insensitive substring match against title or
    /// description; `category` filters by exact name.
    #[instrument(skip(self))]
    pub fn list(&self, filter: &GameFilter) -> Result<Vec<GameView>> {
        let mut sql = format!("{GAME_VIEW_SELECT} WHERE g.is_active = 1");

        let search_term = filter.search.as_ref().map(|s| format!("%{s}%"));
        let limit = filter.limit as i64;
        let offset = filter.offset as i64;
        let mut args: Vec<&dyn ToSql> = Vec::new();

        if let Some(term) = &search_term {
            sql.push_str(&format!(
                " AND (g.title LIKE ?{} OR g.description LIKE ?{})",
                args.len() + 1,
                args.len() + 2
            ));
            args.push(term);
            args.push(term);
        }
        if let Some(category) = &filter.category {
            sql.push_str(&format!(" AND c.name = ?{}", args.len() + 1));
            args.push(category);
        }
        sql.push_str(&format!(
            " ORDER BY g.created_at DESC LIMIT ?{} OFFSET ?{}",
            args.len() + 1,
            args.len() + 2
        ));
        args.push(&limit);
        args.push(&offset);

        let mut stmt = self.conn.prepare(&sql)?;
        let games = stmt
            .query_map(args.as_slice(), Self::map_game_view)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(games)
    }

    /// Find an active game by ID
    #[instrument(skip(self))]
    pub fn find_by_id(&self, id: Uuid) -> Result<Option<GameView>> {
        let sql = format!("{GAME_VIEW_SELECT} WHERE g.id = ?1 AND g.is_active = 1");
        let mut stmt = self.conn.prepare(&sql)?;

        let game = stmt
            .query_row(params![id.to_string()], Self::map_game_view)
            .optional()?;

        Ok(game)
    }

    /// Register a play: unconditional counter increment, no dedup
    pub fn record_play(&self, id: Uuid) -> Result<()> {
        self.conn.execute(
            "UPDATE games SET play_count = play_count + 1 WHERE id = ?1",
            params![id.to_string()],
        )?;
        Ok(())
    }

    /// The single most-played active game, if any
    pub fn most_played(&self) -> Result<Option<PopularGame>> {
        let game = self
            .conn
            .query_row(
                "SELECT title, play_count FROM games WHERE is_active = 1
                 ORDER BY play_count DESC LIMIT 1",
                [],
                |row| {
                    Ok(PopularGame {
                        title: row.get(0)?,
                        play_count: row.get(1)?,
                    })
                },
            )
            .optional()?;

        Ok(game)
    }

    fn map_game_view(row: &rusqlite::Row<'_>) -> rusqlite::Result<GameView> {
        Ok(GameView {
            id: parse_uuid(&row.get::<_, String>(0)?)?,
            title: row.get(1)?,
            description: row.get(2)?,
            category: row.get(3)?,
            category_color: row.get(4)?,
            image_url: row.get(5)?,
            game_url: row.get(6)?,
            added_by: row.get(7)?,
            created_at: parse_datetime(&row.get::<_, String>(8)?)?,
            updated_at: parse_datetime(&row.get::<_, String>(9)?)?,
            play_count: row.get(10)?,
            rating: row.get(11)?,
        })
    }
}
