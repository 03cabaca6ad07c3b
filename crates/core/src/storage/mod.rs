//! SQLite storage layer for Arcadia

mod categories;
mod chat;
mod games;
mod library;
mod migrations;
mod parse;
mod seed;
mod stats;
mod traits;
mod users;

use std::path::Path;

use rusqlite::Connection;
use tracing::instrument;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{
    ChatMessageView, GameFilter, GameView, LibraryView, NewGame, PublicUser, Session,
};

pub use categories::CategoryStore;
pub use chat::ChatStore;
pub use games::GameStore;
pub use library::LibraryStore;
pub use stats::StatsStore;
pub use traits::{
    CatalogStorage, ChatRepository, GameRepository, LibraryRepository, UserRepository,
};
pub use users::UserStore;

/// Main database handle
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open or create the database at the given path
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA foreign_keys = ON")?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Open an in-memory database (for testing)
    #[instrument]
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON")?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Initialize the schema via migrations, then seed defaults
    fn init(&self) -> Result<()> {
        migrations::run_migrations(&self.conn)?;
        seed::insert_default_data(&self.conn)?;
        Ok(())
    }

    /// Get current schema version
    pub fn schema_version(&self) -> u32 {
        self.conn
            .query_row("SELECT MAX(version) FROM schema_migrations", [], |row| {
                row.get(0)
            })
            .unwrap_or(0)
    }

    /// Get user store
    pub fn users(&self) -> UserStore<'_> {
        UserStore::new(&self.conn)
    }

    /// Get game store
    pub fn games(&self) -> GameStore<'_> {
        GameStore::new(&self.conn)
    }

    /// Get library store
    pub fn library(&self) -> LibraryStore<'_> {
        LibraryStore::new(&self.conn)
    }

    /// Get chat store
    pub fn chat(&self) -> ChatStore<'_> {
        ChatStore::new(&self.conn)
    }

    /// Get category store
    pub fn categories(&self) -> CategoryStore<'_> {
        CategoryStore::new(&self.conn)
    }

    /// Get stats store
    pub fn stats(&self) -> StatsStore<'_> {
        StatsStore::new(&self.conn)
    }
}

// Implement repository traits for Database
// This enables using Database through the trait interface

impl UserRepository for Database {
    fn register_user(&self, username: &str, email: &str, password: &str) -> Result<Uuid> {
        self.users().register(username, email, password)
    }

    fn authenticate_user(&self, login: &str, password: &str) -> Result<Option<PublicUser>> {
        self.users().authenticate(login, password)
    }

    fn find_public_user(&self, id: Uuid) -> Result<Option<PublicUser>> {
        self.users().find_public_by_id(id)
    }

    fn create_session(&self, user_id: Uuid, ttl_days: i64) -> Result<Session> {
        self.users().create_session(user_id, ttl_days)
    }

    fn find_valid_session(&self, token: &str) -> Result<Option<Session>> {
        self.users().find_valid_session(token)
    }

    fn delete_session(&self, token: &str) -> Result<()> {
        self.users().delete_session(token)
    }

    fn cleanup_expired_sessions(&self) -> Result<u64> {
        self.users().cleanup_expired_sessions()
    }
}

impl GameRepository for Database {
    fn add_game(&self, game: &NewGame) -> Result<Uuid> {
        self.games().add(game)
    }

    fn list_games(&self, filter: &GameFilter) -> Result<Vec<GameView>> {
        self.games().list(filter)
    }

    fn find_game_by_id(&self, id: Uuid) -> Result<Option<GameView>> {
        self.games().find_by_id(id)
    }

    fn record_play(&self, game_id: Uuid) -> Result<()> {
        self.games().record_play(game_id)
    }
}

impl LibraryRepository for Database {
    fn add_to_library(&self, user_id: Uuid, game_id: Uuid) -> Result<()> {
        self.library().add(user_id, game_id)
    }

    fn list_library(&self, user_id: Uuid) -> Result<Vec<LibraryView>> {
        self.library().list_for_user(user_id)
    }

    fn remove_from_library(&self, user_id: Uuid, game_id: Uuid) -> Result<bool> {
        self.library().remove(user_id, game_id)
    }
}

impl ChatRepository for Database {
    fn send_message(&self, user_id: Uuid, text: &str) -> Result<i64> {
        self.chat().send(user_id, text)
    }

    fn list_recent_messages(&self, limit: u32) -> Result<Vec<ChatMessageView>> {
        self.chat().list_recent(limit)
    }

    fn delete_message(&self, message_id: i64) -> Result<bool> {
        self.chat().delete(message_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_on_disk_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("arcadia.db");

        let user_id;
        {
            let db = Database::open(&path).unwrap();
            user_id = db.users().register("alice", "alice@x.com", "secret1").unwrap();
        }

        // Reopening applies no new migrations and seeds nothing twice
        let db = Database::open(&path).unwrap();
        assert!(db.users().find_public_by_id(user_id).unwrap().is_some());
        assert_eq!(db.categories().list().unwrap().len(), 8);

        let admins: i64 = db
            .conn
            .query_row("SELECT COUNT(*) FROM users WHERE is_admin = 1", [], |row| {
                row.get(0)
            })
            .unwrap();
        assert_eq!(admins, 1);
    }

    #[test]
    fn test_user_cascade_deletes_dependents() {
        let db = Database::open_in_memory().unwrap();
        let user = db.users().register("alice", "alice@x.com", "secret1").unwrap();
        let game = db
            .games()
            .add(&NewGame {
                title: "Puzzle X".to_string(),
                description: "A puzzle game".to_string(),
                category: "puzzle".to_string(),
                image_url: "https://img.example/x.png".to_string(),
                game_url: "https://play.example/x".to_string(),
                added_by: user,
            })
            .unwrap();
        db.library().add(user, game).unwrap();
        db.chat().send(user, "hello").unwrap();
        db.users().create_session(user, 7).unwrap();

        // Games must go first: the games.added_by reference has no cascade
        db.conn
            .execute("DELETE FROM games WHERE id = ?1", [game.to_string()])
            .unwrap();
        db.conn
            .execute("DELETE FROM users WHERE id = ?1", [user.to_string()])
            .unwrap();

        let library: i64 = db
            .conn
            .query_row("SELECT COUNT(*) FROM library_entries", [], |row| row.get(0))
            .unwrap();
        let messages: i64 = db
            .conn
            .query_row("SELECT COUNT(*) FROM chat_messages", [], |row| row.get(0))
            .unwrap();
        let sessions: i64 = db
            .conn
            .query_row("SELECT COUNT(*) FROM sessions", [], |row| row.get(0))
            .unwrap();
        assert_eq!(library, 0);
        assert_eq!(messages, 0);
        assert_eq!(sessions, 0);
    }

    /// Full register/authenticate/catalog/library flow, driven through the
    /// trait interface so any CatalogStorage backend satisfies it
    fn exercise_catalog(store: &impl CatalogStorage) {
        let user = store.register_user("bob3", "bob3@x.com", "secret1").unwrap();

        assert!(store.authenticate_user("bob3", "wrong").unwrap().is_none());
        let bob = store.authenticate_user("bob3", "secret1").unwrap().unwrap();
        assert!(!bob.is_admin);

        let game = store
            .add_game(&NewGame {
                title: "Puzzle X".to_string(),
                description: "A puzzle game".to_string(),
                category: "puzzle".to_string(),
                image_url: "https://img.example/x.png".to_string(),
                game_url: "https://play.example/x".to_string(),
                added_by: user,
            })
            .unwrap();

        let listed = store
            .list_games(&GameFilter {
                category: Some("puzzle".to_string()),
                limit: 50,
                ..Default::default()
            })
            .unwrap();
        assert!(listed.iter().any(|g| g.id == game));

        store.add_to_library(user, game).unwrap();
        let library = store.list_library(user).unwrap();
        assert_eq!(library.len(), 1);
        assert_eq!(library[0].game_id, game);
    }

    #[test]
    fn test_end_to_end_flow() {
        let db = Database::open_in_memory().unwrap();
        exercise_catalog(&db);
    }
}
