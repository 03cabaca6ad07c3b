//! Storage repository traits
//!
//! These traits define the storage interface, allowing for different
//! implementations (SQLite, mock, future alternative backend).

use uuid::Uuid;

use crate::error::Result;
use crate::models::{
    ChatMessageView, GameFilter, GameView, LibraryView, NewGame, PublicUser, Session,
};

/// User repository operations
pub trait UserRepository {
    /// Register a new user, returning the new ID
    fn register_user(&self, username: &str, email: &str, password: &str) -> Result<Uuid>;

    /// Authenticate by username or email
    fn authenticate_user(&self, login: &str, password: &str) -> Result<Option<PublicUser>>;

    /// Find an active user by ID, as the public projection
    fn find_public_user(&self, id: Uuid) -> Result<Option<PublicUser>>;

    /// Create a session for a user
    fn create_session(&self, user_id: Uuid, ttl_days: i64) -> Result<Session>;

    /// Find a valid (non-expired) session by token
    fn find_valid_session(&self, token: &str) -> Result<Option<Session>>;

    /// Delete a session
    fn delete_session(&self, token: &str) -> Result<()>;

    /// Clean up expired sessions
    fn cleanup_expired_sessions(&self) -> Result<u64>;
}

/// Game catalog repository operations
pub trait GameRepository {
    /// Add a game to the catalog, returning the new ID
    fn add_game(&self, game: &NewGame) -> Result<Uuid>;

    /// List active games matching the filter
    fn list_games(&self, filter: &GameFilter) -> Result<Vec<GameView>>;

    /// Find an active game by ID
    fn find_game_by_id(&self, id: Uuid) -> Result<Option<GameView>>;

    /// Register a play
    fn record_play(&self, game_id: Uuid) -> Result<()>;
}

/// Personal library repository operations
pub trait LibraryRepository {
    /// Add a game to a user's library
    fn add_to_library(&self, user_id: Uuid, game_id: Uuid) -> Result<()>;

    /// List a user's library
    fn list_library(&self, user_id: Uuid) -> Result<Vec<LibraryView>>;

    /// Remove a game from a user's library
    fn remove_from_library(&self, user_id: Uuid, game_id: Uuid) -> Result<bool>;
}

/// Chat repository operations
pub trait ChatRepository {
    /// Send a message
    fn send_message(&self, user_id: Uuid, text: &str) -> Result<i64>;

    /// The most recent messages, oldest-first
    fn list_recent_messages(&self, limit: u32) -> Result<Vec<ChatMessageView>>;

    /// Soft delete a message
    fn delete_message(&self, message_id: i64) -> Result<bool>;
}

/// Combined storage interface
///
/// Provides access to all repository operations.
pub trait CatalogStorage:
    UserRepository + GameRepository + LibraryRepository + ChatRepository
{
}

// Blanket implementation: any type implementing all traits implements
// CatalogStorage
impl<T> CatalogStorage for T where
    T: UserRepository + GameRepository + LibraryRepository + ChatRepository
{
}
