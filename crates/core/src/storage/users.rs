//! User storage operations
//!
//! Owns registration validation, credential verification and the
//! session records backing cookie authentication.

use chrono::Utc;
use rusqlite::{params, Connection};
use tracing::instrument;
use uuid::Uuid;

use super::parse::{parse_datetime, parse_datetime_opt, parse_uuid, OptionalExt};
use crate::auth;
use crate::error::{Error, Result};
use crate::models::{PublicUser, Session, User};

const MIN_PASSWORD_LEN: usize = 6;

/// Username rule: 3-20 characters, letters, digits and underscore
fn valid_username(username: &str) -> bool {
    (3..=20).contains(&username.len())
        && username.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Email rule: local@domain.tld with an alphabetic TLD of at least two
/// characters
fn valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty()
        || !local
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "._%+-".contains(c))
    {
        return false;
    }
    let Some((host, tld)) = domain.rsplit_once('.') else {
        return false;
    };
    if host.is_empty()
        || !host
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
    {
        return false;
    }
    tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic())
}

pub struct UserStore<'a> {
    conn: &'a Connection,
}

impl<'a> UserStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Register a new user
    ///
    /// Validates the username, email and password, rejects duplicates,
    /// and stores the argon2 hash of the password.
    #[instrument(skip(self, password))]
    pub fn register(&self, username: &str, email: &str, password: &str) -> Result<Uuid> {
        if !valid_username(username) {
            return Err(Error::invalid(
                "username",
                "use only letters, numbers and _ (3-20 characters)",
            ));
        }
        if !valid_email(email) {
            return Err(Error::invalid("email", "not a valid email address"));
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(Error::invalid(
                "password",
                "must be at least 6 characters",
            ));
        }

        let taken: Option<i64> = self
            .conn
            .query_row(
                "SELECT 1 FROM users WHERE username = ?1 OR email = ?2",
                params![username, email],
                |row| row.get(0),
            )
            .optional()?;
        if taken.is_some() {
            return Err(Error::Duplicate("username or email"));
        }

        let user = User::new(
            username.to_string(),
            email.to_string(),
            auth::hash_password(password)?,
        );
        self.conn
            .execute(
                "INSERT INTO users (id, username, email, password_hash, created_at, last_login,
                                    is_active, is_admin, profile_image, bio)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
                params![
                    user.id.to_string(),
                    user.username,
                    user.email,
                    user.password_hash,
                    user.created_at.to_rfc3339(),
                    user.last_login.map(|t| t.to_rfc3339()),
                    user.is_active as i32,
                    user.is_admin as i32,
                    user.profile_image,
                    user.bio,
                ],
            )
            .map_err(|e| Error::duplicate_on_constraint(e, "username or email"))?;

        Ok(user.id)
    }

    /// Authenticate by username or email
    ///
    /// Returns `None` for an unknown login and for a wrong password; the
    /// two cases are indistinguishable to the caller. On success the
    /// stored last_login is advanced, but the returned view carries the
    /// value as of the row read (the previous login).
    #[instrument(skip(self, password))]
    pub fn authenticate(&self, login: &str, password: &str) -> Result<Option<PublicUser>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, username, email, password_hash, created_at, last_login,
                    is_active, is_admin, profile_image, bio
             FROM users WHERE (username = ?1 OR email = ?1) AND is_active = 1",
        )?;

        let user = stmt
            .query_row(params![login], Self::map_user)
            .optional()?;

        let Some(user) = user else {
            return Ok(None);
        };

        if !auth::verify_password(password, &user.password_hash) {
            return Ok(None);
        }

        self.conn.execute(
            "UPDATE users SET last_login = ?1 WHERE id = ?2",
            params![Utc::now().to_rfc3339(), user.id.to_string()],
        )?;

        Ok(Some(user.to_public()))
    }

    /// Find an active user by ID, as the public projection
    #[instrument(skip(self))]
    pub fn find_public_by_id(&self, id: Uuid) -> Result<Option<PublicUser>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, username, email, password_hash, created_at, last_login,
                    is_active, is_admin, profile_image, bio
             FROM users WHERE id = ?1 AND is_active = 1",
        )?;

        let user = stmt
            .query_row(params![id.to_string()], Self::map_user)
            .optional()?;

        Ok(user.map(|u| u.to_public()))
    }

    fn map_user(row: &rusqlite::Row<'_>) -> rusqlite::Result<User> {
        Ok(User {
            id: parse_uuid(&row.get::<_, String>(0)?)?,
            username: row.get(1)?,
            email: row.get(2)?,
            password_hash: row.get(3)?,
            created_at: parse_datetime(&row.get::<_, String>(4)?)?,
            last_login: parse_datetime_opt(row.get::<_, Option<String>>(5)?)?,
            is_active: row.get::<_, i32>(6)? != 0,
            is_admin: row.get::<_, i32>(7)? != 0,
            profile_image: row.get(8)?,
            bio: row.get(9)?,
        })
    }

    /// Create a session for a user
    #[instrument(skip(self))]
    pub fn create_session(&self, user_id: Uuid, ttl_days: i64) -> Result<Session> {
        let session = Session::new(user_id, ttl_days);
        self.conn.execute(
            "INSERT INTO sessions (id, user_id, created_at, expires_at) VALUES (?1, ?2, ?3, ?4)",
            params![
                session.token,
                session.user_id.to_string(),
                session.created_at.to_rfc3339(),
                session.expires_at.to_rfc3339(),
            ],
        )?;
        Ok(session)
    }

    /// Find a valid (non-expired) session by token
    #[instrument(skip(self, token))]
    pub fn find_valid_session(&self, token: &str) -> Result<Option<Session>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, user_id, created_at, expires_at FROM sessions
             WHERE id = ?1 AND expires_at > ?2",
        )?;

        let now = Utc::now().to_rfc3339();
        let session = stmt
            .query_row(params![token, now], |row| {
                Ok(Session {
                    token: row.get(0)?,
                    user_id: parse_uuid(&row.get::<_, String>(1)?)?,
                    created_at: parse_datetime(&row.get::<_, String>(2)?)?,
                    expires_at: parse_datetime(&row.get::<_, String>(3)?)?,
                })
            })
            .optional()?;

        Ok(session)
    }

    /// Delete a session
    pub fn delete_session(&self, token: &str) -> Result<()> {
        self.conn
            .execute("DELETE FROM sessions WHERE id = ?1", params![token])?;
        Ok(())
    }

    /// Clean up expired sessions
    pub fn cleanup_expired_sessions(&self) -> Result<u64> {
        let count = self.conn.execute(
            "DELETE FROM sessions WHERE expires_at < ?1",
            params![Utc::now().to_rfc3339()],
        )?;
        Ok(count as u64)
    }
}
