//! Community chat storage operations

use chrono::Utc;
use rusqlite::{params, Connection};
use tracing::instrument;
use uuid::Uuid;

use super::parse::{parse_datetime, parse_uuid};
use crate::error::{Error, Result};
use crate::models::ChatMessageView;

/// Maximum message length in characters
const MAX_MESSAGE_LEN: usize = 500;

pub struct ChatStore<'a> {
    conn: &'a Connection,
}

impl<'a> ChatStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Send a message; returns the new row id
    #[instrument(skip(self, text))]
    pub fn send(&self, user_id: Uuid, text: &str) -> Result<i64> {
        let text = text.trim();
        if text.is_empty() {
            return Err(Error::invalid("message", "cannot be empty"));
        }
        if text.chars().count() > MAX_MESSAGE_LEN {
            return Err(Error::invalid(
                "message",
                "too long (maximum 500 characters)",
            ));
        }

        self.conn.execute(
            "INSERT INTO chat_messages (user_id, message, created_at) VALUES (?1, ?2, ?3)",
            params![user_id.to_string(), text, Utc::now().to_rfc3339()],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    /// The most recent non-deleted messages, in chronological order
    ///
    /// The fetch is newest-first to apply the limit, then reversed so the
    /// caller gets oldest-first display order.
    #[instrument(skip(self))]
    pub fn list_recent(&self, limit: u32) -> Result<Vec<ChatMessageView>> {
        let mut stmt = self.conn.prepare(
            "SELECT m.id, m.user_id, u.username, m.message, m.created_at
             FROM chat_messages m
             JOIN users u ON m.user_id = u.id
             WHERE m.is_deleted = 0
             ORDER BY m.created_at DESC, m.id DESC
             LIMIT ?1",
        )?;

        let mut messages = stmt
            .query_map(params![limit], |row| {
                Ok(ChatMessageView {
                    id: row.get(0)?,
                    user_id: parse_uuid(&row.get::<_, String>(1)?)?,
                    username: row.get(2)?,
                    message: row.get(3)?,
                    created_at: parse_datetime(&row.get::<_, String>(4)?)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        messages.reverse();
        Ok(messages)
    }

    /// Soft delete a message; reports whether a row was flagged
    #[instrument(skip(self))]
    pub fn delete(&self, message_id: i64) -> Result<bool> {
        let flagged = self.conn.execute(
            "UPDATE chat_messages SET is_deleted = 1 WHERE id = ?1 AND is_deleted = 0",
            params![message_id],
        )?;
        Ok(flagged > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Database;

    fn setup() -> (Database, Uuid) {
        let db = Database::open_in_memory().unwrap();
        let user = db.users().register("alice", "alice@x.com", "secret1").unwrap();
        (db, user)
    }

    #[test]
    fn test_send_validates_text() {
        let (db, user) = setup();

        let err = db.chat().send(user, "   ").unwrap_err();
        assert!(matches!(err, Error::InvalidInput { field: "message", .. }));

        let err = db.chat().send(user, &"x".repeat(501)).unwrap_err();
        assert!(matches!(err, Error::InvalidInput { field: "message", .. }));

        // 500 characters exactly is accepted
        db.chat().send(user, &"x".repeat(500)).unwrap();
    }

    #[test]
    fn test_send_stores_trimmed() {
        let (db, user) = setup();
        db.chat().send(user, "  hello  ").unwrap();

        let messages = db.chat().list_recent(50).unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].message, "hello");
        assert_eq!(messages[0].username, "alice");
    }

    #[test]
    fn test_list_recent_is_chronological() {
        let (db, user) = setup();
        db.chat().send(user, "first").unwrap();
        db.chat().send(user, "second").unwrap();
        db.chat().send(user, "third").unwrap();

        let messages = db.chat().list_recent(50).unwrap();
        let texts: Vec<&str> = messages.iter().map(|m| m.message.as_str()).collect();
        assert_eq!(texts, ["first", "second", "third"]);

        // The limit keeps the newest messages, still oldest-first
        let messages = db.chat().list_recent(2).unwrap();
        let texts: Vec<&str> = messages.iter().map(|m| m.message.as_str()).collect();
        assert_eq!(texts, ["second", "third"]);
    }

    #[test]
    fn test_delete_is_soft() {
        let (db, user) = setup();
        let id = db.chat().send(user, "regrettable").unwrap();

        assert!(db.chat().delete(id).unwrap());
        assert!(db.chat().list_recent(50).unwrap().is_empty());

        // Repeat delete and unknown ids report false
        assert!(!db.chat().delete(id).unwrap());
        assert!(!db.chat().delete(9999).unwrap());

        // The row itself survives
        let rows: i64 = db
            .conn
            .query_row("SELECT COUNT(*) FROM chat_messages", [], |row| row.get(0))
            .unwrap();
        assert_eq!(rows, 1);
    }
}
