//! Default data seeding
//!
//! Runs once at database open. An empty categories table is the signal
//! that the database has never been populated; once any category exists
//! seeding is a no-op.

use chrono::Utc;
use rusqlite::{params, Connection};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::auth;
use crate::error::Result;

/// Fixed category catalog: (name, description, display color)
const DEFAULT_CATEGORIES: &[(&str, &str, &str)] = &[
    ("action", "Fast-paced action games", "#e74c3c"),
    ("adventure", "Adventure and exploration games", "#3498db"),
    ("strategy", "Strategy and planning games", "#9b59b6"),
    ("racing", "Racing and speed games", "#f39c12"),
    ("puzzle", "Puzzle and logic games", "#2ecc71"),
    ("rpg", "Role-playing games", "#e67e22"),
    ("sports", "Sports games", "#1abc9c"),
    ("simulation", "Simulation games", "#34495e"),
];

const ADMIN_USERNAME: &str = "admin";
const ADMIN_EMAIL: &str = "admin@arcadia.local";
const ADMIN_PASSWORD: &str = "admin123";

/// Insert the default categories and the administrator account
#[instrument(skip(conn))]
pub fn insert_default_data(conn: &Connection) -> Result<()> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM categories", [], |row| row.get(0))?;
    if count > 0 {
        return Ok(());
    }

    for (name, description, color) in DEFAULT_CATEGORIES {
        conn.execute(
            "INSERT INTO categories (name, description, color) VALUES (?1, ?2, ?3)",
            params![name, description, color],
        )?;
    }

    conn.execute(
        "INSERT INTO users (id, username, email, password_hash, created_at, is_admin)
         VALUES (?1, ?2, ?3, ?4, ?5, 1)",
        params![
            Uuid::new_v4().to_string(),
            ADMIN_USERNAME,
            ADMIN_EMAIL,
            auth::hash_password(ADMIN_PASSWORD)?,
            Utc::now().to_rfc3339(),
        ],
    )?;

    info!("Seeded default categories and administrator account");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::migrations;

    fn empty_db() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("PRAGMA foreign_keys = ON").unwrap();
        migrations::run_migrations(&conn).unwrap();
        conn
    }

    #[test]
    fn test_seed_inserts_categories_and_admin() {
        let conn = empty_db();
        insert_default_data(&conn).unwrap();

        let categories: i64 = conn
            .query_row("SELECT COUNT(*) FROM categories", [], |row| row.get(0))
            .unwrap();
        assert_eq!(categories, 8);

        let admins: i64 = conn
            .query_row("SELECT COUNT(*) FROM users WHERE is_admin = 1", [], |row| {
                row.get(0)
            })
            .unwrap();
        assert_eq!(admins, 1);
    }

    #[test]
    fn test_seed_is_idempotent() {
        let conn = empty_db();
        insert_default_data(&conn).unwrap();
        insert_default_data(&conn).unwrap();

        let categories: i64 = conn
            .query_row("SELECT COUNT(*) FROM categories", [], |row| row.get(0))
            .unwrap();
        assert_eq!(categories, 8);

        let admins: i64 = conn
            .query_row("SELECT COUNT(*) FROM users WHERE is_admin = 1", [], |row| {
                row.get(0)
            })
            .unwrap();
        assert_eq!(admins, 1);
    }

    #[test]
    fn test_seed_skipped_once_data_exists() {
        let conn = empty_db();
        conn.execute(
            "INSERT INTO categories (name, description, color) VALUES ('custom', 'Custom', '#000000')",
            [],
        )
        .unwrap();

        insert_default_data(&conn).unwrap();

        let categories: i64 = conn
            .query_row("SELECT COUNT(*) FROM categories", [], |row| row.get(0))
            .unwrap();
        assert_eq!(categories, 1);
    }
}
