//! Category storage operations

use rusqlite::{params, Connection};

use super::parse::OptionalExt;
use crate::error::Result;
use crate::models::Category;

pub struct CategoryStore<'a> {
    conn: &'a Connection,
}

impl<'a> CategoryStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// List all categories, alphabetical by name
    pub fn list(&self) -> Result<Vec<Category>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, description, color FROM categories ORDER BY name")?;

        let categories = stmt
            .query_map([], Self::map_category)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(categories)
    }

    /// Find a category by exact name
    pub fn find_by_name(&self, name: &str) -> Result<Option<Category>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, description, color FROM categories WHERE name = ?1")?;

        let category = stmt
            .query_row(params![name], Self::map_category)
            .optional()?;

        Ok(category)
    }

    fn map_category(row: &rusqlite::Row<'_>) -> rusqlite::Result<Category> {
        Ok(Category {
            id: row.get(0)?,
            name: row.get(1)?,
            description: row.get(2)?,
            color: row.get(3)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::storage::Database;

    #[test]
    fn test_list_is_alphabetical() {
        let db = Database::open_in_memory().unwrap();
        let categories = db.categories().list().unwrap();

        assert_eq!(categories.len(), 8);
        let names: Vec<&str> = categories.iter().map(|c| c.name.as_str()).collect();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
    }

    #[test]
    fn test_find_by_name_is_exact() {
        let db = Database::open_in_memory().unwrap();

        let puzzle = db.categories().find_by_name("puzzle").unwrap();
        assert!(puzzle.is_some());
        assert_eq!(puzzle.unwrap().name, "puzzle");

        // Lookup is case-sensitive, no fuzzy matching
        assert!(db.categories().find_by_name("Puzzle").unwrap().is_none());
        assert!(db.categories().find_by_name("puzz").unwrap().is_none());
    }
}
