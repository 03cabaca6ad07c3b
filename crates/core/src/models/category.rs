//! Category model

use serde::{Deserialize, Serialize};

/// A game category (seeded at first initialization, immutable after)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub color: String,
}
