//! Chat models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A chat message joined with its sender's username
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessageView {
    pub id: i64,
    pub user_id: Uuid,
    pub username: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}
