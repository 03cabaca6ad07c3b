//! User and session models

use chrono::{DateTime, Utc};
use rand::{distributions::Alphanumeric, Rng};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered account as stored, including the credential hash.
/// Never leaves the storage layer; external callers get [`PublicUser`].
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub is_admin: bool,
    pub profile_image: Option<String>,
    pub bio: Option<String>,
}

impl User {
    pub fn new(username: String, email: String, password_hash: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            username,
            email,
            password_hash,
            created_at: Utc::now(),
            last_login: None,
            is_active: true,
            is_admin: false,
            profile_image: None,
            bio: None,
        }
    }

    /// Project to the public-safe view, dropping the credential hash
    pub fn to_public(&self) -> PublicUser {
        PublicUser {
            id: self.id,
            username: self.username.clone(),
            email: self.email.clone(),
            is_admin: self.is_admin,
            created_at: self.created_at,
            last_login: self.last_login,
            profile_image: self.profile_image.clone(),
            bio: self.bio.clone(),
        }
    }
}

/// Public projection of a user, safe to serialize in responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicUser {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
    pub profile_image: Option<String>,
    pub bio: Option<String>,
}

/// Length of the opaque session token
const SESSION_TOKEN_LEN: usize = 40;

/// Active session for a logged-in user, keyed by an opaque token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn new(user_id: Uuid, ttl_days: i64) -> Self {
        let token: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(SESSION_TOKEN_LEN)
            .map(char::from)
            .collect();

        let now = Utc::now();
        Self {
            token,
            user_id,
            created_at: now,
            expires_at: now + chrono::Duration::days(ttl_days),
        }
    }

    pub fn is_valid(&self) -> bool {
        Utc::now() < self.expires_at
    }
}
