//! Error types for Arcadia Core

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Invalid {field}: {reason}")]
    InvalidInput {
        field: &'static str,
        reason: String,
    },

    #[error("{0} already exists")]
    Duplicate(&'static str),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Constraint violation: {0}")]
    Constraint(String),

    #[error("Password hashing failed")]
    PasswordHash,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Error::InvalidInput {
            field,
            reason: reason.into(),
        }
    }

    /// Translate a unique-constraint failure on insert into a typed
    /// duplicate error. Races past the pre-insert existence checks land
    /// here instead of surfacing as raw SQLite errors.
    pub(crate) fn duplicate_on_constraint(err: rusqlite::Error, kind: &'static str) -> Self {
        match err.sqlite_error_code() {
            Some(rusqlite::ErrorCode::ConstraintViolation) => Error::Duplicate(kind),
            _ => Error::Database(err),
        }
    }
}
