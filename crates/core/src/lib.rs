//! Arcadia Core Library
//!
//! Models, credential handling, and SQLite storage for the Arcadia
//! casual-games catalog.

pub mod auth;
pub mod error;
pub mod models;
pub mod storage;

pub use error::{Error, Result};
pub use models::*;
pub use storage::{
    CatalogStorage, ChatRepository, Database, GameRepository, LibraryRepository, UserRepository,
};
