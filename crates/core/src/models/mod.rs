//! Data models for the catalog store

mod category;
mod chat;
mod game;
mod library;
mod stats;
mod user;

pub use category::Category;
pub use chat::ChatMessageView;
pub use game::{GameFilter, GameView, NewGame, PopularGame};
pub use library::LibraryView;
pub use stats::Stats;
pub use user::{PublicUser, Session, User};
