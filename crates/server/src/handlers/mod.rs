//! HTTP handlers, one module per resource

pub mod auth;
pub mod chat;
pub mod games;
pub mod library;
pub mod meta;
