//! Shared application state

use std::sync::{Arc, Mutex, MutexGuard};

use arcadia_core::Database;

use crate::config::ServerConfig;

/// State shared by all handlers
///
/// The database is a single synchronous connection; callers serialize
/// on the mutex, and every lock is scoped to one request.
#[derive(Clone)]
pub struct AppState {
    db: Arc<Mutex<Database>>,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(db: Database, config: ServerConfig) -> Self {
        Self {
            db: Arc::new(Mutex::new(db)),
            config: Arc::new(config),
        }
    }

    /// Lock the database for one request-scoped unit of work
    pub fn db(&self) -> MutexGuard<'_, Database> {
        self.db.lock().unwrap()
    }
}
