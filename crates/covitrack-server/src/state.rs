//! Shared state for HTTP handlers.

use std::sync::{Arc, Mutex, MutexGuard};

use covitrack_core::Database;

use crate::error::ApiError;

/// Application state handed to every handler.
///
/// The store sits behind a mutex; each handler is one unit of work and
/// holds the guard only for its own service calls.
#[derive(Clone)]
pub struct AppState {
    db: Arc<Mutex<Database>>,
}

impl AppState {
    /// Wrap an opened database.
    pub fn new(db: Database) -> Self {
        Self {
            db: Arc::new(Mutex::new(db)),
        }
    }

    /// Lock the store for one unit of work.
    pub fn db(&self) -> Result<MutexGuard<'_, Database>, ApiError> {
        self.db
            .lock()
            .map_err(|_| ApiError::internal("store lock poisoned"))
    }
}
