//! Application state shared across handlers.

use database::Database;

use crate::config::Limits;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Database connection.
    pub db: Database,
    /// Query parameter defaults.
    pub limits: Limits,
}

impl AppState {
    /// Create new application state.
    pub fn new(db: Database, limits: Limits) -> Self {
        Self { db, limits }
    }
}
