//! Application State
//!
//! Shared state accessible by all API handlers.
//! Wrapped in Arc for thread-safe sharing across async tasks.

use std::sync::Arc;

use crate::db::Database;
use crate::queries::QueryStore;

/// Shared application state for all handlers
#[derive(Clone)]
pub struct AppState {
    /// Pooled database handle
    pub db: Arc<dyn Database>,
    /// Query file, re-read on every request
    pub queries: QueryStore,
}

impl AppState {
    pub fn new(db: Arc<dyn Database>, queries: QueryStore) -> Self {
        Self { db, queries }
    }
}
