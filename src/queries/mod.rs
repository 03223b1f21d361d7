//! Query Store
//!
//! SQL statements live in a single text file, separated by a sentinel line.
//! Statements are addressed by 1-based position, so the order of the file
//! is part of the contract:
//!
//! 1. professor hours
//! 2. room schedules
//!
//! The file is read from disk on every call to [`QueryStore::load`]; edits
//! take effect on the next request without a restart.

use std::path::{Path, PathBuf};

/// Line separating statements inside the query file
pub const QUERY_BREAK: &str = "-- QUERY BREAK --";

/// Position of the professor hours statement
pub const PROFESSOR_HOURS: usize = 1;

/// Position of the room schedules statement
pub const ROOM_SCHEDULES: usize = 2;

/// Handle to the query file on disk
#[derive(Debug, Clone)]
pub struct QueryStore {
    path: PathBuf,
}

impl QueryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the whole file fresh from disk
    pub async fn load(&self) -> std::io::Result<String> {
        tokio::fs::read_to_string(&self.path).await
    }

    /// Read the file and return the statement at `index`
    ///
    /// An empty string means the statement does not exist; running it will
    /// fail in the database layer.
    pub async fn statement(&self, index: usize) -> std::io::Result<String> {
        let content = self.load().await?;
        Ok(extract(&content, index))
    }
}

/// Return the `index`-th (1-based) statement of `content`, trimmed.
///
/// Returns an empty string when `content` has fewer statements than
/// `index`, or when `index` is 0.
pub fn extract(content: &str, index: usize) -> String {
    if index == 0 {
        return String::new();
    }

    content
        .split(QUERY_BREAK)
        .nth(index - 1)
        .map(|segment| segment.trim().to_string())
        .unwrap_or_default()
}
