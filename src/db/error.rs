//! Database error types

use thiserror::Error;

/// Errors raised by the database layer
#[derive(Error, Debug)]
pub enum DbError {
    /// Opening a connection failed
    #[error("Failed to open database {url}: {source}")]
    Open {
        url: String,
        #[source]
        source: rusqlite::Error,
    },

    /// Preparing or running a statement failed
    #[error("SQL error: {0}")]
    Sql(#[from] rusqlite::Error),

    /// Statement text was empty
    #[error("Empty SQL statement")]
    EmptyStatement,

    /// The blocking task running the query did not complete
    #[error("Query task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    /// A schema migration could not be applied
    #[error("Migration {version} ({name}) failed: {source}")]
    Migration {
        version: i64,
        name: &'static str,
        #[source]
        source: rusqlite::Error,
    },

    /// Pool configuration is unusable
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for database operations
pub type DbResult<T> = Result<T, DbError>;
