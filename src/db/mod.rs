//! Database Access
//!
//! The report handlers only ever see the [`Database`] trait: run a
//! statement, get positional rows back. [`SqlitePool`] is the production
//! implementation; tests substitute canned rows.
//!
//! - [`pool`]: SQLite connection pool
//! - [`row`]: owned positional rows and column decoding
//! - [`migrate`]: schema migrations and baseline seed data

pub mod error;
pub mod migrate;
pub mod pool;
pub mod row;

pub use error::{DbError, DbResult};
pub use migrate::{migrate, seed};
pub use pool::SqlitePool;
pub use row::{Row, RowError};

use async_trait::async_trait;
use rusqlite::types::Value;

/// Read access to a relational database
#[async_trait]
pub trait Database: Send + Sync {
    /// Run `sql` with positional `args` and return every result row
    async fn query(&self, sql: &str, args: &[Value]) -> DbResult<Vec<Row>>;
}
