//! # Campus Hours
//!
//! Read-only HTTP API over a university scheduling database: committed
//! teaching hours per professor and occupied time slots per room.
//!
//! ## Modules
//!
//! - [`queries`]: Query Store file and statement extraction
//! - [`db`]: database trait, SQLite pool, migrations and seed data
//! - [`reports`]: row decoding and per-room grouping
//! - [`api`]: REST API server with Axum
//! - [`config`]: TOML + environment configuration
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use campus_hours::db::{self, SqlitePool};
//! use campus_hours::{serve, AppState, QueryStore, ServerConfig};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = SqlitePool::open("sqlite://campus_hours.db", 4)?;
//!     db::migrate(&pool).await?;
//!     db::seed(&pool).await?;
//!
//!     let state = AppState::new(Arc::new(pool), QueryStore::new("queries/queries.sql"));
//!     serve(state, &ServerConfig::default()).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod db;
pub mod queries;
pub mod reports;

pub use api::{build_router, serve, ApiError, AppState};

pub use config::{Config, ConfigError, DatabaseConfig, LoggingConfig, QueriesConfig, ServerConfig};

pub use db::{Database, DbError, DbResult, Row, RowError, SqlitePool};

pub use queries::{extract, QueryStore, QUERY_BREAK};

pub use reports::{ProfessorHours, RoomSchedule, ScheduleEntry};
