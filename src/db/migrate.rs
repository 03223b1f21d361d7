//! Schema bootstrap
//!
//! Migrations are embedded at compile time and applied in version order.
//! Applied versions are recorded in `schema_migrations`, so running
//! [`migrate`] on every startup is safe.

use rusqlite::{params, Connection, OptionalExtension};

use crate::db::{DbError, DbResult, SqlitePool};

/// An embedded schema migration
#[derive(Debug, Clone, Copy)]
pub struct Migration {
    pub version: i64,
    pub name: &'static str,
    pub sql: &'static str,
}

/// All migrations, in application order
pub const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        name: "init",
        sql: include_str!("../../migrations/0001_init.sql"),
    },
    Migration {
        version: 2,
        name: "indexes",
        sql: include_str!("../../migrations/0002_indexes.sql"),
    },
];

const SEED_SQL: &str = include_str!("../../seed/seed.sql");

/// Apply every migration not yet recorded. Returns how many ran.
pub async fn migrate(pool: &SqlitePool) -> DbResult<usize> {
    let applied = pool.with_connection(apply_migrations).await?;
    tracing::info!(applied, total = MIGRATIONS.len(), "Migrations complete");
    Ok(applied)
}

/// Insert the baseline dataset unless professors already exist.
/// Returns `true` when rows were inserted.
pub async fn seed(pool: &SqlitePool) -> DbResult<bool> {
    let seeded = pool.with_connection(apply_seed).await?;
    if seeded {
        tracing::info!("Seeded baseline data");
    } else {
        tracing::info!("Database already populated, skipping seed");
    }
    Ok(seeded)
}

fn apply_migrations(conn: &mut Connection) -> DbResult<usize> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )",
    )?;

    let mut applied = 0;
    for migration in MIGRATIONS {
        let exists = conn
            .query_row(
                "SELECT version FROM schema_migrations WHERE version = ?1",
                [migration.version],
                |row| row.get::<_, i64>(0),
            )
            .optional()?
            .is_some();
        if exists {
            continue;
        }

        let to_migration_error = |source| DbError::Migration {
            version: migration.version,
            name: migration.name,
            source,
        };

        let tx = conn.transaction().map_err(to_migration_error)?;
        tx.execute_batch(migration.sql).map_err(to_migration_error)?;
        tx.execute(
            "INSERT INTO schema_migrations (version, name) VALUES (?1, ?2)",
            params![migration.version, migration.name],
        )
        .map_err(to_migration_error)?;
        tx.commit().map_err(to_migration_error)?;

        tracing::debug!(version = migration.version, name = migration.name, "Applied migration");
        applied += 1;
    }

    Ok(applied)
}

fn apply_seed(conn: &mut Connection) -> DbResult<bool> {
    let professors: i64 = conn.query_row("SELECT COUNT(*) FROM professors", [], |row| row.get(0))?;
    if professors > 0 {
        return Ok(false);
    }

    let tx = conn.transaction()?;
    tx.execute_batch(SEED_SQL)?;
    tx.commit()?;
    Ok(true)
}
