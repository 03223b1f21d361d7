//! SQLite connection pool
//!
//! A fixed set of connections opened at startup. Each query checks out the
//! first idle connection, scanning from a rotating start slot, and holds it
//! for its duration. Only when every connection is busy does it wait, on
//! the start slot. Queries run on tokio's blocking thread pool so async
//! request handlers never block on SQLite.

use async_trait::async_trait;
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection, OpenFlags};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, TryLockError};

use crate::db::{Database, DbError, DbResult, Row};

const MEMORY_URL: &str = ":memory:";

/// Shared pool of SQLite connections
#[derive(Clone)]
pub struct SqlitePool {
    inner: Arc<PoolInner>,
}

struct PoolInner {
    connections: Vec<Mutex<Connection>>,
    next: AtomicUsize,
}

impl SqlitePool {
    /// Open `size` connections to the database at `url`.
    ///
    /// Accepts `sqlite://<path>`, `sqlite:<path>`, a bare path, or
    /// `:memory:`. In-memory databases are private to a connection, so the
    /// pool is clamped to a single connection for them.
    pub fn open(url: &str, size: usize) -> DbResult<Self> {
        if size == 0 {
            return Err(DbError::Config("pool size must be at least 1".to_string()));
        }

        let path = parse_url(url);
        let size = if path == MEMORY_URL { 1 } else { size };

        let mut connections = Vec::with_capacity(size);
        for _ in 0..size {
            let conn = open_connection(path).map_err(|source| DbError::Open {
                url: url.to_string(),
                source,
            })?;
            connections.push(Mutex::new(conn));
        }

        tracing::debug!(url = %url, size, "Opened SQLite pool");

        Ok(Self {
            inner: Arc::new(PoolInner {
                connections,
                next: AtomicUsize::new(0),
            }),
        })
    }

    /// Single-connection in-memory pool
    pub fn in_memory() -> DbResult<Self> {
        Self::open(MEMORY_URL, 1)
    }

    /// Number of connections in the pool
    pub fn size(&self) -> usize {
        self.inner.connections.len()
    }

    /// Run `f` with a checked-out connection on the blocking thread pool
    pub async fn with_connection<F, T>(&self, f: F) -> DbResult<T>
    where
        F: FnOnce(&mut Connection) -> DbResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let inner = Arc::clone(&self.inner);
        tokio::task::spawn_blocking(move || inner.with_connection(f)).await?
    }
}

impl PoolInner {
    fn with_connection<F, T>(&self, f: F) -> DbResult<T>
    where
        F: FnOnce(&mut Connection) -> DbResult<T>,
    {
        let mut conn = self.checkout();
        f(&mut conn)
    }

    /// Take the first idle connection, or wait on the start slot if all are busy
    fn checkout(&self) -> MutexGuard<'_, Connection> {
        let len = self.connections.len();
        let start = self.next.fetch_add(1, Ordering::Relaxed) % len;

        for offset in 0..len {
            let slot = (start + offset) % len;
            match self.connections[slot].try_lock() {
                Ok(guard) => return guard,
                Err(TryLockError::Poisoned(poisoned)) => return recover(slot, poisoned),
                Err(TryLockError::WouldBlock) => {}
            }
        }

        self.connections[start]
            .lock()
            .unwrap_or_else(|poisoned| recover(start, poisoned))
    }
}

/// A panicking query poisons its slot; the connection itself is still usable
fn recover<'a>(
    slot: usize,
    poisoned: PoisonError<MutexGuard<'a, Connection>>,
) -> MutexGuard<'a, Connection> {
    tracing::warn!(slot, "Recovering poisoned connection");
    poisoned.into_inner()
}

#[async_trait]
impl Database for SqlitePool {
    async fn query(&self, sql: &str, args: &[Value]) -> DbResult<Vec<Row>> {
        let sql = sql.to_string();
        let args = args.to_vec();

        self.with_connection(move |conn| run_query(conn, &sql, args))
            .await
    }
}

/// Execute `sql` and materialize every row
fn run_query(conn: &Connection, sql: &str, args: Vec<Value>) -> DbResult<Vec<Row>> {
    if sql.trim().is_empty() {
        return Err(DbError::EmptyStatement);
    }

    let mut stmt = conn.prepare(sql)?;
    let columns = stmt.column_count();

    let mut rows = stmt.query(params_from_iter(args))?;
    let mut out = Vec::new();
    while let Some(row) = rows.next()? {
        let values = (0..columns)
            .map(|idx| row.get::<_, Value>(idx))
            .collect::<Result<Vec<_>, _>>()?;
        out.push(Row::new(values));
    }

    Ok(out)
}

fn parse_url(url: &str) -> &str {
    url.strip_prefix("sqlite://")
        .or_else(|| url.strip_prefix("sqlite:"))
        .unwrap_or(url)
}

fn open_connection(path: &str) -> rusqlite::Result<Connection> {
    let conn = if path == MEMORY_URL {
        Connection::open_in_memory()?
    } else {
        Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?
    };

    conn.execute_batch(
        "
        PRAGMA foreign_keys = ON;
        PRAGMA busy_timeout = 5000;
        ",
    )?;

    if path != MEMORY_URL {
        // WAL lets pooled readers proceed while the bootstrapper writes
        conn.query_row("PRAGMA journal_mode = WAL", [], |_| Ok(()))?;
    }

    Ok(conn)
}
