//! Database connection pool management.
//!
//! This module provides connection pooling for SQLite using r2d2 and owns the
//! "open the existing file or create a new one" decision made at startup.

use std::path::Path;

use edumatrix_common::{Error, Result};
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;

use crate::schema;

/// Type alias for the database connection pool.
pub type DbPool = Pool<SqliteConnectionManager>;

/// Type alias for a pooled database connection.
pub type PooledConnection = r2d2::PooledConnection<SqliteConnectionManager>;

const POOL_SIZE: u32 = 4;

/// How the database file was obtained when the pool was initialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    /// The file did not exist (or was empty) and the schema was applied.
    Created,
    /// The file already existed and its schema was verified.
    Existing,
}

/// Initialize a database pool backed by a file on disk.
///
/// This function will:
/// - Create the parent directory and the SQLite file if they don't exist
/// - Enable foreign key constraints on every new connection
/// - Apply the schema to a new file, or verify it on an existing one
///
/// An existing file is never modified here. A schema mismatch is returned as
/// [`Error::Storage`].
pub fn init_pool(db_path: &Path) -> Result<(DbPool, OpenMode)> {
    let existed = std::fs::metadata(db_path)
        .map(|meta| meta.len() > 0)
        .unwrap_or(false);

    if !existed {
        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
    }

    let manager = SqliteConnectionManager::file(db_path)
        .with_init(|conn| conn.execute_batch("PRAGMA foreign_keys = ON;"));

    let pool = Pool::builder()
        .max_size(POOL_SIZE)
        .build(manager)
        .map_err(|e| Error::storage(format!("Failed to open {}: {e}", db_path.display())))?;

    let conn = get_conn(&pool)?;
    let mode = if existed {
        schema::verify_schema(&conn)?;
        OpenMode::Existing
    } else {
        schema::apply_schema(&conn)?;
        OpenMode::Created
    };

    Ok((pool, mode))
}

/// Initialize an in-memory database pool (useful for tests).
///
/// Each call creates a uniquely-named shared-cache in-memory database so
/// that parallel tests do not interfere with each other, while all
/// connections *within* a single pool still share state.
///
/// The database lives only while a connection to it is open, so pooled
/// connections are never retired by idle or lifetime timeouts.
pub fn init_memory_pool() -> Result<DbPool> {
    use std::sync::atomic::{AtomicU64, Ordering};
    static COUNTER: AtomicU64 = AtomicU64::new(0);
    let n = COUNTER.fetch_add(1, Ordering::Relaxed);
    let uri = format!("file:edumatrix_mem_{n}?mode=memory&cache=shared");

    let manager = SqliteConnectionManager::file(uri)
        .with_init(|conn| conn.execute_batch("PRAGMA foreign_keys = ON;"));

    let pool = Pool::builder()
        .max_size(POOL_SIZE)
        .idle_timeout(None)
        .max_lifetime(None)
        .build(manager)
        .map_err(|e| Error::storage(format!("Failed to create in-memory pool: {e}")))?;

    let conn = get_conn(&pool)?;
    schema::apply_schema(&conn)?;

    Ok(pool)
}

/// Convenience helper to get a connection from the pool.
pub fn get_conn(pool: &DbPool) -> Result<PooledConnection> {
    pool.get()
        .map_err(|e| Error::storage(format!("Failed to get connection from pool: {e}")))
}
