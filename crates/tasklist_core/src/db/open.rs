//! Connection bootstrap for the local store.

use super::{DbError, DbResult};
use log::{error, info};
use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};

/// Layout version recorded in `PRAGMA user_version`.
pub const LOCAL_STORE_VERSION: u32 = 1;

const LOCAL_STORE_TABLE: &str = "
CREATE TABLE IF NOT EXISTS local_store (
    key TEXT PRIMARY KEY NOT NULL,
    value TEXT NOT NULL,
    updated_at INTEGER NOT NULL DEFAULT (strftime('%s', 'now') * 1000)
);";

/// Opens the local store database file, creating it when missing.
///
/// # Side effects
/// - Creates the parent directory when it does not exist yet.
/// - Emits `db_open` logging events with duration and status.
pub fn open_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| {
            error!(
                "event=db_open module=db status=error mode=file error_code=create_dir_failed error={source}"
            );
            DbError::CreateDir {
                path: parent.to_path_buf(),
                source,
            }
        })?;
    }
    open_with("file", || Connection::open(path))
}

/// Opens an in-memory database; contents vanish with the connection.
pub fn open_db_in_memory() -> DbResult<Connection> {
    open_with("memory", Connection::open_in_memory)
}

fn open_with(
    mode: &'static str,
    connect: impl FnOnce() -> rusqlite::Result<Connection>,
) -> DbResult<Connection> {
    let started_at = Instant::now();
    let result = connect()
        .map_err(DbError::from)
        .and_then(|mut conn| ensure_local_store(&mut conn).map(|()| conn));

    match &result {
        Ok(_) => info!(
            "event=db_open module=db status=ok mode={mode} duration_ms={}",
            started_at.elapsed().as_millis()
        ),
        Err(err) => error!(
            "event=db_open module=db status=error mode={mode} duration_ms={} error={err}",
            started_at.elapsed().as_millis()
        ),
    }
    result
}

fn ensure_local_store(conn: &mut Connection) -> DbResult<()> {
    conn.busy_timeout(Duration::from_secs(5))?;
    let found: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if found > LOCAL_STORE_VERSION {
        return Err(DbError::StoreLayoutTooNew {
            found,
            supported: LOCAL_STORE_VERSION,
        });
    }
    if found == LOCAL_STORE_VERSION {
        return Ok(());
    }

    let tx = conn.transaction()?;
    tx.execute_batch(LOCAL_STORE_TABLE)?;
    tx.pragma_update(None, "user_version", LOCAL_STORE_VERSION)?;
    tx.commit()?;
    info!("event=local_store_init module=db status=ok version={LOCAL_STORE_VERSION}");
    Ok(())
}
