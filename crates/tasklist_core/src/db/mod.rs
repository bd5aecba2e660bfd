//! SQLite backing for the `local_store` key/value table.
//!
//! # Responsibility
//! - Open the database that holds named list entries.
//! - Create the `local_store` table on first open.
//!
//! # Invariants
//! - Returned connections always have `local_store` in place.
//! - A database written by a newer layout is refused, never rewritten.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io;
use std::path::PathBuf;

mod open;

pub use open::{open_db, open_db_in_memory, LOCAL_STORE_VERSION};

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    /// The directory for the database file could not be created.
    CreateDir { path: PathBuf, source: io::Error },
    /// `local_store` was laid out by a newer build.
    StoreLayoutTooNew { found: u32, supported: u32 },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::CreateDir { path, source } => {
                write!(f, "cannot create `{}`: {source}", path.display())
            }
            Self::StoreLayoutTooNew { found, supported } => write!(
                f,
                "local store layout v{found} is newer than supported v{supported}"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::CreateDir { source, .. } => Some(source),
            Self::StoreLayoutTooNew { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
