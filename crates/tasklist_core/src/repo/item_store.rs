//! Item collection persistence contracts and implementations.
//!
//! # Responsibility
//! - Persist the whole ordered collection as one named storage entry.
//! - Decode stored entries back into validated items.
//!
//! # Invariants
//! - `save` is a whole-collection overwrite; there is no incremental write.
//! - `load` never fails: missing or corrupt entries read as an empty list.
//! - A stored collection with blank text or duplicate ids counts as corrupt.

use crate::db::{DbError, DbResult};
use crate::model::item::{Item, ItemValidationError};
use log::{info, warn};
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Default name of the storage entry holding the serialized list.
pub const DEFAULT_STORAGE_KEY: &str = "tasks";

pub type StoreResult<T> = Result<T, StoreError>;

/// Error for item collection reads and writes.
#[derive(Debug)]
pub enum StoreError {
    Db(DbError),
    Encode(serde_json::Error),
    /// Stored entry exists but does not describe a valid collection.
    Corrupt(String),
    /// Backend refused the write.
    Unavailable(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Encode(err) => write!(f, "item collection encoding failed: {err}"),
            Self::Corrupt(message) => write!(f, "invalid persisted item data: {message}"),
            Self::Unavailable(message) => write!(f, "item store unavailable: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Encode(err) => Some(err),
            Self::Corrupt(_) | Self::Unavailable(_) => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<ItemValidationError> for StoreError {
    fn from(value: ItemValidationError) -> Self {
        Self::Corrupt(value.to_string())
    }
}

/// Durable home for the ordered item collection.
pub trait ItemStore {
    /// Reads the stored collection, or an empty one when unavailable.
    fn load(&self) -> Vec<Item>;

    /// Overwrites the stored collection with `items`, preserving order.
    fn save(&mut self, items: &[Item]) -> StoreResult<()>;
}

/// Serializes a collection into its stored JSON array form.
pub fn encode_items(items: &[Item]) -> StoreResult<String> {
    serde_json::to_string(items).map_err(StoreError::Encode)
}

/// Parses and validates a stored JSON array.
///
/// # Errors
/// - [`StoreError::Corrupt`] for malformed JSON, blank text or duplicate ids.
pub fn decode_items(raw: &str) -> StoreResult<Vec<Item>> {
    let items: Vec<Item> =
        serde_json::from_str(raw).map_err(|err| StoreError::Corrupt(err.to_string()))?;

    let mut seen = HashSet::with_capacity(items.len());
    for item in &items {
        item.validate()?;
        if !seen.insert(item.id) {
            return Err(StoreError::Corrupt(format!("duplicate item id {}", item.id)));
        }
    }
    Ok(items)
}

fn load_or_empty(backend: &'static str, entry: StoreResult<Option<String>>) -> Vec<Item> {
    let raw = match entry {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            info!("event=store_load module=repo status=empty backend={backend}");
            return Vec::new();
        }
        Err(err) => {
            warn!(
                "event=store_load module=repo status=fallback backend={backend} error_code=store_read_failed error={err}"
            );
            return Vec::new();
        }
    };

    match decode_items(&raw) {
        Ok(items) => {
            info!(
                "event=store_load module=repo status=ok backend={backend} count={}",
                items.len()
            );
            items
        }
        Err(err) => {
            warn!(
                "event=store_load module=repo status=fallback backend={backend} error_code=store_corrupt error={err}"
            );
            Vec::new()
        }
    }
}

/// SQLite-backed store keeping the collection in `local_store`.
pub struct SqliteItemStore {
    conn: Connection,
    key: String,
}

impl SqliteItemStore {
    /// Wraps a connection from [`crate::db::open_db`] using [`DEFAULT_STORAGE_KEY`].
    pub fn new(conn: Connection) -> Self {
        Self::with_key(conn, DEFAULT_STORAGE_KEY)
    }

    pub fn with_key(conn: Connection, key: impl Into<String>) -> Self {
        Self {
            conn,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Borrows the underlying connection, mainly for diagnostics.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    fn read_entry(&self) -> DbResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM local_store WHERE key = ?1;",
                [self.key.as_str()],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }
}

impl ItemStore for SqliteItemStore {
    fn load(&self) -> Vec<Item> {
        load_or_empty("sqlite", self.read_entry().map_err(StoreError::from))
    }

    fn save(&mut self, items: &[Item]) -> StoreResult<()> {
        let encoded = encode_items(items)?;
        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT INTO local_store (key, value, updated_at)
             VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![self.key.as_str(), encoded],
        )?;
        tx.commit()?;
        Ok(())
    }
}

/// Process-local store holding the serialized entry in memory.
///
/// Keeps the same encode/decode path as the SQLite store.
#[derive(Debug, Default)]
pub struct MemoryItemStore {
    entry: Option<String>,
    fail_writes: bool,
}

impl MemoryItemStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from a raw stored entry, valid or not.
    pub fn with_entry(raw: impl Into<String>) -> Self {
        Self {
            entry: Some(raw.into()),
            fail_writes: false,
        }
    }

    pub fn raw_entry(&self) -> Option<&str> {
        self.entry.as_deref()
    }

    /// Makes subsequent writes fail, e.g. to emulate a full disk.
    pub fn set_fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }
}

impl ItemStore for MemoryItemStore {
    fn load(&self) -> Vec<Item> {
        load_or_empty("memory", Ok(self.entry.clone()))
    }

    fn save(&mut self, items: &[Item]) -> StoreResult<()> {
        if self.fail_writes {
            return Err(StoreError::Unavailable("writes disabled".to_string()));
        }
        self.entry = Some(encode_items(items)?);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{decode_items, ItemStore, MemoryItemStore, StoreError};
    use crate::model::item::Item;

    #[test]
    fn decode_rejects_duplicate_ids() {
        let raw = r#"[{"id":1,"text":"a","completed":false},{"id":1,"text":"b","completed":true}]"#;
        let err = decode_items(raw).unwrap_err();
        assert!(matches!(err, StoreError::Corrupt(message) if message.contains("duplicate")));
    }

    #[test]
    fn decode_rejects_blank_text() {
        let raw = r#"[{"id":1,"text":"   ","completed":false}]"#;
        assert!(matches!(decode_items(raw), Err(StoreError::Corrupt(_))));
    }

    #[test]
    fn memory_store_reads_back_saved_entry() {
        let mut store = MemoryItemStore::new();
        let items = vec![Item::new(1, "a", None).unwrap()];
        store.save(&items).unwrap();
        assert_eq!(store.load(), items);
    }

    #[test]
    fn memory_store_falls_back_to_empty_on_garbage() {
        let store = MemoryItemStore::with_entry("{not json");
        assert!(store.load().is_empty());
    }

    #[test]
    fn failing_writes_keep_previous_entry() {
        let mut store = MemoryItemStore::new();
        store.save(&[Item::new(1, "a", None).unwrap()]).unwrap();
        let before = store.raw_entry().map(str::to_string);

        store.set_fail_writes(true);
        assert!(store.save(&[]).is_err());
        assert_eq!(store.raw_entry().map(str::to_string), before);
    }
}
