//! Core list state engine.
//! This crate is the single source of truth for list invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod schedule;
pub mod service;

pub use config::CoreConfig;
pub use logging::{init_logging, init_logging_at, logging_status, LogLevel};
pub use model::filter::FilterMode;
pub use model::item::{parse_due_date, Item, ItemId, ItemValidationError};
pub use repo::item_store::{
    ItemStore, MemoryItemStore, SqliteItemStore, StoreError, StoreResult, DEFAULT_STORAGE_KEY,
};
pub use schedule::clock::{Clock, FixedClock, SystemClock};
pub use schedule::refresh::RefreshSchedule;
pub use schedule::time_status::{format_remaining, time_status, RemainingParts, TimeStatus};
pub use service::engine::{ListEngine, ListEvent, ListSummary};
pub use service::list_service::{FilteredView, ItemTimeStatus, ListError, ListResult, TaskList};
pub use service::reorder::{
    DragSession, DragState, DropOutcome, DropRejection, MoveRequest, VisualOrder,
};

/// Opens the configured SQLite store and builds an engine over it.
///
/// # Errors
/// - Returns [`db::DbError`] when the database cannot be opened or its
///   `local_store` layout is newer than this build.
pub fn open_engine(config: &CoreConfig) -> db::DbResult<ListEngine<SqliteItemStore>> {
    let conn = db::open_db(&config.db_path)?;
    let store = SqliteItemStore::with_key(conn, config.storage_key.clone());
    Ok(ListEngine::new(
        TaskList::open(store),
        RefreshSchedule::new(config.refresh_interval),
    ))
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, open_engine, CoreConfig, ListEvent};

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn open_engine_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let config = CoreConfig {
            db_path: dir.path().join("list.db"),
            ..CoreConfig::default()
        };

        let mut engine = open_engine(&config).unwrap();
        engine
            .dispatch(ListEvent::Add {
                text: "water plants".to_string(),
                due_date: None,
            })
            .unwrap();
        drop(engine);

        let reopened = open_engine(&config).unwrap();
        assert_eq!(reopened.list().len(), 1);
        assert_eq!(reopened.list().items()[0].text, "water plants");
    }
}
