//! Runtime configuration.
//!
//! # Responsibility
//! - Provide defaults for storage location, storage key, refresh cadence and
//!   log level.
//! - Apply `TASKLIST_*` environment overrides.
//!
//! # Invariants
//! - Invalid overrides fall back to defaults with a warning; never an error.

use crate::logging::{init_logging_at, LogLevel};
use crate::repo::item_store::DEFAULT_STORAGE_KEY;
use crate::schedule::refresh::DEFAULT_REFRESH_INTERVAL_SECS;
use chrono::Duration;
use log::warn;
use std::path::PathBuf;

pub const ENV_DB_PATH: &str = "TASKLIST_DB_PATH";
pub const ENV_STORAGE_KEY: &str = "TASKLIST_STORAGE_KEY";
pub const ENV_REFRESH_SECS: &str = "TASKLIST_REFRESH_SECS";
pub const ENV_LOG_LEVEL: &str = "TASKLIST_LOG_LEVEL";

const DEFAULT_DB_FILE_NAME: &str = "tasklist.sqlite3";

/// Settings shared by embedders of the core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    pub db_path: PathBuf,
    pub storage_key: String,
    pub refresh_interval: Duration,
    pub log_level: LogLevel,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            db_path: std::env::temp_dir().join(DEFAULT_DB_FILE_NAME),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            refresh_interval: Duration::seconds(DEFAULT_REFRESH_INTERVAL_SECS),
            log_level: LogLevel::build_default(),
        }
    }
}

impl CoreConfig {
    /// Defaults overlaid with process environment overrides.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Defaults overlaid with values from `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        let read = |name: &str| {
            lookup(name)
                .map(|raw| raw.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        if let Some(path) = read(ENV_DB_PATH) {
            config.db_path = PathBuf::from(path);
        }
        if let Some(key) = read(ENV_STORAGE_KEY) {
            config.storage_key = key;
        }
        if let Some(raw) = read(ENV_REFRESH_SECS) {
            let interval = raw
                .parse::<i64>()
                .ok()
                .filter(|secs| *secs > 0)
                .and_then(Duration::try_seconds);
            match interval {
                Some(interval) => config.refresh_interval = interval,
                None => warn!(
                    "event=config_load module=config status=fallback key={ENV_REFRESH_SECS} reason=invalid_value"
                ),
            }
        }
        if let Some(raw) = read(ENV_LOG_LEVEL) {
            match raw.parse::<LogLevel>() {
                Ok(level) => config.log_level = level,
                Err(_) => warn!(
                    "event=config_load module=config status=fallback key={ENV_LOG_LEVEL} reason=invalid_value"
                ),
            }
        }
        config
    }

    /// Starts core logging in `log_dir` at the configured level.
    ///
    /// # Errors
    /// - Same as [`crate::logging::init_logging`].
    pub fn init_logging(&self, log_dir: &str) -> Result<(), String> {
        init_logging_at(self.log_level, log_dir)
    }
}
