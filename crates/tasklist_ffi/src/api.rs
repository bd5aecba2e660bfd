//! FFI list API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose list and drag-lifecycle hooks to the rendering layer via FRB.
//! - Return one flat snapshot per call so the UI never reads core types.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - All calls go through one process-wide engine behind a mutex, so events
//!   are applied strictly one at a time.

use chrono::SecondsFormat;
use log::warn;
use once_cell::sync::OnceCell;
use std::sync::Mutex;
use tasklist_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, open_engine,
    parse_due_date, CoreConfig, FilterMode, ListEngine, ListEvent, ListSummary, SqliteItemStore,
};

static ENGINE: OnceCell<Mutex<ListEngine<SqliteItemStore>>> = OnceCell::new();

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// # FFI contract
/// - Idempotent for the same `level + log_dir`.
/// - A blank `level` uses `TASKLIST_LOG_LEVEL`, else the build default.
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    let result = if level.trim().is_empty() {
        CoreConfig::from_env().init_logging(log_dir.as_str())
    } else {
        init_logging_inner(level.as_str(), log_dir.as_str())
    };
    match result {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// One row as the renderer needs it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListItemView {
    pub id: i64,
    pub text: String,
    pub completed: bool,
    /// RFC 3339 due timestamp.
    pub due_date: Option<String>,
    /// `overdue|due-soon|normal`; `None` without a due date.
    pub time_status: Option<String>,
    /// Compact remaining time such as `3h 12m`; `None` when overdue.
    pub remaining_label: Option<String>,
    /// Row carries the `drag-over` marker.
    pub drag_over: bool,
    /// Row is the one being dragged.
    pub dragging: bool,
}

/// Full derived state after one call.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ListSnapshot {
    /// Every item in display order; hidden ones included.
    pub items: Vec<ListItemView>,
    /// Ids visible under the active filter.
    pub visible_ids: Vec<i64>,
    pub filter: String,
    pub active_count: u32,
    pub completed_count: u32,
    pub progress_percent: u8,
}

/// Response envelope shared by every list call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListResponse {
    pub ok: bool,
    /// Human-readable diagnostics; empty on success.
    pub message: String,
    pub snapshot: ListSnapshot,
}

/// Current state without any mutation.
#[flutter_rust_bridge::frb(sync)]
pub fn list_snapshot() -> ListResponse {
    with_engine("list_snapshot", |engine| Ok(engine.summary()))
}

/// Adds an item. Blank text is ignored and still reports `ok`.
///
/// `due_date` accepts RFC 3339 or `YYYY-MM-DDTHH:MM`; an unparseable value
/// rejects the call without adding anything.
#[flutter_rust_bridge::frb(sync)]
pub fn list_add(text: String, due_date: Option<String>) -> ListResponse {
    let due_date = match due_date.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => match parse_due_date(raw) {
            Some(parsed) => Some(parsed),
            None => return failure_with_current("list_add", "invalid due date"),
        },
    };
    dispatch("list_add", ListEvent::Add { text, due_date })
}

#[flutter_rust_bridge::frb(sync)]
pub fn list_toggle(id: i64) -> ListResponse {
    dispatch("list_toggle", ListEvent::ToggleCompleted(id))
}

#[flutter_rust_bridge::frb(sync)]
pub fn list_set_completed(id: i64, completed: bool) -> ListResponse {
    dispatch("list_set_completed", ListEvent::SetCompleted { id, completed })
}

#[flutter_rust_bridge::frb(sync)]
pub fn list_remove(id: i64) -> ListResponse {
    dispatch("list_remove", ListEvent::Remove(id))
}

#[flutter_rust_bridge::frb(sync)]
pub fn list_clear_completed() -> ListResponse {
    dispatch("list_clear_completed", ListEvent::ClearCompleted)
}

/// Switches the view filter (`all|active|completed`).
#[flutter_rust_bridge::frb(sync)]
pub fn list_set_filter(mode: String) -> ListResponse {
    match mode.parse::<FilterMode>() {
        Ok(mode) => dispatch("list_set_filter", ListEvent::SetFilter(mode)),
        Err(err) => failure_with_current("list_set_filter", &err.to_string()),
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn list_drag_start(id: i64) -> ListResponse {
    dispatch("list_drag_start", ListEvent::DragStart(id))
}

#[flutter_rust_bridge::frb(sync)]
pub fn list_drag_enter(target_id: i64) -> ListResponse {
    dispatch("list_drag_enter", ListEvent::DragEnter(target_id))
}

#[flutter_rust_bridge::frb(sync)]
pub fn list_drag_leave(target_id: i64) -> ListResponse {
    dispatch("list_drag_leave", ListEvent::DragLeave(target_id))
}

/// Drops `source_id` onto `target_id`; unresolvable drops are no-ops.
#[flutter_rust_bridge::frb(sync)]
pub fn list_drop(source_id: i64, target_id: i64) -> ListResponse {
    dispatch(
        "list_drop",
        ListEvent::Drop {
            source: source_id,
            target: target_id,
        },
    )
}

#[flutter_rust_bridge::frb(sync)]
pub fn list_drag_end() -> ListResponse {
    dispatch("list_drag_end", ListEvent::DragEnd)
}

/// Periodic timer hook; refreshes due status at most once per interval.
#[flutter_rust_bridge::frb(sync)]
pub fn list_tick() -> ListResponse {
    dispatch("list_tick", ListEvent::Tick)
}

fn dispatch(call: &'static str, event: ListEvent) -> ListResponse {
    with_engine(call, |engine| engine.dispatch(event).map_err(|err| err.to_string()))
}

fn with_engine(
    call: &'static str,
    f: impl FnOnce(&mut ListEngine<SqliteItemStore>) -> Result<ListSummary, String>,
) -> ListResponse {
    let engine = match ENGINE.get_or_try_init(init_engine) {
        Ok(engine) => engine,
        Err(err) => return failure(call, &err, ListSnapshot::default()),
    };
    let mut guard = match engine.lock() {
        Ok(guard) => guard,
        Err(_) => return failure(call, "list engine lock poisoned", ListSnapshot::default()),
    };

    match f(&mut *guard) {
        Ok(summary) => ListResponse {
            ok: true,
            message: String::new(),
            snapshot: to_snapshot(&guard, &summary),
        },
        Err(err) => {
            let current = guard.summary();
            failure(call, &err, to_snapshot(&guard, &current))
        }
    }
}

fn failure_with_current(call: &'static str, message: &str) -> ListResponse {
    let snapshot = list_snapshot().snapshot;
    failure(call, message, snapshot)
}

fn failure(call: &'static str, message: &str, snapshot: ListSnapshot) -> ListResponse {
    warn!("event={call} module=ffi status=error error={message}");
    ListResponse {
        ok: false,
        message: format!("{call} failed: {message}"),
        snapshot,
    }
}

fn init_engine() -> Result<Mutex<ListEngine<SqliteItemStore>>, String> {
    let config = CoreConfig::from_env();
    open_engine(&config)
        .map(Mutex::new)
        .map_err(|err| format!("list store open failed: {err}"))
}

fn to_snapshot(engine: &ListEngine<SqliteItemStore>, summary: &ListSummary) -> ListSnapshot {
    let items = engine
        .list()
        .items()
        .iter()
        .map(|item| {
            let due = summary.due.iter().find(|status| status.id == item.id);
            ListItemView {
                id: item.id,
                text: item.text.clone(),
                completed: item.completed,
                due_date: item
                    .due_date
                    .map(|due| due.to_rfc3339_opts(SecondsFormat::Millis, true)),
                time_status: due.map(|status| status.status.as_str().to_string()),
                remaining_label: due.and_then(|status| status.remaining_label.clone()),
                drag_over: summary.highlighted.contains(&item.id),
                dragging: summary.dragging == Some(item.id),
            }
        })
        .collect();

    ListSnapshot {
        items,
        visible_ids: summary.visible_ids.clone(),
        filter: summary.filter.as_str().to_string(),
        active_count: u32::try_from(summary.active_count).unwrap_or(u32::MAX),
        completed_count: u32::try_from(summary.completed_count).unwrap_or(u32::MAX),
        progress_percent: summary.progress_percent,
    }
}
