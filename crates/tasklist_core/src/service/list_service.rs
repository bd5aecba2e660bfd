//! Ordered list model.
//!
//! # Responsibility
//! - Own the in-memory item collection and its order.
//! - Be the only writer of persisted list state.
//! - Provide filtered views and derived counters.
//!
//! # Invariants
//! - Item ids are pairwise distinct and strictly increasing at creation
//!   until an id of `i64::MAX` exists; after that the highest unused id is
//!   handed out.
//! - Every mutation is persisted before it becomes visible in memory; a
//!   failed save leaves both memory and store unchanged.
//! - Item text is never logged.

use crate::model::filter::FilterMode;
use crate::model::item::{Item, ItemId};
use crate::repo::item_store::{ItemStore, StoreError};
use crate::schedule::clock::{Clock, SystemClock};
use crate::schedule::time_status::{format_remaining, remaining, time_status, TimeStatus};
use crate::service::reorder::{MoveRequest, VisualOrder};
use chrono::{DateTime, Duration, Utc};
use log::{error, info, warn};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ListResult<T> = Result<T, ListError>;

/// Errors from list mutations.
#[derive(Debug)]
pub enum ListError {
    /// Store write failed; the mutation was not applied.
    Store(StoreError),
}

impl Display for ListError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Store(err) => write!(f, "list change not saved: {err}"),
        }
    }
}

impl Error for ListError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
        }
    }
}

impl From<StoreError> for ListError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Time evaluation for one item carrying a due date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemTimeStatus {
    pub id: ItemId,
    pub completed: bool,
    pub due_date: DateTime<Utc>,
    pub status: TimeStatus,
    pub remaining: Duration,
    /// Compact remaining label; `None` when overdue.
    pub remaining_label: Option<String>,
}

/// Lazy read-only view over the list for one filter mode.
///
/// Does not copy items. A clone keeps the current position; use
/// [`FilteredView::restart`] to walk the view again from the start.
#[derive(Debug, Clone)]
pub struct FilteredView<'a> {
    items: &'a [Item],
    mode: FilterMode,
    cursor: usize,
}

impl<'a> FilteredView<'a> {
    fn new(items: &'a [Item], mode: FilterMode) -> Self {
        Self {
            items,
            mode,
            cursor: 0,
        }
    }

    pub fn mode(&self) -> FilterMode {
        self.mode
    }

    /// Returns a fresh view positioned at the first item.
    pub fn restart(&self) -> Self {
        Self::new(self.items, self.mode)
    }

    pub fn ids(self) -> impl Iterator<Item = ItemId> + 'a {
        self.map(|item| item.id)
    }
}

impl<'a> Iterator for FilteredView<'a> {
    type Item = &'a Item;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(item) = self.items.get(self.cursor) {
            self.cursor += 1;
            if self.mode.matches(item) {
                return Some(item);
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.items.len().saturating_sub(self.cursor)))
    }
}

/// Ordered item collection bound to a store and a clock.
pub struct TaskList<S: ItemStore, C: Clock = SystemClock> {
    items: Vec<Item>,
    store: S,
    clock: C,
    last_id: ItemId,
}

impl<S: ItemStore> TaskList<S, SystemClock> {
    /// Opens the list from `store` using the wall clock.
    pub fn open(store: S) -> Self {
        Self::open_with_clock(store, SystemClock)
    }
}

impl<S: ItemStore, C: Clock> TaskList<S, C> {
    /// Opens the list from `store` and loads the persisted collection.
    pub fn open_with_clock(store: S, clock: C) -> Self {
        let mut list = Self {
            items: Vec::new(),
            store,
            clock,
            last_id: 0,
        };
        list.load();
        list
    }

    /// Replaces memory with the persisted collection.
    ///
    /// Missing or corrupt storage yields an empty list; never fails.
    pub fn load(&mut self) {
        self.items = self.store.load();
        self.last_id = self.items.iter().map(|item| item.id).max().unwrap_or(0);
        info!(
            "event=list_load module=service status=ok count={}",
            self.items.len()
        );
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: ItemId) -> Option<&Item> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn position(&self, id: ItemId) -> Option<usize> {
        self.items.iter().position(|item| item.id == id)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Appends a new active item.
    ///
    /// Returns `Ok(None)` without touching storage when `text` is blank.
    pub fn add(
        &mut self,
        text: &str,
        due_date: Option<DateTime<Utc>>,
    ) -> ListResult<Option<ItemId>> {
        let id = self.next_id();
        let item = match Item::new(id, text, due_date) {
            Ok(item) => item,
            Err(_) => {
                info!("event=item_add module=service status=skipped reason=blank_text");
                return Ok(None);
            }
        };

        let mut candidate = self.items.clone();
        candidate.push(item);
        self.commit(candidate, "item_add")?;
        self.last_id = self.last_id.max(id);
        Ok(Some(id))
    }

    /// Flips `completed`; returns the new value, or `None` for unknown ids.
    pub fn toggle_completed(&mut self, id: ItemId) -> ListResult<Option<bool>> {
        let Some(index) = self.position(id) else {
            return Ok(None);
        };
        let mut candidate = self.items.clone();
        candidate[index].completed = !candidate[index].completed;
        let completed = candidate[index].completed;
        self.commit(candidate, "item_toggle")?;
        Ok(Some(completed))
    }

    /// Sets `completed` explicitly; returns whether anything changed.
    pub fn set_completed(&mut self, id: ItemId, completed: bool) -> ListResult<bool> {
        match self.get(id) {
            Some(item) if item.completed != completed => {
                self.toggle_completed(id).map(|value| value.is_some())
            }
            _ => Ok(false),
        }
    }

    /// Deletes one item; returns whether it existed.
    pub fn remove(&mut self, id: ItemId) -> ListResult<bool> {
        let Some(index) = self.position(id) else {
            return Ok(false);
        };
        let mut candidate = self.items.clone();
        candidate.remove(index);
        self.commit(candidate, "item_remove")?;
        Ok(true)
    }

    /// Removes every completed item in one write; returns how many went.
    pub fn clear_completed(&mut self) -> ListResult<usize> {
        let candidate: Vec<Item> = self
            .items
            .iter()
            .filter(|item| item.is_active())
            .cloned()
            .collect();
        let removed = self.items.len() - candidate.len();
        if removed == 0 {
            return Ok(0);
        }
        self.commit(candidate, "clear_completed")?;
        Ok(removed)
    }

    /// Moves `id` to `target_index`, clamped to the last slot.
    ///
    /// Remove-then-insert: the item is taken out first and reinserted at the
    /// target index of the shortened sequence. Returns whether order changed.
    pub fn move_to(&mut self, id: ItemId, target_index: usize) -> ListResult<bool> {
        let Some(from) = self.position(id) else {
            return Ok(false);
        };
        let to = target_index.min(self.items.len() - 1);
        if from == to {
            return Ok(false);
        }

        let mut candidate = self.items.clone();
        let item = candidate.remove(from);
        candidate.insert(to, item);
        self.commit(candidate, "item_move")?;
        Ok(true)
    }

    /// Applies a move resolved by the reorder coordinator.
    pub fn apply_move(&mut self, request: MoveRequest) -> ListResult<bool> {
        self.move_to(request.id, request.target_index)
    }

    pub fn filtered_view(&self, mode: FilterMode) -> FilteredView<'_> {
        FilteredView::new(&self.items, mode)
    }

    pub fn active_count(&self) -> usize {
        self.items.iter().filter(|item| item.is_active()).count()
    }

    pub fn completed_count(&self) -> usize {
        self.items.len() - self.active_count()
    }

    /// `round(100 * completed / total)`, halves rounding up; 0 when empty.
    pub fn progress_percent(&self) -> u8 {
        let total = self.items.len();
        if total == 0 {
            return 0;
        }
        let completed = self.completed_count();
        ((200 * completed + total) / (2 * total)) as u8
    }

    /// Evaluates due status for every item that has a due date.
    pub fn time_statuses(&self, now: DateTime<Utc>) -> Vec<ItemTimeStatus> {
        self.items
            .iter()
            .filter_map(|item| {
                let due_date = item.due_date?;
                let left = remaining(due_date, now);
                Some(ItemTimeStatus {
                    id: item.id,
                    completed: item.completed,
                    due_date,
                    status: time_status(due_date, now),
                    remaining: left,
                    remaining_label: format_remaining(left),
                })
            })
            .collect()
    }

    fn next_id(&self) -> ItemId {
        let now_ms = self.clock.now().timestamp_millis();
        match self.last_id.checked_add(1) {
            Some(next) => now_ms.max(next),
            None => self.highest_free_id(),
        }
    }

    fn highest_free_id(&self) -> ItemId {
        warn!("event=item_add module=service status=fallback reason=id_space_exhausted");
        let taken: HashSet<ItemId> = self.items.iter().map(|item| item.id).collect();
        (0..ItemId::MAX)
            .rev()
            .find(|id| !taken.contains(id))
            .unwrap_or(0)
    }

    fn commit(&mut self, candidate: Vec<Item>, event: &'static str) -> ListResult<()> {
        if let Err(err) = self.store.save(&candidate) {
            error!(
                "event={event} module=service status=error error_code=store_save_failed error={err}"
            );
            return Err(err.into());
        }
        self.items = candidate;
        info!(
            "event={event} module=service status=ok count={}",
            self.items.len()
        );
        Ok(())
    }
}

impl<S: ItemStore, C: Clock> VisualOrder for TaskList<S, C> {
    fn index_of(&self, id: ItemId) -> Option<usize> {
        self.position(id)
    }
}
