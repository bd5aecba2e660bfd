//! Single-threaded event loop over the list model.
//!
//! # Responsibility
//! - Accept discrete UI events in arrival order and route them to the list
//!   model or the reorder coordinator.
//! - Recompute derived views after every event.
//!
//! # Invariants
//! - `dispatch` takes `&mut self`; two events can never interleave.
//! - `Tick` never writes the model.
//! - The tick cadence is owned by the schedule alone: mutations re-evaluate
//!   due statuses but never move the next tick.
//! - Drops resolve against the model order, which is the rendered order:
//!   filtered-out items stay in the sequence, only hidden.

use crate::model::filter::FilterMode;
use crate::model::item::ItemId;
use crate::repo::item_store::ItemStore;
use crate::schedule::clock::{Clock, SystemClock};
use crate::schedule::refresh::RefreshSchedule;
use crate::service::list_service::{ItemTimeStatus, ListResult, TaskList};
use crate::service::reorder::{DragSession, DropOutcome, MoveRequest, VisualOrder};
use chrono::{DateTime, Utc};

/// External event consumed by [`ListEngine::dispatch`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListEvent {
    Add {
        text: String,
        due_date: Option<DateTime<Utc>>,
    },
    ToggleCompleted(ItemId),
    SetCompleted {
        id: ItemId,
        completed: bool,
    },
    Remove(ItemId),
    ClearCompleted,
    SetFilter(FilterMode),
    DragStart(ItemId),
    DragEnter(ItemId),
    DragLeave(ItemId),
    Drop {
        source: ItemId,
        target: ItemId,
    },
    DragEnd,
    /// Periodic time-status refresh.
    Tick,
}

/// Derived view state handed to renderers after each event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListSummary {
    pub total: usize,
    pub active_count: usize,
    pub completed_count: usize,
    pub progress_percent: u8,
    pub filter: FilterMode,
    /// Ids visible under `filter`, in display order.
    pub visible_ids: Vec<ItemId>,
    pub dragging: Option<ItemId>,
    pub highlighted: Vec<ItemId>,
    pub due: Vec<ItemTimeStatus>,
}

/// List model, drag session and view settings driven by one event queue.
pub struct ListEngine<S: ItemStore, C: Clock = SystemClock> {
    list: TaskList<S, C>,
    drag: DragSession,
    filter: FilterMode,
    refresh: RefreshSchedule,
    due: Vec<ItemTimeStatus>,
}

impl<S: ItemStore, C: Clock> ListEngine<S, C> {
    pub fn new(list: TaskList<S, C>, refresh: RefreshSchedule) -> Self {
        let mut engine = Self {
            list,
            drag: DragSession::new(),
            filter: FilterMode::All,
            refresh,
            due: Vec::new(),
        };
        engine.scheduled_refresh();
        engine
    }

    pub fn list(&self) -> &TaskList<S, C> {
        &self.list
    }

    pub fn drag_session(&self) -> &DragSession {
        &self.drag
    }

    pub fn filter(&self) -> FilterMode {
        self.filter
    }

    /// Processes one event and returns the recomputed summary.
    ///
    /// A failed store write leaves the model unchanged and is returned
    /// as-is; gesture state still settles (a failed drop ends idle).
    pub fn dispatch(&mut self, event: ListEvent) -> ListResult<ListSummary> {
        let mutated = match event {
            ListEvent::Add { text, due_date } => self.list.add(&text, due_date)?.is_some(),
            ListEvent::ToggleCompleted(id) => self.list.toggle_completed(id)?.is_some(),
            ListEvent::SetCompleted { id, completed } => {
                self.list.set_completed(id, completed)?
            }
            ListEvent::Remove(id) => self.list.remove(id)?,
            ListEvent::ClearCompleted => self.list.clear_completed()? > 0,
            ListEvent::SetFilter(mode) => {
                self.filter = mode;
                false
            }
            ListEvent::DragStart(id) => {
                self.drag.drag_start(id);
                false
            }
            ListEvent::DragEnter(id) => {
                self.drag.drag_enter(id);
                false
            }
            ListEvent::DragLeave(id) => {
                self.drag.drag_leave(id);
                false
            }
            ListEvent::Drop { source, target } => self.drop_onto(source, target, None)?,
            ListEvent::DragEnd => {
                self.drag.drag_end();
                false
            }
            ListEvent::Tick => {
                if self.refresh.is_due(self.list.now()) {
                    self.scheduled_refresh();
                }
                false
            }
        };

        if mutated {
            self.refresh_due();
        }
        Ok(self.summary())
    }

    /// Drop against a renderer-supplied order instead of the model order.
    ///
    /// `visual` may leave out hidden rows. It decides whether the drop is
    /// accepted; the move itself lands next to the target in model order, so
    /// hidden neighbours never end up between the two.
    pub fn drop_with_visual(
        &mut self,
        source: ItemId,
        target: ItemId,
        visual: &dyn VisualOrder,
    ) -> ListResult<ListSummary> {
        if self.drop_onto(source, target, Some(visual))? {
            self.refresh_due();
        }
        Ok(self.summary())
    }

    pub fn summary(&self) -> ListSummary {
        ListSummary {
            total: self.list.len(),
            active_count: self.list.active_count(),
            completed_count: self.list.completed_count(),
            progress_percent: self.list.progress_percent(),
            filter: self.filter,
            visible_ids: self.list.filtered_view(self.filter).ids().collect(),
            dragging: self.drag.dragged_id(),
            highlighted: self.drag.highlighted().collect(),
            due: self.due.clone(),
        }
    }

    fn drop_onto(
        &mut self,
        source: ItemId,
        target: ItemId,
        visual: Option<&dyn VisualOrder>,
    ) -> ListResult<bool> {
        let outcome = match visual {
            Some(visual) => self.drag.drop(source, target, visual),
            None => self.drag.drop(source, target, &self.list),
        };
        match outcome {
            DropOutcome::Move(request) if visual.is_none() => self.list.apply_move(request),
            DropOutcome::Move(request) => match self.list.position(target) {
                Some(target_index) => self.list.apply_move(MoveRequest {
                    target_index,
                    ..request
                }),
                None => Ok(false),
            },
            DropOutcome::Rejected(_) => Ok(false),
        }
    }

    fn refresh_due(&mut self) {
        self.due = self.list.time_statuses(self.list.now());
    }

    fn scheduled_refresh(&mut self) {
        let now = self.list.now();
        self.due = self.list.time_statuses(now);
        self.refresh.mark_run(now);
    }
}
