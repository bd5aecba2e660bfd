//! Drag-and-drop reorder coordination.
//!
//! # Responsibility
//! - Track one drag gesture: `Idle -> Dragging -> (Dropped | Cancelled) -> Idle`.
//! - Resolve a drop into at most one model move.
//! - Own the transient `drag-over` highlight markers.
//!
//! # Invariants
//! - No model mutation happens before drop.
//! - Indices are looked up in the live visual order at drop time.
//! - Leaving `Dragging` always clears every highlight marker.

use crate::model::item::ItemId;
use log::{debug, info};
use std::collections::BTreeSet;

/// Index lookup over the sequence a renderer currently shows.
pub trait VisualOrder {
    fn index_of(&self, id: ItemId) -> Option<usize>;
}

impl VisualOrder for [ItemId] {
    fn index_of(&self, id: ItemId) -> Option<usize> {
        self.iter().position(|candidate| *candidate == id)
    }
}

impl VisualOrder for Vec<ItemId> {
    fn index_of(&self, id: ItemId) -> Option<usize> {
        self.as_slice().index_of(id)
    }
}

/// Model-level move produced by a successful drop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveRequest {
    pub id: ItemId,
    /// Remove-then-insert target index.
    pub target_index: usize,
}

/// Why a drop produced no move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropRejection {
    /// No drag gesture was in progress.
    NotDragging,
    /// The reported source is not the item being dragged.
    SourceMismatch,
    /// Dropped onto itself.
    SameItem,
    /// Source or target is missing from the visual order.
    Unresolved,
}

impl DropRejection {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotDragging => "not_dragging",
            Self::SourceMismatch => "source_mismatch",
            Self::SameItem => "same_item",
            Self::Unresolved => "unresolved",
        }
    }
}

/// Result of [`DragSession::drop`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropOutcome {
    Move(MoveRequest),
    Rejected(DropRejection),
}

impl DropOutcome {
    pub fn move_request(self) -> Option<MoveRequest> {
        match self {
            Self::Move(request) => Some(request),
            Self::Rejected(_) => None,
        }
    }
}

/// Gesture phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging { source: ItemId },
}

/// One drag gesture plus its highlight markers.
#[derive(Debug, Default)]
pub struct DragSession {
    state: DragState,
    highlighted: BTreeSet<ItemId>,
}

impl DragSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    /// Item currently being dragged, if any.
    pub fn dragged_id(&self) -> Option<ItemId> {
        match self.state {
            DragState::Idle => None,
            DragState::Dragging { source } => Some(source),
        }
    }

    pub fn is_highlighted(&self, id: ItemId) -> bool {
        self.highlighted.contains(&id)
    }

    /// Ids carrying the `drag-over` marker, ascending.
    pub fn highlighted(&self) -> impl Iterator<Item = ItemId> + '_ {
        self.highlighted.iter().copied()
    }

    /// Starts dragging `id`; an in-flight gesture is discarded first.
    pub fn drag_start(&mut self, id: ItemId) {
        self.highlighted.clear();
        self.state = DragState::Dragging { source: id };
        debug!("event=drag_start module=reorder status=ok");
    }

    /// Marks `target` as a drop candidate. Ignored while idle or on the source.
    pub fn drag_enter(&mut self, target: ItemId) {
        match self.state {
            DragState::Dragging { source } if source != target => {
                self.highlighted.insert(target);
            }
            _ => {}
        }
    }

    /// Drops the candidate marker from `target`.
    pub fn drag_leave(&mut self, target: ItemId) {
        if matches!(self.state, DragState::Dragging { .. }) {
            self.highlighted.remove(&target);
        }
    }

    /// Resolves a drop of `source` onto `target`.
    ///
    /// The returned target index is the target's current visual index.
    /// Under remove-then-insert this places the source immediately before
    /// the target when the target sits above it, and immediately after the
    /// target otherwise. The session is idle afterwards in every case.
    pub fn drop<V>(&mut self, source: ItemId, target: ItemId, visual: &V) -> DropOutcome
    where
        V: VisualOrder + ?Sized,
    {
        let outcome = self.resolve(source, target, visual);
        self.reset();
        match outcome {
            DropOutcome::Move(request) => info!(
                "event=drag_drop module=reorder status=ok target_index={}",
                request.target_index
            ),
            DropOutcome::Rejected(reason) => info!(
                "event=drag_drop module=reorder status=noop reason={}",
                reason.as_str()
            ),
        }
        outcome
    }

    /// Ends the gesture without a drop; returns whether a drag was active.
    pub fn drag_end(&mut self) -> bool {
        let was_dragging = matches!(self.state, DragState::Dragging { .. });
        self.reset();
        if was_dragging {
            debug!("event=drag_cancel module=reorder status=ok");
        }
        was_dragging
    }

    fn resolve<V>(&self, source: ItemId, target: ItemId, visual: &V) -> DropOutcome
    where
        V: VisualOrder + ?Sized,
    {
        let dragged = match self.state {
            DragState::Idle => return DropOutcome::Rejected(DropRejection::NotDragging),
            DragState::Dragging { source } => source,
        };
        if dragged != source {
            return DropOutcome::Rejected(DropRejection::SourceMismatch);
        }
        if source == target {
            return DropOutcome::Rejected(DropRejection::SameItem);
        }

        match (visual.index_of(source), visual.index_of(target)) {
            (Some(_), Some(target_index)) => DropOutcome::Move(MoveRequest {
                id: source,
                target_index,
            }),
            _ => DropOutcome::Rejected(DropRejection::Unresolved),
        }
    }

    fn reset(&mut self) {
        self.state = DragState::Idle;
        self.highlighted.clear();
    }
}
