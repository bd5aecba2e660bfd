use chrono::{TimeZone, Utc};
use tasklist_core::{
    DragSession, DragState, DropOutcome, DropRejection, FixedClock, ItemId, MemoryItemStore,
    TaskList,
};

fn four_items() -> (TaskList<MemoryItemStore, FixedClock>, Vec<ItemId>) {
    let clock = FixedClock::new(Utc.with_ymd_and_hms(2026, 6, 1, 0, 0, 0).unwrap());
    let mut list = TaskList::open_with_clock(MemoryItemStore::new(), clock);
    let ids = ["A", "B", "C", "D"]
        .iter()
        .map(|text| list.add(text, None).unwrap().unwrap())
        .collect();
    (list, ids)
}

fn order(list: &TaskList<MemoryItemStore, FixedClock>) -> Vec<ItemId> {
    list.items().iter().map(|item| item.id).collect()
}

fn drop_onto(
    list: &mut TaskList<MemoryItemStore, FixedClock>,
    source: ItemId,
    target: ItemId,
) -> DropOutcome {
    let mut session = DragSession::new();
    session.drag_start(source);
    session.drag_enter(target);
    let outcome = session.drop(source, target, &*list);
    if let Some(request) = outcome.move_request() {
        list.apply_move(request).unwrap();
    }
    assert_eq!(session.state(), DragState::Idle);
    assert_eq!(session.highlighted().count(), 0);
    outcome
}

#[test]
fn dropping_upward_lands_before_target() {
    let (mut list, ids) = four_items();
    drop_onto(&mut list, ids[3], ids[1]);
    assert_eq!(order(&list), vec![ids[0], ids[3], ids[1], ids[2]]);
}

#[test]
fn dropping_downward_lands_after_target() {
    let (mut list, ids) = four_items();
    drop_onto(&mut list, ids[1], ids[3]);
    assert_eq!(order(&list), vec![ids[0], ids[2], ids[3], ids[1]]);
}

#[test]
fn dropping_onto_neighbour_swaps() {
    let (mut list, ids) = four_items();
    drop_onto(&mut list, ids[0], ids[1]);
    assert_eq!(order(&list), vec![ids[1], ids[0], ids[2], ids[3]]);
}

#[test]
fn dropping_onto_self_is_noop() {
    let (mut list, ids) = four_items();
    let outcome = drop_onto(&mut list, ids[2], ids[2]);
    assert_eq!(outcome, DropOutcome::Rejected(DropRejection::SameItem));
    assert_eq!(order(&list), ids);
}

#[test]
fn indices_are_resolved_at_drop_time() {
    let (mut list, ids) = four_items();
    let mut session = DragSession::new();
    session.drag_start(ids[3]);

    // Order changes while the gesture is in flight.
    list.move_to(ids[0], 3).unwrap();
    assert_eq!(order(&list), vec![ids[1], ids[2], ids[3], ids[0]]);

    let request = session.drop(ids[3], ids[1], &list).move_request().unwrap();
    assert_eq!(request.target_index, 0);
    list.apply_move(request).unwrap();
    assert_eq!(order(&list), vec![ids[3], ids[1], ids[2], ids[0]]);
}

#[test]
fn drop_of_removed_target_is_noop() {
    let (mut list, ids) = four_items();
    let mut session = DragSession::new();
    session.drag_start(ids[0]);
    list.remove(ids[2]).unwrap();

    let outcome = session.drop(ids[0], ids[2], &list);
    assert_eq!(outcome, DropOutcome::Rejected(DropRejection::Unresolved));
    assert_eq!(session.state(), DragState::Idle);
}

#[test]
fn drop_without_drag_or_with_other_source_is_noop() {
    let (list, ids) = four_items();
    let mut session = DragSession::new();
    assert_eq!(
        session.drop(ids[0], ids[1], &list),
        DropOutcome::Rejected(DropRejection::NotDragging)
    );

    session.drag_start(ids[2]);
    assert_eq!(
        session.drop(ids[0], ids[1], &list),
        DropOutcome::Rejected(DropRejection::SourceMismatch)
    );
}

#[test]
fn cancel_clears_every_marker_without_moving() {
    let (list, ids) = four_items();
    let mut session = DragSession::new();
    session.drag_start(ids[0]);
    for id in &ids[1..] {
        session.drag_enter(*id);
    }
    session.drag_leave(ids[1]);
    assert_eq!(session.highlighted().count(), 2);

    assert!(session.drag_end());
    assert_eq!(session.state(), DragState::Idle);
    assert!(ids.iter().all(|id| !session.is_highlighted(*id)));
    assert_eq!(order(&list), ids);
}

#[test]
fn restarting_a_drag_drops_stale_markers() {
    let mut session = DragSession::new();
    session.drag_start(1);
    session.drag_enter(2);
    session.drag_start(3);
    assert_eq!(session.dragged_id(), Some(3));
    assert!(!session.is_highlighted(2));
}
