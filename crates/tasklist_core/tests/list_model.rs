use chrono::{Duration, TimeZone, Utc};
use std::collections::HashSet;
use tasklist_core::{
    Clock, FilterMode, FixedClock, ItemId, ItemStore, ListError, MemoryItemStore, TaskList,
    TimeStatus,
};

fn clock() -> FixedClock {
    FixedClock::new(Utc.with_ymd_and_hms(2026, 4, 1, 8, 0, 0).unwrap())
}

fn list_with(texts: &[&str]) -> (TaskList<MemoryItemStore, FixedClock>, Vec<ItemId>) {
    let mut list = TaskList::open_with_clock(MemoryItemStore::new(), clock());
    let ids = texts
        .iter()
        .map(|text| list.add(text, None).unwrap().unwrap())
        .collect();
    (list, ids)
}

fn order(list: &TaskList<MemoryItemStore, FixedClock>) -> Vec<ItemId> {
    list.items().iter().map(|item| item.id).collect()
}

#[test]
fn add_assigns_distinct_ids_under_a_frozen_clock() {
    let (list, ids) = list_with(&["a", "b", "c", "d", "e"]);
    let unique: HashSet<_> = ids.iter().copied().collect();
    assert_eq!(unique.len(), ids.len());
    assert_eq!(order(&list), ids);
}

#[test]
fn add_ignores_blank_text_without_writing() {
    let mut list = TaskList::open_with_clock(MemoryItemStore::new(), clock());
    assert_eq!(list.add("   \t", None).unwrap(), None);
    assert!(list.is_empty());
    assert!(list.store().raw_entry().is_none());
}

#[test]
fn add_keeps_due_date_and_persists() {
    let mut list = TaskList::open_with_clock(MemoryItemStore::new(), clock());
    let due = Utc.with_ymd_and_hms(2026, 4, 2, 8, 0, 0).unwrap();
    let id = list.add("renew passport", Some(due)).unwrap().unwrap();

    let stored = list.store().load();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].id, id);
    assert_eq!(stored[0].due_date, Some(due));
}

#[test]
fn ids_stay_unique_after_reload() {
    let (list, ids) = list_with(&["a", "b"]);
    let store = MemoryItemStore::with_entry(list.store().raw_entry().unwrap());

    let mut reopened = TaskList::open_with_clock(store, clock());
    let fresh = reopened.add("c", None).unwrap().unwrap();
    assert!(!ids.contains(&fresh));
    assert!(fresh > *ids.iter().max().unwrap());
}

#[test]
fn toggling_twice_restores_original_state() {
    let (mut list, ids) = list_with(&["a"]);
    assert_eq!(list.toggle_completed(ids[0]).unwrap(), Some(true));
    assert_eq!(list.toggle_completed(ids[0]).unwrap(), Some(false));
    assert!(!list.get(ids[0]).unwrap().completed);
}

#[test]
fn toggle_and_remove_ignore_unknown_ids() {
    let (mut list, _) = list_with(&["a"]);
    assert_eq!(list.toggle_completed(-1).unwrap(), None);
    assert!(!list.remove(-1).unwrap());
    assert!(!list.move_to(-1, 0).unwrap());
    assert_eq!(list.len(), 1);
}

#[test]
fn set_completed_only_reports_real_changes() {
    let (mut list, ids) = list_with(&["a"]);
    assert!(!list.set_completed(ids[0], false).unwrap());
    assert!(list.set_completed(ids[0], true).unwrap());
    assert!(!list.set_completed(ids[0], true).unwrap());
}

#[test]
fn remove_deletes_only_the_matching_item() {
    let (mut list, ids) = list_with(&["a", "b", "c"]);
    assert!(list.remove(ids[1]).unwrap());
    assert_eq!(order(&list), vec![ids[0], ids[2]]);
    assert_eq!(list.store().load().len(), 2);
}

#[test]
fn move_to_matches_reference_sequences() {
    let (mut list, ids) = list_with(&["A", "B", "C", "D"]);
    let [a, b, c, d] = [ids[0], ids[1], ids[2], ids[3]];

    list.move_to(d, 1).unwrap();
    assert_eq!(order(&list), vec![a, d, b, c]);

    let (mut list, _) = list_with(&["A", "B", "C", "D"]);
    let ids = order(&list);
    list.move_to(ids[0], 3).unwrap();
    assert_eq!(order(&list), vec![ids[1], ids[2], ids[3], ids[0]]);
}

#[test]
fn move_to_clamps_target_index() {
    let (mut list, ids) = list_with(&["A", "B", "C"]);
    assert!(list.move_to(ids[0], 99).unwrap());
    assert_eq!(order(&list), vec![ids[1], ids[2], ids[0]]);
    assert_eq!(
        list.store().load().iter().map(|item| item.id).collect::<Vec<_>>(),
        order(&list)
    );
}

#[test]
fn progress_rounds_and_handles_empty() {
    let (mut list, ids) = list_with(&["a", "b", "c", "d"]);
    list.toggle_completed(ids[0]).unwrap();
    assert_eq!(list.progress_percent(), 25);

    let (mut list, ids) = list_with(&["a", "b", "c"]);
    list.toggle_completed(ids[0]).unwrap();
    list.toggle_completed(ids[1]).unwrap();
    assert_eq!(list.progress_percent(), 67);

    let (empty, _) = list_with(&[]);
    assert_eq!(empty.progress_percent(), 0);
}

#[test]
fn filtered_views_partition_the_list() {
    let (mut list, ids) = list_with(&["a", "b", "c", "d", "e"]);
    list.toggle_completed(ids[1]).unwrap();
    list.toggle_completed(ids[4]).unwrap();

    let active: HashSet<_> = list.filtered_view(FilterMode::Active).ids().collect();
    let completed: HashSet<_> = list.filtered_view(FilterMode::Completed).ids().collect();
    let all: HashSet<_> = list.filtered_view(FilterMode::All).ids().collect();

    assert!(active.is_disjoint(&completed));
    assert_eq!(&active | &completed, all);
    assert_eq!(all.len(), 5);
}

#[test]
fn filtered_view_is_restartable_and_ordered() {
    let (mut list, ids) = list_with(&["a", "b", "c"]);
    list.toggle_completed(ids[1]).unwrap();

    let mut view = list.filtered_view(FilterMode::Active);
    let first: Vec<_> = view.by_ref().map(|item| item.id).collect();
    assert_eq!(first, vec![ids[0], ids[2]]);
    assert!(view.next().is_none());

    let again: Vec<_> = view.restart().map(|item| item.id).collect();
    assert_eq!(again, first);
}

#[test]
fn clear_completed_keeps_active_count() {
    let (mut list, ids) = list_with(&["a", "b", "c", "d"]);
    list.toggle_completed(ids[0]).unwrap();
    list.toggle_completed(ids[2]).unwrap();
    let active_before = list.active_count();

    assert_eq!(list.clear_completed().unwrap(), 2);
    assert_eq!(list.filtered_view(FilterMode::Completed).count(), 0);
    assert_eq!(list.active_count(), active_before);
    assert_eq!(order(&list), vec![ids[1], ids[3]]);
}

#[test]
fn failed_save_leaves_memory_and_store_untouched() {
    let (mut list, ids) = list_with(&["a", "b"]);
    let before = list.store().raw_entry().map(str::to_string);
    list.store_mut().set_fail_writes(true);

    assert!(matches!(list.add("c", None), Err(ListError::Store(_))));
    assert!(matches!(list.toggle_completed(ids[0]), Err(ListError::Store(_))));
    assert!(matches!(list.move_to(ids[1], 0), Err(ListError::Store(_))));

    assert_eq!(order(&list), ids);
    assert!(!list.get(ids[0]).unwrap().completed);
    assert_eq!(list.store().raw_entry().map(str::to_string), before);
}

#[test]
fn corrupt_storage_loads_as_empty() {
    let list = TaskList::open_with_clock(MemoryItemStore::with_entry("[{\"id\":"), clock());
    assert!(list.is_empty());
}

#[test]
fn time_statuses_cover_only_items_with_due_dates() {
    let clock = clock();
    let now = clock.now();
    let mut list = TaskList::open_with_clock(MemoryItemStore::new(), clock);
    let overdue = list.add("late", Some(now - Duration::minutes(5))).unwrap().unwrap();
    list.add("undated", None).unwrap();
    let soon = list.add("soon", Some(now + Duration::hours(3))).unwrap().unwrap();

    let statuses = list.time_statuses(now);
    assert_eq!(statuses.len(), 2);
    assert_eq!(statuses[0].id, overdue);
    assert_eq!(statuses[0].status, TimeStatus::Overdue);
    assert_eq!(statuses[0].remaining_label, None);
    assert_eq!(statuses[1].id, soon);
    assert_eq!(statuses[1].status, TimeStatus::DueSoon);
    assert_eq!(statuses[1].remaining_label.as_deref(), Some("3h 0m"));
}

#[test]
fn add_after_loading_the_largest_id_picks_free_ids() {
    let entry = format!(
        "[{{\"id\":{},\"text\":\"big\",\"completed\":false}}]",
        ItemId::MAX
    );
    let mut list = TaskList::open_with_clock(MemoryItemStore::with_entry(entry), clock());

    let first = list.add("next", None).unwrap().unwrap();
    let second = list.add("after", None).unwrap().unwrap();

    assert_eq!(first, ItemId::MAX - 1);
    assert_eq!(second, ItemId::MAX - 2);
    assert_eq!(order(&list), vec![ItemId::MAX, first, second]);

    let reloaded = TaskList::open_with_clock(
        MemoryItemStore::with_entry(list.store().raw_entry().unwrap()),
        clock(),
    );
    assert_eq!(order(&reloaded), order(&list));
}
