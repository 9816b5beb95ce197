//! Tests for structural edits: geometry upkeep, relabelling of loaded rows,
//! selection reconciliation and the begin/end protocol.

use std::collections::BTreeSet;

use grouplist_testing::prelude::*;

fn two_groups() -> ListHarness {
    ListHarness::new(
        FixtureData::uniform(&[3, 3], 50),
        ListViewConfig::default().with_viewport(200, 120),
    )
}

fn select(harness: &ListHarness, rows: &[(i32, i32)]) {
    harness.view_mut().set_selection(
        rows.iter()
            .map(|&(group, item)| RowIndex::new(group, item))
            .collect(),
    );
}

fn selection(harness: &ListHarness) -> Vec<RowIndex> {
    harness.view().selection().iter().collect()
}

fn view_for(harness: &ListHarness, index: RowIndex) -> ViewId {
    harness
        .loaded_rows()
        .into_iter()
        .find(|row| row.index == index)
        .and_then(|row| row.view)
        .unwrap_or_else(|| panic!("{index:?} is not loaded"))
}

#[test]
fn insert_items_relabels_and_shifts_selection() {
    let harness = two_groups();
    select(&harness, &[(0, 1)]);
    let moved_view = view_for(&harness, RowIndex::new(0, 1));
    let before = harness.view().geometry().content_height();
    harness.log.borrow_mut().clear();
    harness.take_events();

    harness
        .insert_items(RowIndex::new(0, 1), &[40, 40])
        .unwrap();

    assert_eq!(harness.view().geometry().content_height(), before + 80);
    assert_eq!(selection(&harness), vec![RowIndex::new(0, 3)]);
    assert_eq!(
        harness.loaded_items(),
        vec![
            RowIndex::new(0, 0),
            RowIndex::new(0, 1),
            RowIndex::new(0, 2),
            RowIndex::new(0, 3),
        ]
    );

    // The old (0, 1) row kept its view under its new index.
    assert_eq!(view_for(&harness, RowIndex::new(0, 3)), moved_view);
    let view = harness.view();
    let handle = view.view(moved_view).unwrap();
    assert_eq!(handle.index(), RowIndex::new(0, 3));
    assert_eq!(handle.geometry().y, 50 + 80);
    assert!(handle.is_selected());
    drop(view);

    // Only the new rows went through the delegate.
    assert_eq!(
        harness.log.borrow().prepared_rows(),
        vec![RowIndex::new(0, 1), RowIndex::new(0, 2)]
    );
    assert_eq!(harness.view().stats().pending_reuse_count, 1);
    assert!(harness.take_events().contains(&ListEvent::ItemsInserted {
        index: RowIndex::new(0, 1),
        count: 2,
    }));
    harness.assert_consistent();
}

#[test]
fn insert_then_remove_restores_everything() {
    let harness = ListHarness::new(
        FixtureData::uniform(&[6, 4, 5], 50),
        ListViewConfig::default().with_viewport(200, 300),
    );
    select(&harness, &[(0, 0), (0, 4), (1, 2), (2, 0)]);
    harness.scroll_to(120);
    let rows = harness.loaded_rows();
    let height = harness.view().geometry().content_height();
    let selected = selection(&harness);

    harness
        .insert_items(RowIndex::new(0, 2), &[10, 20, 30])
        .unwrap();
    harness.assert_consistent();
    harness.remove_items(RowIndex::new(0, 2), 3).unwrap();

    assert_eq!(harness.view().geometry().content_height(), height);
    assert_eq!(selection(&harness), selected);
    let indices = |rows: &[LoadedRow]| -> Vec<(RowIndex, i64)> {
        rows.iter().map(|row| (row.index, row.y)).collect()
    };
    assert_eq!(indices(&harness.loaded_rows()), indices(&rows));
    harness.assert_consistent();
}

#[test]
fn remove_items_drops_selection_in_range() {
    let harness = two_groups();
    select(&harness, &[(0, 0), (0, 1), (0, 2), (1, 0)]);
    harness.take_events();

    harness.remove_items(RowIndex::new(0, 1), 1).unwrap();

    assert_eq!(
        selection(&harness),
        vec![RowIndex::new(0, 0), RowIndex::new(0, 1), RowIndex::new(1, 0)]
    );
    assert_eq!(harness.view().geometry().content_height(), 250);
    let events = harness.take_events();
    assert!(events.contains(&ListEvent::SelectionChanged));
    assert!(events.contains(&ListEvent::ItemsRemoved {
        index: RowIndex::new(0, 1),
        count: 1,
    }));
    harness.assert_consistent();
}

#[test]
fn removed_rows_are_cleaned_with_their_old_index() {
    let harness = two_groups();
    let removed_view = view_for(&harness, RowIndex::new(0, 1));
    harness.log.borrow_mut().clear();

    harness.remove_items(RowIndex::new(0, 1), 1).unwrap();

    assert!(harness
        .log
        .borrow()
        .cleaned
        .contains(&(RowIndex::new(0, 1), removed_view)));
    harness.assert_consistent();
}

#[test]
fn remove_group_shifts_later_groups_down() {
    let harness = two_groups();
    select(&harness, &[(0, 1), (1, 2)]);

    harness.remove_group(0).unwrap();

    assert_eq!(selection(&harness), vec![RowIndex::new(0, 2)]);
    assert_eq!(harness.view().geometry().group_count(), 1);
    assert_eq!(
        harness.loaded_items(),
        vec![RowIndex::new(0, 0), RowIndex::new(0, 1), RowIndex::new(0, 2)]
    );
    assert!(harness
        .take_events()
        .contains(&ListEvent::GroupRemoved { group: 0 }));
    harness.assert_consistent();
}

#[test]
fn remove_group_destroys_its_header_view() {
    let data = FixtureData::new(vec![
        FixtureGroup::uniform(2, 50).with_header(20),
        FixtureGroup::uniform(2, 50).with_header(25),
    ]);
    let harness = ListHarness::new(data, ListViewConfig::default().with_viewport(200, 400));
    let first = harness.view().header_view(0).unwrap();
    let second = harness.view().header_view(1).unwrap();

    harness.remove_group(0).unwrap();

    let view = harness.view();
    assert!(view.view(first).is_none());
    assert_eq!(view.header_view(0), Some(second));
    assert_eq!(view.view(second).unwrap().index(), RowIndex::header(0));
    assert_eq!(view.view(second).unwrap().geometry().y, 0);
    drop(view);
    harness.assert_consistent();
}

#[test]
fn insert_group_creates_and_measures_its_header() {
    let harness = ListHarness::new(
        FixtureData::uniform(&[2, 2], 50),
        ListViewConfig::default().with_viewport(200, 400),
    );
    select(&harness, &[(1, 0)]);

    harness
        .insert_group(1, FixtureGroup::uniform(1, 30).with_header(15))
        .unwrap();

    let view = harness.view();
    assert_eq!(view.geometry().group_count(), 3);
    assert_eq!(view.geometry().group_height(1), 45);
    let header = view.header_view(1).unwrap();
    assert_eq!(view.view(header).unwrap().geometry().y, 100);
    assert_eq!(view.selection().iter().collect::<Vec<_>>(), vec![RowIndex::new(2, 0)]);
    drop(view);
    assert!(harness
        .take_events()
        .contains(&ListEvent::GroupInserted { group: 1 }));
    harness.assert_consistent();
}

#[test]
fn edits_reach_every_bound_view() {
    let harness = two_groups();
    let (second, second_log) =
        harness.attach_view(ListViewConfig::default().with_viewport(200, 500));
    assert_eq!(harness.model.observer_count(), 2);

    harness
        .insert_items(RowIndex::new(1, 0), &[10, 10, 10])
        .unwrap();

    harness.assert_consistent();
    assert_view_consistent(&second.borrow());
    assert_eq!(second.borrow().geometry().item_count(1), 6);
    assert_eq!(loaded_items(&second.borrow()).len(), 9);
    assert!(second_log.borrow().prepare_count() >= 9);
}

#[test]
fn insert_above_the_window_reloads_the_viewport() {
    let harness = ListHarness::new(
        FixtureData::uniform(&[20, 20], 50),
        ListViewConfig::default().with_viewport(200, 120),
    );
    harness.scroll_to(1_500);

    harness
        .insert_items(RowIndex::new(0, 0), &[50, 50])
        .unwrap();

    assert_eq!(harness.offset(), 1_500);
    let first = harness.loaded_rows()[0];
    assert!(first.y <= 1_500 && first.y + i64::from(first.h) >= 1_450);
    harness.assert_consistent();
}

#[test]
fn removing_rows_near_the_end_clamps_the_offset() {
    let harness = two_groups();
    harness.view_mut().scroll_to_bottom();
    assert_eq!(harness.offset(), 180);
    harness.take_events();

    harness.remove_group(1).unwrap();

    assert_eq!(harness.offset(), 30);
    assert!(harness
        .take_events()
        .contains(&ListEvent::ScrollMoved { offset: 30 }));
    harness.assert_consistent();
}

#[test]
fn end_without_begin_is_rejected() {
    let harness = two_groups();
    let err = harness.model.end_insert_items().unwrap_err();
    assert_eq!(
        err,
        ModifyError::ModeMismatch {
            open: None,
            expected: ModifyKind::InsertItems,
        }
    );
    assert!(!harness.view().is_modifying());
}

#[test]
fn second_begin_is_rejected_and_first_survives() {
    let harness = two_groups();
    harness.model.begin_remove_items(RowIndex::new(0, 0), 1).unwrap();

    let err = harness.model.begin_insert_group(0).unwrap_err();
    assert_eq!(
        err,
        ModifyError::TransactionOpen {
            open: ModifyKind::RemoveItems,
            requested: ModifyKind::InsertGroup,
        }
    );
    assert!(harness.model.end_remove_group().is_err());

    harness.data.borrow_mut().remove_items(RowIndex::new(0, 0), 1);
    harness.model.end_remove_items().unwrap();
    assert!(!harness.view().is_modifying());
    harness.assert_consistent();
}

#[test]
fn out_of_range_begin_leaves_state_untouched() {
    let harness = two_groups();
    let rows = harness.loaded_rows();

    let err = harness
        .model
        .begin_remove_items(RowIndex::new(1, 2), 5)
        .unwrap_err();
    assert_eq!(
        err,
        ModifyError::OutOfRange {
            kind: ModifyKind::RemoveItems,
            index: RowIndex::new(1, 2),
            count: 5,
        }
    );
    assert!(harness.model.begin_insert_items(RowIndex::new(2, 0), 1).is_err());
    assert!(harness.model.begin_remove_group(-1).is_err());
    assert!(!harness.view().is_modifying());
    assert_eq!(harness.loaded_rows(), rows);
}

#[test]
fn unbound_views_accept_any_notification() {
    let view = ListView::new(ListViewConfig::default());
    let mut view = view.borrow_mut();
    assert_eq!(view.begin_insert_items(RowIndex::new(4, 0), 2), Ok(()));
    assert_eq!(view.end_remove_group(), Ok(()));
    assert!(!view.is_modifying());
}

#[test]
fn row_height_change_moves_rows_below() {
    let harness = two_groups();
    harness.log.borrow_mut().clear();

    harness.resize_row(RowIndex::new(0, 1), 70);

    let rows = harness.loaded_rows();
    let y_of = |index: RowIndex| rows.iter().find(|row| row.index == index).map(|row| row.y);
    assert_eq!(y_of(RowIndex::new(0, 2)), Some(120));
    assert_eq!(harness.view().geometry().content_height(), 320);
    assert_eq!(harness.log.borrow().prepared_rows(), vec![RowIndex::new(0, 1)]);
    harness.assert_consistent();
}

#[test]
fn row_height_change_above_the_window_keeps_content_still() {
    let harness = ListHarness::new(
        FixtureData::uniform(&[20], 50),
        ListViewConfig::default().with_viewport(200, 120),
    );
    harness.scroll_to(500);
    let first = harness.loaded_rows()[0];
    let distance = first.y - harness.offset();
    harness.take_events();

    harness.resize_row(RowIndex::new(0, 2), 80);

    assert_eq!(harness.offset(), 530);
    let after = harness.loaded_rows()[0];
    assert_eq!(after.index, first.index);
    assert_eq!(after.y - harness.offset(), distance);
    assert!(harness
        .take_events()
        .contains(&ListEvent::ScrollMoved { offset: 530 }));
    harness.assert_consistent();
}

#[test]
fn last_row_growth_keeps_the_end_pinned() {
    let harness = two_groups();
    harness.view_mut().scroll_to_bottom();

    harness.resize_row(RowIndex::new(1, 2), 90);

    let view = harness.view();
    assert_eq!(view.viewport().offset(), view.viewport().max_offset());
    assert_eq!(view.viewport().offset(), 220);
    drop(view);
    harness.assert_consistent();
}

#[test]
fn selection_flags_follow_set_selection() {
    let harness = two_groups();
    harness.take_events();

    harness
        .view_mut()
        .set_selection(BTreeSet::from([RowIndex::new(0, 2)]));
    let flagged = view_for(&harness, RowIndex::new(0, 2));
    assert!(harness.view().view(flagged).unwrap().is_selected());
    assert_eq!(harness.take_events(), vec![ListEvent::SelectionChanged]);

    harness
        .view_mut()
        .set_selection(BTreeSet::from([RowIndex::new(0, 2)]));
    assert!(harness.take_events().is_empty());
    harness.assert_consistent();
}
