//! Tests for the load/unload pass: which rows are materialized for a given
//! viewport, and how views are recycled while scrolling.

use grouplist_testing::prelude::*;

fn config(width: i32, height: i32) -> ListViewConfig {
    ListViewConfig::default().with_viewport(width, height)
}

#[test]
fn initial_fill_covers_viewport_plus_one_row() {
    let harness = ListHarness::new(FixtureData::uniform(&[3, 3], 50), config(200, 120));

    let rows: Vec<_> = harness
        .loaded_rows()
        .into_iter()
        .filter(|row| !row.index.is_header())
        .map(|row| (row.index, row.y, row.h))
        .collect();
    assert_eq!(
        rows,
        vec![
            (RowIndex::new(0, 0), 0, 50),
            (RowIndex::new(0, 1), 50, 50),
            (RowIndex::new(0, 2), 100, 50),
            (RowIndex::new(1, 0), 150, 50),
        ]
    );
    harness.assert_consistent();
}

#[test]
fn zero_overscan_fills_the_viewport_exactly() {
    let harness = ListHarness::new(
        FixtureData::uniform(&[3, 3], 50),
        config(200, 120).with_overscan(0),
    );
    assert_eq!(
        harness.loaded_items(),
        vec![RowIndex::new(0, 0), RowIndex::new(0, 1), RowIndex::new(0, 2)]
    );
}

#[test]
fn rerunning_the_pass_is_idempotent() {
    let harness = ListHarness::new(FixtureData::uniform(&[5, 5, 5], 50), config(200, 120));
    harness.scroll_to(333);
    let rows = harness.loaded_rows();
    let stats = harness.view().stats().clone();
    let prepared = harness.log.borrow().prepare_count();

    harness.scroll_to(333);
    harness.scroll_to(333);

    assert_eq!(harness.loaded_rows(), rows);
    assert_eq!(harness.view().stats(), &stats);
    assert_eq!(harness.log.borrow().prepare_count(), prepared);
}

#[test]
fn scrolling_recycles_views_instead_of_creating_them() {
    let harness = ListHarness::new(FixtureData::uniform(&[200], 50), config(200, 120));
    for step in 0..200 {
        harness.scroll_to(step * 10);
        harness.assert_consistent();
    }
    let view = harness.view();
    let stats = view.stats();
    assert!(stats.total_created <= 6, "created {} views", stats.total_created);
    assert!(stats.reuse_count >= 30, "reused {} views", stats.reuse_count);
    assert_eq!(stats.views_in_use, loaded_items(&view).len());
}

#[test]
fn released_views_are_cleaned_before_reuse() {
    let harness = ListHarness::new(FixtureData::uniform(&[50], 50), config(200, 120));
    harness.scroll_to(1_000);

    let log = harness.log.borrow();
    assert!(log.clean_count() > 0);
    for (index, _) in &log.cleaned {
        assert!(index.item < 19, "cleaned {index:?}, which is still on screen");
    }
    drop(log);
    harness.assert_consistent();
}

#[test]
fn views_are_only_reused_within_their_type() {
    let text = ViewType::new(7);
    let image = ViewType::new(8);
    let data = FixtureData::new(vec![
        FixtureGroup::uniform(20, 50).with_view_type(text),
        FixtureGroup::uniform(20, 50).with_view_type(image),
        FixtureGroup::uniform(20, 50).with_view_type(text),
    ]);
    let harness = ListHarness::new(data, config(200, 120));
    for offset in (0..3_000).step_by(35) {
        harness.scroll_to(offset);
        let view = harness.view();
        for row in view.loaded_rows().filter(|row| !row.index.is_header()) {
            let handle = row.view.and_then(|id| view.view(id)).unwrap();
            let expected = if row.index.group == 1 { image } else { text };
            assert_eq!(handle.view_type(), expected, "row {:?}", row.index);
        }
    }
}

#[test]
fn header_views_follow_their_group() {
    let data = FixtureData::new(vec![
        FixtureGroup::uniform(3, 50).with_header(20),
        FixtureGroup::uniform(3, 50),
        FixtureGroup::uniform(3, 50).with_header(30),
    ]);
    let harness = ListHarness::new(data, config(200, 1_000));
    let view = harness.view();

    assert!(view.header_view(1).is_none());
    let header = view.header_view(2).unwrap();
    let handle = view.view(header).unwrap();
    assert_eq!(handle.role(), ViewRole::Header);
    assert_eq!(handle.view_type(), HEADER_TYPE);
    assert_eq!(handle.index(), RowIndex::header(2));
    assert_eq!(handle.geometry().y, 20 + 150 + 150);
    assert_eq!(handle.geometry().height, 30);
    assert!(handle.is_visible());
    assert_eq!(view.geometry().content_height(), 500);
    drop(view);
    harness.assert_consistent();
}

#[test]
fn header_views_are_hidden_when_scrolled_away() {
    let data = FixtureData::new(vec![
        FixtureGroup::uniform(10, 50).with_header(20),
        FixtureGroup::uniform(10, 50).with_header(20),
    ]);
    let harness = ListHarness::new(data, config(200, 120));
    let header = harness.view().header_view(0).unwrap();
    assert!(harness.view().view(header).unwrap().is_visible());

    harness.scroll_to(400);
    assert!(!harness.view().view(header).unwrap().is_visible());
    harness.assert_consistent();

    harness.scroll_to(0);
    assert!(harness.view().view(header).unwrap().is_visible());
}

#[test]
fn empty_model_shows_the_empty_state_only() {
    let harness = ListHarness::new(FixtureData::default(), config(200, 120));
    {
        let view = harness.view();
        let empty = view.empty_state().unwrap();
        let handle = view.view(empty).unwrap();
        assert_eq!(handle.role(), ViewRole::EmptyState);
        assert_eq!(handle.view_type(), EMPTY_TYPE);
        assert!(handle.is_visible());
        assert_eq!(handle.geometry().height, 120);
        assert_eq!(view.loaded_rows().count(), 0);
    }

    harness
        .insert_group(0, FixtureGroup::uniform(2, 50))
        .unwrap();
    assert!(harness.view().empty_state().is_none());
    assert_eq!(
        harness.loaded_items(),
        vec![RowIndex::new(0, 0), RowIndex::new(0, 1)]
    );
    harness.assert_consistent();

    harness.remove_group(0).unwrap();
    assert!(harness.view().empty_state().is_some());
    assert_eq!(harness.view().loaded_rows().count(), 0);
    harness.assert_consistent();
}

#[test]
fn empty_state_is_optional() {
    let harness = ListHarness::with_delegate(FixtureData::default(), config(200, 120), |delegate| {
        delegate.without_empty_state()
    });
    assert!(harness.view().empty_state().is_none());
    assert_eq!(harness.view().views().count(), 0);
}

#[test]
fn edge_events_fire_when_the_ends_are_materialized() {
    let harness = ListHarness::new(FixtureData::uniform(&[30], 50), config(200, 120));
    let events = harness.take_events();
    assert!(events.contains(&ListEvent::LeadingEdgeReached));
    assert!(!events.contains(&ListEvent::TrailingEdgeReached));

    harness.view_mut().scroll_to_bottom();
    let events = harness.take_events();
    assert!(events.contains(&ListEvent::TrailingEdgeReached));
    assert!(!events.contains(&ListEvent::LeadingEdgeReached));

    harness.scroll_to(harness.offset());
    assert!(harness.take_events().is_empty());
}
