//! Notifications the list view queues for its host.
//!
//! The engine never calls back into host code while its own state is
//! borrowed. Everything the host should react to is queued here and handed
//! out by [`ListView::drain_events`](crate::ListView::drain_events).

use crate::index::RowIndex;
use crate::view::ViewId;

/// Mouse button of a row click.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PointerButton {
    Left,
    Right,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ListEvent {
    /// The selection set changed.
    SelectionChanged,
    /// `count` items were inserted at `index`.
    ItemsInserted { index: RowIndex, count: i32 },
    /// `count` items were removed from `index`.
    ItemsRemoved { index: RowIndex, count: i32 },
    GroupInserted { group: i32 },
    GroupRemoved { group: i32 },
    /// A row was clicked, after any selection update.
    RowClicked {
        index: RowIndex,
        view: ViewId,
        button: PointerButton,
    },
    /// The scrollable extent changed.
    ContentResized { height: i64 },
    /// The engine moved the scroll offset; mirror it in the scrollbar.
    ScrollMoved { offset: i64 },
    /// The first row was materialized.
    LeadingEdgeReached,
    /// The last row was materialized.
    TrailingEdgeReached,
}
