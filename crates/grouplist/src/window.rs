//! The working set of materialized rows.

use std::collections::VecDeque;
use std::ops::Range;

use crate::index::{IndexSpace, RowIndex};
use crate::view::ViewId;

/// One materialized row or header.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoadedRow {
    pub index: RowIndex,
    /// Top of the row in content coordinates.
    pub y: i64,
    pub h: i32,
    /// `None` for the header of a group without a header view.
    pub view: Option<ViewId>,
}

impl LoadedRow {
    #[inline]
    pub fn bottom(&self) -> i64 {
        self.y + i64::from(self.h)
    }
}

/// Vertical span of the viewport in content coordinates, `[top, bottom)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Span {
    pub top: i64,
    pub bottom: i64,
}

impl Span {
    /// A row is visible when it starts above the bottom edge and ends at or
    /// below the top edge. Zero-height headers at the top edge count.
    #[inline]
    pub fn intersects(&self, y: i64, h: i32) -> bool {
        y < self.bottom && y + i64::from(h) >= self.top
    }

    #[inline]
    pub fn is_below(&self, y: i64) -> bool {
        y >= self.bottom
    }

    #[inline]
    pub fn is_above(&self, y: i64, h: i32) -> bool {
        y + i64::from(h) < self.top
    }
}

/// Ordered, index-contiguous run of loaded rows.
#[derive(Debug, Default)]
pub struct LoadedWindow {
    rows: VecDeque<LoadedRow>,
}

impl LoadedWindow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn first(&self) -> Option<&LoadedRow> {
        self.rows.front()
    }

    pub fn last(&self) -> Option<&LoadedRow> {
        self.rows.back()
    }

    pub fn push_back(&mut self, row: LoadedRow) {
        debug_assert!(self.rows.back().map_or(true, |last| last.index < row.index));
        self.rows.push_back(row);
    }

    pub fn push_front(&mut self, row: LoadedRow) {
        debug_assert!(self.rows.front().map_or(true, |first| first.index > row.index));
        self.rows.push_front(row);
    }

    /// Pops the last row if its index is at or after `from`.
    pub fn pop_back_from(&mut self, from: RowIndex) -> Option<LoadedRow> {
        if self.rows.back()?.index >= from {
            self.rows.pop_back()
        } else {
            None
        }
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &LoadedRow> + '_ {
        self.rows.iter()
    }

    pub fn iter_mut(&mut self) -> impl DoubleEndedIterator<Item = &mut LoadedRow> + '_ {
        self.rows.iter_mut()
    }

    /// Position of `index` in the window.
    pub fn position(&self, index: RowIndex) -> Option<usize> {
        self.rows.binary_search_by(|row| row.index.cmp(&index)).ok()
    }

    pub fn get(&self, position: usize) -> Option<&LoadedRow> {
        self.rows.get(position)
    }

    pub fn get_mut(&mut self, position: usize) -> Option<&mut LoadedRow> {
        self.rows.get_mut(position)
    }

    /// Row currently showing `view`.
    pub fn find_view(&self, view: ViewId) -> Option<&LoadedRow> {
        self.rows.iter().find(|row| row.view == Some(view))
    }

    /// Removes every row outside `keep`, returning them in index order.
    pub fn drain_outside(&mut self, keep: Range<usize>) -> Vec<LoadedRow> {
        let mut evicted: Vec<LoadedRow> = self.rows.drain(..keep.start).collect();
        let tail = self.rows.split_off(keep.len());
        evicted.extend(tail);
        evicted
    }

    /// Removes every row.
    pub fn drain_all(&mut self) -> Vec<LoadedRow> {
        self.rows.drain(..).collect()
    }

    /// Number of item rows that start at or below the viewport bottom.
    pub fn items_below(&self, span: Span) -> usize {
        self.rows
            .iter()
            .rev()
            .take_while(|row| span.is_below(row.y))
            .filter(|row| !row.index.is_header())
            .count()
    }

    /// Number of item rows that end above the viewport top.
    pub fn items_above(&self, span: Span) -> usize {
        self.rows
            .iter()
            .take_while(|row| span.is_above(row.y, row.h))
            .filter(|row| !row.index.is_header())
            .count()
    }

    /// Range of rows to keep for `span`: every intersecting row plus up to
    /// `overscan` item rows on each side (and the headers between them).
    ///
    /// Empty when no row intersects the viewport.
    pub fn retained_span(&self, span: Span, overscan: usize) -> Range<usize> {
        let Some(first) = self.rows.iter().position(|row| span.intersects(row.y, row.h)) else {
            return 0..0;
        };
        let last = self
            .rows
            .iter()
            .rposition(|row| span.intersects(row.y, row.h))
            .unwrap_or(first);

        let mut end = last + 1;
        let mut items = 0;
        while let Some(row) = self.rows.get(end) {
            if items >= overscan {
                break;
            }
            if !row.index.is_header() {
                items += 1;
            }
            end += 1;
        }

        let mut start = first;
        let mut items = 0;
        while start > 0 {
            if items >= overscan {
                break;
            }
            if !self.rows[start - 1].index.is_header() {
                items += 1;
            }
            start -= 1;
        }

        start..end
    }

    /// Checks ordering, index contiguity and vertical tiling.
    pub fn is_consistent(&self, space: &impl IndexSpace) -> bool {
        self.rows
            .iter()
            .zip(self.rows.iter().skip(1))
            .all(|(prev, next)| space.successor(prev.index) == next.index && prev.bottom() == next.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(group: i32, item: i32, y: i64, h: i32) -> LoadedRow {
        LoadedRow {
            index: RowIndex::new(group, item),
            y,
            h,
            view: None,
        }
    }

    fn window(rows: &[LoadedRow]) -> LoadedWindow {
        let mut window = LoadedWindow::new();
        for row in rows {
            window.push_back(*row);
        }
        window
    }

    #[test]
    fn retained_span_keeps_overscan_items_and_headers() {
        let window = window(&[
            row(0, -1, 0, 0),
            row(0, 0, 0, 50),
            row(0, 1, 50, 50),
            row(0, 2, 100, 50),
            row(1, -1, 150, 0),
            row(1, 0, 150, 50),
            row(1, 1, 200, 50),
        ]);
        let span = Span { top: 0, bottom: 120 };
        assert_eq!(window.retained_span(span, 0), 0..4);
        assert_eq!(window.retained_span(span, 1), 0..6);
        assert_eq!(window.items_below(span), 3);
    }

    #[test]
    fn retained_span_trims_above_the_viewport() {
        let window = window(&[
            row(0, 0, 0, 50),
            row(0, 1, 50, 50),
            row(0, 2, 100, 50),
            row(0, 3, 150, 50),
        ]);
        let span = Span { top: 120, bottom: 170 };
        assert_eq!(window.retained_span(span, 0), 2..4);
        assert_eq!(window.retained_span(span, 1), 1..4);
        assert_eq!(window.items_above(span), 2);
    }

    #[test]
    fn nothing_retained_when_viewport_misses_the_window() {
        let window = window(&[row(0, 0, 0, 50), row(0, 1, 50, 50)]);
        assert_eq!(window.retained_span(Span { top: 500, bottom: 600 }, 3), 0..0);
    }

    #[test]
    fn drain_outside_returns_both_ends_in_order() {
        let mut window = window(&[
            row(0, 0, 0, 10),
            row(0, 1, 10, 10),
            row(0, 2, 20, 10),
            row(0, 3, 30, 10),
        ]);
        let evicted = window.drain_outside(1..3);
        let indices: Vec<_> = evicted.iter().map(|row| row.index.item).collect();
        assert_eq!(indices, vec![0, 3]);
        assert_eq!(window.len(), 2);
        assert_eq!(window.first().map(|row| row.index.item), Some(1));
    }
}
