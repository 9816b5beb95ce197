//! Selected rows, kept index-consistent across structural mutations.

use std::collections::BTreeSet;

use crate::index::RowIndex;

/// Ordered set of selected rows.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SelectionSet {
    rows: BTreeSet<RowIndex>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn contains(&self, index: RowIndex) -> bool {
        self.rows.contains(&index)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = RowIndex> + '_ {
        self.rows.iter().copied()
    }

    pub fn as_set(&self) -> &BTreeSet<RowIndex> {
        &self.rows
    }

    /// Replaces the whole set. Returns false when nothing changed.
    pub fn replace(&mut self, rows: BTreeSet<RowIndex>) -> bool {
        if self.rows == rows {
            return false;
        }
        self.rows = rows;
        true
    }

    /// Returns true when the set is exactly `{index}`.
    pub fn is_only(&self, index: RowIndex) -> bool {
        self.rows.len() == 1 && self.rows.contains(&index)
    }

    /// Flips membership of `index`. Returns the new membership.
    pub fn toggle(&mut self, index: RowIndex) -> bool {
        if self.rows.remove(&index) {
            false
        } else {
            self.rows.insert(index);
            true
        }
    }

    pub fn clear(&mut self) {
        self.rows.clear();
    }

    /// Rewrites every selected row at or after `from` through `remap`.
    /// Rows for which `remap` returns `None` are dropped.
    fn remap_tail<F>(&mut self, from: RowIndex, mut remap: F)
    where
        F: FnMut(RowIndex) -> Option<RowIndex>,
    {
        let tail = self.rows.split_off(&from);
        self.rows.extend(tail.into_iter().filter_map(|row| remap(row)));
    }

    /// `count` items were inserted at `at`; later items of that group move
    /// down by `count`.
    pub fn items_inserted(&mut self, at: RowIndex, count: i32) {
        self.remap_tail(at, |row| {
            Some(if row.group == at.group {
                RowIndex::new(row.group, row.item + count)
            } else {
                row
            })
        });
    }

    /// `count` items starting at `at` were removed; selections inside the
    /// range are dropped and later items of that group move up by `count`.
    pub fn items_removed(&mut self, at: RowIndex, count: i32) {
        let end = at.item + count;
        self.remap_tail(at, |row| {
            if row.group != at.group {
                Some(row)
            } else if row.item < end {
                None
            } else {
                Some(RowIndex::new(row.group, row.item - count))
            }
        });
    }

    /// A group was inserted at `group`; that group and every later one shift
    /// by one.
    pub fn group_inserted(&mut self, group: i32) {
        self.remap_tail(RowIndex::header(group), |row| {
            Some(RowIndex::new(row.group + 1, row.item))
        });
    }

    /// The group at `group` was removed; its selections are dropped and later
    /// groups shift back by one.
    pub fn group_removed(&mut self, group: i32) {
        self.remap_tail(RowIndex::header(group), |row| {
            (row.group != group).then(|| RowIndex::new(row.group - 1, row.item))
        });
    }
}

impl FromIterator<RowIndex> for SelectionSet {
    fn from_iter<T: IntoIterator<Item = RowIndex>>(iter: T) -> Self {
        Self {
            rows: iter.into_iter().collect(),
        }
    }
}
