//! Composite row identifiers and the walk across group boundaries.
//!
//! A grouped list is addressed by [`RowIndex`]: a group number plus an item
//! number inside that group. Every group owns one header pseudo-row (item
//! `-1`) that sorts before all of its items, so walking the index space visits
//! `header(0), (0, 0), (0, 1), .., header(1), (1, 0), ..`.

use std::fmt;

/// Identifies one row of a grouped list.
///
/// Ordering is by group first, then by item, which places a group's header
/// before its items. The derived ordering relies on the field order below.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RowIndex {
    pub group: i32,
    pub item: i32,
}

impl RowIndex {
    /// Group number of the invalid index.
    pub const INVALID_GROUP: i32 = -1;
    /// Item number of a group header.
    pub const HEADER_ITEM: i32 = -1;
    /// The empty/invalid index.
    pub const INVALID: RowIndex = RowIndex {
        group: Self::INVALID_GROUP,
        item: Self::HEADER_ITEM,
    };

    #[inline]
    pub const fn new(group: i32, item: i32) -> Self {
        Self { group, item }
    }

    /// Header pseudo-row of `group`.
    #[inline]
    pub const fn header(group: i32) -> Self {
        Self {
            group,
            item: Self::HEADER_ITEM,
        }
    }

    #[inline]
    pub const fn is_header(&self) -> bool {
        self.item == Self::HEADER_ITEM
    }

    /// Returns true for the invalid index.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.group == Self::INVALID_GROUP
    }
}

impl Default for RowIndex {
    fn default() -> Self {
        Self::INVALID
    }
}

impl fmt::Debug for RowIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            f.write_str("RowIndex(invalid)")
        } else if self.is_header() {
            write!(f, "RowIndex({}, header)", self.group)
        } else {
            write!(f, "RowIndex({}, {})", self.group, self.item)
        }
    }
}

impl fmt::Display for RowIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_header() {
            write!(f, "{}.h", self.group)
        } else {
            write!(f, "{}.{}", self.group, self.item)
        }
    }
}

/// Shape of a grouped index space.
///
/// Implementors only report group and item counts; the walk between rows is
/// provided. Both walks are O(1) as long as `item_count` is.
///
/// Walking from [`RowIndex::INVALID`] is a caller error: check
/// [`RowIndex::is_empty`] before stepping again.
pub trait IndexSpace {
    /// Number of groups.
    fn group_count(&self) -> i32;

    /// Number of items in `group`.
    fn item_count(&self, group: i32) -> i32;

    /// Row after `index`: the next item, or the next group's header after the
    /// last item of a group. Returns the invalid index past the last row.
    fn successor(&self, index: RowIndex) -> RowIndex {
        debug_assert!(!index.is_empty(), "successor of the invalid index");
        if index.item == self.item_count(index.group) - 1 {
            if index.group == self.group_count() - 1 {
                RowIndex::INVALID
            } else {
                RowIndex::header(index.group + 1)
            }
        } else {
            RowIndex::new(index.group, index.item + 1)
        }
    }

    /// Row before `index`: the previous item, the group's header before item
    /// zero, or the previous group's last row before a header. Returns the
    /// invalid index before the first header.
    fn predecessor(&self, index: RowIndex) -> RowIndex {
        debug_assert!(!index.is_empty(), "predecessor of the invalid index");
        if index.is_header() {
            if index.group == 0 {
                RowIndex::INVALID
            } else {
                let group = index.group - 1;
                RowIndex::new(group, self.item_count(group) - 1)
            }
        } else {
            RowIndex::new(index.group, index.item - 1)
        }
    }

    /// The first row (group 0's header), or invalid when there are no groups.
    fn first_row(&self) -> RowIndex {
        if self.group_count() > 0 {
            RowIndex::header(0)
        } else {
            RowIndex::INVALID
        }
    }

    /// The last row. For a trailing empty group this is its header.
    fn last_row(&self) -> RowIndex {
        let last_group = self.group_count() - 1;
        if last_group >= 0 {
            RowIndex::new(last_group, self.item_count(last_group) - 1)
        } else {
            RowIndex::INVALID
        }
    }

    /// Returns true when `index` addresses an existing row or header.
    fn contains(&self, index: RowIndex) -> bool {
        index.group >= 0
            && index.group < self.group_count()
            && index.item >= RowIndex::HEADER_ITEM
            && index.item < self.item_count(index.group)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Shape(Vec<i32>);

    impl IndexSpace for Shape {
        fn group_count(&self) -> i32 {
            self.0.len() as i32
        }

        fn item_count(&self, group: i32) -> i32 {
            self.0[group as usize]
        }
    }

    #[test]
    fn header_sorts_before_items() {
        assert!(RowIndex::header(1) < RowIndex::new(1, 0));
        assert!(RowIndex::new(0, 99) < RowIndex::header(1));
        assert!(RowIndex::INVALID < RowIndex::header(0));
    }

    #[test]
    fn successor_crosses_group_boundaries() {
        let shape = Shape(vec![2, 0, 1]);
        let mut walk = vec![shape.first_row()];
        loop {
            let next = shape.successor(*walk.last().unwrap());
            if next.is_empty() {
                break;
            }
            walk.push(next);
        }
        assert_eq!(
            walk,
            vec![
                RowIndex::header(0),
                RowIndex::new(0, 0),
                RowIndex::new(0, 1),
                RowIndex::header(1),
                RowIndex::header(2),
                RowIndex::new(2, 0),
            ]
        );
    }

    #[test]
    fn predecessor_mirrors_successor() {
        let shape = Shape(vec![2, 0, 1]);
        let mut index = shape.last_row();
        let mut steps = 0;
        while !index.is_empty() {
            let prev = shape.predecessor(index);
            if !prev.is_empty() {
                assert_eq!(shape.successor(prev), index);
            }
            index = prev;
            steps += 1;
        }
        assert_eq!(steps, 6);
    }

    #[test]
    fn empty_space_has_no_rows() {
        let shape = Shape(vec![]);
        assert!(shape.first_row().is_empty());
        assert!(shape.last_row().is_empty());
        assert!(!shape.contains(RowIndex::header(0)));
    }

    #[test]
    fn contains_checks_bounds() {
        let shape = Shape(vec![3]);
        assert!(shape.contains(RowIndex::header(0)));
        assert!(shape.contains(RowIndex::new(0, 2)));
        assert!(!shape.contains(RowIndex::new(0, 3)));
        assert!(!shape.contains(RowIndex::new(1, 0)));
        assert!(!shape.contains(RowIndex::new(0, -2)));
    }
}
