//! Cached row heights and the aggregate totals derived from them.
//!
//! The cache is rebuilt wholesale only on rebind, reload and width-driven
//! reflow. Structural edits and single-row resizes patch it incrementally so
//! that scrolling never calls back into the delegate for measurements.

use smallvec::SmallVec;
use web_time::Instant;

use crate::index::{IndexSpace, RowIndex};
use crate::model::DataSource;

#[derive(Clone, Debug, Default, PartialEq)]
struct GroupGeometry {
    header_height: i32,
    item_heights: Vec<i32>,
    /// `header_height + sum(item_heights)`.
    total: i64,
}

impl GroupGeometry {
    fn recompute_total(&mut self) {
        self.total = i64::from(self.header_height)
            + self.item_heights.iter().map(|h| i64::from(*h)).sum::<i64>();
    }
}

/// Per-group header height and per-item height arrays plus the content total.
#[derive(Clone, Debug, Default)]
pub struct GeometryCache {
    groups: Vec<GroupGeometry>,
    content_height: i64,
}

impl GeometryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops every cached height.
    pub fn clear(&mut self) {
        self.groups.clear();
        self.content_height = 0;
    }

    /// Recomputes every height from scratch.
    ///
    /// `measure` is called once per header and once per item, in index order.
    /// When `anchor` is given, returns the offset at which it begins;
    /// otherwise returns 0.
    pub fn rebuild<F>(&mut self, source: &dyn DataSource, mut measure: F, anchor: Option<RowIndex>) -> i64
    where
        F: FnMut(RowIndex) -> i32,
    {
        let started = Instant::now();
        let group_count = source.num_groups().max(0);
        let mut anchor_y = 0;
        let mut rows = 0usize;

        self.groups.clear();
        self.groups.reserve(group_count as usize);
        self.content_height = 0;

        for group in 0..group_count {
            let header = RowIndex::header(group);
            if anchor == Some(header) {
                anchor_y = self.content_height;
            }
            let header_height = measure(header);
            let mut running = self.content_height + i64::from(header_height);

            let item_count = source.num_items_in_group(group).max(0);
            let mut item_heights = Vec::with_capacity(item_count as usize);
            for item in 0..item_count {
                let index = RowIndex::new(group, item);
                if anchor == Some(index) {
                    anchor_y = running;
                }
                let height = measure(index);
                item_heights.push(height);
                running += i64::from(height);
            }
            rows += item_heights.len() + 1;

            let geometry = GroupGeometry {
                header_height,
                item_heights,
                total: running - self.content_height,
            };
            self.content_height = running;
            self.groups.push(geometry);
        }

        log::debug!(
            "geometry rebuilt: {} groups, {} rows, content height {} in {:?}",
            group_count,
            rows,
            self.content_height,
            started.elapsed()
        );
        anchor_y
    }

    #[inline]
    pub fn content_height(&self) -> i64 {
        self.content_height
    }

    /// Height of a header or item row.
    #[inline]
    pub fn height_of(&self, index: RowIndex) -> i32 {
        let group = &self.groups[index.group as usize];
        if index.is_header() {
            group.header_height
        } else {
            group.item_heights[index.item as usize]
        }
    }

    #[inline]
    pub fn header_height(&self, group: i32) -> i32 {
        self.groups[group as usize].header_height
    }

    /// Header height plus all item heights of `group`.
    #[inline]
    pub fn group_height(&self, group: i32) -> i64 {
        self.groups[group as usize].total
    }

    /// Replaces one row's height. Returns the height delta.
    pub fn resize(&mut self, index: RowIndex, height: i32) -> i32 {
        let group = &mut self.groups[index.group as usize];
        let slot = if index.is_header() {
            &mut group.header_height
        } else {
            &mut group.item_heights[index.item as usize]
        };
        let delta = height - *slot;
        *slot = height;
        group.total += i64::from(delta);
        self.content_height += i64::from(delta);
        delta
    }

    /// Inserts item heights at `at` in `group`. Returns the added height.
    pub fn insert_items(&mut self, group: i32, at: i32, heights: &[i32]) -> i64 {
        let geometry = &mut self.groups[group as usize];
        let at = at as usize;
        geometry
            .item_heights
            .splice(at..at, heights.iter().copied());
        let added: i64 = heights.iter().map(|h| i64::from(*h)).sum();
        geometry.total += added;
        self.content_height += added;
        added
    }

    /// Removes `count` items starting at `at` in `group`. Returns the removed
    /// height.
    pub fn remove_items(&mut self, group: i32, at: i32, count: i32) -> i64 {
        let geometry = &mut self.groups[group as usize];
        let start = at as usize;
        let end = start + count as usize;
        let removed: i64 = geometry
            .item_heights
            .drain(start..end)
            .map(i64::from)
            .sum();
        geometry.total -= removed;
        self.content_height -= removed;
        removed
    }

    /// Inserts a whole group. Returns its total height.
    pub fn insert_group(&mut self, group: i32, header_height: i32, item_heights: Vec<i32>) -> i64 {
        let mut geometry = GroupGeometry {
            header_height,
            item_heights,
            total: 0,
        };
        geometry.recompute_total();
        let added = geometry.total;
        self.groups.insert(group as usize, geometry);
        self.content_height += added;
        added
    }

    /// Removes a whole group. Returns its total height.
    pub fn remove_group(&mut self, group: i32) -> i64 {
        let removed = self.groups.remove(group as usize).total;
        self.content_height -= removed;
        removed
    }

    /// Absolute top of `index`, skipping whole groups by their totals.
    pub fn position_of(&self, index: RowIndex) -> Option<i64> {
        if !self.contains(index) {
            return None;
        }
        let mut y: i64 = self.groups[..index.group as usize]
            .iter()
            .map(|group| group.total)
            .sum();
        if !index.is_header() {
            let group = &self.groups[index.group as usize];
            y += i64::from(group.header_height);
            y += group.item_heights[..index.item as usize]
                .iter()
                .map(|h| i64::from(*h))
                .sum::<i64>();
        }
        Some(y)
    }

    /// Top of `index` given that `reference` starts at `reference_y`.
    ///
    /// Walks index space between the two rows, skipping whole groups when the
    /// walk sits on a header and the target lies in a later group. Cost is
    /// proportional to the distance between the rows.
    pub fn offset_from(&self, index: RowIndex, reference: RowIndex, reference_y: i64) -> i64 {
        let (mut low, high) = if index < reference {
            (index, reference)
        } else {
            (reference, index)
        };
        let mut distance: i64 = 0;
        while low != high {
            if low.is_header() && high.group > low.group {
                distance += self.group_height(low.group);
                low = RowIndex::header(low.group + 1);
            } else {
                distance += i64::from(self.height_of(low));
                low = self.successor(low);
            }
        }
        if index > reference {
            reference_y + distance
        } else {
            reference_y - distance
        }
    }

    /// Finds the first row whose bottom edge is at or below `y`.
    ///
    /// Returns the row and its top. `None` when `y` lies past the content.
    pub fn locate(&self, y: i64) -> Option<(RowIndex, i64)> {
        let mut top: i64 = 0;
        for (group_number, group) in self.groups.iter().enumerate() {
            if top + group.total < y {
                top += group.total;
                continue;
            }
            let group_number = group_number as i32;
            let header_bottom = top + i64::from(group.header_height);
            if header_bottom >= y {
                return Some((RowIndex::header(group_number), top));
            }
            top = header_bottom;
            for (item, height) in group.item_heights.iter().enumerate() {
                let bottom = top + i64::from(*height);
                if bottom >= y {
                    return Some((RowIndex::new(group_number, item as i32), top));
                }
                top = bottom;
            }
        }
        None
    }

    /// Heights of `group`'s items, for diagnostics and tests.
    pub fn item_heights(&self, group: i32) -> &[i32] {
        &self.groups[group as usize].item_heights
    }

    /// Recomputes every total from the raw heights and compares with the
    /// cached values.
    pub fn totals_consistent(&self) -> bool {
        let mut content: i64 = 0;
        for group in &self.groups {
            let mut check = group.clone();
            check.recompute_total();
            if check.total != group.total {
                return false;
            }
            content += group.total;
        }
        content == self.content_height
    }
}

impl IndexSpace for GeometryCache {
    #[inline]
    fn group_count(&self) -> i32 {
        self.groups.len() as i32
    }

    #[inline]
    fn item_count(&self, group: i32) -> i32 {
        self.groups[group as usize].item_heights.len() as i32
    }
}

/// Measured heights for a batch of inserted rows.
pub(crate) type HeightBatch = SmallVec<[i32; 8]>;
