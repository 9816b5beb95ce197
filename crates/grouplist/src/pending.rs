//! Rows displaced by a structural mutation, waiting to be re-attached.

use crate::collections::map::HashMap;
use crate::index::RowIndex;
use crate::window::LoadedRow;

/// Holding area keyed by each displaced row's *new* index.
///
/// Only populated between a mutation's geometry update and the end of the
/// load pass that follows it. The pass takes back every row it reaches; the
/// rest are drained and recycled.
#[derive(Debug, Default)]
pub struct PendingMap {
    rows: HashMap<RowIndex, LoadedRow>,
}

impl PendingMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, row: LoadedRow) {
        let previous = self.rows.insert(row.index, row);
        debug_assert!(previous.is_none(), "two displaced rows share {:?}", row.index);
    }

    pub fn take(&mut self, index: RowIndex) -> Option<LoadedRow> {
        self.rows.remove(&index)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Removes every remaining row, in index order.
    pub fn drain_sorted(&mut self) -> Vec<LoadedRow> {
        let mut rows: Vec<LoadedRow> = self.rows.drain().map(|(_, row)| row).collect();
        rows.sort_by_key(|row| row.index);
        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::ViewId;

    fn row(group: i32, item: i32, y: i64) -> LoadedRow {
        LoadedRow {
            index: RowIndex::new(group, item),
            y,
            h: 10,
            view: Some(ViewId(y as u32)),
        }
    }

    #[test]
    fn take_removes_by_new_index() {
        let mut pending = PendingMap::new();
        pending.insert(row(0, 3, 30));
        assert_eq!(pending.take(RowIndex::new(0, 2)), None);
        assert_eq!(pending.take(RowIndex::new(0, 3)), Some(row(0, 3, 30)));
        assert!(pending.is_empty());
    }

    #[test]
    fn drain_returns_rows_in_index_order() {
        let mut pending = PendingMap::new();
        pending.insert(row(1, 0, 50));
        pending.insert(row(0, -1, 0));
        pending.insert(row(0, 4, 40));

        let drained: Vec<_> = pending.drain_sorted().into_iter().map(|row| row.index).collect();

        assert_eq!(
            drained,
            vec![RowIndex::header(0), RowIndex::new(0, 4), RowIndex::new(1, 0)]
        );
        assert_eq!(pending.len(), 0);
    }
}
