//! Structural edits: the four begin/end pairs and single-row changes.
//!
//! `begin_*` only latches the change. The host then edits its data source and
//! calls the matching `end_*`, which patches the geometry, moves the loaded
//! rows behind the edit into the pending map under their new indices,
//! reconciles the selection and runs one load pass. Rows the pass reaches are
//! re-attached without going through the delegate again.

use crate::error::ModifyError;
use crate::event::ListEvent;
use crate::geometry::HeightBatch;
use crate::index::{IndexSpace, RowIndex};
use crate::list_view::{new_header_view, row_height, ListView};
use crate::transaction::ModifyKind;

impl ListView {
    fn open_transaction(
        &mut self,
        kind: ModifyKind,
        index: RowIndex,
        count: i32,
        fits: bool,
    ) -> Result<(), ModifyError> {
        let result = if fits || self.transaction.is_open() {
            self.transaction.begin(kind, index, count)
        } else {
            Err(ModifyError::OutOfRange { kind, index, count })
        };
        if let Err(err) = &result {
            log::error!("{err}");
        }
        result
    }

    fn close_transaction(&self, kind: ModifyKind) -> Result<(RowIndex, i32), ModifyError> {
        self.transaction.expect(kind).map_err(|err| {
            log::error!("{err}");
            err
        })
    }

    fn measure_batch(&self, group: i32, from: i32, count: i32) -> HeightBatch {
        let width = self.viewport.width();
        match self.delegate.as_deref() {
            Some(delegate) => (from..from + count)
                .map(|item| row_height(delegate, RowIndex::new(group, item), width))
                .collect(),
            None => HeightBatch::new(),
        }
    }

    /// Pulls every loaded row at or after `from` off the window, newest
    /// first. Rows `relabel` maps to `None` are released; the rest move by
    /// `delta` and wait in the pending map under their new index.
    fn displace<F>(&mut self, from: RowIndex, delta: i64, mut relabel: F)
    where
        F: FnMut(RowIndex) -> Option<RowIndex>,
    {
        debug_assert!(self.pending.is_empty());
        while let Some(mut row) = self.loaded.pop_back_from(from) {
            let Some(index) = relabel(row.index) else {
                self.release_row(row);
                continue;
            };
            row.index = index;
            row.y += delta;
            if let Some(handle) = row.view.and_then(|id| self.pool.get_mut(id)) {
                handle.index = index;
                handle.geometry.y = row.y;
            }
            self.pending.insert(row);
        }
    }

    /// Re-labels every header view after groups shifted.
    fn renumber_header_views(&mut self) {
        for (group, id) in self.header_views.iter().enumerate() {
            if let Some(handle) = id.and_then(|id| self.pool.get_mut(id)) {
                handle.index = RowIndex::header(group as i32);
            }
        }
    }

    /// Content extent, load pass, transaction close and event, shared by
    /// every `end_*`.
    fn finish_edit(&mut self, event: ListEvent, selection_before: usize) {
        if self.selection.len() != selection_before {
            self.events.push_back(ListEvent::SelectionChanged);
        }
        self.fix_content_size(false);
        self.refresh();
        self.sync_selected_flags();
        self.transaction.finish();
        self.events.push_back(event);
    }

    // ------------------------------------------------------------------
    // Items

    /// Announces `count` items about to be inserted at `index`. All of them
    /// land in `index.group`.
    pub fn begin_insert_items(&mut self, index: RowIndex, count: i32) -> Result<(), ModifyError> {
        if !self.is_bound() {
            return Ok(());
        }
        let fits = self.group_exists(index.group)
            && count > 0
            && index.item >= 0
            && index.item <= self.geometry.item_count(index.group);
        self.open_transaction(ModifyKind::InsertItems, index, count, fits)
    }

    pub fn end_insert_items(&mut self) -> Result<(), ModifyError> {
        if !self.is_bound() {
            return Ok(());
        }
        let (index, count) = self.close_transaction(ModifyKind::InsertItems)?;
        let heights = self.measure_batch(index.group, index.item, count);
        let added = self.geometry.insert_items(index.group, index.item, &heights);
        log::trace!("inserted {count} items at {index}, {added} high");

        self.displace(index, added, |row| {
            Some(if row.group == index.group {
                RowIndex::new(row.group, row.item + count)
            } else {
                row
            })
        });
        let selected = self.selection.len();
        self.selection.items_inserted(index, count);
        self.finish_edit(ListEvent::ItemsInserted { index, count }, selected);
        Ok(())
    }

    /// Announces `count` items about to be removed from `index` onwards, all
    /// within `index.group`.
    pub fn begin_remove_items(&mut self, index: RowIndex, count: i32) -> Result<(), ModifyError> {
        if !self.is_bound() {
            return Ok(());
        }
        let fits = self.group_exists(index.group)
            && count > 0
            && index.item >= 0
            && index.item + count <= self.geometry.item_count(index.group);
        self.open_transaction(ModifyKind::RemoveItems, index, count, fits)
    }

    pub fn end_remove_items(&mut self) -> Result<(), ModifyError> {
        if !self.is_bound() {
            return Ok(());
        }
        let (index, count) = self.close_transaction(ModifyKind::RemoveItems)?;
        let removed = self.geometry.remove_items(index.group, index.item, count);
        log::trace!("removed {count} items at {index}, {removed} high");

        let end = index.item + count;
        self.displace(index, -removed, |row| {
            if row.group != index.group {
                Some(row)
            } else if row.item < end {
                None
            } else {
                Some(RowIndex::new(row.group, row.item - count))
            }
        });
        let selected = self.selection.len();
        self.selection.items_removed(index, count);
        self.finish_edit(ListEvent::ItemsRemoved { index, count }, selected);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Groups

    /// Announces a group about to be inserted at position `group`.
    pub fn begin_insert_group(&mut self, group: i32) -> Result<(), ModifyError> {
        if !self.is_bound() {
            return Ok(());
        }
        let fits = (0..=self.geometry.group_count()).contains(&group);
        self.open_transaction(ModifyKind::InsertGroup, RowIndex::header(group), 1, fits)
    }

    pub fn end_insert_group(&mut self) -> Result<(), ModifyError> {
        if !self.is_bound() {
            return Ok(());
        }
        let (index, _) = self.close_transaction(ModifyKind::InsertGroup)?;
        let group = index.group;
        let item_count = match &self.model {
            Some(model) => model.source().num_items_in_group(group).max(0),
            None => 0,
        };
        let width = self.viewport.width();
        let (header_view, header_height) = match self.delegate.as_deref() {
            Some(delegate) => (
                new_header_view(&mut self.pool, delegate, group),
                row_height(delegate, index, width),
            ),
            None => (None, 0),
        };
        let heights = self.measure_batch(group, 0, item_count);
        let added = self
            .geometry
            .insert_group(group, header_height, heights.into_vec());
        self.header_views.insert(group as usize, header_view);
        log::trace!("inserted group {group} with {item_count} items, {added} high");

        self.displace(index, added, |row| Some(RowIndex::new(row.group + 1, row.item)));
        self.renumber_header_views();
        let selected = self.selection.len();
        self.selection.group_inserted(group);
        self.finish_edit(ListEvent::GroupInserted { group }, selected);
        Ok(())
    }

    /// Announces the group at `group` about to be removed with its items.
    pub fn begin_remove_group(&mut self, group: i32) -> Result<(), ModifyError> {
        if !self.is_bound() {
            return Ok(());
        }
        let fits = self.group_exists(group);
        self.open_transaction(ModifyKind::RemoveGroup, RowIndex::header(group), 1, fits)
    }

    pub fn end_remove_group(&mut self) -> Result<(), ModifyError> {
        if !self.is_bound() {
            return Ok(());
        }
        let (index, _) = self.close_transaction(ModifyKind::RemoveGroup)?;
        let group = index.group;
        let removed = self.geometry.remove_group(group);
        log::trace!("removed group {group}, {removed} high");

        self.displace(index, -removed, |row| {
            (row.group != group).then(|| RowIndex::new(row.group - 1, row.item))
        });
        if let Some(id) = self.header_views.remove(group as usize) {
            self.pool.destroy(id);
        }
        self.renumber_header_views();
        let selected = self.selection.len();
        self.selection.group_removed(group);
        self.finish_edit(ListEvent::GroupRemoved { group }, selected);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Single rows

    /// Re-measures `index` after its content changed.
    ///
    /// Rows below it move by the height delta. When the row sits above the
    /// loaded window the offset moves by the same delta so the visible rows
    /// stay put; when it is the last row and the list was scrolled to the
    /// end, the end stays pinned. A loaded row's view is prepared again.
    pub fn item_changed(&mut self, index: RowIndex) {
        if !self.is_bound() {
            return;
        }
        if let Some(kind) = self.transaction.open_kind() {
            log::warn!("item_changed({index:?}) during an open {kind} transaction, ignoring");
            return;
        }
        if !self.geometry.contains(index) {
            log::trace!("item_changed: {index:?} is not a row, ignoring");
            return;
        }
        let width = self.viewport.width();
        let Some(height) = self
            .delegate
            .as_deref()
            .map(|delegate| row_height(delegate, index, width))
        else {
            return;
        };
        let was_at_max = self.viewport.is_at_max();
        let delta = i64::from(self.geometry.resize(index, height));

        let position = self.loaded.position(index);
        let above_window = position.is_none()
            && self.loaded.first().is_some_and(|first| index < first.index);
        if delta != 0 {
            match position {
                Some(position) => {
                    for row in self.loaded.iter_mut().skip(position) {
                        if row.index == index {
                            row.h = height;
                        } else {
                            row.y += delta;
                        }
                    }
                }
                None if above_window => {
                    for row in self.loaded.iter_mut() {
                        row.y += delta;
                    }
                }
                None => {}
            }
            self.place_loaded_views();
        }

        let view = position
            .and_then(|position| self.loaded.get(position))
            .and_then(|row| row.view);
        if let (Some(view), false) = (view, index.is_header()) {
            if let (Some(delegate), Some(handle)) = (self.delegate.as_deref_mut(), self.pool.get(view)) {
                delegate.prepare_view(index, handle);
            }
        }

        self.sync_content_height();
        if above_window && delta != 0 {
            self.set_offset_silently(self.viewport.offset() + delta);
        } else if was_at_max && index == self.geometry.last_row() {
            self.set_offset_silently(i64::MAX);
        }
        self.refresh();
    }

    fn group_exists(&self, group: i32) -> bool {
        (0..self.geometry.group_count()).contains(&group)
    }
}
