//! The list view: binding, the load/unload pass, selection and scrolling.
//!
//! A [`ListView`] keeps a contiguous window of materialized rows around the
//! viewport. Every change that can move rows (scrolling, resizing, structural
//! edits) ends with one pass of [`ListView::refresh`]:
//!
//! 1. unload rows outside the retained span,
//! 2. load rows under the last loaded row,
//! 3. load rows above the first loaded row,
//! 4. recycle whatever a structural edit displaced and the pass did not reach.
//!
//! Structural edits live in `mutation.rs`, width reflow in `reflow.rs`.

use std::cell::RefCell;
use std::collections::{BTreeSet, VecDeque};
use std::rc::{Rc, Weak};

use crate::config::ListViewConfig;
use crate::delegate::ListDelegate;
use crate::event::{ListEvent, PointerButton};
use crate::geometry::GeometryCache;
use crate::index::{IndexSpace, RowIndex};
use crate::model::ListModel;
use crate::pending::PendingMap;
use crate::pool::{RecycleStats, ViewPool};
use crate::selection::SelectionSet;
use crate::transaction::Transaction;
use crate::view::{ViewHandle, ViewId, ViewRole};
use crate::viewport::Viewport;
use crate::window::{LoadedRow, LoadedWindow};

/// Shared handle to a list view. Models observe list views through weak
/// references to this.
pub type SharedListView = Rc<RefCell<ListView>>;

/// Height of `index` as the delegate reports it. Headers of groups without a
/// header view are zero high.
pub(crate) fn row_height(delegate: &dyn ListDelegate, index: RowIndex, width: i32) -> i32 {
    if index.is_header() && delegate.header_view_for_group(index.group).is_none() {
        return 0;
    }
    delegate.height_for_index(index, width).max(0)
}

/// Creates the owned header view of `group`, if the delegate wants one.
pub(crate) fn new_header_view(
    pool: &mut ViewPool,
    delegate: &dyn ListDelegate,
    group: i32,
) -> Option<ViewId> {
    let view_type = delegate.header_view_for_group(group)?;
    let id = pool.create_owned(view_type, ViewRole::Header);
    if let Some(handle) = pool.get_mut(id) {
        handle.index = RowIndex::header(group);
    }
    Some(id)
}

/// A virtualized, grouped, variable-height list.
///
/// Create one with [`ListView::new`], bind a model and a delegate, give it a
/// viewport size and forward the host's scroll events to
/// [`ListView::set_scroll_offset`]. The host mirrors the view handles the
/// engine exposes through [`ListView::loaded_rows`] and [`ListView::view`],
/// and drains [`ListEvent`]s after each call.
///
/// Delegate callbacks run while the list view is mutably borrowed; they must
/// not call back into it.
pub struct ListView {
    pub(crate) config: ListViewConfig,
    self_ref: Weak<RefCell<ListView>>,
    pub(crate) model: Option<ListModel>,
    pub(crate) delegate: Option<Box<dyn ListDelegate>>,
    pub(crate) geometry: GeometryCache,
    pub(crate) selection: SelectionSet,
    pub(crate) pool: ViewPool,
    pub(crate) pending: PendingMap,
    pub(crate) loaded: LoadedWindow,
    /// Owned header view per group, `None` for groups without one.
    pub(crate) header_views: Vec<Option<ViewId>>,
    empty_view: Option<ViewId>,
    pub(crate) viewport: Viewport,
    pub(crate) transaction: Transaction,
    pub(crate) events: VecDeque<ListEvent>,
}

impl std::fmt::Debug for ListView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListView")
            .field("viewport", &self.viewport)
            .field("loaded", &self.loaded.len())
            .field("selection", &self.selection.len())
            .field("transaction", &self.transaction)
            .finish_non_exhaustive()
    }
}

impl ListView {
    pub fn new(config: ListViewConfig) -> SharedListView {
        Rc::new_cyclic(|self_ref| {
            RefCell::new(ListView {
                viewport: Viewport::new(config.initial_width, config.initial_height),
                config,
                self_ref: self_ref.clone(),
                model: None,
                delegate: None,
                geometry: GeometryCache::new(),
                selection: SelectionSet::new(),
                pool: ViewPool::new(),
                pending: PendingMap::new(),
                loaded: LoadedWindow::new(),
                header_views: Vec::new(),
                empty_view: None,
                transaction: Transaction::default(),
                events: VecDeque::new(),
            })
        })
    }

    // ------------------------------------------------------------------
    // Binding

    /// Binds `model`, or unbinds with `None`.
    ///
    /// Rebinding detaches from the previous model and resets every piece of
    /// engine state. Binding the model that is already bound does nothing.
    pub fn set_model(&mut self, model: Option<ListModel>) {
        let same = match (&self.model, &model) {
            (Some(current), Some(next)) => current.ptr_eq(next),
            (None, None) => true,
            _ => false,
        };
        if same {
            return;
        }
        self.clear();
        if let Some(previous) = self.model.take() {
            previous.detach(&self.self_ref);
        }
        if let Some(next) = &model {
            next.attach(self.self_ref.clone());
        }
        self.model = model;
        self.reload();
    }

    /// Replaces the delegate and rebuilds everything it measured.
    pub fn set_delegate(&mut self, delegate: Option<Box<dyn ListDelegate>>) {
        self.clear();
        self.delegate = delegate;
        self.reload();
    }

    pub fn model(&self) -> Option<&ListModel> {
        self.model.as_ref()
    }

    pub(crate) fn is_bound(&self) -> bool {
        self.model.is_some() && self.delegate.is_some()
    }

    /// Releases every view and forgets every cached measurement.
    pub(crate) fn clear(&mut self) {
        for row in self.loaded.drain_all() {
            self.release_row(row);
        }
        for row in self.pending.drain_sorted() {
            self.release_row(row);
        }
        for id in self.header_views.drain(..).flatten() {
            self.pool.destroy(id);
        }
        if let Some(id) = self.empty_view.take() {
            self.pool.destroy(id);
        }
        self.selection.clear();
        self.geometry.clear();
        if let Some(kind) = self.transaction.open_kind() {
            log::warn!("dropping open {kind} transaction while clearing the list");
            self.transaction.finish();
        }
    }

    /// Re-measures every row, recreates header views and reloads the window.
    pub(crate) fn reload(&mut self) {
        let (Some(model), Some(delegate)) = (self.model.as_ref(), self.delegate.as_deref()) else {
            return;
        };
        let width = self.viewport.width();
        {
            let source = model.source();
            self.geometry
                .rebuild(&*source, |index| row_height(delegate, index, width), None);
        }
        self.header_views = (0..self.geometry.group_count())
            .map(|group| new_header_view(&mut self.pool, delegate, group))
            .collect();
        self.fix_content_size(false);
        self.refresh();
    }

    // ------------------------------------------------------------------
    // Load pass

    /// Runs one load/unload pass against the current viewport.
    pub(crate) fn refresh(&mut self) {
        if !self.is_bound() {
            return;
        }
        if self.geometry.group_count() > 0 {
            self.remove_empty_state();
            self.unload_out_of_viewport();
            self.load_under();
            self.load_above();
            self.recycle_pending();
        } else {
            for row in self.loaded.drain_all() {
                self.release_row(row);
            }
            self.recycle_pending();
            self.show_empty_state();
        }
        debug_assert!(self.loaded.is_consistent(&self.geometry));
    }

    fn unload_out_of_viewport(&mut self) {
        let span = self.viewport.span();
        let keep = if span.top < span.bottom {
            self.loaded.retained_span(span, self.config.overscan_rows)
        } else {
            0..0
        };
        if keep == (0..self.loaded.len()) {
            return;
        }
        let evicted = self.loaded.drain_outside(keep);
        log::trace!("unloading {} rows", evicted.len());
        for row in evicted {
            self.release_row(row);
        }
    }

    fn load_under(&mut self) {
        let span = self.viewport.span();
        if span.top >= span.bottom {
            return;
        }
        let overscan = self.config.overscan_rows;
        let (mut next, mut y) = match self.loaded.last() {
            Some(last) => (self.geometry.successor(last.index), last.bottom()),
            None => match self.geometry.locate(span.top) {
                Some(found) => found,
                None => return,
            },
        };
        let mut past = self.loaded.items_below(span);
        while !next.is_empty() {
            if span.is_below(y) {
                if past >= overscan {
                    break;
                }
                if !next.is_header() {
                    past += 1;
                }
            }
            let row = self.materialize(next, y);
            y = row.bottom();
            self.loaded.push_back(row);
            next = self.geometry.successor(next);
        }
    }

    fn load_above(&mut self) {
        let span = self.viewport.span();
        if span.top >= span.bottom {
            return;
        }
        let overscan = self.config.overscan_rows;
        let (mut prev, mut bottom) = match self.loaded.first() {
            Some(first) => (self.geometry.predecessor(first.index), first.y),
            None => (self.geometry.last_row(), self.geometry.content_height()),
        };
        let mut past = self.loaded.items_above(span);
        while !prev.is_empty() {
            let h = self.geometry.height_of(prev);
            let y = bottom - i64::from(h);
            // Walking up from the end of the content into the viewport.
            if self.loaded.is_empty() && span.is_below(y) {
                bottom = y;
                prev = self.geometry.predecessor(prev);
                continue;
            }
            if span.is_above(y, h) {
                if past >= overscan {
                    break;
                }
                if !prev.is_header() {
                    past += 1;
                }
            }
            let row = self.materialize(prev, y);
            self.loaded.push_front(row);
            bottom = y;
            prev = self.geometry.predecessor(prev);
        }
    }

    fn recycle_pending(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        for row in self.pending.drain_sorted() {
            self.release_row(row);
        }
    }

    /// Binds a view to `index` at `y`: a displaced row if one is waiting,
    /// otherwise a pooled or fresh view that the delegate prepares.
    fn materialize(&mut self, index: RowIndex, y: i64) -> LoadedRow {
        let width = self.viewport.width();
        let h = self.geometry.height_of(index);
        let selected = !index.is_header() && self.selection.contains(index);

        if let Some(mut row) = self.pending.take(index) {
            self.pool.note_pending_reuse();
            row.y = y;
            row.h = h;
            if let Some(handle) = row.view.and_then(|id| self.pool.get_mut(id)) {
                handle.index = index;
                handle.place(y, width, h);
                handle.selected = selected;
                handle.show();
            }
            return row;
        }

        let view = if index.is_header() {
            let id = self.header_views.get(index.group as usize).copied().flatten();
            if let Some(handle) = id.and_then(|id| self.pool.get_mut(id)) {
                handle.index = index;
                handle.place(y, width, h);
                handle.show();
            }
            id
        } else if let Some(delegate) = self.delegate.as_deref_mut() {
            let (id, _) = self.pool.acquire(delegate.view_type_for_index(index));
            if let Some(handle) = self.pool.get_mut(id) {
                handle.index = index;
                handle.place(y, width, h);
                handle.selected = selected;
                handle.show();
            }
            if let Some(handle) = self.pool.get(id) {
                delegate.prepare_view(index, handle);
            }
            Some(id)
        } else {
            None
        };

        if index == self.geometry.first_row() {
            self.events.push_back(ListEvent::LeadingEdgeReached);
        }
        if index == self.geometry.last_row() {
            self.events.push_back(ListEvent::TrailingEdgeReached);
        }
        LoadedRow { index, y, h, view }
    }

    /// Takes a row's view off screen. Header views stay with their group;
    /// item views are cleaned and pooled.
    pub(crate) fn release_row(&mut self, row: LoadedRow) {
        let Some(id) = row.view else {
            return;
        };
        if row.index.is_header() {
            if let Some(handle) = self.pool.get_mut(id) {
                handle.hide();
            }
            return;
        }
        if let (Some(delegate), Some(handle)) = (self.delegate.as_deref_mut(), self.pool.get(id)) {
            delegate.clean_view(row.index, handle);
        }
        self.pool.release(id);
    }

    fn show_empty_state(&mut self) {
        let width = self.viewport.width();
        let height = self.viewport.height();
        if self.empty_view.is_none() {
            let Some(view_type) = self.delegate.as_deref().and_then(|d| d.empty_state_view()) else {
                return;
            };
            self.empty_view = Some(self.pool.create_owned(view_type, ViewRole::EmptyState));
        }
        if let Some(handle) = self.empty_view.and_then(|id| self.pool.get_mut(id)) {
            handle.place(0, width, height);
            handle.show();
        }
    }

    fn remove_empty_state(&mut self) {
        if let Some(id) = self.empty_view.take() {
            self.pool.destroy(id);
        }
    }

    // ------------------------------------------------------------------
    // Scrolling

    /// Host scroll handler: moves the viewport and runs one pass.
    pub fn set_scroll_offset(&mut self, offset: i64) {
        self.viewport.set_offset(offset);
        self.refresh();
    }

    /// Engine-initiated offset change. Never runs a pass by itself.
    pub(crate) fn set_offset_silently(&mut self, offset: i64) {
        if self.viewport.set_offset(offset) {
            self.events.push_back(ListEvent::ScrollMoved {
                offset: self.viewport.offset(),
            });
        }
    }

    /// Scrolls so that `index` starts at the top of the viewport, as far as
    /// the content allows. Indices outside the model are ignored.
    pub fn scroll_to_index(&mut self, index: RowIndex) {
        if !self.is_bound() || !self.geometry.contains(index) {
            log::trace!("scroll_to_index: {index:?} is not a row, ignoring");
            return;
        }
        let target = match self.loaded.first() {
            Some(first) => self.geometry.offset_from(index, first.index, first.y),
            None => self.geometry.position_of(index).unwrap_or_default(),
        };
        self.set_offset_silently(target);
        self.refresh();
    }

    pub fn scroll_to_top(&mut self) {
        self.set_offset_silently(0);
        self.refresh();
    }

    pub fn scroll_to_bottom(&mut self) {
        self.set_offset_silently(i64::MAX);
        self.refresh();
    }

    /// Resizes the viewport. A width change re-measures rows when the
    /// delegate's heights depend on width.
    pub fn set_viewport_size(&mut self, width: i32, height: i32) {
        let width_changed = self.viewport.resize(width, height);
        self.fix_content_size(width_changed);
        self.refresh();
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    // ------------------------------------------------------------------
    // Selection

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    /// Replaces the selection. Emits `SelectionChanged` only when it differs.
    pub fn set_selection(&mut self, rows: BTreeSet<RowIndex>) {
        self.apply_selection(rows);
    }

    fn apply_selection(&mut self, rows: BTreeSet<RowIndex>) {
        let previous = self.selection.clone();
        if self.selection.replace(rows) {
            self.selection_changed(&previous);
        }
    }

    /// Flips the `selected` flag of loaded views whose membership changed
    /// since `previous` and queues `SelectionChanged`.
    fn selection_changed(&mut self, previous: &SelectionSet) {
        for row in self.loaded.iter() {
            let now = self.selection.contains(row.index);
            if previous.contains(row.index) == now || row.index.is_header() {
                continue;
            }
            if let Some(handle) = row.view.and_then(|id| self.pool.get_mut(id)) {
                handle.selected = now;
            }
        }
        self.events.push_back(ListEvent::SelectionChanged);
    }

    /// Resyncs the `selected` flag of every loaded item view.
    pub(crate) fn sync_selected_flags(&mut self) {
        for row in self.loaded.iter() {
            if row.index.is_header() {
                continue;
            }
            if let Some(handle) = row.view.and_then(|id| self.pool.get_mut(id)) {
                handle.selected = self.selection.contains(row.index);
            }
        }
    }

    /// Host click handler for the view `view`.
    ///
    /// A left click on a selectable row toggles it (multi-select) or makes it
    /// the only selected row (single-select). Every click on a loaded row is
    /// reported as `RowClicked`.
    pub fn click_row(&mut self, view: ViewId, button: PointerButton) {
        let Some(index) = self.loaded.find_view(view).map(|row| row.index) else {
            log::trace!("click on {view:?}, which shows no loaded row");
            return;
        };
        if button == PointerButton::Left && !index.is_header() {
            if let Some(delegate) = self.delegate.as_deref() {
                if delegate.can_select(index) {
                    let multi = delegate.is_multi_select();
                    if multi {
                        let previous = self.selection.clone();
                        self.selection.toggle(index);
                        self.selection_changed(&previous);
                    } else if !self.selection.is_only(index) {
                        self.apply_selection(BTreeSet::from([index]));
                    }
                }
            }
        }
        self.events.push_back(ListEvent::RowClicked {
            index,
            view,
            button,
        });
    }

    // ------------------------------------------------------------------
    // Introspection

    /// Loaded rows in index order, headers included.
    pub fn loaded_rows(&self) -> impl Iterator<Item = &LoadedRow> + '_ {
        self.loaded.iter()
    }

    pub fn view(&self, id: ViewId) -> Option<&ViewHandle> {
        self.pool.get(id)
    }

    /// Every view handle the list owns, shown or not.
    pub fn views(&self) -> impl Iterator<Item = &ViewHandle> + '_ {
        self.pool.handles()
    }

    /// Owned header view of `group`.
    pub fn header_view(&self, group: i32) -> Option<ViewId> {
        self.header_views.get(group as usize).copied().flatten()
    }

    /// The empty-state view, while one is shown.
    pub fn empty_state(&self) -> Option<ViewId> {
        self.empty_view
    }

    pub fn geometry(&self) -> &GeometryCache {
        &self.geometry
    }

    pub fn config(&self) -> &ListViewConfig {
        &self.config
    }

    pub fn stats(&self) -> &RecycleStats {
        self.pool.stats()
    }

    pub fn is_modifying(&self) -> bool {
        self.transaction.is_open()
    }

    /// Takes every queued event, oldest first.
    pub fn drain_events(&mut self) -> Vec<ListEvent> {
        self.events.drain(..).collect()
    }

    /// Checks the loaded window and the geometry totals.
    pub fn is_consistent(&self) -> bool {
        self.loaded.is_consistent(&self.geometry)
            && self.geometry.totals_consistent()
            && self.pending.is_empty()
            && self.loaded.iter().all(|row| {
                self.geometry.contains(row.index)
                    && self.geometry.position_of(row.index) == Some(row.y)
                    && self.geometry.height_of(row.index) == row.h
            })
    }
}

impl Drop for ListView {
    fn drop(&mut self) {
        if let Some(model) = self.model.take() {
            model.detach(&self.self_ref);
        }
    }
}
