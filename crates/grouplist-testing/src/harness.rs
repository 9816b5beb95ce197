//! Drives a bound list view through its model the way a host would.

use std::cell::{Ref, RefCell, RefMut};
use std::rc::Rc;

use grouplist::{
    DataSource, ListEvent, ListModel, ListView, ListViewConfig, LoadedRow, ModifyError,
    RowIndex, SharedListView, ViewRole,
};

use crate::fixture::{DelegateLog, FixtureData, FixtureDelegate, FixtureGroup};

/// A fixture data source, its model and one bound list view.
///
/// Mutation helpers follow the host protocol: `begin_*` on the model, edit
/// the data, `end_*` on the model.
pub struct ListHarness {
    pub data: Rc<RefCell<FixtureData>>,
    pub model: ListModel,
    pub view: SharedListView,
    pub log: Rc<RefCell<DelegateLog>>,
}

impl ListHarness {
    /// Binds `data` to a fresh list view built from `config`, with a default
    /// [`FixtureDelegate`].
    pub fn new(data: FixtureData, config: ListViewConfig) -> Self {
        Self::with_delegate(data, config, |delegate| delegate)
    }

    /// Like [`ListHarness::new`], letting `configure` adjust the delegate.
    pub fn with_delegate<F>(data: FixtureData, config: ListViewConfig, configure: F) -> Self
    where
        F: FnOnce(FixtureDelegate) -> FixtureDelegate,
    {
        let data = Rc::new(RefCell::new(data));
        let source: Rc<RefCell<dyn DataSource>> = data.clone();
        let model = ListModel::new(source);
        let delegate = configure(FixtureDelegate::new(Rc::clone(&data)));
        let log = delegate.log();

        let view = ListView::new(config);
        {
            let mut view = view.borrow_mut();
            view.set_model(Some(model.clone()));
            view.set_delegate(Some(Box::new(delegate)));
        }
        Self {
            data,
            model,
            view,
            log,
        }
    }

    /// Binds a second list view to the same model, with its own delegate and
    /// log.
    pub fn attach_view(&self, config: ListViewConfig) -> (SharedListView, Rc<RefCell<DelegateLog>>) {
        let delegate = FixtureDelegate::new(Rc::clone(&self.data));
        let log = delegate.log();
        let view = ListView::new(config);
        {
            let mut view = view.borrow_mut();
            view.set_model(Some(self.model.clone()));
            view.set_delegate(Some(Box::new(delegate)));
        }
        (view, log)
    }

    pub fn view(&self) -> Ref<'_, ListView> {
        self.view.borrow()
    }

    pub fn view_mut(&self) -> RefMut<'_, ListView> {
        self.view.borrow_mut()
    }

    pub fn insert_items(&self, index: RowIndex, heights: &[i32]) -> Result<(), ModifyError> {
        self.model.begin_insert_items(index, heights.len() as i32)?;
        self.data.borrow_mut().insert_items(index, heights);
        self.model.end_insert_items()
    }

    pub fn remove_items(&self, index: RowIndex, count: i32) -> Result<(), ModifyError> {
        self.model.begin_remove_items(index, count)?;
        self.data.borrow_mut().remove_items(index, count);
        self.model.end_remove_items()
    }

    pub fn insert_group(&self, at: i32, group: FixtureGroup) -> Result<(), ModifyError> {
        self.model.begin_insert_group(at)?;
        self.data.borrow_mut().insert_group(at, group);
        self.model.end_insert_group()
    }

    pub fn remove_group(&self, at: i32) -> Result<(), ModifyError> {
        self.model.begin_remove_group(at)?;
        self.data.borrow_mut().remove_group(at);
        self.model.end_remove_group()
    }

    /// Changes one row's height and notifies the model.
    pub fn resize_row(&self, index: RowIndex, height: i32) {
        self.data.borrow_mut().set_height(index, height);
        self.model.item_changed(index);
    }

    pub fn scroll_to(&self, offset: i64) {
        self.view.borrow_mut().set_scroll_offset(offset);
    }

    pub fn offset(&self) -> i64 {
        self.view.borrow().viewport().offset()
    }

    pub fn loaded_rows(&self) -> Vec<LoadedRow> {
        self.view.borrow().loaded_rows().copied().collect()
    }

    /// Loaded item rows, headers filtered out.
    pub fn loaded_items(&self) -> Vec<RowIndex> {
        loaded_items(&self.view.borrow())
    }

    pub fn take_events(&self) -> Vec<ListEvent> {
        self.view.borrow_mut().drain_events()
    }

    /// Panics unless the loaded window is ordered, contiguous and consistent
    /// with the geometry, and every loaded view mirrors its row.
    pub fn assert_consistent(&self) {
        assert_view_consistent(&self.view.borrow());
        assert_eq!(
            self.view.borrow().geometry().content_height(),
            self.data.borrow().total_height(),
            "content height does not match the data"
        );
    }
}

/// Loaded item rows of `view`, headers filtered out.
pub fn loaded_items(view: &ListView) -> Vec<RowIndex> {
    view.loaded_rows()
        .map(|row| row.index)
        .filter(|index| !index.is_header())
        .collect()
}

/// Panics unless `view`'s loaded window and view handles agree with its
/// geometry.
pub fn assert_view_consistent(view: &ListView) {
    assert!(view.is_consistent(), "inconsistent list view: {view:?}");
    let width = view.viewport().width();
    for row in view.loaded_rows() {
        let Some(id) = row.view else {
            assert!(row.index.is_header(), "item row {:?} has no view", row.index);
            continue;
        };
        let handle = view
            .view(id)
            .unwrap_or_else(|| panic!("loaded row {:?} points at a missing view", row.index));
        assert!(handle.is_visible(), "loaded view for {:?} is hidden", row.index);
        assert_eq!(handle.index(), row.index);
        assert_eq!(handle.geometry().y, row.y, "view y for {:?}", row.index);
        assert_eq!(handle.geometry().height, row.h, "view height for {:?}", row.index);
        assert_eq!(handle.geometry().width, width, "view width for {:?}", row.index);
        if !row.index.is_header() {
            assert_eq!(
                handle.is_selected(),
                view.selection().contains(row.index),
                "selected flag for {:?}",
                row.index
            );
        }
    }
    let visible_rows = view
        .views()
        .filter(|handle| handle.is_visible() && handle.role() != ViewRole::EmptyState)
        .count();
    let loaded_views = view.loaded_rows().filter(|row| row.view.is_some()).count();
    assert_eq!(visible_rows, loaded_views, "visible views outside the window");
    if view.empty_state().is_some() {
        assert_eq!(view.loaded_rows().count(), 0, "empty state shown next to rows");
    }
}
