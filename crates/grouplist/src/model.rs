//! Data source contract and the shared model that fans notifications out to
//! every bound list view.

use std::any::Any;
use std::cell::{Ref, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use crate::error::ModifyError;
use crate::index::RowIndex;
use crate::list_view::ListView;

/// Supplies the shape of the grouped data.
///
/// The engine only calls these during geometry rebuilds and bounds checks,
/// never while scrolling.
pub trait DataSource {
    /// Number of groups.
    fn num_groups(&self) -> i32;

    /// Number of items in `group`.
    fn num_items_in_group(&self, group: i32) -> i32;

    /// Optional payload for a row. Defaults to `None`.
    fn data_at(&self, index: RowIndex) -> Option<&dyn Any> {
        let _ = index;
        None
    }
}

/// Non-owning handle to a list view bound to a model.
type Observer = Weak<RefCell<ListView>>;

/// Shared model: a data source plus the registry of list views observing it.
///
/// Cloning a `ListModel` yields another handle to the same model. The model
/// never keeps its views alive; dropped views are pruned on the next
/// notification.
///
/// Structural notifications follow a two-phase protocol: call `begin_*` with
/// the exact parameters of the change, mutate the data source, then call the
/// matching `end_*`. A mismatch between the parameters and the actual change
/// is not detected.
#[derive(Clone)]
pub struct ListModel {
    inner: Rc<ModelInner>,
}

struct ModelInner {
    source: Rc<RefCell<dyn DataSource>>,
    observers: RefCell<Vec<Observer>>,
}

impl fmt::Debug for ListModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListModel")
            .field("observers", &self.observer_count())
            .finish()
    }
}

impl ListModel {
    /// Wraps a data source. The caller keeps its own handle to the concrete
    /// source in order to mutate it between `begin_*` and `end_*`.
    pub fn new(source: Rc<RefCell<dyn DataSource>>) -> Self {
        Self {
            inner: Rc::new(ModelInner {
                source,
                observers: RefCell::new(Vec::new()),
            }),
        }
    }

    /// Borrows the data source.
    pub fn source(&self) -> Ref<'_, dyn DataSource> {
        self.inner.source.borrow()
    }

    /// Returns true when both handles refer to the same model.
    pub fn ptr_eq(&self, other: &ListModel) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// Index of the last row, or invalid for a model without groups.
    pub fn max_index(&self) -> RowIndex {
        let source = self.source();
        let max_group = source.num_groups() - 1;
        if max_group >= 0 {
            RowIndex::new(max_group, source.num_items_in_group(max_group) - 1)
        } else {
            RowIndex::INVALID
        }
    }

    pub fn is_empty(&self) -> bool {
        self.source().num_groups() == 0
    }

    /// Number of live list views bound to this model.
    pub fn observer_count(&self) -> usize {
        self.inner
            .observers
            .borrow()
            .iter()
            .filter(|observer| observer.strong_count() > 0)
            .count()
    }

    pub(crate) fn attach(&self, view: Observer) {
        let mut observers = self.inner.observers.borrow_mut();
        if !observers.iter().any(|existing| existing.ptr_eq(&view)) {
            observers.push(view);
        }
    }

    pub(crate) fn detach(&self, view: &Observer) {
        self.inner
            .observers
            .borrow_mut()
            .retain(|existing| !existing.ptr_eq(view) && existing.strong_count() > 0);
    }

    /// Live observers in registration order. Dead entries are pruned.
    fn live_observers(&self) -> Vec<Rc<RefCell<ListView>>> {
        let mut observers = self.inner.observers.borrow_mut();
        observers.retain(|observer| observer.strong_count() > 0);
        observers.iter().filter_map(Weak::upgrade).collect()
    }

    /// Calls `notify` on every observer and returns the first error.
    fn fan_out<F>(&self, mut notify: F) -> Result<(), ModifyError>
    where
        F: FnMut(&mut ListView) -> Result<(), ModifyError>,
    {
        let mut first_error = None;
        for view in self.live_observers() {
            let mut view = view.borrow_mut();
            if let Err(err) = notify(&mut *view) {
                first_error.get_or_insert(err);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    /// The row at `index` changed and should be re-measured.
    pub fn item_changed(&self, index: RowIndex) {
        for view in self.live_observers() {
            view.borrow_mut().item_changed(index);
        }
    }

    /// Announces `count` items about to be inserted at `index` (single group).
    pub fn begin_insert_items(&self, index: RowIndex, count: i32) -> Result<(), ModifyError> {
        self.fan_out(|view| view.begin_insert_items(index, count))
    }

    pub fn end_insert_items(&self) -> Result<(), ModifyError> {
        self.fan_out(ListView::end_insert_items)
    }

    /// Announces a group about to be inserted at `group`.
    pub fn begin_insert_group(&self, group: i32) -> Result<(), ModifyError> {
        self.fan_out(|view| view.begin_insert_group(group))
    }

    pub fn end_insert_group(&self) -> Result<(), ModifyError> {
        self.fan_out(ListView::end_insert_group)
    }

    /// Announces `count` items about to be removed from `index` (single group).
    pub fn begin_remove_items(&self, index: RowIndex, count: i32) -> Result<(), ModifyError> {
        self.fan_out(|view| view.begin_remove_items(index, count))
    }

    pub fn end_remove_items(&self) -> Result<(), ModifyError> {
        self.fan_out(ListView::end_remove_items)
    }

    /// Announces the group at `group` about to be removed with all its items.
    pub fn begin_remove_group(&self, group: i32) -> Result<(), ModifyError> {
        self.fan_out(|view| view.begin_remove_group(group))
    }

    pub fn end_remove_group(&self) -> Result<(), ModifyError> {
        self.fan_out(ListView::end_remove_group)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Counts(Vec<i32>);

    impl DataSource for Counts {
        fn num_groups(&self) -> i32 {
            self.0.len() as i32
        }

        fn num_items_in_group(&self, group: i32) -> i32 {
            self.0[group as usize]
        }
    }

    fn model(counts: Vec<i32>) -> ListModel {
        ListModel::new(Rc::new(RefCell::new(Counts(counts))))
    }

    #[test]
    fn max_index_is_the_last_row() {
        assert_eq!(model(vec![3, 4]).max_index(), RowIndex::new(1, 3));
        assert_eq!(model(vec![3, 0]).max_index(), RowIndex::header(1));
        assert_eq!(model(vec![]).max_index(), RowIndex::INVALID);
        assert!(model(vec![]).is_empty());
    }

    #[test]
    fn clones_share_one_model() {
        let first = model(vec![1]);
        let second = first.clone();
        assert!(first.ptr_eq(&second));
        assert!(!first.ptr_eq(&model(vec![1])));
        assert_eq!(first.source().data_at(RowIndex::new(0, 0)).map(|_| ()), None);
    }

    #[test]
    fn notifications_without_observers_succeed() {
        let model = model(vec![2]);
        assert_eq!(model.observer_count(), 0);
        assert_eq!(model.begin_insert_items(RowIndex::new(0, 0), 1), Ok(()));
        assert_eq!(model.end_insert_items(), Ok(()));
        model.item_changed(RowIndex::new(0, 0));
    }
}
