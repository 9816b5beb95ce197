//! Host callbacks that measure rows and bind data into views.

use crate::index::RowIndex;
use crate::view::{ViewHandle, ViewType};

/// Measures rows and prepares views for them.
///
/// Only `height_for_index` and `view_type_for_index` are required. Header
/// rows are measured through `height_for_index` with a header index, and only
/// for groups whose `header_view_for_group` returns a type.
pub trait ListDelegate {
    /// Height of `index` laid out at `available_width`.
    fn height_for_index(&self, index: RowIndex, available_width: i32) -> i32;

    /// Recycling bucket of the view that shows `index`.
    fn view_type_for_index(&self, index: RowIndex) -> ViewType;

    /// Binds the data of `index` into `view` before it is shown.
    ///
    /// Called for fresh and recycled views, never for rows re-attached after
    /// a structural mutation.
    fn prepare_view(&mut self, index: RowIndex, view: &ViewHandle) {
        let _ = (index, view);
    }

    /// Releases whatever `prepare_view` bound, right before the view goes
    /// back to the pool.
    fn clean_view(&mut self, index: RowIndex, view: &ViewHandle) {
        let _ = (index, view);
    }

    /// Whether a click may select `index`. Defaults to false.
    fn can_select(&self, index: RowIndex) -> bool {
        let _ = index;
        false
    }

    /// Clicks toggle membership when true, replace the selection when false.
    fn is_multi_select(&self) -> bool {
        true
    }

    /// View type of `group`'s header, or `None` for a group without one.
    fn header_view_for_group(&self, group: i32) -> Option<ViewType> {
        let _ = group;
        None
    }

    /// View shown while the model has no groups.
    fn empty_state_view(&self) -> Option<ViewType> {
        None
    }

    /// When true, a width change re-measures every row.
    fn height_depends_on_width(&self) -> bool {
        false
    }
}
