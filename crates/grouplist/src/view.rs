//! Engine-side records of host views.
//!
//! The engine never touches a toolkit widget. It keeps one [`ViewHandle`] per
//! host view, records where that view should be and whether it is shown, and
//! the host mirrors the handles by [`ViewId`].

use crate::index::RowIndex;

/// Stable identifier of a view handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ViewId(pub(crate) u32);

impl ViewId {
    #[inline]
    pub fn raw(self) -> u32 {
        self.0
    }
}

/// View type tag returned by the delegate. Views are only recycled between
/// rows of the same type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ViewType(pub u64);

impl ViewType {
    #[inline]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    #[inline]
    pub fn raw(self) -> u64 {
        self.0
    }
}

/// What a view is used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewRole {
    /// A recyclable item row.
    Row,
    /// A group header, owned by its group.
    Header,
    /// The placeholder shown while the model has no groups.
    EmptyState,
}

/// Placement of a view inside the scroll content.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViewGeometry {
    pub y: i64,
    pub width: i32,
    pub height: i32,
}

/// Engine-side record of one host view.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewHandle {
    id: ViewId,
    view_type: ViewType,
    role: ViewRole,
    pub(crate) index: RowIndex,
    pub(crate) geometry: ViewGeometry,
    pub(crate) visible: bool,
    pub(crate) selected: bool,
}

impl ViewHandle {
    pub(crate) fn new(id: ViewId, view_type: ViewType, role: ViewRole) -> Self {
        Self {
            id,
            view_type,
            role,
            index: RowIndex::INVALID,
            geometry: ViewGeometry::default(),
            visible: false,
            selected: false,
        }
    }

    pub fn id(&self) -> ViewId {
        self.id
    }

    pub fn view_type(&self) -> ViewType {
        self.view_type
    }

    pub fn role(&self) -> ViewRole {
        self.role
    }

    /// Row the view currently represents.
    pub fn index(&self) -> RowIndex {
        self.index
    }

    pub fn geometry(&self) -> ViewGeometry {
        self.geometry
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    pub(crate) fn place(&mut self, y: i64, width: i32, height: i32) {
        self.geometry = ViewGeometry { y, width, height };
    }

    pub(crate) fn show(&mut self) {
        self.visible = true;
    }

    pub(crate) fn hide(&mut self) {
        self.visible = false;
    }
}
