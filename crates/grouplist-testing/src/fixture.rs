//! In-memory data source and a delegate that records its callbacks.

use std::cell::RefCell;
use std::rc::Rc;

use grouplist::{DataSource, ListDelegate, RowIndex, ViewHandle, ViewId, ViewType};

/// View type of every fixture item row unless a group overrides it.
pub const ROW_TYPE: ViewType = ViewType::new(1);
/// View type of fixture group headers.
pub const HEADER_TYPE: ViewType = ViewType::new(100);
/// View type of the fixture empty state.
pub const EMPTY_TYPE: ViewType = ViewType::new(200);

/// One group of fixture data.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FixtureGroup {
    /// Header height, or `None` for a group without a header view.
    pub header: Option<i32>,
    /// Item heights at the reference width.
    pub heights: Vec<i32>,
    pub view_type: ViewType,
}

impl FixtureGroup {
    pub fn new(heights: Vec<i32>) -> Self {
        Self {
            header: None,
            heights,
            view_type: ROW_TYPE,
        }
    }

    /// `count` items of `height`.
    pub fn uniform(count: usize, height: i32) -> Self {
        Self::new(vec![height; count])
    }

    pub fn with_header(mut self, height: i32) -> Self {
        self.header = Some(height);
        self
    }

    pub fn with_view_type(mut self, view_type: ViewType) -> Self {
        self.view_type = view_type;
        self
    }
}

/// Grouped rows with fixed heights.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FixtureData {
    groups: Vec<FixtureGroup>,
}

impl FixtureData {
    pub fn new(groups: Vec<FixtureGroup>) -> Self {
        Self { groups }
    }

    /// Header-less groups of `height`-high items, one group per entry of
    /// `counts`.
    pub fn uniform(counts: &[usize], height: i32) -> Self {
        Self::new(
            counts
                .iter()
                .map(|count| FixtureGroup::uniform(*count, height))
                .collect(),
        )
    }

    pub fn group(&self, group: i32) -> Option<&FixtureGroup> {
        self.groups.get(usize::try_from(group).ok()?)
    }

    /// Height of `index` at the reference width. Zero for unknown rows.
    pub fn height(&self, index: RowIndex) -> i32 {
        let Some(group) = self.group(index.group) else {
            return 0;
        };
        if index.is_header() {
            group.header.unwrap_or(0)
        } else {
            group.heights.get(index.item as usize).copied().unwrap_or(0)
        }
    }

    pub fn insert_items(&mut self, index: RowIndex, heights: &[i32]) {
        let group = &mut self.groups[index.group as usize];
        let at = index.item as usize;
        group.heights.splice(at..at, heights.iter().copied());
    }

    pub fn remove_items(&mut self, index: RowIndex, count: i32) {
        let group = &mut self.groups[index.group as usize];
        let at = index.item as usize;
        group.heights.drain(at..at + count as usize);
    }

    pub fn insert_group(&mut self, at: i32, group: FixtureGroup) {
        self.groups.insert(at as usize, group);
    }

    pub fn remove_group(&mut self, at: i32) -> FixtureGroup {
        self.groups.remove(at as usize)
    }

    pub fn set_height(&mut self, index: RowIndex, height: i32) {
        let group = &mut self.groups[index.group as usize];
        if index.is_header() {
            group.header = Some(height);
        } else {
            group.heights[index.item as usize] = height;
        }
    }

    /// Sum of every header and item height at the reference width.
    pub fn total_height(&self) -> i64 {
        self.groups
            .iter()
            .map(|group| {
                i64::from(group.header.unwrap_or(0))
                    + group.heights.iter().map(|h| i64::from(*h)).sum::<i64>()
            })
            .sum()
    }
}

impl DataSource for FixtureData {
    fn num_groups(&self) -> i32 {
        self.groups.len() as i32
    }

    fn num_items_in_group(&self, group: i32) -> i32 {
        self.group(group).map_or(0, |group| group.heights.len() as i32)
    }
}

/// Every prepare and clean callback a [`FixtureDelegate`] received.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DelegateLog {
    pub prepared: Vec<(RowIndex, ViewId)>,
    pub cleaned: Vec<(RowIndex, ViewId)>,
}

impl DelegateLog {
    pub fn prepare_count(&self) -> usize {
        self.prepared.len()
    }

    pub fn clean_count(&self) -> usize {
        self.cleaned.len()
    }

    /// Rows prepared since the log was last cleared.
    pub fn prepared_rows(&self) -> Vec<RowIndex> {
        self.prepared.iter().map(|(index, _)| *index).collect()
    }

    pub fn clear(&mut self) {
        self.prepared.clear();
        self.cleaned.clear();
    }
}

/// Delegate that reads heights from shared [`FixtureData`] and logs its
/// callbacks.
#[derive(Clone, Debug)]
pub struct FixtureDelegate {
    data: Rc<RefCell<FixtureData>>,
    log: Rc<RefCell<DelegateLog>>,
    selectable: bool,
    multi_select: bool,
    empty_state: bool,
    /// When set, heights scale by `reference / width`.
    reference_width: Option<i32>,
}

impl FixtureDelegate {
    pub fn new(data: Rc<RefCell<FixtureData>>) -> Self {
        Self {
            data,
            log: Rc::default(),
            selectable: true,
            multi_select: true,
            empty_state: true,
            reference_width: None,
        }
    }

    pub fn with_log(mut self, log: Rc<RefCell<DelegateLog>>) -> Self {
        self.log = log;
        self
    }

    pub fn selectable(mut self, selectable: bool) -> Self {
        self.selectable = selectable;
        self
    }

    pub fn single_select(mut self) -> Self {
        self.multi_select = false;
        self
    }

    pub fn without_empty_state(mut self) -> Self {
        self.empty_state = false;
        self
    }

    /// Heights are the fixture heights at `reference` width and scale
    /// inversely with the actual width.
    pub fn width_dependent(mut self, reference: i32) -> Self {
        self.reference_width = Some(reference);
        self
    }

    pub fn log(&self) -> Rc<RefCell<DelegateLog>> {
        Rc::clone(&self.log)
    }
}

impl ListDelegate for FixtureDelegate {
    fn height_for_index(&self, index: RowIndex, available_width: i32) -> i32 {
        let height = self.data.borrow().height(index);
        match self.reference_width {
            Some(reference) if available_width > 0 => {
                (i64::from(height) * i64::from(reference) / i64::from(available_width)) as i32
            }
            _ => height,
        }
    }

    fn view_type_for_index(&self, index: RowIndex) -> ViewType {
        self.data
            .borrow()
            .group(index.group)
            .map_or(ROW_TYPE, |group| group.view_type)
    }

    fn prepare_view(&mut self, index: RowIndex, view: &ViewHandle) {
        self.log.borrow_mut().prepared.push((index, view.id()));
    }

    fn clean_view(&mut self, index: RowIndex, view: &ViewHandle) {
        self.log.borrow_mut().cleaned.push((index, view.id()));
    }

    fn can_select(&self, _index: RowIndex) -> bool {
        self.selectable
    }

    fn is_multi_select(&self) -> bool {
        self.multi_select
    }

    fn header_view_for_group(&self, group: i32) -> Option<ViewType> {
        self.data
            .borrow()
            .group(group)
            .and_then(|group| group.header)
            .map(|_| HEADER_TYPE)
    }

    fn empty_state_view(&self) -> Option<ViewType> {
        self.empty_state.then_some(EMPTY_TYPE)
    }

    fn height_depends_on_width(&self) -> bool {
        self.reference_width.is_some()
    }
}
