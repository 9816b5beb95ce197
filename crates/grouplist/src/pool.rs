//! Type-keyed recycling of view handles.
//!
//! Every handle the list view ever creates lives in the pool's arena. Row
//! views are never destroyed: a released view is hidden and queued under its
//! [`ViewType`] so the next row of that type can reuse it regardless of what
//! it showed before. Header and empty-state views are owned by their group or
//! by the list and are destroyed explicitly.

use smallvec::SmallVec;

use crate::collections::map::{self, HashMap};
use crate::view::{ViewHandle, ViewId, ViewRole, ViewType};

/// Inline capacity of a per-type free list. Lists rarely use more than a
/// handful of row types, and each type rarely has more than a screenful of
/// released views.
type FreeList = SmallVec<[ViewId; 8]>;

/// Counters describing view lifecycle, for tests and diagnostics.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RecycleStats {
    /// Row views currently bound to a loaded or pending row.
    pub views_in_use: usize,
    /// Row views waiting in the free lists.
    pub views_in_pool: usize,
    /// Row views ever created.
    pub total_created: usize,
    /// Acquisitions served from a free list.
    pub reuse_count: usize,
    /// Rows re-attached from the pending map without rebinding.
    pub pending_reuse_count: usize,
    /// Views returned to the free lists.
    pub release_count: usize,
}

/// Whether [`ViewPool::acquire`] reused a released view.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Acquired {
    Fresh,
    Reused,
}

/// Arena of view handles plus the per-type free lists.
#[derive(Debug)]
pub struct ViewPool {
    handles: HashMap<ViewId, ViewHandle>,
    free: HashMap<ViewType, FreeList>,
    next_id: u32,
    stats: RecycleStats,
}

impl Default for ViewPool {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewPool {
    pub fn new() -> Self {
        Self {
            handles: map::with_capacity(64),
            free: map::with_capacity(4),
            next_id: 0,
            stats: RecycleStats::default(),
        }
    }

    fn create(&mut self, view_type: ViewType, role: ViewRole) -> ViewId {
        let id = ViewId(self.next_id);
        self.next_id += 1;
        self.handles
            .insert(id, ViewHandle::new(id, view_type, role));
        id
    }

    /// Pops a released row view of `view_type`, or creates a fresh one.
    ///
    /// The handle keeps whatever state it had; the caller places it and runs
    /// the delegate's prepare callback before showing it.
    pub fn acquire(&mut self, view_type: ViewType) -> (ViewId, Acquired) {
        self.stats.views_in_use += 1;
        if let Some(id) = self.free.get_mut(&view_type).and_then(|list| list.pop()) {
            self.stats.views_in_pool -= 1;
            self.stats.reuse_count += 1;
            return (id, Acquired::Reused);
        }
        self.stats.total_created += 1;
        (self.create(view_type, ViewRole::Row), Acquired::Fresh)
    }

    /// Hides a row view and queues it for reuse.
    pub fn release(&mut self, id: ViewId) {
        let Some(handle) = self.handles.get_mut(&id) else {
            log::warn!("released unknown view {:?}", id);
            return;
        };
        debug_assert_eq!(handle.role(), ViewRole::Row, "only row views are pooled");
        handle.hide();
        handle.selected = false;
        let view_type = handle.view_type();
        self.free.entry(view_type).or_default().push(id);
        self.stats.views_in_use -= 1;
        self.stats.views_in_pool += 1;
        self.stats.release_count += 1;
    }

    /// Creates a view that is never pooled (group header or empty state).
    pub fn create_owned(&mut self, view_type: ViewType, role: ViewRole) -> ViewId {
        debug_assert_ne!(role, ViewRole::Row, "row views come from acquire");
        self.create(view_type, role)
    }

    /// Destroys a header or empty-state view.
    pub fn destroy(&mut self, id: ViewId) {
        if let Some(handle) = self.handles.remove(&id) {
            debug_assert_ne!(handle.role(), ViewRole::Row, "row views are never destroyed");
        }
    }

    pub(crate) fn note_pending_reuse(&mut self) {
        self.stats.pending_reuse_count += 1;
    }

    pub fn get(&self, id: ViewId) -> Option<&ViewHandle> {
        self.handles.get(&id)
    }

    pub fn get_mut(&mut self, id: ViewId) -> Option<&mut ViewHandle> {
        self.handles.get_mut(&id)
    }

    /// Number of released views waiting for `view_type`.
    pub fn pooled(&self, view_type: ViewType) -> usize {
        self.free.get(&view_type).map_or(0, |list| list.len())
    }

    /// All handles, in no particular order.
    pub fn handles(&self) -> impl Iterator<Item = &ViewHandle> {
        self.handles.values()
    }

    pub fn stats(&self) -> &RecycleStats {
        &self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEXT: ViewType = ViewType::new(1);
    const IMAGE: ViewType = ViewType::new(2);

    #[test]
    fn released_views_are_reused_by_type() {
        let mut pool = ViewPool::new();
        let (text, how) = pool.acquire(TEXT);
        assert_eq!(how, Acquired::Fresh);
        pool.release(text);
        assert_eq!(pool.pooled(TEXT), 1);

        let (image, how) = pool.acquire(IMAGE);
        assert_eq!(how, Acquired::Fresh);
        assert_ne!(image, text);

        let (again, how) = pool.acquire(TEXT);
        assert_eq!((again, how), (text, Acquired::Reused));
        assert_eq!(pool.pooled(TEXT), 0);
    }

    #[test]
    fn release_hides_and_counts() {
        let mut pool = ViewPool::new();
        let (id, _) = pool.acquire(TEXT);
        pool.get_mut(id).unwrap().show();
        pool.release(id);
        assert!(!pool.get(id).unwrap().is_visible());
        assert_eq!(
            pool.stats(),
            &RecycleStats {
                views_in_use: 0,
                views_in_pool: 1,
                total_created: 1,
                reuse_count: 0,
                pending_reuse_count: 0,
                release_count: 1,
            }
        );
    }

    #[test]
    fn owned_views_are_destroyed_not_pooled() {
        let mut pool = ViewPool::new();
        let header = pool.create_owned(TEXT, ViewRole::Header);
        assert_eq!(pool.get(header).map(ViewHandle::role), Some(ViewRole::Header));
        pool.destroy(header);
        assert!(pool.get(header).is_none());
        assert_eq!(pool.pooled(TEXT), 0);
        assert_eq!(pool.stats().total_created, 0);
    }
}
