//! Content extent upkeep and anchor-preserving reflow on width changes.

use crate::event::ListEvent;
use crate::index::RowIndex;
use crate::list_view::{row_height, ListView};

/// Row whose on-screen position survives a reflow.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Anchor {
    /// Keep `index` at `distance` from the viewport top.
    Top { index: RowIndex, distance: i64 },
    /// Keep the content end pinned to the viewport bottom.
    Bottom { index: RowIndex },
}

impl Anchor {
    fn index(self) -> RowIndex {
        match self {
            Anchor::Top { index, .. } | Anchor::Bottom { index } => index,
        }
    }
}

impl ListView {
    /// Brings the content extent in line with the geometry. On a width change
    /// either re-measures everything or just re-places views at the new width.
    ///
    /// Never runs a load pass; callers follow up with one.
    pub(crate) fn fix_content_size(&mut self, width_changed: bool) {
        if width_changed {
            let depends = self
                .delegate
                .as_deref()
                .is_some_and(|delegate| delegate.height_depends_on_width());
            // A source edited mid-transaction must not be re-measured yet.
            if depends && self.model.is_some() && !self.transaction.is_open() {
                self.reflow();
            } else {
                self.place_loaded_views();
            }
        }
        self.sync_content_height();
    }

    /// Pushes the geometry's content height into the viewport, clamping the
    /// offset silently.
    pub(crate) fn sync_content_height(&mut self) {
        let height = self.geometry.content_height();
        if height != self.viewport.content_height() {
            self.events.push_back(ListEvent::ContentResized { height });
        }
        if self.viewport.set_content_height(height) {
            self.events.push_back(ListEvent::ScrollMoved {
                offset: self.viewport.offset(),
            });
        }
    }

    /// Moves every loaded view to its row's current position and width.
    pub(crate) fn place_loaded_views(&mut self) {
        let width = self.viewport.width();
        for row in self.loaded.iter() {
            if let Some(handle) = row.view.and_then(|id| self.pool.get_mut(id)) {
                handle.place(row.y, width, row.h);
            }
        }
    }

    fn choose_anchor(&self) -> Option<Anchor> {
        if self.viewport.is_at_max() {
            self.loaded.last().map(|row| Anchor::Bottom { index: row.index })
        } else {
            self.loaded.first().map(|row| Anchor::Top {
                index: row.index,
                distance: row.y - self.viewport.offset(),
            })
        }
    }

    /// Re-measures every row at the new width and repositions the loaded
    /// window so the anchor row stays where it was on screen.
    fn reflow(&mut self) {
        let anchor = self.choose_anchor();
        let (Some(model), Some(delegate)) = (self.model.as_ref(), self.delegate.as_deref()) else {
            return;
        };
        let width = self.viewport.width();
        let anchor_y = {
            let source = model.source();
            self.geometry.rebuild(
                &*source,
                |index| row_height(delegate, index, width),
                anchor.map(Anchor::index),
            )
        };
        log::debug!("reflow at width {width}, anchor {anchor:?} now at {anchor_y}");

        let Some(anchor) = anchor else {
            return;
        };

        let mut y = match anchor {
            Anchor::Top { .. } => anchor_y,
            // The bottom anchor is the last loaded row; stack the window up
            // from its new top.
            Anchor::Bottom { .. } => {
                let above: i64 = self
                    .loaded
                    .iter()
                    .rev()
                    .skip(1)
                    .map(|row| i64::from(self.geometry.height_of(row.index)))
                    .sum();
                anchor_y - above
            }
        };
        for row in self.loaded.iter_mut() {
            row.h = self.geometry.height_of(row.index);
            row.y = y;
            y += i64::from(row.h);
        }
        self.place_loaded_views();

        self.sync_content_height();
        match anchor {
            Anchor::Top { distance, .. } => self.set_offset_silently(anchor_y - distance),
            Anchor::Bottom { .. } => self.set_offset_silently(i64::MAX),
        }
    }
}
