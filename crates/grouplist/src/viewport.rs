//! Scroll position and visible extent.

use crate::window::Span;

/// Offset and size of the visible area over the scroll content.
///
/// The offset is kept within `[0, max_offset]` at all times.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Viewport {
    offset: i64,
    width: i32,
    height: i32,
    content_height: i64,
}

impl Viewport {
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            offset: 0,
            width: width.max(0),
            height: height.max(0),
            content_height: 0,
        }
    }

    #[inline]
    pub fn offset(&self) -> i64 {
        self.offset
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    #[inline]
    pub fn content_height(&self) -> i64 {
        self.content_height
    }

    #[inline]
    pub fn top(&self) -> i64 {
        self.offset
    }

    #[inline]
    pub fn bottom(&self) -> i64 {
        self.offset + i64::from(self.height)
    }

    #[inline]
    pub fn span(&self) -> Span {
        Span {
            top: self.top(),
            bottom: self.bottom(),
        }
    }

    /// Largest valid offset.
    #[inline]
    pub fn max_offset(&self) -> i64 {
        (self.content_height - i64::from(self.height)).max(0)
    }

    #[inline]
    pub fn is_at_max(&self) -> bool {
        self.offset >= self.max_offset()
    }

    /// Sets the offset, clamped. Returns true when it moved.
    pub fn set_offset(&mut self, offset: i64) -> bool {
        let clamped = offset.clamp(0, self.max_offset());
        let moved = clamped != self.offset;
        self.offset = clamped;
        moved
    }

    /// Sets the content extent and re-clamps the offset. Returns true when
    /// the offset moved.
    pub fn set_content_height(&mut self, content_height: i64) -> bool {
        self.content_height = content_height.max(0);
        self.set_offset(self.offset)
    }

    /// Resizes the visible area. Returns true when the width changed.
    pub fn resize(&mut self, width: i32, height: i32) -> bool {
        let width = width.max(0);
        let width_changed = width != self.width;
        self.width = width;
        self.height = height.max(0);
        width_changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_is_clamped_to_content() {
        let mut viewport = Viewport::new(100, 200);
        viewport.set_content_height(500);
        assert!(viewport.set_offset(1_000));
        assert_eq!(viewport.offset(), 300);
        assert!(viewport.is_at_max());
        assert!(viewport.set_offset(-20));
        assert_eq!(viewport.offset(), 0);
        assert!(!viewport.set_offset(0));
    }

    #[test]
    fn shrinking_content_pulls_offset_back() {
        let mut viewport = Viewport::new(100, 200);
        viewport.set_content_height(1_000);
        viewport.set_offset(700);
        assert!(viewport.set_content_height(600));
        assert_eq!(viewport.offset(), 400);
        assert_eq!(viewport.span(), Span { top: 400, bottom: 600 });
    }

    #[test]
    fn short_content_has_no_scroll_range() {
        let mut viewport = Viewport::new(100, 200);
        viewport.set_content_height(150);
        assert_eq!(viewport.max_offset(), 0);
        assert!(viewport.is_at_max());
    }

    #[test]
    fn resize_reports_width_changes_only() {
        let mut viewport = Viewport::new(100, 200);
        assert!(!viewport.resize(100, 400));
        assert!(viewport.resize(120, 400));
        assert_eq!(viewport.height(), 400);
    }
}
