//! Cursor position and visibility state.

/// The terminal cursor.
///
/// `x` may transiently equal `width` while a wrap is pending; callers that
/// need the on-screen column should clamp (see [`crate::Terminal::cursor`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    /// Column, 0-based.
    pub x: u16,
    /// Viewport row, 0-based.
    pub y: u16,
    /// Whether the cursor is visible (DECTCEM, mode ?25).
    pub visible: bool,
    /// Set after printing into the last column; the next printable character
    /// wraps to the start of the following line before being placed.
    pub pending_wrap: bool,
}

impl Default for Cursor {
    fn default() -> Self {
        Self {
            x: 0,
            y: 0,
            visible: true,
            pending_wrap: false,
        }
    }
}

impl Cursor {
    /// Clamp the position into the given dimensions.
    ///
    /// Used after a resize. A zero-sized axis clamps to 0. Any pending wrap
    /// is discarded since the column it referred to no longer exists.
    pub fn clamp(&mut self, width: u16, height: u16) {
        self.x = self.x.min(width.saturating_sub(1));
        self.y = self.y.min(height.saturating_sub(1));
        self.pending_wrap = false;
    }
}
