//! Circular scrollback grid.
//!
//! The grid is a flat ring of `capacity` lines. Lines are addressed by a
//! monotonically increasing *logical* index: line 0 is the first line the
//! terminal ever had, and indices never shift as history scrolls. Once more
//! than `capacity` lines exist, the oldest logical lines are evicted and the
//! ring's start slot advances; evicted indices simply stop resolving.
//!
//! Slot resolution: `slot = (buffer_start + (logical - first_retained)) % capacity`.

use crate::cell::Cell;

/// Ring-buffered cell storage with logical line addressing.
#[derive(Debug, Clone)]
pub struct Grid {
    width: u16,
    height: u16,
    /// Ring capacity in lines. Always `>= max(height, 1)`.
    capacity: usize,
    /// Flat storage, `capacity * width` cells.
    cells: Vec<Cell>,
    /// Slot holding the oldest retained logical line.
    buffer_start: usize,
    /// Total lines ever created, including evicted ones. Starts at `height`
    /// since the initial viewport rows count as lines.
    total_lines: u64,
}

impl Grid {
    /// Create a grid of `width` x `height` with at least `scrollback_lines`
    /// of history. Capacity is raised to the viewport height so the visible
    /// rows always fit, and to 1 so the ring is never empty.
    #[must_use]
    pub fn new(width: u16, height: u16, scrollback_lines: usize) -> Self {
        let capacity = scrollback_lines.max(height as usize).max(1);
        Self {
            width,
            height,
            capacity,
            cells: vec![Cell::default(); capacity * width as usize],
            buffer_start: 0,
            total_lines: u64::from(height),
        }
    }

    #[must_use]
    pub fn width(&self) -> u16 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> u16 {
        self.height
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Total lines ever created (evicted lines included).
    #[must_use]
    pub fn total_lines(&self) -> u64 {
        self.total_lines
    }

    /// Logical index of the oldest line still in the ring.
    #[must_use]
    pub fn first_retained(&self) -> u64 {
        self.total_lines.saturating_sub(self.capacity as u64)
    }

    /// Number of lines currently in the ring.
    #[must_use]
    pub fn retained_len(&self) -> usize {
        self.total_lines.min(self.capacity as u64) as usize
    }

    /// How far the viewport can scroll back: retained lines beyond the
    /// viewport itself.
    #[must_use]
    pub fn max_scroll(&self) -> usize {
        self.retained_len().saturating_sub(self.height as usize)
    }

    /// Resolve a logical line to its ring slot, or `None` if the line has
    /// been evicted (or never existed).
    #[must_use]
    pub fn slot_of(&self, logical: u64) -> Option<usize> {
        if logical < self.first_retained() || logical >= self.total_lines {
            return None;
        }
        let relative = (logical - self.first_retained()) as usize;
        Some((self.buffer_start + relative) % self.capacity)
    }

    /// The cells of a retained logical line.
    #[must_use]
    pub fn line(&self, logical: u64) -> Option<&[Cell]> {
        let slot = self.slot_of(logical)?;
        let start = slot * self.width as usize;
        Some(&self.cells[start..start + self.width as usize])
    }

    /// Mutable access to a retained logical line.
    pub fn line_mut(&mut self, logical: u64) -> Option<&mut [Cell]> {
        let slot = self.slot_of(logical)?;
        let start = slot * self.width as usize;
        Some(&mut self.cells[start..start + self.width as usize])
    }

    /// Map a viewport row to its logical line, given the viewport offset
    /// (`0` = live bottom, negative = scrolled back `-offset` lines).
    ///
    /// Row `height - 1` at offset 0 is the newest line, `total_lines - 1`.
    /// Returns `None` if the row falls outside the retained window or the
    /// viewport has no rows.
    #[must_use]
    pub fn viewport_logical(&self, offset: i64, y: u16) -> Option<u64> {
        if y >= self.height {
            return None;
        }
        let newest = self.total_lines as i64 - 1 + offset;
        let logical = newest - i64::from(self.height - 1 - y);
        if logical < 0 {
            return None;
        }
        let logical = logical as u64;
        if logical < self.first_retained() || logical >= self.total_lines {
            return None;
        }
        Some(logical)
    }

    /// Append a fresh blank line at the bottom, evicting the oldest line
    /// once the ring is full.
    pub fn advance(&mut self) {
        self.total_lines += 1;
        if self.total_lines > self.capacity as u64 {
            self.buffer_start = (self.buffer_start + 1) % self.capacity;
        }
        // The newest line reuses a slot; wipe whatever was there.
        if let Some(line) = self.line_mut(self.total_lines - 1) {
            line.fill(Cell::default());
        }
    }

    /// Resize the grid, preserving as much retained content as fits.
    ///
    /// The viewport stays anchored at its top row, so cells within the
    /// overlap of old and new dimensions keep their viewport coordinates.
    /// A taller viewport gains blank rows at the bottom; a shorter one
    /// drops its bottom rows. Columns keep their leftmost `min(old, new)`
    /// cells. Logical indices of surviving lines are unchanged, so
    /// scrollback history stays addressable.
    pub fn resize(&mut self, new_width: u16, new_height: u16) {
        if new_width == self.width && new_height == self.height {
            return;
        }
        let new_total = self.total_lines - u64::from(self.height) + u64::from(new_height);
        let new_capacity = self.capacity.max(new_height as usize).max(1);
        let mut new_cells = vec![Cell::default(); new_capacity * new_width as usize];

        let new_first = new_total.saturating_sub(new_capacity as u64);
        let copy_width = self.width.min(new_width) as usize;
        for logical in new_first.max(self.first_retained())..self.total_lines.min(new_total) {
            let Some(old_line) = self.line(logical) else {
                continue;
            };
            let slot = (logical - new_first) as usize % new_capacity;
            let start = slot * new_width as usize;
            new_cells[start..start + copy_width].copy_from_slice(&old_line[..copy_width]);
        }

        self.width = new_width;
        self.height = new_height;
        self.capacity = new_capacity;
        self.cells = new_cells;
        self.buffer_start = 0;
        self.total_lines = new_total;
    }
}
