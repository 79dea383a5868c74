//! The terminal engine: applies parsed actions to the grid and answers
//! queries about the visible screen.
//!
//! All query coordinates are viewport-relative: `(0, 0)` is the top-left of
//! whatever the viewport currently shows, which is the live bottom of the
//! scrollback unless the viewport has been scrolled back. Every extracted
//! row has exactly `width` characters; empty cells and the trailing halves
//! of wide characters read as spaces.

use unicode_width::UnicodeWidthChar;

use crate::cell::{Cell, Color, SgrFlags, Style};
use crate::cursor::Cursor;
use crate::grid::Grid;
use crate::parser::{Action, Parser};

/// Scrollback retained by [`Terminal::new`].
pub const DEFAULT_SCROLLBACK_LINES: usize = 1000;

/// Where the viewport sits within the scrollback history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollbackPosition {
    /// Logical line just past the bottom of the viewport.
    pub current_line: u64,
    /// Total lines ever written (evicted lines included).
    pub total_lines: u64,
    /// Whether the viewport is at the live bottom.
    pub at_bottom: bool,
}

/// An in-memory terminal: grid, cursor, attributes, and scrollback.
#[derive(Debug, Clone)]
pub struct Terminal {
    grid: Grid,
    cursor: Cursor,
    style: Style,
    parser: Parser,
    /// 0 at the live bottom; negative when scrolled back, bounded below by
    /// `-max_scroll`.
    viewport_offset: i64,
    alt_screen: bool,
}

impl Terminal {
    /// Create a terminal with the default scrollback depth.
    ///
    /// Zero-sized dimensions are permitted; such a terminal accepts writes
    /// and discards them.
    #[must_use]
    pub fn new(width: u16, height: u16) -> Self {
        Self::with_scrollback(width, height, DEFAULT_SCROLLBACK_LINES)
    }

    /// Create a terminal retaining at least `scrollback_lines` of history.
    #[must_use]
    pub fn with_scrollback(width: u16, height: u16, scrollback_lines: usize) -> Self {
        Self {
            grid: Grid::new(width, height, scrollback_lines),
            cursor: Cursor::default(),
            style: Style::default(),
            parser: Parser::new(),
            viewport_offset: 0,
            alt_screen: false,
        }
    }

    #[must_use]
    pub fn width(&self) -> u16 {
        self.grid.width()
    }

    #[must_use]
    pub fn height(&self) -> u16 {
        self.grid.height()
    }

    // ── writing ──────────────────────────────────────────────────────────

    /// Feed program output. Escape sequences split across calls resume
    /// where they left off.
    ///
    /// Any non-empty write snaps the viewport back to the live bottom.
    pub fn write(&mut self, input: &str) {
        self.write_bytes(input.as_bytes());
    }

    /// Byte-level variant of [`Terminal::write`].
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        if bytes.is_empty() {
            return;
        }
        crate::trace!(len = bytes.len(), "write");
        self.viewport_offset = 0;
        let actions = self.parser.feed(bytes);
        for action in actions {
            self.apply(action);
        }
    }

    fn apply(&mut self, action: Action) {
        let width = self.grid.width();
        let height = self.grid.height();
        match action {
            Action::Print(ch) => self.put_char(ch),
            Action::Newline => {
                self.cursor.x = 0;
                self.cursor.pending_wrap = false;
                self.line_feed();
            }
            Action::CarriageReturn => {
                self.cursor.x = 0;
                self.cursor.pending_wrap = false;
            }
            Action::Tab => {
                self.cursor.pending_wrap = false;
                if width > 0 {
                    let next_stop = (self.cursor.x / 8 + 1).saturating_mul(8);
                    self.cursor.x = next_stop.min(width - 1);
                }
            }
            Action::Backspace => {
                self.cursor.pending_wrap = false;
                self.cursor.x = self.cursor.x.saturating_sub(1);
            }
            Action::CursorUp(n) => {
                self.cursor.pending_wrap = false;
                self.cursor.y = self.cursor.y.saturating_sub(n);
            }
            Action::CursorDown(n) => {
                self.cursor.pending_wrap = false;
                self.cursor.y = self
                    .cursor
                    .y
                    .saturating_add(n)
                    .min(height.saturating_sub(1));
            }
            Action::CursorRight(n) => {
                self.cursor.pending_wrap = false;
                self.cursor.x = self
                    .cursor
                    .x
                    .saturating_add(n)
                    .min(width.saturating_sub(1));
            }
            Action::CursorLeft(n) => {
                self.cursor.pending_wrap = false;
                self.cursor.x = self.cursor.x.saturating_sub(n);
            }
            Action::CursorPosition { row, col } => {
                self.cursor.pending_wrap = false;
                self.cursor.x = col.min(width.saturating_sub(1));
                self.cursor.y = row.min(height.saturating_sub(1));
            }
            Action::EraseInDisplay(mode) => self.erase_in_display(mode),
            Action::EraseInLine(mode) => self.erase_in_line(mode),
            Action::Sgr(params) => self.style.apply_sgr(&params),
            Action::DecSet(modes) => {
                for mode in modes {
                    match mode {
                        25 => self.cursor.visible = true,
                        1049 => self.alt_screen = true,
                        _ => {}
                    }
                }
            }
            Action::DecRst(modes) => {
                for mode in modes {
                    match mode {
                        25 => self.cursor.visible = false,
                        1049 => self.alt_screen = false,
                        _ => {}
                    }
                }
            }
        }
    }

    /// Place one printable character at the cursor, handling wrap and wide
    /// characters.
    pub fn put_char(&mut self, ch: char) {
        let width = self.grid.width();
        let height = self.grid.height();
        if width == 0 || height == 0 {
            return;
        }
        let char_width = match ch.width() {
            Some(w) if w > 0 => (w as u16).min(2),
            // Zero-width and unprintable codepoints occupy no cell.
            _ => return,
        };
        if char_width > width {
            return;
        }
        if self.cursor.pending_wrap || self.cursor.x.saturating_add(char_width) > width {
            self.cursor.x = 0;
            self.cursor.pending_wrap = false;
            self.line_feed();
        }

        let x = self.cursor.x as usize;
        let Some(logical) = self.grid.viewport_logical(0, self.cursor.y) else {
            return;
        };
        let Some(line) = self.grid.line_mut(logical) else {
            return;
        };
        // Overwriting half of a wide pair orphans the other half.
        if line[x].is_wide_continuation() && x > 0 {
            line[x - 1] = Cell::default();
        }
        let end = x + char_width as usize - 1;
        if line[end].is_wide() && end + 1 < width as usize {
            line[end + 1] = Cell::default();
        }

        if char_width == 2 {
            let (lead, cont) = Cell::wide(ch, self.style);
            line[x] = lead;
            line[x + 1] = cont;
        } else {
            line[x] = Cell::new(ch, self.style);
        }

        let next = self.cursor.x.saturating_add(char_width);
        if next >= width {
            self.cursor.x = width - 1;
            self.cursor.pending_wrap = true;
        } else {
            self.cursor.x = next;
        }
    }

    /// Move down one row, scrolling the grid when already at the bottom.
    fn line_feed(&mut self) {
        if self.cursor.y + 1 < self.grid.height() {
            self.cursor.y += 1;
        } else {
            self.grid.advance();
        }
    }

    fn live_line_mut(&mut self, y: u16) -> Option<&mut [Cell]> {
        let logical = self.grid.viewport_logical(0, y)?;
        self.grid.line_mut(logical)
    }

    fn erase_in_display(&mut self, mode: u8) {
        if self.grid.width() == 0 || self.grid.height() == 0 {
            return;
        }
        let bg = self.style.bg;
        let height = self.grid.height();
        let (cursor_x, cursor_y) = self.cursor_clamped();
        match mode {
            0 => {
                self.erase_in_line(0);
                for y in cursor_y + 1..height {
                    if let Some(line) = self.live_line_mut(y) {
                        for cell in line {
                            cell.erase(bg);
                        }
                    }
                }
            }
            1 => {
                for y in 0..cursor_y {
                    if let Some(line) = self.live_line_mut(y) {
                        for cell in line {
                            cell.erase(bg);
                        }
                    }
                }
                if let Some(line) = self.live_line_mut(cursor_y) {
                    for cell in &mut line[..=cursor_x as usize] {
                        cell.erase(bg);
                    }
                }
            }
            2 => {
                for y in 0..height {
                    if let Some(line) = self.live_line_mut(y) {
                        for cell in line {
                            cell.erase(bg);
                        }
                    }
                }
            }
            _ => {}
        }
    }

    fn erase_in_line(&mut self, mode: u8) {
        if self.grid.width() == 0 || self.grid.height() == 0 {
            return;
        }
        let bg = self.style.bg;
        let (cursor_x, cursor_y) = self.cursor_clamped();
        let Some(line) = self.live_line_mut(cursor_y) else {
            return;
        };
        let range = match mode {
            0 => cursor_x as usize..line.len(),
            1 => 0..cursor_x as usize + 1,
            2 => 0..line.len(),
            _ => return,
        };
        for cell in &mut line[range] {
            cell.erase(bg);
        }
    }

    // ── cursor and cells ─────────────────────────────────────────────────

    /// Cursor position, column clamped into the viewport even while a wrap
    /// is pending.
    #[must_use]
    pub fn cursor(&self) -> (u16, u16) {
        self.cursor_clamped()
    }

    fn cursor_clamped(&self) -> (u16, u16) {
        (
            self.cursor.x.min(self.grid.width().saturating_sub(1)),
            self.cursor.y,
        )
    }

    /// Whether the cursor is at exactly the given position.
    #[must_use]
    pub fn cursor_at(&self, x: u16, y: u16) -> bool {
        self.cursor() == (x, y)
    }

    /// Cursor visibility (DECTCEM, mode ?25).
    #[must_use]
    pub fn cursor_visible(&self) -> bool {
        self.cursor.visible
    }

    /// Whether the alternate screen mode (?1049) is active. Tracked as a
    /// flag only; the grid is shared.
    #[must_use]
    pub fn is_alt_screen(&self) -> bool {
        self.alt_screen
    }

    /// Move the cursor directly, clamping into the viewport.
    pub fn move_cursor(&mut self, x: u16, y: u16) {
        self.cursor.x = x.min(self.grid.width().saturating_sub(1));
        self.cursor.y = y.min(self.grid.height().saturating_sub(1));
        self.cursor.pending_wrap = false;
    }

    /// The cell at viewport position `(x, y)`. Out-of-bounds coordinates
    /// yield an empty default cell.
    #[must_use]
    pub fn get_cell(&self, x: u16, y: u16) -> Cell {
        if x >= self.grid.width() {
            return Cell::default();
        }
        self.grid
            .viewport_logical(self.viewport_offset, y)
            .and_then(|logical| self.grid.line(logical))
            .map_or_else(Cell::default, |line| line[x as usize])
    }

    /// Overwrite the cell at viewport position `(x, y)`. Out-of-bounds
    /// coordinates are ignored.
    pub fn set_cell(&mut self, x: u16, y: u16, cell: Cell) {
        if x >= self.grid.width() {
            return;
        }
        if let Some(logical) = self.grid.viewport_logical(self.viewport_offset, y)
            && let Some(line) = self.grid.line_mut(logical)
        {
            line[x as usize] = cell;
        }
    }

    /// Clear the whole visible screen to default cells and home the cursor.
    ///
    /// Unlike the erase sequences, this resets cell backgrounds too and
    /// does move the cursor.
    pub fn clear(&mut self) {
        for y in 0..self.grid.height() {
            if let Some(line) = self.live_line_mut(y) {
                line.fill(Cell::default());
            }
        }
        self.cursor.x = 0;
        self.cursor.y = 0;
        self.cursor.pending_wrap = false;
    }

    // ── text extraction ──────────────────────────────────────────────────

    /// All viewport text as a single string of exactly `width * height`
    /// characters, rows concatenated without separators.
    #[must_use]
    pub fn get_all_text(&self) -> String {
        let mut out = String::with_capacity(self.grid.width() as usize * self.grid.height() as usize);
        for y in 0..self.grid.height() {
            self.push_row(&mut out, y);
        }
        out
    }

    /// One viewport row with trailing whitespace removed.
    #[must_use]
    pub fn get_line(&self, y: u16) -> String {
        let mut row = String::with_capacity(self.grid.width() as usize);
        self.push_row(&mut row, y);
        row.truncate(row.trim_end().len());
        row
    }

    fn push_row(&self, out: &mut String, y: u16) {
        match self
            .grid
            .viewport_logical(self.viewport_offset, y)
            .and_then(|logical| self.grid.line(logical))
        {
            Some(line) => out.extend(line.iter().map(Cell::display_char)),
            None => out.extend(std::iter::repeat_n(' ', self.grid.width() as usize)),
        }
    }

    /// A rectangular region, row-major with no separators: exactly `w * h`
    /// characters. Cells outside the viewport read as spaces.
    #[must_use]
    pub fn get_region(&self, x: u16, y: u16, w: u16, h: u16) -> String {
        let mut out = String::with_capacity(w as usize * h as usize);
        for row in 0..h {
            for col in 0..w {
                let (cx, cy) = (x.checked_add(col), y.checked_add(row));
                let ch = match (cx, cy) {
                    (Some(cx), Some(cy)) => self.get_cell(cx, cy).display_char(),
                    _ => ' ',
                };
                out.push(ch);
            }
        }
        out
    }

    /// Substring search over the concatenated viewport text. Because rows
    /// carry no separators, a needle may match across a row boundary.
    #[must_use]
    pub fn contains_text(&self, needle: &str) -> bool {
        self.get_all_text().contains(needle)
    }

    /// Case-insensitive [`Terminal::contains_text`].
    #[must_use]
    pub fn contains_text_ignore_case(&self, needle: &str) -> bool {
        self.get_all_text()
            .to_lowercase()
            .contains(&needle.to_lowercase())
    }

    /// Substring search scoped to a rectangle, over its concatenated text.
    #[must_use]
    pub fn contains_text_in_region(&self, needle: &str, x: u16, y: u16, w: u16, h: u16) -> bool {
        self.get_region(x, y, w, h).contains(needle)
    }

    // ── attribute queries ────────────────────────────────────────────────

    /// Whether the cell at `(x, y)` carries all of the given SGR flags.
    #[must_use]
    pub fn has_attribute(&self, x: u16, y: u16, flags: SgrFlags) -> bool {
        self.get_cell(x, y).style.flags.contains(flags)
    }

    /// Foreground color of the cell at `(x, y)`.
    #[must_use]
    pub fn text_color_at(&self, x: u16, y: u16) -> Color {
        self.get_cell(x, y).style.fg
    }

    /// Background color of the cell at `(x, y)`.
    #[must_use]
    pub fn background_color_at(&self, x: u16, y: u16) -> Color {
        self.get_cell(x, y).style.bg
    }

    // ── viewport navigation ──────────────────────────────────────────────

    /// Scroll the viewport `n` lines toward older history.
    pub fn scroll_viewport_up(&mut self, n: usize) {
        let n = i64::try_from(n).unwrap_or(i64::MAX);
        self.viewport_offset = self
            .viewport_offset
            .saturating_sub(n)
            .clamp(-(self.grid.max_scroll() as i64), 0);
    }

    /// Scroll the viewport `n` lines toward the live bottom.
    pub fn scroll_viewport_down(&mut self, n: usize) {
        let n = i64::try_from(n).unwrap_or(i64::MAX);
        self.viewport_offset = self
            .viewport_offset
            .saturating_add(n)
            .clamp(-(self.grid.max_scroll() as i64), 0);
    }

    /// Scroll one viewport height toward older history.
    pub fn page_up(&mut self) {
        self.scroll_viewport_up(self.grid.height() as usize);
    }

    /// Scroll one viewport height toward the live bottom.
    pub fn page_down(&mut self) {
        self.scroll_viewport_down(self.grid.height() as usize);
    }

    /// Jump to the oldest retained line.
    pub fn scroll_to_top(&mut self) {
        self.viewport_offset = -(self.grid.max_scroll() as i64);
    }

    /// Jump back to the live bottom.
    pub fn scroll_to_bottom(&mut self) {
        self.viewport_offset = 0;
    }

    /// How far back the viewport can scroll from the live bottom.
    #[must_use]
    pub fn max_scroll(&self) -> usize {
        self.grid.max_scroll()
    }

    /// Current viewport position within the scrollback.
    #[must_use]
    pub fn scrollback_position(&self) -> ScrollbackPosition {
        let total = self.grid.total_lines();
        let current = (total as i64 + self.viewport_offset).max(0) as u64;
        ScrollbackPosition {
            current_line: current,
            total_lines: total,
            at_bottom: self.viewport_offset == 0,
        }
    }

    // ── resize ───────────────────────────────────────────────────────────

    /// Resize the terminal, preserving overlapping content and clamping the
    /// cursor and viewport into the new bounds.
    pub fn resize(&mut self, width: u16, height: u16) {
        crate::debug!(width, height, "resize");
        self.grid.resize(width, height);
        self.cursor.clamp(width, height);
        self.viewport_offset = self
            .viewport_offset
            .max(-(self.grid.max_scroll() as i64))
            .min(0);
    }
}
