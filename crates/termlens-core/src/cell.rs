//! Terminal cell: the fundamental unit of the grid.
//!
//! Each cell stores a codepoint and its SGR attributes. A cell is *empty*
//! iff its codepoint is the `'\0'` sentinel; colors and attributes do not
//! participate in emptiness.

use bitflags::bitflags;

bitflags! {
    /// SGR text attribute flags.
    ///
    /// Maps directly to the ECMA-48 / VT100 SGR parameter values.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct SgrFlags: u8 {
        const BOLD          = 1 << 0;
        const DIM           = 1 << 1;
        const ITALIC        = 1 << 2;
        const UNDERLINE     = 1 << 3;
        const STRIKETHROUGH = 1 << 4;
    }
}

bitflags! {
    /// Cell-level flags that are orthogonal to SGR attributes.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct CellFlags: u8 {
        /// This cell is the leading (left) cell of a wide (2-column) character.
        const WIDE_CHAR = 1 << 0;
        /// This cell is the trailing (right) continuation of a wide character.
        /// Its content is meaningless; text extraction renders it as a space.
        const WIDE_CONTINUATION = 1 << 1;
    }
}

/// Color representation for terminal cells.
///
/// The basic palette (`Named`, 0-15) is what the 16-color SGR codes produce;
/// `Indexed` and `Rgb` come from the extended `38`/`48` SGR forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    /// Named color index (0-15): standard 8 + bright 8.
    Named(u8),
    /// 256-color palette index (0-255).
    Indexed(u8),
    /// 24-bit true color.
    Rgb(u8, u8, u8),
}

impl Color {
    /// Default foreground (SGR 39): white, palette index 7.
    pub const DEFAULT_FG: Color = Color::Named(7);
    /// Default background (SGR 49): black, palette index 0.
    pub const DEFAULT_BG: Color = Color::Named(0);
}

/// The active SGR state: flags + foreground/background colors.
///
/// Applied to every subsequently placed cell until changed; SGR 0 restores
/// the default (fg 7, bg 0, no flags).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Style {
    pub flags: SgrFlags,
    pub fg: Color,
    pub bg: Color,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            flags: SgrFlags::empty(),
            fg: Color::DEFAULT_FG,
            bg: Color::DEFAULT_BG,
        }
    }
}

impl Style {
    /// Reset all attributes to default (SGR 0).
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Apply a run of SGR parameters left to right.
    ///
    /// An empty parameter list is the bare `CSI m`, equivalent to SGR 0.
    /// Unknown parameters are skipped; the extended `38`/`48` forms consume
    /// their color arguments.
    pub fn apply_sgr(&mut self, params: &[u16]) {
        if params.is_empty() {
            self.reset();
            return;
        }
        let mut i = 0;
        while i < params.len() {
            match params[i] {
                0 => self.reset(),
                1 => self.flags.insert(SgrFlags::BOLD),
                2 => self.flags.insert(SgrFlags::DIM),
                3 => self.flags.insert(SgrFlags::ITALIC),
                4 => self.flags.insert(SgrFlags::UNDERLINE),
                9 => self.flags.insert(SgrFlags::STRIKETHROUGH),
                // 22 is "normal intensity": clears both bold and dim.
                22 => self.flags.remove(SgrFlags::BOLD | SgrFlags::DIM),
                23 => self.flags.remove(SgrFlags::ITALIC),
                24 => self.flags.remove(SgrFlags::UNDERLINE),
                29 => self.flags.remove(SgrFlags::STRIKETHROUGH),
                30..=37 => self.fg = Color::Named((params[i] - 30) as u8),
                38 => {
                    if let Some(color) = extended_color(params, &mut i) {
                        self.fg = color;
                    }
                }
                39 => self.fg = Color::DEFAULT_FG,
                40..=47 => self.bg = Color::Named((params[i] - 40) as u8),
                48 => {
                    if let Some(color) = extended_color(params, &mut i) {
                        self.bg = color;
                    }
                }
                49 => self.bg = Color::DEFAULT_BG,
                90..=97 => self.fg = Color::Named((params[i] - 90 + 8) as u8),
                100..=107 => self.bg = Color::Named((params[i] - 100 + 8) as u8),
                _ => {}
            }
            i += 1;
        }
    }
}

/// Decode the extended color forms `38;5;n` / `38;2;r;g;b` (same for 48).
///
/// `i` points at the 38/48 parameter on entry and is advanced past the
/// consumed color arguments. A truncated or unknown form yields `None` and
/// consumes the rest of the parameter list so trailing arguments are not
/// misread as independent SGR codes.
fn extended_color(params: &[u16], i: &mut usize) -> Option<Color> {
    match params.get(*i + 1).copied() {
        Some(5) => {
            let idx = params.get(*i + 2).copied();
            *i += 2;
            idx.map(|n| Color::Indexed(n.min(255) as u8))
        }
        Some(2) => {
            let r = params.get(*i + 2).copied();
            let g = params.get(*i + 3).copied();
            let b = params.get(*i + 4).copied();
            *i += 4;
            match (r, g, b) {
                (Some(r), Some(g), Some(b)) => Some(Color::Rgb(
                    r.min(255) as u8,
                    g.min(255) as u8,
                    b.min(255) as u8,
                )),
                _ => None,
            }
        }
        _ => {
            *i = params.len();
            None
        }
    }
}

/// A single cell in the terminal grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    /// The codepoint. `'\0'` marks an empty cell.
    ch: char,
    /// Cell-level flags (wide char, continuation).
    pub flags: CellFlags,
    /// SGR attributes in effect when the cell was written.
    pub style: Style,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: '\0',
            flags: CellFlags::empty(),
            style: Style::default(),
        }
    }
}

impl Cell {
    /// Create a cell with the given codepoint and style.
    #[must_use]
    pub fn new(ch: char, style: Style) -> Self {
        Self {
            ch,
            flags: CellFlags::empty(),
            style,
        }
    }

    /// Create a wide (2-column) character pair: `(leading, continuation)`.
    #[must_use]
    pub fn wide(ch: char, style: Style) -> (Self, Self) {
        let leading = Self {
            ch,
            flags: CellFlags::WIDE_CHAR,
            style,
        };
        let continuation = Self {
            ch: '\0',
            flags: CellFlags::WIDE_CONTINUATION,
            style,
        };
        (leading, continuation)
    }

    /// The codepoint stored in this cell (`'\0'` if empty).
    #[must_use]
    pub fn ch(&self) -> char {
        self.ch
    }

    /// Whether this cell is empty (codepoint sentinel `'\0'`).
    ///
    /// Colors and attributes do not affect emptiness.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ch == '\0'
    }

    /// Whether this cell is the leading half of a wide character.
    #[must_use]
    pub fn is_wide(&self) -> bool {
        self.flags.contains(CellFlags::WIDE_CHAR)
    }

    /// Whether this cell is the trailing half of a wide character.
    #[must_use]
    pub fn is_wide_continuation(&self) -> bool {
        self.flags.contains(CellFlags::WIDE_CONTINUATION)
    }

    /// The character this cell contributes to extracted text.
    ///
    /// Empty cells and wide continuations render as a space so that every
    /// extracted row has exactly `width` characters.
    #[must_use]
    pub fn display_char(&self) -> char {
        if self.is_empty() || self.is_wide_continuation() {
            ' '
        } else {
            self.ch
        }
    }

    /// Reset this cell to empty, keeping the given background color.
    ///
    /// Used by the erase operations (ED, EL), which fill with the current
    /// background but reset all other attributes.
    pub fn erase(&mut self, bg: Color) {
        *self = Self {
            ch: '\0',
            flags: CellFlags::empty(),
            style: Style {
                bg,
                ..Style::default()
            },
        };
    }
}
