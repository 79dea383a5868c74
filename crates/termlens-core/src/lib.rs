#![forbid(unsafe_code)]

//! In-memory VT/ANSI terminal engine.
//!
//! `termlens-core` emulates a terminal screen entirely in memory: a styled
//! cell grid with scrollback, a streaming escape-sequence parser, and a
//! query API for inspecting what a program "drew". It is the substrate for
//! asserting on CLI/TUI output without a real terminal: push bytes in with
//! [`Terminal::write`], then ask questions with [`Terminal::get_all_text`],
//! [`Terminal::contains_text`], [`Terminal::cursor_at`], and friends.
//!
//! The engine is single-threaded and synchronous; it owns its buffers, does
//! no I/O, and knows nothing about processes or file descriptors. Feeding
//! it bytes in arbitrary chunks is equivalent to feeding them whole.
//!
//! ```
//! use termlens_core::Terminal;
//!
//! let mut term = Terminal::new(10, 3);
//! term.write("\x1b[1;31mhello\x1b[0m");
//! assert_eq!(term.get_line(0), "hello");
//! assert!(term.cursor_at(5, 0));
//! ```

pub mod cell;
pub mod cursor;
pub mod grid;
pub mod logging;
pub mod parser;
pub mod terminal;

pub use cell::{Cell, CellFlags, Color, SgrFlags, Style};
pub use cursor::Cursor;
pub use grid::Grid;
pub use parser::{Action, Parser};
pub use terminal::{DEFAULT_SCROLLBACK_LINES, ScrollbackPosition, Terminal};

#[cfg(feature = "tracing")]
pub use logging::{debug, trace, warn};
