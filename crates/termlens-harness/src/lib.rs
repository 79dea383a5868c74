#![forbid(unsafe_code)]

//! Assertion and scripting layer over [`termlens_core`].
//!
//! Where the core answers "what is on the screen", this crate answers
//! "does the screen look right": glob-like row patterns, deterministic
//! state captures, terminal-to-terminal diffs, region assertions with
//! descriptive failures, and a key encoder for synthesizing input.
//!
//! ```
//! use termlens_core::Terminal;
//! use termlens_harness::{contains_pattern, Key};
//!
//! let mut term = Terminal::new(20, 3);
//! term.write("done: 42 items\nready");
//! assert!(contains_pattern(&term, "done: [0-9]+ items"));
//!
//! term.write(&Key::ArrowUp.encode());
//! assert!(term.cursor_at(5, 0));
//! ```

pub mod capture;
pub mod error;
pub mod expect;
pub mod input;
pub mod pattern;

pub use capture::{CaptureState, DiffResult, capture_state, diff};
pub use error::{HarnessError, Result};
pub use expect::{expect_region_equals, region_text};
pub use input::Key;
pub use pattern::{Pattern, contains_pattern, find_pattern};
