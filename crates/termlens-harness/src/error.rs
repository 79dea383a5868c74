//! Error types for termlens-harness.
//!
//! Assertion helpers report failures through [`HarnessError`]; [`Result`] is
//! the crate-wide alias. Bounds violations and malformed escape input never
//! surface here — the core absorbs those silently — so the only reportable
//! conditions are comparisons that cannot be made or that failed.

use thiserror::Error;

/// Result type alias for harness operations.
pub type Result<T> = std::result::Result<T, HarnessError>;

/// Errors produced by assertion and comparison helpers.
#[derive(Debug, Error)]
pub enum HarnessError {
    /// Two terminals of different sizes cannot be diffed.
    #[error(
        "dimension mismatch: left is {}x{}, right is {}x{}",
        left.0, left.1, right.0, right.1
    )]
    DimensionMismatch {
        /// `(width, height)` of the left terminal.
        left: (u16, u16),
        /// `(width, height)` of the right terminal.
        right: (u16, u16),
    },

    /// A region's content did not equal the expected text.
    #[error("region ({x},{y}) {width}x{height} mismatch:\n{diff}")]
    RegionMismatch {
        x: u16,
        y: u16,
        width: u16,
        height: u16,
        /// Unified diff of expected vs actual, one terminal row per line.
        diff: String,
    },
}
