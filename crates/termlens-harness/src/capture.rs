//! Snapshots and diffs of terminal state.

use termlens_core::Terminal;

use crate::error::{HarnessError, Result};

/// A deterministic snapshot of a terminal: content, cursor, dimensions.
///
/// Two captures of unchanged state compare equal, so snapshots can be
/// persisted and compared as plain values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureState {
    /// Viewport text, row-major, `width * height` characters with no
    /// separators.
    pub content: String,
    /// Cursor position as `(x, y)`.
    pub cursor: (u16, u16),
    pub width: u16,
    pub height: u16,
}

/// Snapshot the terminal's current state.
#[must_use]
pub fn capture_state(term: &Terminal) -> CaptureState {
    CaptureState {
        content: term.get_all_text(),
        cursor: term.cursor(),
        width: term.width(),
        height: term.height(),
    }
}

/// The rows on which two terminals differ.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffResult {
    /// Ascending viewport row indices whose trimmed content differs.
    pub changed_lines: Vec<u16>,
}

impl DiffResult {
    #[must_use]
    pub fn has_differences(&self) -> bool {
        !self.changed_lines.is_empty()
    }
}

/// Compare two terminals row by row (trimmed-line equality).
///
/// # Errors
///
/// Returns [`HarnessError::DimensionMismatch`] when the terminals are not
/// the same size; rows of differently sized screens do not correspond.
pub fn diff(left: &Terminal, right: &Terminal) -> Result<DiffResult> {
    if left.width() != right.width() || left.height() != right.height() {
        return Err(HarnessError::DimensionMismatch {
            left: (left.width(), left.height()),
            right: (right.width(), right.height()),
        });
    }
    let changed_lines = (0..left.height())
        .filter(|&y| left.get_line(y) != right.get_line(y))
        .collect();
    Ok(DiffResult { changed_lines })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_terminals_have_no_differences() {
        let mut a = Terminal::new(10, 3);
        let mut b = Terminal::new(10, 3);
        a.write("same\ntext");
        b.write("same\ntext");
        let result = diff(&a, &b).unwrap();
        assert!(!result.has_differences());
        assert!(result.changed_lines.is_empty());
    }

    #[test]
    fn diff_against_self_is_empty() {
        let mut term = Terminal::new(10, 3);
        term.write("\x1b[31mstuff");
        assert!(!diff(&term, &term).unwrap().has_differences());
    }

    #[test]
    fn single_differing_row_is_reported_exactly() {
        let mut a = Terminal::new(10, 3);
        let mut b = Terminal::new(10, 3);
        a.write("one\ntwo\nthree");
        b.write("one\nTWO\nthree");
        let result = diff(&a, &b).unwrap();
        assert_eq!(result.changed_lines, vec![1]);
    }

    #[test]
    fn changed_lines_are_ascending() {
        let mut a = Terminal::new(10, 4);
        let mut b = Terminal::new(10, 4);
        a.write("a\nb\nc\nd");
        b.write("x\nb\nc\ny");
        assert_eq!(diff(&a, &b).unwrap().changed_lines, vec![0, 3]);
    }

    #[test]
    fn diff_only_compares_trimmed_rows() {
        let mut a = Terminal::new(10, 2);
        let mut b = Terminal::new(10, 2);
        a.write("hi");
        b.write("hi\x1b[K");
        assert!(!diff(&a, &b).unwrap().has_differences());
    }

    #[test]
    fn dimension_mismatch_is_an_error() {
        let a = Terminal::new(10, 3);
        let b = Terminal::new(8, 3);
        let err = diff(&a, &b).unwrap_err();
        assert!(matches!(err, HarnessError::DimensionMismatch { .. }));
        assert_eq!(
            err.to_string(),
            "dimension mismatch: left is 10x3, right is 8x3"
        );
    }

    #[test]
    fn captures_of_unchanged_state_are_equal() {
        let mut term = Terminal::new(6, 2);
        term.write("ab\x1b[1;31mc");
        let first = capture_state(&term);
        let second = capture_state(&term);
        assert_eq!(first, second);
        assert_eq!(first.content, "abc         ");
        assert_eq!(first.cursor, (3, 0));
        assert_eq!((first.width, first.height), (6, 2));
    }

    #[test]
    fn capture_reflects_subsequent_writes() {
        let mut term = Terminal::new(6, 2);
        term.write("a");
        let before = capture_state(&term);
        term.write("b");
        assert_ne!(before, capture_state(&term));
    }
}
