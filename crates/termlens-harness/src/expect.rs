//! Region equality assertions with descriptive failures.

use similar::{ChangeTag, TextDiff};
use termlens_core::Terminal;

use crate::error::{HarnessError, Result};

/// Extract a rectangle as rows joined by newlines (one `\n` between rows).
#[must_use]
pub fn region_text(term: &Terminal, x: u16, y: u16, w: u16, h: u16) -> String {
    let flat = term.get_region(x, y, w, h);
    let chars: Vec<char> = flat.chars().collect();
    chars
        .chunks(w.max(1) as usize)
        .map(|row| row.iter().collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Assert that the rectangle at `(x, y)` of size `w` x `h` equals `expected`
/// exactly, where `expected` uses one newline per row break.
///
/// # Errors
///
/// Returns [`HarnessError::RegionMismatch`] carrying a line diff of expected
/// vs actual content.
pub fn expect_region_equals(
    term: &Terminal,
    x: u16,
    y: u16,
    w: u16,
    h: u16,
    expected: &str,
) -> Result<()> {
    let actual = region_text(term, x, y, w, h);
    if actual == expected {
        return Ok(());
    }
    Err(HarnessError::RegionMismatch {
        x,
        y,
        width: w,
        height: h,
        diff: render_diff(expected, &actual),
    })
}

/// Render a unified line diff: `-` expected rows, `+` actual rows.
fn render_diff(expected: &str, actual: &str) -> String {
    let diff = TextDiff::from_lines(expected, actual);
    let mut out = String::from("--- expected\n+++ actual\n");
    for change in diff.iter_all_changes() {
        let sign = match change.tag() {
            ChangeTag::Delete => '-',
            ChangeTag::Insert => '+',
            ChangeTag::Equal => ' ',
        };
        out.push(sign);
        out.push_str(change.value());
        if !change.value().ends_with('\n') {
            out.push('\n');
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn region_text_inserts_row_breaks() {
        let mut term = Terminal::new(4, 3);
        term.write("abcd\nefgh");
        assert_eq!(region_text(&term, 0, 0, 2, 2), "ab\nef");
        assert_eq!(region_text(&term, 2, 0, 2, 3), "cd\ngh\n  ");
    }

    #[test]
    fn matching_region_passes() {
        let mut term = Terminal::new(6, 2);
        term.write("hello\nworld");
        assert!(expect_region_equals(&term, 0, 0, 5, 2, "hello\nworld").is_ok());
    }

    #[test]
    fn mismatch_reports_both_sides() {
        let mut term = Terminal::new(6, 2);
        term.write("hello");
        let err = expect_region_equals(&term, 0, 0, 5, 1, "howdy").unwrap_err();
        let HarnessError::RegionMismatch { diff, .. } = &err else {
            panic!("expected RegionMismatch, got {err:?}");
        };
        assert!(diff.contains("-howdy"));
        assert!(diff.contains("+hello"));
        let message = err.to_string();
        assert!(message.contains("(0,0) 5x1"));
    }

    #[test]
    fn out_of_bounds_cells_compare_as_spaces() {
        let term = Terminal::new(2, 1);
        assert!(expect_region_equals(&term, 0, 0, 3, 2, "   \n   ").is_ok());
    }
}
