//! Property-based invariant tests for termlens-core.
//!
//! These verify structural invariants that must hold for **any** input:
//!
//! 1. Parser never panics and is deterministic on arbitrary byte streams.
//! 2. Feeding bytes in chunks is equivalent to feeding them whole.
//! 3. The cursor stays within grid bounds after any write.
//! 4. Extracted text is always exactly `width * height` characters.
//! 5. The viewport offset never leaves its clamp under any navigation.

use proptest::prelude::*;
use termlens_core::{Action, Parser, Terminal};

/// Dimensions strategy: small enough for fast tests, large enough for edge cases.
fn dims() -> impl Strategy<Value = (u16, u16)> {
    (1u16..=80, 1u16..=40)
}

/// A viewport navigation call, chosen arbitrarily.
#[derive(Debug, Clone, Copy)]
enum NavOp {
    Up(usize),
    Down(usize),
    PageUp,
    PageDown,
    Top,
    Bottom,
}

fn nav_ops() -> impl Strategy<Value = Vec<NavOp>> {
    proptest::collection::vec(
        prop_oneof![
            (0usize..200).prop_map(NavOp::Up),
            (0usize..200).prop_map(NavOp::Down),
            Just(NavOp::PageUp),
            Just(NavOp::PageDown),
            Just(NavOp::Top),
            Just(NavOp::Bottom),
        ],
        0..64,
    )
}

proptest! {
    /// The parser must handle any byte sequence without panicking.
    #[test]
    fn parser_never_panics(bytes in proptest::collection::vec(any::<u8>(), 0..4096)) {
        let mut parser = Parser::new();
        let _actions = parser.feed(&bytes);
    }

    /// Parser output is deterministic: same bytes always produce same actions.
    #[test]
    fn parser_deterministic(bytes in proptest::collection::vec(any::<u8>(), 0..2048)) {
        let mut p1 = Parser::new();
        let mut p2 = Parser::new();
        prop_assert_eq!(p1.feed(&bytes), p2.feed(&bytes));
    }

    /// Feeding bytes one at a time produces the same result as feeding all
    /// at once: the state machine must survive arbitrary chunk boundaries.
    #[test]
    fn parser_incremental_equivalence(bytes in proptest::collection::vec(any::<u8>(), 0..1024)) {
        let mut bulk_parser = Parser::new();
        let bulk_actions = bulk_parser.feed(&bytes);

        let mut incr_parser = Parser::new();
        let mut incr_actions = Vec::new();
        for &b in &bytes {
            incr_actions.extend(incr_parser.feed(&[b]));
        }

        prop_assert_eq!(bulk_actions, incr_actions);
    }

    /// Parser emits only well-formed actions: printable codepoints and
    /// in-range erase modes.
    #[test]
    fn parser_output_well_formed(bytes in proptest::collection::vec(any::<u8>(), 0..2048)) {
        let mut parser = Parser::new();
        for action in parser.feed(&bytes) {
            match action {
                Action::Print(ch) => {
                    let code = ch as u32;
                    prop_assert!(
                        (0x20..=0x7E).contains(&code) || code >= 0x80,
                        "Print with non-printable char U+{code:04X}"
                    );
                }
                Action::EraseInDisplay(mode) | Action::EraseInLine(mode) => {
                    prop_assert!(mode <= 2, "erase mode out of range: {mode}");
                }
                _ => {}
            }
        }
    }

    /// After writing any byte stream, the cursor is within grid bounds.
    #[test]
    fn cursor_always_in_bounds(
        (width, height) in dims(),
        bytes in proptest::collection::vec(any::<u8>(), 0..2048),
    ) {
        let mut term = Terminal::new(width, height);
        term.write_bytes(&bytes);
        let (x, y) = term.cursor();
        prop_assert!(x < width, "cursor x {x} >= width {width}");
        prop_assert!(y < height, "cursor y {y} >= height {height}");
    }

    /// `get_all_text` is always exactly `width * height` characters, no
    /// matter what was written or where the viewport sits.
    #[test]
    fn all_text_has_exact_area(
        (width, height) in dims(),
        bytes in proptest::collection::vec(any::<u8>(), 0..1024),
        back in 0usize..100,
    ) {
        let mut term = Terminal::with_scrollback(width, height, 50);
        term.write_bytes(&bytes);
        term.scroll_viewport_up(back);
        let text = term.get_all_text();
        prop_assert_eq!(
            text.chars().count(),
            width as usize * height as usize
        );
    }

    /// The viewport offset never leaves `[-max_scroll, 0]` under any
    /// sequence of navigation calls, and writes always snap it back to 0.
    #[test]
    fn viewport_offset_always_clamped(
        (width, height) in dims(),
        lines in 0usize..120,
        ops in nav_ops(),
    ) {
        let mut term = Terminal::with_scrollback(width, height, 64);
        for _ in 0..lines {
            term.write("x\n");
        }
        for op in ops {
            match op {
                NavOp::Up(n) => term.scroll_viewport_up(n),
                NavOp::Down(n) => term.scroll_viewport_down(n),
                NavOp::PageUp => term.page_up(),
                NavOp::PageDown => term.page_down(),
                NavOp::Top => term.scroll_to_top(),
                NavOp::Bottom => term.scroll_to_bottom(),
            }
            let pos = term.scrollback_position();
            let back = pos.total_lines - pos.current_line;
            prop_assert!(
                back as usize <= term.max_scroll(),
                "offset {back} beyond max_scroll {}",
                term.max_scroll()
            );
        }
        term.write("y");
        prop_assert!(term.scrollback_position().at_bottom);
    }

    /// Total lines written only ever grows under writes.
    #[test]
    fn total_lines_monotonic(
        (width, height) in dims(),
        chunks in proptest::collection::vec(proptest::collection::vec(any::<u8>(), 0..64), 0..32),
    ) {
        let mut term = Terminal::with_scrollback(width, height, 16);
        let mut last = term.scrollback_position().total_lines;
        for chunk in chunks {
            term.write_bytes(&chunk);
            let total = term.scrollback_position().total_lines;
            prop_assert!(total >= last, "total_lines shrank: {last} -> {total}");
            last = total;
        }
    }

    /// Writing a stream in two arbitrary halves leaves the terminal in the
    /// same observable state as writing it whole.
    #[test]
    fn chunked_write_equivalence(
        (width, height) in dims(),
        bytes in proptest::collection::vec(any::<u8>(), 0..512),
        split in 0usize..512,
    ) {
        let split = split.min(bytes.len());
        let mut whole = Terminal::new(width, height);
        whole.write_bytes(&bytes);

        let mut halves = Terminal::new(width, height);
        halves.write_bytes(&bytes[..split]);
        halves.write_bytes(&bytes[split..]);

        prop_assert_eq!(whole.get_all_text(), halves.get_all_text());
        prop_assert_eq!(whole.cursor(), halves.cursor());
    }
}
