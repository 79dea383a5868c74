//! Encoded keys fed back through the terminal must reproduce the intended
//! effect: the encoder and the parser speak the same dialect.

use proptest::prelude::*;
use termlens_core::Terminal;
use termlens_harness::{Key, capture_state, contains_pattern, diff, find_pattern};

#[test]
fn arrow_up_encoding_moves_cursor_up() {
    assert_eq!(Key::ArrowUp.encode(), "\x1b[A");

    let mut term = Terminal::new(10, 5);
    term.write("\x1b[4;1H");
    assert!(term.cursor_at(0, 3));
    term.write(&Key::ArrowUp.encode());
    assert!(term.cursor_at(0, 2));
    // Clamped at the top.
    for _ in 0..10 {
        term.write(&Key::ArrowUp.encode());
    }
    assert!(term.cursor_at(0, 0));
}

#[test]
fn all_arrows_roundtrip() {
    let mut term = Terminal::new(10, 5);
    term.write("\x1b[3;5H");
    let (x, y) = term.cursor();

    term.write(&Key::ArrowDown.encode());
    assert!(term.cursor_at(x, y + 1));
    term.write(&Key::ArrowRight.encode());
    assert!(term.cursor_at(x + 1, y + 1));
    term.write(&Key::ArrowLeft.encode());
    term.write(&Key::ArrowUp.encode());
    assert!(term.cursor_at(x, y));
}

#[test]
fn enter_returns_column_to_zero() {
    let mut term = Terminal::new(10, 3);
    term.write("abc");
    term.write(&Key::Enter.encode());
    let (x, _) = term.cursor();
    assert_eq!(x, 0);
}

#[test]
fn typed_characters_appear_on_screen() {
    let mut term = Terminal::new(10, 3);
    for key in [Key::Char('h'), Key::Char('i'), Key::Char('!')] {
        term.write(&key.encode());
    }
    assert_eq!(term.get_line(0), "hi!");
}

#[test]
fn backspace_key_byte_is_absorbed_by_the_screen() {
    // DEL (0x7f) is input for the program, not a screen-drawing byte; the
    // emulator ignores it rather than moving the cursor.
    let mut term = Terminal::new(10, 3);
    term.write("abc");
    term.write(&Key::Backspace.encode());
    assert!(term.cursor_at(3, 0));
}

#[test]
fn unsupported_keys_write_nothing() {
    let mut term = Terminal::new(10, 3);
    let before = capture_state(&term);
    term.write(&Key::Function(13).encode());
    term.write(&Key::Ctrl(27).encode());
    assert_eq!(capture_state(&term), before);
}

#[test]
fn pattern_and_diff_compose_over_live_output() {
    let mut before = Terminal::new(20, 4);
    let mut after = Terminal::new(20, 4);
    for term in [&mut before, &mut after] {
        term.write("build: running\ntests: pending");
    }
    after.write("\x1b[2;1H\x1b[2Ktests: 17 passed");

    assert!(contains_pattern(&after, "^tests: [0-9]+ passed$"));
    assert_eq!(find_pattern(&after, "passed"), vec![(10, 1)]);

    let result = diff(&before, &after).unwrap();
    assert_eq!(result.changed_lines, vec![1]);
}

proptest! {
    /// Every encodable key produces bytes the parser consumes without
    /// leaking literal escape garbage onto the screen.
    #[test]
    fn encoded_keys_never_print_control_bytes(n in 0u8..30, arrows in 0usize..4) {
        let keys = [
            Key::Enter,
            Key::Escape,
            Key::Tab,
            Key::Backspace,
            [Key::ArrowUp, Key::ArrowDown, Key::ArrowRight, Key::ArrowLeft][arrows],
            Key::Function(n),
            Key::Ctrl(n),
        ];
        let mut term = Terminal::new(12, 4);
        for key in keys {
            term.write(&key.encode());
        }
        let text = term.get_all_text();
        prop_assert!(
            text.chars().all(|c| c == ' '),
            "control keys left visible text: {text:?}"
        );
    }
}
