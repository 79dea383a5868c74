//! Key-to-bytes encoding: the inverse of the terminal's parser for the keys
//! a test script can synthesize.
//!
//! Feeding the encoded bytes back through [`termlens_core::Terminal::write`]
//! reproduces the key's effect, so scripted input and parsed output stay in
//! the same dialect.

/// A key a test can press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// A printable character, sent as its own UTF-8 bytes.
    Char(char),
    /// Sent as carriage return, matching what a real terminal's Enter emits.
    Enter,
    Escape,
    Tab,
    /// Sent as DEL (0x7f), the modern backspace convention.
    Backspace,
    ArrowUp,
    ArrowDown,
    ArrowRight,
    ArrowLeft,
    /// Function key F1-F12. Other numbers encode to nothing.
    Function(u8),
    /// Ctrl+letter as its control byte: 1 = Ctrl-A .. 26 = Ctrl-Z.
    /// 0, 27, and anything above 26 encode to nothing (27 is [`Key::Escape`]).
    Ctrl(u8),
}

/// xterm function-key codes for F1-F12. The jumps over 16 and 22 are an
/// inherited xterm quirk, not a typo.
const FUNCTION_CODES: [u8; 12] = [11, 12, 13, 14, 15, 17, 18, 19, 20, 21, 23, 24];

impl Key {
    /// Encode this key as the bytes a terminal would receive.
    ///
    /// Unsupported function and control numbers encode to the empty string
    /// rather than failing; a script pressing `F13` sends nothing, the same
    /// as on a keyboard without that key.
    #[must_use]
    pub fn encode(self) -> String {
        match self {
            Key::Char(ch) => ch.to_string(),
            Key::Enter => "\r".to_string(),
            Key::Escape => "\x1b".to_string(),
            Key::Tab => "\t".to_string(),
            Key::Backspace => "\x7f".to_string(),
            Key::ArrowUp => "\x1b[A".to_string(),
            Key::ArrowDown => "\x1b[B".to_string(),
            Key::ArrowRight => "\x1b[C".to_string(),
            Key::ArrowLeft => "\x1b[D".to_string(),
            Key::Function(n) => match n {
                1..=12 => format!("\x1b[{}~", FUNCTION_CODES[n as usize - 1]),
                _ => String::new(),
            },
            Key::Ctrl(n) => match n {
                1..=26 => (n as char).to_string(),
                _ => String::new(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn printable_chars_encode_as_themselves() {
        assert_eq!(Key::Char('a').encode(), "a");
        assert_eq!(Key::Char('中').encode(), "中");
    }

    #[test]
    fn named_keys() {
        assert_eq!(Key::Enter.encode(), "\r");
        assert_eq!(Key::Escape.encode(), "\x1b");
        assert_eq!(Key::Tab.encode(), "\t");
        assert_eq!(Key::Backspace.encode(), "\x7f");
    }

    #[test]
    fn arrows_encode_to_csi() {
        assert_eq!(Key::ArrowUp.encode(), "\x1b[A");
        assert_eq!(Key::ArrowDown.encode(), "\x1b[B");
        assert_eq!(Key::ArrowRight.encode(), "\x1b[C");
        assert_eq!(Key::ArrowLeft.encode(), "\x1b[D");
    }

    #[test]
    fn function_key_table_has_xterm_gaps() {
        assert_eq!(Key::Function(1).encode(), "\x1b[11~");
        assert_eq!(Key::Function(5).encode(), "\x1b[15~");
        // F6 skips code 16.
        assert_eq!(Key::Function(6).encode(), "\x1b[17~");
        assert_eq!(Key::Function(10).encode(), "\x1b[21~");
        // F11 skips code 22.
        assert_eq!(Key::Function(11).encode(), "\x1b[23~");
        assert_eq!(Key::Function(12).encode(), "\x1b[24~");
    }

    #[test]
    fn out_of_range_function_keys_encode_to_nothing() {
        assert_eq!(Key::Function(0).encode(), "");
        assert_eq!(Key::Function(13).encode(), "");
        assert_eq!(Key::Function(255).encode(), "");
    }

    #[test]
    fn ctrl_letters_are_raw_control_bytes() {
        assert_eq!(Key::Ctrl(1).encode(), "\x01");
        assert_eq!(Key::Ctrl(3).encode(), "\x03");
        assert_eq!(Key::Ctrl(26).encode(), "\x1a");
    }

    #[test]
    fn reserved_and_out_of_range_ctrl_encode_to_nothing() {
        assert_eq!(Key::Ctrl(0).encode(), "");
        // 27 is ESC, reserved for Key::Escape.
        assert_eq!(Key::Ctrl(27).encode(), "");
        assert_eq!(Key::Ctrl(99).encode(), "");
    }
}
