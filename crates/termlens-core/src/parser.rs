//! Streaming VT/ANSI byte parser.
//!
//! Consumes raw output bytes and produces [`Action`]s for the terminal to
//! apply. The parser is incremental: an escape sequence or UTF-8 character
//! split across `feed` calls resumes where it left off, so feeding a byte
//! stream in arbitrary chunks yields the same actions as feeding it whole.
//!
//! Unrecognized or malformed sequences are swallowed silently; they never
//! leak bytes into the output and never abort parsing of what follows.

/// A decoded terminal action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Place a printable character at the cursor.
    Print(char),
    /// Line feed (also VT and FF): cursor to column 0 of the next line.
    Newline,
    /// Carriage return: cursor to column 0.
    CarriageReturn,
    /// Horizontal tab: advance to the next 8-column tab stop.
    Tab,
    /// Move the cursor one column left, stopping at column 0.
    Backspace,
    /// CSI A
    CursorUp(u16),
    /// CSI B
    CursorDown(u16),
    /// CSI C
    CursorRight(u16),
    /// CSI D
    CursorLeft(u16),
    /// CSI H / CSI f, converted to 0-based coordinates.
    CursorPosition { row: u16, col: u16 },
    /// CSI J with mode 0 (below), 1 (above), or 2 (all).
    EraseInDisplay(u8),
    /// CSI K with mode 0 (right), 1 (left), or 2 (line).
    EraseInLine(u8),
    /// CSI m with its raw parameter list (empty = reset).
    Sgr(Vec<u16>),
    /// CSI ? h: DEC private modes to set.
    DecSet(Vec<u16>),
    /// CSI ? l: DEC private modes to reset.
    DecRst(Vec<u16>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Ground,
    /// Saw ESC, waiting for the introducer byte.
    Escape,
    /// Inside a non-CSI escape with intermediate bytes; swallowing until
    /// the final byte.
    EscapeIntermediate,
    /// Inside CSI, accumulating parameters.
    Csi,
    /// Inside OSC, swallowing until BEL or ST.
    Osc,
    /// Inside OSC, saw ESC (potential ST terminator).
    OscEsc,
    /// Assembling a multi-byte UTF-8 character.
    Utf8,
}

/// Incremental parser; state persists across [`Parser::feed`] calls.
#[derive(Debug, Clone)]
pub struct Parser {
    state: State,
    /// CSI parameters accumulated so far.
    params: Vec<u16>,
    /// Whether any digit or separator has been seen for the current CSI.
    params_started: bool,
    /// CSI began with `?` (DEC private).
    private: bool,
    /// CSI contains bytes we do not handle; drop it at the final byte.
    malformed: bool,
    utf8_buf: [u8; 4],
    utf8_len: usize,
    utf8_remaining: usize,
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: State::Ground,
            params: Vec::new(),
            params_started: false,
            private: false,
            malformed: false,
            utf8_buf: [0; 4],
            utf8_len: 0,
            utf8_remaining: 0,
        }
    }

    /// Feed a chunk of output bytes, returning the decoded actions.
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<Action> {
        let mut actions = Vec::new();
        let mut i = 0;
        while i < bytes.len() {
            if self.process(bytes[i], &mut actions) {
                i += 1;
            }
        }
        actions
    }

    /// Handle one byte. Returns `false` if the byte must be reprocessed in
    /// the new state (used when a partial sequence is aborted).
    fn process(&mut self, byte: u8, actions: &mut Vec<Action>) -> bool {
        match self.state {
            State::Ground => self.ground(byte, actions),
            State::Escape => {
                match byte {
                    b'[' => {
                        self.enter_csi();
                    }
                    b']' => self.state = State::Osc,
                    0x1B => {} // stay in Escape
                    // Intermediates (e.g. charset designation `ESC ( B`):
                    // the final byte still belongs to the sequence.
                    0x20..=0x2F => self.state = State::EscapeIntermediate,
                    _ => {
                        // Two-byte escape we do not handle; swallow it.
                        self.state = State::Ground;
                    }
                }
                true
            }
            State::EscapeIntermediate => {
                match byte {
                    0x20..=0x2F => {} // more intermediates
                    0x1B => self.state = State::Escape,
                    // Final byte: the whole sequence is discarded.
                    _ => self.state = State::Ground,
                }
                true
            }
            State::Csi => self.csi(byte, actions),
            State::Osc => {
                match byte {
                    0x07 => self.state = State::Ground,
                    0x1B => self.state = State::OscEsc,
                    _ => {}
                }
                true
            }
            State::OscEsc => {
                if byte == b'\\' {
                    self.state = State::Ground;
                    true
                } else {
                    // Bare ESC inside OSC starts a new sequence.
                    self.state = State::Escape;
                    false
                }
            }
            State::Utf8 => self.utf8_continuation(byte, actions),
        }
    }

    fn ground(&mut self, byte: u8, actions: &mut Vec<Action>) -> bool {
        match byte {
            0x1B => self.state = State::Escape,
            b'\n' | 0x0B | 0x0C => actions.push(Action::Newline),
            b'\r' => actions.push(Action::CarriageReturn),
            b'\t' => actions.push(Action::Tab),
            0x08 => actions.push(Action::Backspace),
            0x20..=0x7E => actions.push(Action::Print(byte as char)),
            0xC2..=0xDF => self.enter_utf8(byte, 1),
            0xE0..=0xEF => self.enter_utf8(byte, 2),
            0xF0..=0xF4 => self.enter_utf8(byte, 3),
            // Remaining C0 controls, DEL, and stray continuation bytes are
            // ignored.
            _ => {
                #[cfg(feature = "tracing")]
                crate::trace!(byte, "ignoring unhandled byte");
            }
        }
        true
    }

    fn enter_csi(&mut self) {
        self.state = State::Csi;
        self.params.clear();
        self.params_started = false;
        self.private = false;
        self.malformed = false;
    }

    fn enter_utf8(&mut self, lead: u8, remaining: usize) {
        self.state = State::Utf8;
        self.utf8_buf[0] = lead;
        self.utf8_len = 1;
        self.utf8_remaining = remaining;
    }

    fn utf8_continuation(&mut self, byte: u8, actions: &mut Vec<Action>) -> bool {
        if !(0x80..=0xBF).contains(&byte) {
            // Truncated character: drop it and reprocess this byte fresh.
            self.state = State::Ground;
            return false;
        }
        self.utf8_buf[self.utf8_len] = byte;
        self.utf8_len += 1;
        self.utf8_remaining -= 1;
        if self.utf8_remaining == 0 {
            self.state = State::Ground;
            // Overlong encodings and surrogates fail validation and are
            // dropped.
            if let Ok(s) = std::str::from_utf8(&self.utf8_buf[..self.utf8_len])
                && let Some(ch) = s.chars().next()
            {
                actions.push(Action::Print(ch));
            }
        }
        true
    }

    fn csi(&mut self, byte: u8, actions: &mut Vec<Action>) -> bool {
        match byte {
            b'0'..=b'9' => {
                if !self.params_started {
                    self.params_started = true;
                    self.params.push(0);
                }
                if let Some(last) = self.params.last_mut() {
                    *last = last.saturating_mul(10).saturating_add(u16::from(byte - b'0'));
                }
            }
            b';' => {
                if !self.params_started {
                    self.params_started = true;
                    self.params.push(0);
                }
                self.params.push(0);
            }
            b'?' => {
                if self.params_started || self.private {
                    self.malformed = true;
                } else {
                    self.private = true;
                }
            }
            // Intermediates and other prefix bytes we do not handle poison
            // the whole sequence.
            0x20..=0x2F | 0x3A | 0x3C..=0x3E => self.malformed = true,
            0x40..=0x7E => {
                self.state = State::Ground;
                if !self.malformed
                    && let Some(action) = self.dispatch_csi(byte)
                {
                    actions.push(action);
                }
                #[cfg(feature = "tracing")]
                if self.malformed {
                    crate::debug!(final_byte = byte, "discarding malformed CSI");
                }
            }
            0x1B => {
                // ESC aborts the sequence and starts a new one.
                self.state = State::Escape;
            }
            _ => {
                // Other control bytes abort the sequence.
                self.state = State::Ground;
            }
        }
        true
    }

    fn dispatch_csi(&self, final_byte: u8) -> Option<Action> {
        if self.private {
            return match final_byte {
                b'h' => Some(Action::DecSet(self.params.clone())),
                b'l' => Some(Action::DecRst(self.params.clone())),
                _ => None,
            };
        }
        match final_byte {
            b'A' => Some(Action::CursorUp(self.count_or_one())),
            b'B' => Some(Action::CursorDown(self.count_or_one())),
            b'C' => Some(Action::CursorRight(self.count_or_one())),
            b'D' => Some(Action::CursorLeft(self.count_or_one())),
            b'H' | b'f' => Some(Action::CursorPosition {
                row: self.param_or_one(0) - 1,
                col: self.param_or_one(1) - 1,
            }),
            b'J' => {
                let mode = self.param_or_zero(0);
                (mode <= 2).then_some(Action::EraseInDisplay(mode as u8))
            }
            b'K' => {
                let mode = self.param_or_zero(0);
                (mode <= 2).then_some(Action::EraseInLine(mode as u8))
            }
            b'm' => Some(Action::Sgr(self.params.clone())),
            _ => None,
        }
    }

    /// First parameter as a count: missing or zero means 1.
    fn count_or_one(&self) -> u16 {
        self.param_or_one(0)
    }

    fn param_or_one(&self, idx: usize) -> u16 {
        self.params
            .get(idx)
            .copied()
            .filter(|&v| v > 0)
            .unwrap_or(1)
    }

    fn param_or_zero(&self, idx: usize) -> u16 {
        self.params.get(idx).copied().unwrap_or(0)
    }
}
