//! Restricted glob-like row patterns.
//!
//! The grammar is deliberately small — enough to assert on terminal rows
//! without pulling in a regex engine:
//!
//! - literal characters match themselves
//! - `*` (and its alias `.*`) matches any sequence, including none
//! - `?` matches exactly one character
//! - `[...]` matches one character from the set; ranges like `a-z` work,
//!   and a trailing `+` repeats the class one or more times
//! - `^` / `$` at the pattern edges anchor to the start/end of the row
//!
//! A bare `.` is a literal dot, and an unclosed `[` is a literal bracket.
//! Patterns are evaluated per trimmed row with substring semantics unless
//! anchored; a terminal matches if any viewport row does.

use termlens_core::Terminal;

#[derive(Debug, Clone, PartialEq, Eq)]
enum ClassItem {
    Char(char),
    Range(char, char),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Atom {
    Literal(char),
    /// `*` or `.*`: any sequence of characters, including empty.
    Any,
    /// `?`: exactly one character.
    One,
    /// `[...]`, repeated one-or-more when followed by `+`.
    Class { items: Vec<ClassItem>, repeated: bool },
}

/// A compiled pattern. Parsing never fails; malformed syntax degrades to
/// literal characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    atoms: Vec<Atom>,
    anchor_start: bool,
    anchor_end: bool,
}

impl Pattern {
    /// Compile a pattern string.
    #[must_use]
    pub fn parse(src: &str) -> Self {
        let mut chars: Vec<char> = src.chars().collect();
        let anchor_start = chars.first() == Some(&'^');
        if anchor_start {
            chars.remove(0);
        }
        let anchor_end = chars.last() == Some(&'$');
        if anchor_end {
            chars.pop();
        }

        let mut atoms = Vec::new();
        let mut i = 0;
        while i < chars.len() {
            match chars[i] {
                '*' => {
                    atoms.push(Atom::Any);
                    i += 1;
                }
                '.' if chars.get(i + 1) == Some(&'*') => {
                    atoms.push(Atom::Any);
                    i += 2;
                }
                '?' => {
                    atoms.push(Atom::One);
                    i += 1;
                }
                '[' => match parse_class(&chars, i) {
                    Some((items, end)) => {
                        let repeated = chars.get(end + 1) == Some(&'+');
                        atoms.push(Atom::Class { items, repeated });
                        i = end + if repeated { 2 } else { 1 };
                    }
                    None => {
                        atoms.push(Atom::Literal('['));
                        i += 1;
                    }
                },
                c => {
                    atoms.push(Atom::Literal(c));
                    i += 1;
                }
            }
        }
        Self {
            atoms,
            anchor_start,
            anchor_end,
        }
    }

    /// Whether this pattern matches anywhere in the given row.
    #[must_use]
    pub fn matches_row(&self, row: &str) -> bool {
        let chars: Vec<char> = row.chars().collect();
        !self.match_starts(&chars, true).is_empty()
    }

    /// All start positions in `chars` where a match begins. With `first_only`
    /// the scan stops at the first hit.
    fn match_starts(&self, chars: &[char], first_only: bool) -> Vec<usize> {
        let mut starts = Vec::new();
        let candidates: Vec<usize> = if self.anchor_start {
            vec![0]
        } else {
            (0..=chars.len()).collect()
        };
        for s in candidates {
            if self.match_here(&self.atoms, &chars[s..]) {
                starts.push(s);
                if first_only {
                    break;
                }
            }
        }
        starts
    }

    fn match_here(&self, atoms: &[Atom], input: &[char]) -> bool {
        let Some((first, rest)) = atoms.split_first() else {
            return !self.anchor_end || input.is_empty();
        };
        match first {
            Atom::Literal(c) => input.first() == Some(c) && self.match_here(rest, &input[1..]),
            Atom::One => !input.is_empty() && self.match_here(rest, &input[1..]),
            Atom::Any => (0..=input.len()).any(|k| self.match_here(rest, &input[k..])),
            Atom::Class { items, repeated } => {
                if !*repeated {
                    return input.first().is_some_and(|&c| class_contains(items, c))
                        && self.match_here(rest, &input[1..]);
                }
                // One-or-more, with backtracking after each repetition.
                let mut k = 0;
                while k < input.len() && class_contains(items, input[k]) {
                    k += 1;
                    if self.match_here(rest, &input[k..]) {
                        return true;
                    }
                }
                false
            }
        }
    }
}

/// Parse a bracket class starting at `chars[open] == '['`. Returns the items
/// and the index of the closing `]`, or `None` if the class never closes.
fn parse_class(chars: &[char], open: usize) -> Option<(Vec<ClassItem>, usize)> {
    let close = (open + 1..chars.len()).find(|&j| chars[j] == ']')?;
    let body = &chars[open + 1..close];
    let mut items = Vec::new();
    let mut i = 0;
    while i < body.len() {
        if body.get(i + 1) == Some(&'-') && i + 2 < body.len() {
            items.push(ClassItem::Range(body[i], body[i + 2]));
            i += 3;
        } else {
            items.push(ClassItem::Char(body[i]));
            i += 1;
        }
    }
    Some((items, close))
}

fn class_contains(items: &[ClassItem], c: char) -> bool {
    items.iter().any(|item| match item {
        ClassItem::Char(ch) => *ch == c,
        ClassItem::Range(lo, hi) => (*lo..=*hi).contains(&c),
    })
}

/// Whether any viewport row of `term` matches `pattern`.
#[must_use]
pub fn contains_pattern(term: &Terminal, pattern: &str) -> bool {
    let compiled = Pattern::parse(pattern);
    (0..term.height()).any(|y| compiled.matches_row(&term.get_line(y)))
}

/// All `(x, y)` positions where a match of `pattern` starts, scanning rows
/// top to bottom and columns left to right.
#[must_use]
pub fn find_pattern(term: &Terminal, pattern: &str) -> Vec<(u16, u16)> {
    let compiled = Pattern::parse(pattern);
    let mut hits = Vec::new();
    for y in 0..term.height() {
        let chars: Vec<char> = term.get_line(y).chars().collect();
        for s in compiled.match_starts(&chars, false) {
            hits.push((s as u16, y));
        }
    }
    hits
}
