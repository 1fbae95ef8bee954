//! Minimal incremental lexical scanner.
//!
//! Tracks whether a position is code, a comment, or a quoted literal, and
//! counts `{`/`}` nesting in code only. There is no tokenizer and no AST: a
//! single closed state enum and a transition function.
//!
//! Template literals are opaque: `${ ... }` does not re-enter code, so braces
//! inside an interpolation are invisible to the depth counter.

use serde::{Deserialize, Serialize};

/// Lexical mode at a position
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LexMode {
    #[default]
    Code,
    LineComment,
    BlockComment,
    SingleQuoted,
    DoubleQuoted,
    TemplateLiteral,
}

impl LexMode {
    /// Closing delimiter for quoted modes
    #[must_use]
    pub const fn closing_quote(self) -> Option<char> {
        match self {
            Self::SingleQuoted => Some('\''),
            Self::DoubleQuoted => Some('"'),
            Self::TemplateLiteral => Some('`'),
            Self::Code | Self::LineComment | Self::BlockComment => None,
        }
    }

    #[must_use]
    pub const fn is_code(self) -> bool {
        matches!(self, Self::Code)
    }
}

/// Scanner state threaded from one character to the next
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScanState {
    pub mode: LexMode,
    /// Unmatched `{` seen in code; clamps at zero
    pub brace_depth: usize,
    /// The next character inside a quoted mode is literal
    pub escaped: bool,
}

/// Result of one transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub state: ScanState,
    /// Characters consumed: 2 for `//`, `/*` and `*/`, otherwise 1
    pub consumed: usize,
}

impl Transition {
    const fn one(state: ScanState) -> Self {
        Self { state, consumed: 1 }
    }

    const fn two(state: ScanState) -> Self {
        Self { state, consumed: 2 }
    }
}

/// Advance the scanner over `ch`, peeking at `next` for two-character markers.
#[must_use]
pub fn advance(state: ScanState, ch: char, next: Option<char>) -> Transition {
    let mut out = state;
    match state.mode {
        LexMode::LineComment => {
            if ch == '\n' {
                out.mode = LexMode::Code;
            }
            Transition::one(out)
        }
        LexMode::BlockComment => {
            if ch == '*' && next == Some('/') {
                out.mode = LexMode::Code;
                return Transition::two(out);
            }
            Transition::one(out)
        }
        LexMode::SingleQuoted | LexMode::DoubleQuoted | LexMode::TemplateLiteral => {
            if state.escaped {
                out.escaped = false;
            } else if ch == '\\' {
                out.escaped = true;
            } else if Some(ch) == state.mode.closing_quote() {
                out.mode = LexMode::Code;
            }
            Transition::one(out)
        }
        LexMode::Code => match (ch, next) {
            ('/', Some('/')) => {
                out.mode = LexMode::LineComment;
                Transition::two(out)
            }
            ('/', Some('*')) => {
                out.mode = LexMode::BlockComment;
                Transition::two(out)
            }
            ('\'', _) => {
                out.mode = LexMode::SingleQuoted;
                Transition::one(out)
            }
            ('"', _) => {
                out.mode = LexMode::DoubleQuoted;
                Transition::one(out)
            }
            ('`', _) => {
                out.mode = LexMode::TemplateLiteral;
                Transition::one(out)
            }
            ('{', _) => {
                out.brace_depth += 1;
                Transition::one(out)
            }
            ('}', _) => {
                out.brace_depth = out.brace_depth.saturating_sub(1);
                Transition::one(out)
            }
            _ => Transition::one(out),
        },
    }
}

/// One scanned position: the character at `offset` and the state after it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanStep {
    pub offset: usize,
    pub ch: char,
    pub state: ScanState,
}

impl ScanStep {
    /// Whether this step closed a line at code depth zero
    #[must_use]
    pub fn ends_line_at_depth_zero(&self) -> bool {
        self.ch == '\n' && self.state.mode.is_code() && self.state.brace_depth == 0
    }
}

/// Iterator over `[start, end)` of a character slice, yielding a step per
/// transition. Two-character markers yield a single step at their first
/// character; lookahead never reaches past `end`.
#[derive(Debug, Clone)]
pub struct Scanner<'s> {
    chars: &'s [char],
    pos: usize,
    end: usize,
    state: ScanState,
}

impl<'s> Scanner<'s> {
    #[must_use]
    pub fn new(chars: &'s [char], start: usize, end: usize, state: ScanState) -> Self {
        let end = end.min(chars.len());
        Self {
            chars,
            pos: start.min(end),
            end,
            state,
        }
    }

    /// Consume the rest of the range and return the final state
    #[must_use]
    pub fn finish(mut self) -> ScanState {
        for _ in self.by_ref() {}
        self.state
    }
}

impl Iterator for Scanner<'_> {
    type Item = ScanStep;

    fn next(&mut self) -> Option<ScanStep> {
        if self.pos >= self.end {
            return None;
        }
        let offset = self.pos;
        let ch = self.chars[offset];
        let next = if offset + 1 < self.end {
            Some(self.chars[offset + 1])
        } else {
            None
        };

        let transition = advance(self.state, ch, next);
        self.state = transition.state;
        self.pos = (offset + transition.consumed).min(self.end);

        Some(ScanStep {
            offset,
            ch,
            state: self.state,
        })
    }
}

/// Scan `[start, end)` from `state` and return the state at `end`
#[must_use]
pub fn scan_range(chars: &[char], start: usize, end: usize, state: ScanState) -> ScanState {
    Scanner::new(chars, start, end, state).finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    fn depth_after(s: &str) -> usize {
        let c = chars(s);
        scan_range(&c, 0, c.len(), ScanState::default()).brace_depth
    }

    #[test]
    fn test_counts_braces_in_code() {
        assert_eq!(depth_after("{ { }"), 1);
        assert_eq!(depth_after("function f() { if (x) { y(); } }"), 0);
    }

    #[test]
    fn test_ignores_braces_in_comments_and_strings() {
        assert_eq!(depth_after("// {\n{"), 1);
        assert_eq!(depth_after("/* { { */ {"), 1);
        assert_eq!(depth_after("'{' \"{\" `{` {"), 1);
    }

    #[test]
    fn test_stray_close_clamps_to_zero() {
        assert_eq!(depth_after("} } {"), 1);
        assert_eq!(depth_after("}}}"), 0);
    }

    #[test]
    fn test_escape_covers_exactly_one_char() {
        // The escaped quote does not close the string, so the brace is literal.
        assert_eq!(depth_after(r#""a\"{" {"#), 1);
        // An escaped backslash leaves the following quote free to close.
        assert_eq!(depth_after(r#""a\\" {"#), 1);
    }

    #[test]
    fn test_line_comment_ends_at_newline_but_strings_do_not() {
        let c = chars("'abc\n{");
        let state = scan_range(&c, 0, c.len(), ScanState::default());
        assert_eq!(state.mode, LexMode::SingleQuoted);
        assert_eq!(state.brace_depth, 0);

        let c = chars("// x\n");
        let state = scan_range(&c, 0, c.len(), ScanState::default());
        assert_eq!(state.mode, LexMode::Code);
    }

    #[test]
    fn test_block_comment_opening_star_is_not_closing() {
        // "/*/" must stay inside the comment: the '*' belongs to the opener.
        let c = chars("/*/ { */ {");
        let state = scan_range(&c, 0, c.len(), ScanState::default());
        assert_eq!(state.mode, LexMode::Code);
        assert_eq!(state.brace_depth, 1);
    }

    #[test]
    fn test_template_interpolation_is_opaque() {
        assert_eq!(depth_after("`${ { }`"), 0);
        assert_eq!(depth_after("`${ {`"), 0);
    }

    #[test]
    fn test_advance_reports_consumed_width() {
        let t = advance(ScanState::default(), '/', Some('/'));
        assert_eq!(t.consumed, 2);
        assert_eq!(t.state.mode, LexMode::LineComment);

        let t = advance(ScanState::default(), '/', None);
        assert_eq!(t.consumed, 1);
        assert_eq!(t.state.mode, LexMode::Code);
    }

    #[test]
    fn test_scanner_steps_expose_line_ends() {
        let c = chars("{\n}\n");
        let cuts: Vec<usize> = Scanner::new(&c, 0, c.len(), ScanState::default())
            .filter(ScanStep::ends_line_at_depth_zero)
            .map(|step| step.offset + 1)
            .collect();
        assert_eq!(cuts, vec![4]);
    }
}
