//! Character-indexed view over source text.
//!
//! Every offset handed out by this crate is a character index, not a byte
//! index, so results stay meaningful for callers that slice by code point.

/// Immutable source text with a precomputed line-start table
#[derive(Debug, Clone)]
pub struct SourceText<'a> {
    text: &'a str,
    chars: Vec<char>,
    line_starts: Vec<usize>,
}

impl<'a> SourceText<'a> {
    #[must_use]
    pub fn new(text: &'a str) -> Self {
        let chars: Vec<char> = text.chars().collect();
        let mut line_starts = vec![0];
        line_starts.extend(
            chars
                .iter()
                .enumerate()
                .filter(|(_, ch)| **ch == '\n')
                .map(|(idx, _)| idx + 1),
        );
        Self {
            text,
            chars,
            line_starts,
        }
    }

    #[must_use]
    pub const fn as_str(&self) -> &'a str {
        self.text
    }

    /// Length in characters
    #[must_use]
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    #[must_use]
    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    #[must_use]
    pub fn char_at(&self, offset: usize) -> Option<char> {
        self.chars.get(offset).copied()
    }

    /// Copy out `[start, end)`, clamped to the text
    #[must_use]
    pub fn slice(&self, start: usize, end: usize) -> String {
        let end = end.min(self.len());
        let start = start.min(end);
        self.chars[start..end].iter().collect()
    }

    /// First newline in `[from, to)`
    #[must_use]
    pub fn find_newline(&self, from: usize, to: usize) -> Option<usize> {
        let to = to.min(self.len());
        if from >= to {
            return None;
        }
        self.chars[from..to]
            .iter()
            .position(|&ch| ch == '\n')
            .map(|pos| from + pos)
    }

    /// Last newline in `[from, to)`
    #[must_use]
    pub fn rfind_newline(&self, from: usize, to: usize) -> Option<usize> {
        let to = to.min(self.len());
        if from >= to {
            return None;
        }
        self.chars[from..to]
            .iter()
            .rposition(|&ch| ch == '\n')
            .map(|pos| from + pos)
    }

    /// First occurrence of `token` lying entirely inside `[from, to)`
    #[must_use]
    pub fn find_token(&self, token: &[char], from: usize, to: usize) -> Option<usize> {
        let to = to.min(self.len());
        if token.is_empty() || from >= to || to - from < token.len() {
            return None;
        }
        self.chars[from..to]
            .windows(token.len())
            .position(|window| window == token)
            .map(|pos| from + pos)
    }

    /// Last occurrence of `token` lying entirely inside `[from, to)`
    #[must_use]
    pub fn rfind_token(&self, token: &[char], from: usize, to: usize) -> Option<usize> {
        let to = to.min(self.len());
        if token.is_empty() || from >= to || to - from < token.len() {
            return None;
        }
        self.chars[from..to]
            .windows(token.len())
            .rposition(|window| window == token)
            .map(|pos| from + pos)
    }

    /// Offset just past the `count`-th newline at or after `from`
    #[must_use]
    pub fn after_nth_newline(&self, from: usize, count: usize) -> Option<usize> {
        if count == 0 {
            return Some(from.min(self.len()));
        }
        self.chars
            .iter()
            .enumerate()
            .skip(from)
            .filter(|(_, ch)| **ch == '\n')
            .nth(count - 1)
            .map(|(idx, _)| idx + 1)
    }

    /// 0-based line index containing `offset`; offsets past the last line
    /// start map to the last line
    #[must_use]
    pub fn line_of(&self, offset: usize) -> usize {
        self.line_starts
            .partition_point(|&start| start <= offset)
            .saturating_sub(1)
    }

    /// Start offset of a 0-based line, or the text length past the end
    #[must_use]
    pub fn line_start(&self, line: usize) -> usize {
        self.line_starts.get(line).copied().unwrap_or(self.len())
    }

    /// Number of lines, not counting the empty remainder after a final newline
    #[must_use]
    pub fn line_count(&self) -> usize {
        if self.chars.is_empty() {
            return 0;
        }
        if self.chars.last() == Some(&'\n') {
            self.line_starts.len() - 1
        } else {
            self.line_starts.len()
        }
    }

    /// Text of the lines `[first, last]` (0-based, inclusive) with their newlines
    #[must_use]
    pub fn lines_text(&self, first: usize, last: usize) -> String {
        self.slice(self.line_start(first), self.line_start(last + 1))
    }

    /// Convert a byte offset into `as_str()` into a character offset
    #[must_use]
    pub fn char_offset(&self, byte_offset: usize) -> usize {
        let byte_offset = byte_offset.min(self.text.len());
        self.text
            .get(..byte_offset)
            .map_or(self.len(), |prefix| prefix.chars().count())
    }
}
