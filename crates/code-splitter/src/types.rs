use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::hints::{self, ChunkHints};

/// A contiguous, newline-aligned slice of the source text
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Chunk {
    /// Position in the sequence (1-indexed)
    pub ordinal: usize,

    /// Number of chunks the source was split into
    pub total_count: usize,

    /// Start offset in characters (inclusive)
    pub start_offset: usize,

    /// End offset in characters (exclusive)
    pub end_offset: usize,

    /// The chunk text, verbatim
    pub text: String,

    /// First line covered (1-indexed)
    pub start_line: usize,

    /// Last line covered (1-indexed, inclusive)
    pub end_line: usize,

    /// Brace depth in effect at `start_offset`
    pub depth_in: usize,

    /// Brace depth in effect at `end_offset`
    pub depth_out: usize,

    /// First line of `text`, without its newline
    pub first_line: String,

    /// Last line of `text`, without its newline
    pub last_line: String,

    /// Lowercase hex SHA-256 of `text`
    pub content_hash: String,
}

impl Chunk {
    /// Number of characters in this chunk
    #[must_use]
    pub const fn char_len(&self) -> usize {
        self.end_offset - self.start_offset
    }

    /// Get the number of lines in this chunk
    #[must_use]
    pub const fn line_count(&self) -> usize {
        self.end_line.saturating_sub(self.start_line) + 1
    }

    /// Check if chunk contains a specific line
    #[must_use]
    pub const fn contains_line(&self, line: usize) -> bool {
        line >= self.start_line && line <= self.end_line
    }

    #[must_use]
    pub const fn is_last(&self) -> bool {
        self.ordinal == self.total_count
    }

    /// Whether the text carries its own trailing newline
    #[must_use]
    pub fn ends_with_newline(&self) -> bool {
        self.text.ends_with('\n')
    }

    /// Names defined in and identifiers frequent in this chunk
    #[must_use]
    pub fn hints(&self) -> ChunkHints {
        ChunkHints {
            defines: hints::defined_names(&self.text, hints::DEFAULT_MAX_DEFINES),
            top_identifiers: hints::top_identifiers(&self.text, hints::DEFAULT_TOP_IDENTIFIERS),
        }
    }
}

/// Lowercase hex SHA-256 of `text`
#[must_use]
pub fn content_hash(text: &str) -> String {
    use std::fmt::Write;

    let digest = Sha256::digest(text.as_bytes());
    let mut out = String::with_capacity(digest.len() * 2);
    for b in digest.iter() {
        let _ = write!(out, "{b:02x}");
    }
    out
}

/// Kind of construct an extraction matched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstructKind {
    /// `function NAME(`, optionally exported
    Function,
    /// `async function NAME(`
    AsyncFunction,
    /// `function* NAME(` or `async function* NAME(`
    GeneratorFunction,
    /// `var|let|const NAME = function(`
    FunctionExpression,
    /// `var|let|const NAME = (...) => {`
    ArrowFunction,
    /// `class NAME`
    Class,
    /// Indentation-based `def NAME`
    Def,
    /// Indentation-based `async def NAME`
    AsyncDef,
}

impl ConstructKind {
    /// Get human-readable name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Function => "function",
            Self::AsyncFunction => "async function",
            Self::GeneratorFunction => "generator function",
            Self::FunctionExpression => "function expression",
            Self::ArrowFunction => "arrow function",
            Self::Class => "class",
            Self::Def => "def",
            Self::AsyncDef => "async def",
        }
    }
}

/// Why an extraction did not produce a span
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionFailure {
    /// No signature matched the name
    NotFound,
    /// A signature matched but its block never closes
    UnterminatedBlock,
}

impl ExtractionFailure {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "not found",
            Self::UnterminatedBlock => "found start but block not closed",
        }
    }
}

/// Outcome of a construct extraction; `found == false` is an expected result
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExtractionResult {
    pub found: bool,

    /// Start offset in characters (inclusive); 0 when not found
    pub start_offset: usize,

    /// End offset in characters (exclusive); 0 when not found
    pub end_offset: usize,

    /// Verbatim `source[start_offset..end_offset]`
    pub body: String,

    /// First line of the span (1-indexed); 0 when not found
    pub start_line: usize,

    /// Last line of the span (1-indexed, inclusive); 0 when not found
    pub end_line: usize,

    /// Signature kind that matched
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<ConstructKind>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<ExtractionFailure>,
}

impl ExtractionResult {
    /// A located construct
    #[must_use]
    pub const fn found(
        kind: ConstructKind,
        start_offset: usize,
        end_offset: usize,
        body: String,
        start_line: usize,
        end_line: usize,
    ) -> Self {
        Self {
            found: true,
            start_offset,
            end_offset,
            body,
            start_line,
            end_line,
            kind: Some(kind),
            reason: None,
        }
    }

    #[must_use]
    pub const fn not_found() -> Self {
        Self::failed(None, ExtractionFailure::NotFound)
    }

    #[must_use]
    pub const fn unterminated(kind: ConstructKind) -> Self {
        Self::failed(Some(kind), ExtractionFailure::UnterminatedBlock)
    }

    const fn failed(kind: Option<ConstructKind>, reason: ExtractionFailure) -> Self {
        Self {
            found: false,
            start_offset: 0,
            end_offset: 0,
            body: String::new(),
            start_line: 0,
            end_line: 0,
            kind,
            reason: Some(reason),
        }
    }
}

/// One reported literal hit with its surrounding lines
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContextMatch {
    /// Line containing the hit (1-indexed)
    pub hit_line_number: usize,

    /// First line of the window (1-indexed)
    pub window_start: usize,

    /// Last line of the window (1-indexed, inclusive)
    pub window_end: usize,

    /// Window text, lines joined with their original newlines
    pub text: String,
}

/// All hits of a literal search
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContextExtraction {
    /// Every non-overlapping occurrence, including those past the cap
    pub hit_count: usize,

    /// At most `max_matches` windows, in document order
    pub matches: Vec<ContextMatch>,
}

impl ContextExtraction {
    /// Whether some hits were counted but not returned
    #[must_use]
    pub fn is_truncated(&self) -> bool {
        self.hit_count > self.matches.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_chunk() -> Chunk {
        Chunk {
            ordinal: 2,
            total_count: 3,
            start_offset: 40,
            end_offset: 52,
            text: "let a = 1;\n\n".to_string(),
            start_line: 10,
            end_line: 15,
            depth_in: 1,
            depth_out: 1,
            first_line: "let a = 1;".to_string(),
            last_line: String::new(),
            content_hash: content_hash("let a = 1;\n\n"),
        }
    }

    #[test]
    fn test_chunk_line_count() {
        assert_eq!(sample_chunk().line_count(), 6);
        assert_eq!(sample_chunk().char_len(), 12);
    }

    #[test]
    fn test_chunk_contains_line() {
        let chunk = sample_chunk();
        assert!(chunk.contains_line(10));
        assert!(chunk.contains_line(12));
        assert!(chunk.contains_line(15));
        assert!(!chunk.contains_line(9));
        assert!(!chunk.contains_line(16));
        assert!(!chunk.is_last());
        assert!(chunk.ends_with_newline());
    }

    #[test]
    fn test_content_hash_is_sha256_hex() {
        assert_eq!(
            content_hash(""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(content_hash("abc").len(), 64);
    }

    #[test]
    fn test_extraction_constructors() {
        let miss = ExtractionResult::not_found();
        assert!(!miss.found);
        assert_eq!(miss.reason, Some(ExtractionFailure::NotFound));
        assert!(miss.body.is_empty());

        let open = ExtractionResult::unterminated(ConstructKind::Class);
        assert_eq!(open.reason, Some(ExtractionFailure::UnterminatedBlock));
        assert_eq!(open.kind, Some(ConstructKind::Class));

        let hit = ExtractionResult::found(ConstructKind::Function, 0, 3, "f{}".to_string(), 1, 1);
        assert!(hit.found);
        assert!(hit.reason.is_none());
    }

    #[test]
    fn test_extraction_serializes_reason_in_snake_case() {
        let json = serde_json::to_value(ExtractionResult::unterminated(ConstructKind::Function))
            .unwrap();
        assert_eq!(json["reason"], "unterminated_block");
        assert_eq!(json["found"], false);
    }
}
