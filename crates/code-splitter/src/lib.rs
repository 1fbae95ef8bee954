//! # Context Code Splitter
//!
//! Paste-ready code splitting and whole-construct extraction for AI context.
//!
//! ## Philosophy
//!
//! The splitter cuts large source files into parts that:
//! - Never split a line
//! - Prefer ending where brace nesting returns to zero
//! - Carry the true nesting depth from one part into the next
//! - Reassemble byte-for-byte into the original text
//!
//! There is no parser. A small lexical scanner tells code from comments and
//! string literals, and braces are counted in code only.
//!
//! ## Architecture
//!
//! ```text
//! Source Text
//!     │
//!     ├──> Lexical Scanner (mode + brace depth per character)
//!     │
//!     ├──> Boundary Selector
//!     │    ├─> Soft caps (chars, lines) → tentative cut
//!     │    ├─> Strategy search (depth-zero line, closing token, IIFE end)
//!     │    └─> Snap to end of line, authoritative depth at cut
//!     │
//!     ├──> Chunk Assembler → Chunk[] (offsets, lines, depth in/out, hash)
//!     │
//!     ├──> Construct Extractor → ExtractionResult (verbatim span)
//!     │
//!     ├──> Context Extractor → ContextExtraction (hit windows)
//!     │
//!     └──> Scope Index → identifiers, DOM ids, selectors, storage keys
//! ```
//!
//! ## Example
//!
//! ```rust
//! use context_code_splitter::{Splitter, SplitterConfig, Dialect};
//!
//! let splitter = Splitter::new(SplitterConfig::default()).unwrap();
//!
//! let code = "function greet(name) {\n  return `hi ${name}`;\n}\n";
//!
//! let chunks = splitter.split(code).unwrap();
//! for chunk in &chunks {
//!     println!("Part {}/{} at lines {}-{} (depth {} -> {})",
//!              chunk.ordinal, chunk.total_count, chunk.start_line, chunk.end_line,
//!              chunk.depth_in, chunk.depth_out);
//! }
//!
//! let found = splitter.extract(code, "greet", Dialect::CFamily);
//! assert!(found.found);
//! ```

mod assembler;
mod boundary;
mod config;
mod construct;
mod context;
mod dialect;
mod error;
mod hints;
mod scanner;
mod scope;
mod source;
mod splitter;
mod stats;
mod types;

pub use assembler::chunk;
pub use boundary::{
    heuristic_depth_zero_newline, select_boundary, snap_to_line_end, Boundary, CutReason,
    SoftCaps, CLOSING_TOKENS, IIFE_TOKENS,
};
pub use config::{BoundaryStrategy, SplitterConfig};
pub use construct::extract_construct;
pub use context::extract_context;
pub use dialect::Dialect;
pub use error::{Result, SplitterError};
pub use hints::{defined_names, top_identifiers, ChunkHints};
pub use scanner::{advance, scan_range, LexMode, ScanState, ScanStep, Scanner, Transition};
pub use scope::{
    scope_index, IndexedNames, ScopeIndex, MAX_INDEXED_DOM, MAX_INDEXED_IDENTIFIERS,
    MAX_INDEXED_KEYS, MAX_INDEXED_SELECTORS, TOP_FREQUENT_IDENTIFIERS,
};
pub use source::SourceText;
pub use splitter::Splitter;
pub use stats::SplitStats;
pub use types::{
    content_hash, Chunk, ConstructKind, ContextExtraction, ContextMatch, ExtractionFailure,
    ExtractionResult,
};
