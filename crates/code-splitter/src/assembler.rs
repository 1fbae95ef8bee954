use crate::boundary::{select_boundary, SoftCaps};
use crate::config::{validate_grace_ratio, BoundaryStrategy};
use crate::error::{Result, SplitterError};
use crate::scanner::ScanState;
use crate::source::SourceText;
use crate::types::{content_hash, Chunk};

/// Partition `text` into ordered, gap-free, newline-aligned chunks.
///
/// Fails only on invalid limits, before any scanning. Concatenating the
/// returned texts reproduces `text` exactly; an empty text yields one empty
/// chunk.
pub fn chunk(
    text: &str,
    max_chars: usize,
    max_lines: usize,
    strategy: BoundaryStrategy,
    grace_ratio: f64,
) -> Result<Vec<Chunk>> {
    if max_chars == 0 {
        return Err(SplitterError::invalid_config("max_chars must be > 0"));
    }
    if max_lines == 0 {
        return Err(SplitterError::invalid_config("max_lines must be > 0"));
    }
    validate_grace_ratio(grace_ratio)?;

    let source = SourceText::new(text);
    let caps = SoftCaps {
        max_chars,
        max_lines,
    };
    Ok(assemble(&source, caps, strategy, grace_ratio))
}

#[derive(Debug, Clone, Copy)]
struct Span {
    start: usize,
    end: usize,
    depth_in: usize,
    depth_out: usize,
}

fn assemble(
    source: &SourceText<'_>,
    caps: SoftCaps,
    strategy: BoundaryStrategy,
    grace_ratio: f64,
) -> Vec<Chunk> {
    let len = source.len();
    if len == 0 {
        return vec![build_chunk(
            source,
            1,
            1,
            Span {
                start: 0,
                end: 0,
                depth_in: 0,
                depth_out: 0,
            },
        )];
    }

    // Full scanner state, not just depth, carries into the next chunk.
    let mut spans = Vec::new();
    let mut state = ScanState::default();
    let mut start = 0;
    while start < len {
        let boundary = select_boundary(source, start, caps, strategy, grace_ratio, state);
        debug_assert!(boundary.cut > start, "boundary must advance");
        spans.push(Span {
            start,
            end: boundary.cut,
            depth_in: state.brace_depth,
            depth_out: boundary.depth_at_cut(),
        });
        state = boundary.state;
        start = boundary.cut;
    }

    let total = spans.len();
    log::debug!("split {len} chars into {total} chunks ({strategy})");

    spans
        .into_iter()
        .enumerate()
        .map(|(idx, span)| build_chunk(source, idx + 1, total, span))
        .collect()
}

fn build_chunk(source: &SourceText<'_>, ordinal: usize, total_count: usize, span: Span) -> Chunk {
    let text = source.slice(span.start, span.end);
    let first_line = text.lines().next().unwrap_or_default().to_string();
    let last_line = text.lines().last().unwrap_or_default().to_string();
    let start_line = source.line_of(span.start) + 1;
    let end_line = source.line_of(span.start.max(span.end.saturating_sub(1))) + 1;

    Chunk {
        ordinal,
        total_count,
        start_offset: span.start,
        end_offset: span.end,
        content_hash: content_hash(&text),
        text,
        start_line,
        end_line,
        depth_in: span.depth_in,
        depth_out: span.depth_out,
        first_line,
        last_line,
    }
}
