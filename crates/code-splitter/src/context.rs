use crate::error::{Result, SplitterError};
use crate::source::SourceText;
use crate::types::{ContextExtraction, ContextMatch};

/// Find literal occurrences of `needle` and return the lines around each.
///
/// Hits are non-overlapping. An empty needle hits at every character. All
/// hits are counted, but only the first `max_matches` get a window.
pub fn extract_context(
    text: &str,
    needle: &str,
    context_lines: usize,
    max_matches: usize,
) -> Result<ContextExtraction> {
    if max_matches == 0 {
        return Err(SplitterError::invalid_config("max_matches must be > 0"));
    }

    let source = SourceText::new(text);
    let hits = hit_offsets(&source, needle);
    let hit_count = hits.len();

    // Windows never reach past the last real line.
    let last_line = source.line_count().saturating_sub(1);
    let matches: Vec<ContextMatch> = hits
        .into_iter()
        .take(max_matches)
        .map(|offset| {
            let line = source.line_of(offset);
            let first = line.saturating_sub(context_lines);
            let last = line.saturating_add(context_lines).min(last_line.max(line));
            ContextMatch {
                hit_line_number: line + 1,
                window_start: first + 1,
                window_end: last + 1,
                text: source.lines_text(first, last),
            }
        })
        .collect();

    if hit_count > matches.len() {
        log::debug!(
            "'{needle}': {hit_count} hits, returning first {}",
            matches.len()
        );
    }

    Ok(ContextExtraction { hit_count, matches })
}

/// Character offsets of every non-overlapping occurrence, in one pass
fn hit_offsets(source: &SourceText<'_>, needle: &str) -> Vec<usize> {
    if needle.is_empty() {
        return (0..source.len()).collect();
    }
    let text = source.as_str();
    // Hits arrive in increasing byte order; count only the gap since the last one.
    let mut last_byte = 0;
    let mut last_char = 0;
    text.match_indices(needle)
        .map(|(byte, _)| {
            last_char += text[last_byte..byte].chars().count();
            last_byte = byte;
            last_char
        })
        .collect()
}
