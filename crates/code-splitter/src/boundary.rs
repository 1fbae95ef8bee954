use serde::Serialize;

use crate::config::BoundaryStrategy;
use crate::scanner::{scan_range, ScanState, ScanStep, Scanner};
use crate::source::SourceText;

/// Lookback for the depth-zero newline heuristic
pub const DEPTH_ZERO_LOOKBACK: usize = 12_000;

/// Lookback for closing-token search
pub const CLOSING_TOKEN_LOOKBACK: usize = 2_000;

/// Block/call endings tried in order by `Strict`
pub const CLOSING_TOKENS: [&str; 3] = ["\n})();\n", "\n});\n", "\n}\n"];

/// IIFE terminators searched forward by `ConstructPriority` and `Hybrid`
pub const IIFE_TOKENS: [&str; 4] = ["\n})();\n", "})();\n", "\n})();", "})();"];

/// Soft size limits for a single chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SoftCaps {
    pub max_chars: usize,
    pub max_lines: usize,
}

/// Which rule produced the cut candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CutReason {
    /// The soft caps reach the end of the text
    EndOfText,
    /// Last newline at local brace depth zero
    DepthZeroNewline,
    /// One of [`CLOSING_TOKENS`]
    ClosingToken,
    /// One of [`IIFE_TOKENS`]
    IifeTerminator,
    /// Last newline before the soft cap
    LastNewline,
    /// Nothing better; cut at the soft cap (then snapped to the line end)
    HardCut,
}

/// A chosen cut and the authoritative scanner state there
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Boundary {
    pub cut: usize,
    pub state: ScanState,
    pub reason: CutReason,
}

impl Boundary {
    #[must_use]
    pub const fn depth_at_cut(&self) -> usize {
        self.state.brace_depth
    }
}

/// Choose where the chunk starting at `start` ends.
///
/// The candidate comes from the strategy's search; the returned state is
/// computed by scanning `[start, cut)` from `carried`, so it is exact as long as
/// `carried` is.
#[must_use]
pub fn select_boundary(
    source: &SourceText<'_>,
    start: usize,
    caps: SoftCaps,
    strategy: BoundaryStrategy,
    grace_ratio: f64,
    carried: ScanState,
) -> Boundary {
    let len = source.len();
    let cap_by_chars = start.saturating_add(caps.max_chars).min(len);
    let cap_by_lines = source
        .after_nth_newline(start, caps.max_lines)
        .unwrap_or(len);
    let tentative = cap_by_chars.min(cap_by_lines);

    let (candidate, reason) = if tentative >= len {
        (len, CutReason::EndOfText)
    } else {
        match strategy {
            BoundaryStrategy::Strict => strict_candidate(source, start, tentative),
            BoundaryStrategy::ConstructPriority => {
                iife_candidate(source, start, tentative, len)
            }
            BoundaryStrategy::Hybrid => {
                let search_to = tentative
                    .saturating_add(grace_distance(tentative, grace_ratio))
                    .min(len);
                iife_candidate(source, start, tentative, search_to)
            }
        }
    };

    let cut = snap_to_line_end(source, start, candidate);
    if reason == CutReason::HardCut {
        log::warn!(
            "no usable boundary in {start}..{tentative}; cutting at end of line ({cut})"
        );
    }
    log::debug!(
        "boundary[{strategy}] start={start} tentative={tentative} candidate={candidate} cut={cut} via {reason:?}"
    );

    Boundary {
        cut,
        state: scan_range(source.chars(), start, cut, carried),
        reason,
    }
}

/// Forward search distance for `Hybrid`: `floor(tentative * grace_ratio)`
/// characters past the tentative cut, so the window grows with the offset.
#[must_use]
pub fn grace_distance(tentative: usize, grace_ratio: f64) -> usize {
    if !grace_ratio.is_finite() || grace_ratio <= 0.0 {
        return 0;
    }
    // `as` truncates toward zero and saturates for huge ratios.
    (tentative as f64 * grace_ratio) as usize
}

fn strict_candidate(source: &SourceText<'_>, start: usize, tentative: usize) -> (usize, CutReason) {
    let window_from = start.max(tentative.saturating_sub(DEPTH_ZERO_LOOKBACK));
    if let Some(cut) =
        heuristic_depth_zero_newline(source, window_from, tentative).filter(|&cut| cut > start)
    {
        return (cut, CutReason::DepthZeroNewline);
    }

    let token_from = start.max(tentative.saturating_sub(CLOSING_TOKEN_LOOKBACK));
    for token in CLOSING_TOKENS {
        let token: Vec<char> = token.chars().collect();
        if let Some(pos) = source.rfind_token(&token, token_from, tentative) {
            return (pos + token.len(), CutReason::ClosingToken);
        }
    }

    newline_fallback(source, start, tentative)
}

/// Candidate only: the last offset right after a newline that sits at brace
/// depth zero within `[from, to)`.
///
/// The depth counter starts at zero at `from` instead of inheriting the real
/// depth, which keeps the search bounded but can misjudge nesting. Callers
/// must never treat the result as the true depth at that offset.
#[must_use]
pub fn heuristic_depth_zero_newline(
    source: &SourceText<'_>,
    from: usize,
    to: usize,
) -> Option<usize> {
    Scanner::new(source.chars(), from, to, ScanState::default())
        .filter(ScanStep::ends_line_at_depth_zero)
        .last()
        .map(|step| step.offset + 1)
}

fn iife_candidate(
    source: &SourceText<'_>,
    start: usize,
    tentative: usize,
    search_to: usize,
) -> (usize, CutReason) {
    let mut best: Option<(usize, usize)> = None;
    for token in IIFE_TOKENS {
        let token: Vec<char> = token.chars().collect();
        if let Some(pos) = source.find_token(&token, tentative, search_to) {
            if best.map_or(true, |(best_pos, _)| pos < best_pos) {
                best = Some((pos, token.len()));
            }
        }
    }

    match best {
        Some((pos, token_len)) => (pos + token_len, CutReason::IifeTerminator),
        None => {
            log::trace!("no IIFE terminator in {tentative}..{search_to}; falling back to newline");
            newline_fallback(source, start, tentative)
        }
    }
}

fn newline_fallback(source: &SourceText<'_>, start: usize, tentative: usize) -> (usize, CutReason) {
    match source.rfind_newline(start, tentative) {
        Some(nl) if nl > start => (nl + 1, CutReason::LastNewline),
        _ => (tentative, CutReason::HardCut),
    }
}

/// Move `end` forward to just after the next newline (or the end of text), and
/// force progress when `end` does not advance past `start`.
#[must_use]
pub fn snap_to_line_end(source: &SourceText<'_>, start: usize, end: usize) -> usize {
    let len = source.len();
    let past_next_newline = |from: usize| source.find_newline(from, len).map_or(len, |nl| nl + 1);

    if end <= start {
        return past_next_newline(start);
    }
    if end >= len {
        return len;
    }
    if source.char_at(end - 1) == Some('\n') {
        return end;
    }
    past_next_newline(end)
}
