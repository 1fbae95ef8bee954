use context_code_splitter::{
    BoundaryStrategy, Chunk, ChunkHints, ContextExtraction, ExtractionResult, IndexedNames,
    ScopeIndex, SplitStats,
};
use serde::Serialize;

/// Hash prefix shown in text summaries
const SHORT_HASH_LEN: usize = 12;

#[derive(Debug, Serialize)]
pub struct SplitReport<'a> {
    pub file: String,
    pub strategy: BoundaryStrategy,
    pub stats: SplitStats,
    pub chunks: Vec<ChunkReport<'a>>,
}

#[derive(Debug, Serialize)]
pub struct ChunkReport<'a> {
    #[serde(flatten)]
    pub chunk: &'a Chunk,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hints: Option<ChunkHints>,
}

#[derive(Debug, Serialize)]
pub struct ExtractReport<'a> {
    pub file: String,
    pub name: &'a str,
    #[serde(flatten)]
    pub result: &'a ExtractionResult,
}

#[derive(Debug, Serialize)]
pub struct GrepReport<'a> {
    pub file: String,
    pub needle: &'a str,
    #[serde(flatten)]
    pub extraction: &'a ContextExtraction,
}

#[derive(Debug, Serialize)]
pub struct ScopeReport<'a> {
    pub file: String,
    #[serde(flatten)]
    pub index: &'a ScopeIndex,
}

pub fn render_split(report: &SplitReport<'_>) -> String {
    let mut out = String::new();
    for entry in &report.chunks {
        let chunk = entry.chunk;
        out.push_str(&format!(
            "[{}/{}] lines {}-{} chars {}..{} depth {}->{} sha256 {}\n",
            chunk.ordinal,
            chunk.total_count,
            chunk.start_line,
            chunk.end_line,
            chunk.start_offset,
            chunk.end_offset,
            chunk.depth_in,
            chunk.depth_out,
            &chunk.content_hash[..SHORT_HASH_LEN.min(chunk.content_hash.len())],
        ));
        out.push_str(&format!("    first: {}\n", truncate_one_line(&chunk.first_line, 100)));
        out.push_str(&format!("    last:  {}\n", truncate_one_line(&chunk.last_line, 100)));
        if let Some(hints) = &entry.hints {
            if !hints.defines.is_empty() {
                out.push_str(&format!("    defines: {}\n", hints.defines.join(", ")));
            }
            if !hints.top_identifiers.is_empty() {
                let top: Vec<String> = hints
                    .top_identifiers
                    .iter()
                    .map(|(ident, count)| format!("{ident}({count})"))
                    .collect();
                out.push_str(&format!("    top: {}\n", top.join(" ")));
            }
        }
    }
    out.push_str(&report.stats.to_string());
    out
}

pub fn render_extract(report: &ExtractReport<'_>) -> String {
    let result = report.result;
    if !result.found {
        let reason = result.reason.map_or("not found", |reason| reason.as_str());
        return format!("{}: {} ({reason})", report.file, report.name);
    }
    let kind = result.kind.map_or("construct", |kind| kind.as_str());
    format!(
        "// {kind} {} lines {}-{} chars {}..{}\n{}",
        report.name,
        result.start_line,
        result.end_line,
        result.start_offset,
        result.end_offset,
        result.body
    )
}

pub fn render_grep(report: &GrepReport<'_>) -> String {
    let extraction = report.extraction;
    let mut out = String::new();
    for m in &extraction.matches {
        out.push_str(&format!(
            "--- '{}' hit line {} (lines {}-{})\n",
            report.needle, m.hit_line_number, m.window_start, m.window_end
        ));
        out.push_str(&m.text);
        if !m.text.ends_with('\n') {
            out.push('\n');
        }
    }
    out.push_str(&format!(
        "{} hits, showing {}",
        extraction.hit_count,
        extraction.matches.len()
    ));
    out
}

pub fn render_scope(report: &ScopeReport<'_>) -> String {
    let index = report.index;
    let mut out = format!(
        "{}: {} identifiers | DOM ids: {} | DOM classes: {} | DOM names: {} | Selectors: {} | localStorage keys: {} | sessionStorage keys: {}\n",
        report.file,
        index.identifiers.total,
        index.dom_ids.total,
        index.dom_classes.total,
        index.dom_names.total,
        index.selectors.total,
        index.local_storage_keys.total,
        index.session_storage_keys.total,
    );
    if !index.top_identifiers.is_empty() {
        let top: Vec<String> = index
            .top_identifiers
            .iter()
            .map(|(ident, count)| format!("{ident}({count})"))
            .collect();
        out.push_str(&format!("top: {}\n", top.join(" ")));
    }
    for (label, names) in [
        ("identifiers", &index.identifiers),
        ("dom ids", &index.dom_ids),
        ("dom classes", &index.dom_classes),
        ("dom names", &index.dom_names),
        ("selectors", &index.selectors),
        ("localStorage keys", &index.local_storage_keys),
        ("sessionStorage keys", &index.session_storage_keys),
    ] {
        push_names(&mut out, label, names);
    }
    out.trim_end().to_string()
}

fn push_names(out: &mut String, label: &str, names: &IndexedNames) {
    if names.items.is_empty() {
        return;
    }
    out.push_str(&format!("{label}:\n"));
    for name in &names.items {
        out.push_str(&format!("  - {name}\n"));
    }
    if names.is_truncated() {
        out.push_str(&format!(
            "  ({} more not shown)\n",
            names.total - names.items.len()
        ));
    }
}

fn truncate_one_line(text: &str, max_chars: usize) -> String {
    let line = text.trim_end_matches('\r');
    if line.chars().count() <= max_chars {
        return line.to_string();
    }
    let mut out: String = line.chars().take(max_chars).collect();
    out.push('…');
    out
}
