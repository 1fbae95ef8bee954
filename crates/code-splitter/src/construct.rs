//! Whole-construct extraction by name.
//!
//! C-family constructs are located by signature regex and closed by brace
//! matching on the lexical scanner, so braces in strings and comments are
//! skipped. Indentation-based constructs end at the first non-blank line that
//! is not indented deeper than the signature line.

use regex::Regex;

use crate::dialect::Dialect;
use crate::scanner::{ScanState, Scanner};
use crate::source::SourceText;
use crate::types::{ConstructKind, ExtractionResult};

/// Where brace matching starts relative to a signature match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BodyStart {
    /// Right after the match; the opening brace is still ahead
    AfterMatch,
    /// At the last matched character: the opening brace itself, or the
    /// first character after the name
    LastMatchedChar,
}

/// One signature form, tried in list order
#[derive(Debug, Clone, Copy)]
struct Signature {
    /// Regex template; `{name}` is replaced by the escaped construct name
    template: &'static str,
    kind: ConstructKind,
    body_start: BodyStart,
}

const EXPORT_PREFIX: &str = r"(?:export\s+default\s+)?(?:export\s+)?";

/// Signature forms in priority order; the first that matches anywhere wins
const SIGNATURES: &[Signature] = &[
    Signature {
        template: r"(?m)^[ \t]*{export}function\s+{name}\s*\(",
        kind: ConstructKind::Function,
        body_start: BodyStart::AfterMatch,
    },
    Signature {
        template: r"(?m)^[ \t]*{export}async\s+function\s+{name}\s*\(",
        kind: ConstructKind::AsyncFunction,
        body_start: BodyStart::AfterMatch,
    },
    Signature {
        template: r"(?m)^[ \t]*{export}function\s*\*\s*{name}\s*\(",
        kind: ConstructKind::GeneratorFunction,
        body_start: BodyStart::AfterMatch,
    },
    Signature {
        template: r"(?m)^[ \t]*{export}async\s+function\s*\*\s*{name}\s*\(",
        kind: ConstructKind::GeneratorFunction,
        body_start: BodyStart::AfterMatch,
    },
    Signature {
        template: r"(?m)^[ \t]*(?:var|let|const)\s+{name}\s*=\s*(?:async\s+)?function\s*\(",
        kind: ConstructKind::FunctionExpression,
        body_start: BodyStart::AfterMatch,
    },
    Signature {
        template: r"(?m)^[ \t]*(?:var|let|const)\s+{name}\s*=\s*(?:async\s*)?\([^)]*\)\s*=>\s*\{",
        kind: ConstructKind::ArrowFunction,
        body_start: BodyStart::LastMatchedChar,
    },
    Signature {
        template: r"(?m)^[ \t]*(?:var|let|const)\s+{name}\s*=\s*(?:async\s+)?[A-Za-z_$][A-Za-z0-9_$]*\s*=>\s*\{",
        kind: ConstructKind::ArrowFunction,
        body_start: BodyStart::LastMatchedChar,
    },
    Signature {
        template: r"(?m)^[ \t]*{export}class\s+{name}(?:[^A-Za-z0-9_$]|$)",
        kind: ConstructKind::Class,
        body_start: BodyStart::LastMatchedChar,
    },
];

/// Spaces a tab counts for when comparing indentation
const TAB_WIDTH: usize = 4;

/// Locate the construct called `name` and return its verbatim span.
///
/// A miss is a normal result (`found == false` with a reason), never an error.
#[must_use]
pub fn extract_construct(text: &str, name: &str, dialect: Dialect) -> ExtractionResult {
    let name = name.trim();
    if name.is_empty() {
        log::debug!("construct extraction skipped: empty name");
        return ExtractionResult::not_found();
    }

    let source = SourceText::new(text);
    let result = match dialect {
        Dialect::CFamily => extract_braced(&source, name),
        Dialect::IndentationBased => extract_indented(&source, name),
    };

    if result.found {
        log::debug!(
            "extracted {name} ({}) at chars {}..{}",
            result.kind.map_or("?", ConstructKind::as_str),
            result.start_offset,
            result.end_offset
        );
    } else {
        log::debug!(
            "construct {name} not extracted: {}",
            result.reason.map_or("?", |reason| reason.as_str())
        );
    }
    result
}

fn signature_regex(signature: &Signature, name: &str) -> Option<Regex> {
    let pattern = signature
        .template
        .replace("{export}", EXPORT_PREFIX)
        .replace("{name}", &regex::escape(name));
    match Regex::new(&pattern) {
        Ok(regex) => Some(regex),
        Err(err) => {
            log::warn!("skipping {} signature for {name}: {err}", signature.kind.as_str());
            None
        }
    }
}

fn extract_braced(source: &SourceText<'_>, name: &str) -> ExtractionResult {
    let text = source.as_str();
    let hit = SIGNATURES.iter().find_map(|signature| {
        signature_regex(signature, name)?
            .find(text)
            .map(|m| (signature, m.start(), m.end()))
    });
    let Some((signature, match_start, match_end)) = hit else {
        return ExtractionResult::not_found();
    };

    let start = source.char_offset(match_start);
    let search_from = match signature.body_start {
        BodyStart::AfterMatch => source.char_offset(match_end),
        BodyStart::LastMatchedChar => source.char_offset(match_end).saturating_sub(1),
    };

    match matching_brace_end(source, search_from) {
        Some(end) => ExtractionResult::found(
            signature.kind,
            start,
            end,
            source.slice(start, end),
            source.line_of(start) + 1,
            source.line_of(end.saturating_sub(1)) + 1,
        ),
        None => ExtractionResult::unterminated(signature.kind),
    }
}

/// Offset just past the `}` closing the first code-level `{` at or after `from`
fn matching_brace_end(source: &SourceText<'_>, from: usize) -> Option<usize> {
    let mut opened = false;
    for step in Scanner::new(source.chars(), from, source.len(), ScanState::default()) {
        if step.state.brace_depth > 0 {
            opened = true;
        } else if opened {
            return Some(step.offset + 1);
        }
    }
    None
}

fn extract_indented(source: &SourceText<'_>, name: &str) -> ExtractionResult {
    let pattern = format!(r"^([ \t]*)(async\s+def|def|class)\s+{}\b", regex::escape(name));
    let signature = match Regex::new(&pattern) {
        Ok(regex) => regex,
        Err(err) => {
            log::warn!("skipping indented signature for {name}: {err}");
            return ExtractionResult::not_found();
        }
    };

    let lines: Vec<&str> = source.as_str().split_inclusive('\n').collect();
    let hit = lines.iter().enumerate().find_map(|(idx, line)| {
        let caps = signature.captures(line)?;
        let indent = indent_width(caps.get(1).map_or("", |m| m.as_str()));
        let kind = match caps.get(2).map(|m| m.as_str()) {
            Some("class") => ConstructKind::Class,
            Some(keyword) if keyword.starts_with("async") => ConstructKind::AsyncDef,
            _ => ConstructKind::Def,
        };
        Some((idx, indent, kind))
    });
    let Some((first, base_indent, kind)) = hit else {
        return ExtractionResult::not_found();
    };

    let end = lines
        .iter()
        .enumerate()
        .skip(first + 1)
        .find(|(_, line)| !line.trim().is_empty() && indent_width(line) <= base_indent)
        .map_or(lines.len(), |(idx, _)| idx);

    let start_offset: usize = lines[..first].iter().map(|line| line.chars().count()).sum();
    let body: String = lines[first..end].concat();
    let end_offset = start_offset + body.chars().count();

    ExtractionResult::found(kind, start_offset, end_offset, body, first + 1, end)
}

fn indent_width(line: &str) -> usize {
    line.chars()
        .map_while(|ch| match ch {
            ' ' => Some(1),
            '\t' => Some(TAB_WIDTH),
            _ => None,
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ExtractionFailure;
    use pretty_assertions::assert_eq;

    fn c_family(text: &str, name: &str) -> ExtractionResult {
        extract_construct(text, name, Dialect::CFamily)
    }

    #[test]
    fn test_plain_function_is_extracted_whole() {
        let text = "function foo(a) {\n  return a + 1;\n}\n";
        let result = c_family(text, "foo");
        assert!(result.found);
        assert_eq!(result.body, "function foo(a) {\n  return a + 1;\n}");
        assert_eq!(result.kind, Some(ConstructKind::Function));
        assert_eq!((result.start_line, result.end_line), (1, 3));
    }

    #[test]
    fn test_truncated_body_is_unterminated() {
        let text = "function foo() {\n  if (x) {\n    y();\n";
        let result = c_family(text, "foo");
        assert!(!result.found);
        assert_eq!(result.reason, Some(ExtractionFailure::UnterminatedBlock));
        assert!(result.body.is_empty());
    }

    #[test]
    fn test_unknown_and_empty_names_are_not_found() {
        let text = "function foo() {}\n";
        assert_eq!(c_family(text, "bar").reason, Some(ExtractionFailure::NotFound));
        assert_eq!(c_family(text, "  ").reason, Some(ExtractionFailure::NotFound));
        // Prefix of another name must not match.
        assert!(!c_family(text, "fo").found);
    }

    #[test]
    fn test_braces_in_strings_and_comments_are_skipped() {
        let text = "function f() {\n  const s = \"}\";\n  // }\n  /* } */\n  return '{';\n}\nfunction g() {}\n";
        let result = c_family(text, "f");
        assert!(result.found);
        assert!(result.body.ends_with("return '{';\n}"));
        assert_eq!(result.end_line, 6);
    }

    #[test]
    fn test_declaration_outranks_function_expression() {
        let text = "var foo = function () {};\nfunction foo() { return 1; }\n";
        let result = c_family(text, "foo");
        assert_eq!(result.kind, Some(ConstructKind::Function));
        assert_eq!(result.start_offset, 26);
        assert_eq!(result.body, "function foo() { return 1; }");
    }

    #[test]
    fn test_exported_and_async_forms() {
        let text = "  export default async function load(url) {\n    return fetch(url);\n  }\n";
        let result = c_family(text, "load");
        assert_eq!(result.kind, Some(ConstructKind::AsyncFunction));
        assert_eq!(result.start_offset, 0);
        assert!(result.body.starts_with("  export default async"));

        let text = "function* ids() {\n  yield 1;\n}\n";
        assert_eq!(c_family(text, "ids").kind, Some(ConstructKind::GeneratorFunction));
    }

    #[test]
    fn test_block_arrow_includes_its_own_brace() {
        let text = "const add = (a, b) => {\n  return a + b;\n};\nadd(1, 2);\n";
        let result = c_family(text, "add");
        assert_eq!(result.kind, Some(ConstructKind::ArrowFunction));
        assert_eq!(result.body, "const add = (a, b) => {\n  return a + b;\n}");

        let text = "let inc = x => { return { v: x + 1 }; };\n";
        let result = c_family(text, "inc");
        assert_eq!(result.body, "let inc = x => { return { v: x + 1 }; }");
    }

    #[test]
    fn test_expression_arrow_is_not_extractable() {
        let text = "const twice = (x) => x * 2;\n";
        assert!(!c_family(text, "twice").found);
    }

    #[test]
    fn test_class_with_template_literal() {
        let text = "export class Widget extends Base {\n  render() { return `}`; }\n}\nnew Widget();\n";
        let result = c_family(text, "Widget");
        assert_eq!(result.kind, Some(ConstructKind::Class));
        assert_eq!(result.end_line, 3);
        assert!(result.body.ends_with("}`; }\n}"));
    }

    #[test]
    fn test_class_name_may_end_in_dollar() {
        let text = "class Foo$ {\n  run() { return 1; }\n}\nclass Foo{\n  x() {}\n}\n";
        let result = c_family(text, "Foo$");
        assert_eq!(result.kind, Some(ConstructKind::Class));
        assert_eq!(result.body, "class Foo$ {\n  run() { return 1; }\n}");

        // `Foo` is a prefix of `Foo$`, so only the second class matches.
        let result = c_family(text, "Foo");
        assert_eq!(result.start_line, 4);
        assert_eq!(result.body, "class Foo{\n  x() {}\n}");
    }

    #[test]
    fn test_offsets_are_characters() {
        let text = "// é\nfunction f() {}\n";
        let result = c_family(text, "f");
        assert_eq!(result.start_offset, 5);
        assert_eq!(result.end_offset, 20);
        assert_eq!(result.start_line, 2);
    }

    #[test]
    fn test_indented_class_runs_to_dedent() {
        let text = "import os\n\nclass A:\n    def run(self):\n        pass\n\n    x = 1\n\ndef main():\n    A().run()\n";
        let result = extract_construct(text, "A", Dialect::IndentationBased);
        assert!(result.found);
        assert_eq!(result.kind, Some(ConstructKind::Class));
        assert_eq!(result.body, "class A:\n    def run(self):\n        pass\n\n    x = 1\n\n");
        assert_eq!((result.start_line, result.end_line), (3, 8));
        assert_eq!(result.start_offset, 11);

        let method = extract_construct(text, "run", Dialect::IndentationBased);
        assert_eq!(method.body, "    def run(self):\n        pass\n\n");
        assert_eq!(method.kind, Some(ConstructKind::Def));
    }

    #[test]
    fn test_indented_block_at_end_of_text() {
        let text = "async def fetch():\n\treturn 1\n";
        let result = extract_construct(text, "fetch", Dialect::IndentationBased);
        assert_eq!(result.kind, Some(ConstructKind::AsyncDef));
        assert_eq!(result.body, text);
        assert_eq!(result.end_line, 2);
    }

    #[test]
    fn test_indented_name_needs_word_boundary() {
        let text = "def runner():\n    pass\n";
        assert!(!extract_construct(text, "run", Dialect::IndentationBased).found);
    }

    #[test]
    fn test_indent_width_counts_tabs() {
        assert_eq!(indent_width("\t  x"), 6);
        assert_eq!(indent_width("x"), 0);
    }
}
