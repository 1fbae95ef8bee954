use crate::assembler;
use crate::config::SplitterConfig;
use crate::construct;
use crate::context;
use crate::dialect::Dialect;
use crate::error::Result;
use crate::stats::SplitStats;
use crate::types::{Chunk, ContextExtraction, ExtractionResult};

/// Splitter and extractor bound to one validated configuration
#[derive(Debug, Clone)]
pub struct Splitter {
    config: SplitterConfig,
}

impl Splitter {
    /// Create a splitter, rejecting invalid limits up front
    pub fn new(config: SplitterConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    #[must_use]
    pub const fn config(&self) -> &SplitterConfig {
        &self.config
    }

    /// Split `text` into chunks using the configured limits and strategy
    pub fn split(&self, text: &str) -> Result<Vec<Chunk>> {
        assembler::chunk(
            text,
            self.config.max_chars,
            self.config.max_lines,
            self.config.strategy,
            self.config.grace_ratio,
        )
    }

    /// Extract the construct called `name`
    #[must_use]
    pub fn extract(&self, text: &str, name: &str, dialect: Dialect) -> ExtractionResult {
        construct::extract_construct(text, name, dialect)
    }

    /// Literal search with the configured window size and match cap
    pub fn grep(&self, text: &str, needle: &str) -> Result<ContextExtraction> {
        context::extract_context(
            text,
            needle,
            self.config.context_lines,
            self.config.max_matches,
        )
    }

    /// Get statistics about a split made with this configuration
    #[must_use]
    pub fn stats(&self, chunks: &[Chunk]) -> SplitStats {
        SplitStats::from_chunks(chunks, self.config.max_chars)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BoundaryStrategy;

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = SplitterConfig {
            max_lines: 0,
            ..Default::default()
        };
        assert!(Splitter::new(config).unwrap_err().is_config());
    }

    #[test]
    fn test_split_uses_configured_limits() {
        let splitter = Splitter::new(SplitterConfig {
            max_lines: 1,
            ..SplitterConfig::for_small_context()
        })
        .unwrap();
        let chunks = splitter.split("a\nb\n").unwrap();
        assert_eq!(chunks.len(), 2);
        assert_eq!(splitter.stats(&chunks).total_chunks, 2);
        assert_eq!(splitter.config().strategy, BoundaryStrategy::Strict);
    }

    #[test]
    fn test_grep_uses_configured_window() {
        let splitter = Splitter::new(SplitterConfig {
            context_lines: 0,
            max_matches: 1,
            ..Default::default()
        })
        .unwrap();
        let found = splitter.grep("x\ny\nx\n", "x").unwrap();
        assert_eq!(found.hit_count, 2);
        assert_eq!(found.matches[0].text, "x\n");
    }

    #[test]
    fn test_extract_delegates_by_dialect() {
        let splitter = Splitter::new(SplitterConfig::default()).unwrap();
        assert!(splitter.extract("def go():\n    pass\n", "go", Dialect::IndentationBased).found);
        assert!(!splitter.extract("def go():\n    pass\n", "go", Dialect::CFamily).found);
    }
}
