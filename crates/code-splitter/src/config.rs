use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Result, SplitterError};

/// Configuration for splitting and extraction behavior
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitterConfig {
    /// Soft cap on chunk size in characters
    pub max_chars: usize,

    /// Soft cap on chunk size in lines
    pub max_lines: usize,

    /// How cut points are chosen once a soft cap is reached
    pub strategy: BoundaryStrategy,

    /// Extra forward search distance for `Hybrid`, as a fraction of the
    /// tentative cut offset
    pub grace_ratio: f64,

    /// Lines shown above and below each context hit
    pub context_lines: usize,

    /// Maximum number of context windows returned per search
    pub max_matches: usize,
}

impl Default for SplitterConfig {
    fn default() -> Self {
        Self {
            max_chars: 60_000,
            max_lines: 1_200,
            strategy: BoundaryStrategy::Strict,
            grace_ratio: 0.30,
            context_lines: 25,
            max_matches: 50,
        }
    }
}

impl SplitterConfig {
    /// Limits sized for pasting whole parts into a chat window
    pub fn for_chat_paste() -> Self {
        Self::default()
    }

    /// Smaller parts for models with a short context window
    pub fn for_small_context() -> Self {
        Self {
            max_chars: 12_000,
            max_lines: 300,
            context_lines: 10,
            ..Default::default()
        }
    }

    /// Prefer ending parts on IIFE terminators, with a bounded overshoot
    pub fn construct_first() -> Self {
        Self {
            strategy: BoundaryStrategy::Hybrid,
            ..Default::default()
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.max_chars == 0 {
            return Err(SplitterError::invalid_config("max_chars must be > 0"));
        }

        if self.max_lines == 0 {
            return Err(SplitterError::invalid_config("max_lines must be > 0"));
        }

        if self.max_matches == 0 {
            return Err(SplitterError::invalid_config("max_matches must be > 0"));
        }

        validate_grace_ratio(self.grace_ratio)
    }
}

pub(crate) fn validate_grace_ratio(grace_ratio: f64) -> Result<()> {
    if !grace_ratio.is_finite() || grace_ratio < 0.0 {
        return Err(SplitterError::invalid_config(format!(
            "grace_ratio must be a finite number >= 0 (got {grace_ratio})"
        )));
    }
    Ok(())
}

/// Strategy for choosing the cut point of a chunk
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BoundaryStrategy {
    /// Stay within the soft caps; prefer depth-zero lines, then closing tokens,
    /// then the last newline
    #[default]
    #[serde(alias = "C", alias = "c")]
    Strict,

    /// Extend the chunk forward to the next IIFE terminator, however far away
    #[serde(alias = "construct_priority", alias = "A", alias = "a")]
    ConstructPriority,

    /// Like `ConstructPriority`, but give up after a grace distance
    #[serde(alias = "B", alias = "b")]
    Hybrid,
}

impl BoundaryStrategy {
    pub const ALL: [Self; 3] = [Self::Strict, Self::ConstructPriority, Self::Hybrid];

    /// Get strategy name as string
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Strict => "strict",
            Self::ConstructPriority => "construct-priority",
            Self::Hybrid => "hybrid",
        }
    }
}

impl fmt::Display for BoundaryStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BoundaryStrategy {
    type Err = SplitterError;

    /// Accepts the long names and the single-letter mode names `C`, `A`, `B`.
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" | "c" => Ok(Self::Strict),
            "construct-priority" | "construct_priority" | "a" => Ok(Self::ConstructPriority),
            "hybrid" | "b" => Ok(Self::Hybrid),
            other => Err(SplitterError::invalid_config(format!(
                "unknown boundary strategy '{other}'"
            ))),
        }
    }
}
