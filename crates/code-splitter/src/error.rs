use thiserror::Error;

/// Result type for splitter operations
pub type Result<T> = std::result::Result<T, SplitterError>;

/// Errors that can occur while splitting or extracting.
///
/// Extraction misses are not errors; see [`crate::ExtractionFailure`].
#[derive(Error, Debug)]
pub enum SplitterError {
    /// Invalid configuration (non-positive size limits, bad grace ratio)
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl SplitterError {
    /// Create an invalid config error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Whether this error was raised before any scanning happened
    #[must_use]
    pub const fn is_config(&self) -> bool {
        matches!(self, Self::InvalidConfig(_))
    }
}
