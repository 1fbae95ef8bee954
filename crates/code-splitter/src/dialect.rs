use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

use crate::error::{Result, SplitterError};

/// How constructs are delimited in a source file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Dialect {
    /// Braces delimit blocks (JavaScript, TypeScript, C, Java, ...)
    #[default]
    CFamily,
    /// Indentation delimits blocks (Python)
    IndentationBased,
}

impl Dialect {
    /// Detect dialect from file extension
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "py" | "pyw" | "pyi" => Dialect::IndentationBased,
            _ => Dialect::CFamily,
        }
    }

    /// Detect dialect from file path
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .map(Self::from_extension)
            .unwrap_or_default()
    }

    /// Get dialect name as string
    pub fn as_str(self) -> &'static str {
        match self {
            Dialect::CFamily => "c-family",
            Dialect::IndentationBased => "indentation",
        }
    }
}

impl FromStr for Dialect {
    type Err = SplitterError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "c-family" | "cfamily" | "c" | "javascript" | "js" => Ok(Dialect::CFamily),
            "indentation" | "indentation-based" | "python" | "py" => {
                Ok(Dialect::IndentationBased)
            }
            other => Err(SplitterError::invalid_config(format!(
                "unknown dialect '{other}'"
            ))),
        }
    }
}
