//! Error types for format operations

use thiserror::Error;

/// Number of unconsumed lines kept in a [`FormatError::MalformedDocument`] snippet.
pub const SNIPPET_LINES: usize = 6;

/// Errors that can occur during format operations
#[derive(Debug, Error)]
pub enum FormatError {
    /// Extension or file name outside the supported notebook formats
    #[error("'{name}' is not a recognized notebook file (expected one of .ipynb, .Rmd, .py, .R)")]
    UnsupportedFormat { name: String },

    /// The remaining lines could not be segmented into a cell
    #[error("Malformed document: {reason}\n{}", snippet.join("\n"))]
    MalformedDocument {
        reason: String,
        /// The first lines of the unconsumed input, for diagnostics
        snippet: Vec<String>,
    },

    /// Options on a `# + {...}` chunk marker are not a JSON object
    #[error("Invalid chunk options '{options}': {message}")]
    InvalidChunkOptions { options: String, message: String },

    /// Error from the underlying reader or writer
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Error in the ipynb JSON document
    #[error("Invalid notebook JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Error in the YAML front matter
    #[error("Invalid YAML header: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl FormatError {
    /// Build a [`FormatError::MalformedDocument`] keeping at most [`SNIPPET_LINES`] lines.
    pub fn malformed(reason: impl Into<String>, remaining: &[String]) -> Self {
        FormatError::MalformedDocument {
            reason: reason.into(),
            snippet: remaining.iter().take(SNIPPET_LINES).cloned().collect(),
        }
    }

    pub fn unsupported(name: impl Into<String>) -> Self {
        FormatError::UnsupportedFormat { name: name.into() }
    }
}
