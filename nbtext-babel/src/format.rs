//! Format trait definition
//!
//! This module defines the Format trait implemented by every notebook codec. The trait provides a
//! uniform interface for parsing a file's contents into a [`Notebook`] and serializing it back.

use crate::error::FormatError;
use crate::notebook::Notebook;

/// Trait for notebook formats
///
/// Implementors provide bidirectional conversion between the file contents and a [`Notebook`].
///
/// # Examples
///
/// ```ignore
/// struct MyFormat;
///
/// impl Format for MyFormat {
///     fn name(&self) -> &str {
///         "my-format"
///     }
///
///     fn parse(&self, source: &str) -> Result<Notebook, FormatError> {
///         todo!()
///     }
///
///     fn serialize(&self, notebook: &Notebook) -> Result<String, FormatError> {
///         todo!()
///     }
/// }
/// ```
pub trait Format: Send + Sync {
    /// The name of this format (e.g., "rmd", "py", "ipynb")
    fn name(&self) -> &str;

    /// Optional description of this format
    fn description(&self) -> &str {
        ""
    }

    /// File extensions associated with this format, without the leading dot
    fn file_extensions(&self) -> &[&str] {
        &[]
    }

    /// Parse file contents into a Notebook
    fn parse(&self, source: &str) -> Result<Notebook, FormatError>;

    /// Serialize a Notebook into file contents
    ///
    /// The notebook is never modified; formats that normalize metadata work on a copy.
    fn serialize(&self, notebook: &Notebook) -> Result<String, FormatError>;
}
