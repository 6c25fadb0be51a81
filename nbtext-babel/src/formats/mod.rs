//! Format implementations
//!
//! The supported formats form a closed set, [`NotebookFormat`]. Text dialects carry their
//! [`FormatProfile`] as data and share one codec ([`TextFormat`]); `.ipynb` has its own.

pub mod chunk_options;
pub mod header;
pub mod ipynb;
pub mod language;
pub mod profile;
pub mod text;

pub use ipynb::IpynbFormat;
pub use profile::{FormatProfile, PY_SCRIPT, RMARKDOWN, R_SCRIPT};
pub use text::TextFormat;

use crate::error::FormatError;
use crate::format::Format;
use crate::notebook::Notebook;
use std::fmt;
use std::path::Path;

/// Notebook file formats, selected from the file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotebookFormat {
    RMarkdown,
    PyScript,
    RScript,
    Ipynb,
}

impl NotebookFormat {
    pub const ALL: [NotebookFormat; 4] = [
        NotebookFormat::Ipynb,
        NotebookFormat::RMarkdown,
        NotebookFormat::PyScript,
        NotebookFormat::RScript,
    ];

    /// Select a format from an extension, with or without the leading dot. Matching ignores case,
    /// so `.rmd` and `.r` are accepted too.
    pub fn from_extension(extension: &str) -> Result<Self, FormatError> {
        let bare = extension.strip_prefix('.').unwrap_or(extension);
        match bare.to_ascii_lowercase().as_str() {
            "ipynb" => Ok(NotebookFormat::Ipynb),
            "rmd" => Ok(NotebookFormat::RMarkdown),
            "py" => Ok(NotebookFormat::PyScript),
            "r" => Ok(NotebookFormat::RScript),
            _ => Err(FormatError::unsupported(extension)),
        }
    }

    /// Select a format from a file name
    pub fn from_path(path: &Path) -> Result<Self, FormatError> {
        let name = path.display().to_string();
        match path.extension().and_then(|e| e.to_str()) {
            Some(extension) => {
                Self::from_extension(extension).map_err(|_| FormatError::unsupported(name))
            }
            None => Err(FormatError::unsupported(name)),
        }
    }

    /// Canonical extension, with the leading dot
    pub fn extension(&self) -> &'static str {
        match self {
            NotebookFormat::Ipynb => ".ipynb",
            NotebookFormat::RMarkdown => RMARKDOWN.extension,
            NotebookFormat::PyScript => PY_SCRIPT.extension,
            NotebookFormat::RScript => R_SCRIPT.extension,
        }
    }

    /// Text profile of the format; `None` for `.ipynb`
    pub fn profile(&self) -> Option<&'static FormatProfile> {
        match self {
            NotebookFormat::Ipynb => None,
            NotebookFormat::RMarkdown => Some(&RMARKDOWN),
            NotebookFormat::PyScript => Some(&PY_SCRIPT),
            NotebookFormat::RScript => Some(&R_SCRIPT),
        }
    }

    /// The codec implementing this format
    pub fn codec(&self) -> Box<dyn Format> {
        match self.profile() {
            Some(profile) => Box::new(TextFormat::new(profile)),
            None => Box::new(IpynbFormat),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            NotebookFormat::Ipynb => "ipynb",
            NotebookFormat::RMarkdown => "rmd",
            NotebookFormat::PyScript => "py",
            NotebookFormat::RScript => "r",
        }
    }

    pub fn parse(&self, source: &str) -> Result<Notebook, FormatError> {
        tracing::debug!(format = self.name(), bytes = source.len(), "parsing notebook");
        self.codec().parse(source)
    }

    pub fn serialize(&self, notebook: &Notebook) -> Result<String, FormatError> {
        tracing::debug!(format = self.name(), cells = notebook.cells.len(), "serializing notebook");
        self.codec().serialize(notebook)
    }
}

impl fmt::Display for NotebookFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.extension())
    }
}
