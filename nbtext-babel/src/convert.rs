//! Conversion entry points.
//!
//! In-memory (`reads`/`writes`), stream (`read`/`write`) and file (`readf`/`writef`) variants of
//! the notebook codecs. The format always comes from an extension; file variants derive it from
//! the file name and reject unsupported names before touching the file system.
//!
//! [`convert`] chains a read and a write for the "convert this file to that format" use case,
//! returning the result in memory or writing it to an output path.

use crate::error::FormatError;
use crate::formats::NotebookFormat;
use crate::notebook::Notebook;
use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

/// Parse notebook text in the format named by `ext`
pub fn reads(text: &str, ext: &str) -> Result<Notebook, FormatError> {
    NotebookFormat::from_extension(ext)?.parse(text)
}

/// Render a notebook in the format named by `ext`
pub fn writes(notebook: &Notebook, ext: &str) -> Result<String, FormatError> {
    NotebookFormat::from_extension(ext)?.serialize(notebook)
}

/// Read a notebook from a stream
pub fn read(mut reader: impl Read, ext: &str) -> Result<Notebook, FormatError> {
    let format = NotebookFormat::from_extension(ext)?;
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    format.parse(&text)
}

/// Write a notebook to a stream
pub fn write(notebook: &Notebook, mut writer: impl Write, ext: &str) -> Result<(), FormatError> {
    let text = writes(notebook, ext)?;
    writer.write_all(text.as_bytes())?;
    writer.flush()?;
    Ok(())
}

/// Read a notebook file; the format comes from the file extension
pub fn readf(path: impl AsRef<Path>) -> Result<Notebook, FormatError> {
    let path = path.as_ref();
    let format = NotebookFormat::from_path(path)?;
    tracing::debug!(path = %path.display(), %format, "reading notebook file");
    let text = fs::read_to_string(path)?;
    format.parse(&text)
}

/// Write a notebook file; the format comes from the file extension
pub fn writef(notebook: &Notebook, path: impl AsRef<Path>) -> Result<(), FormatError> {
    let path = path.as_ref();
    let format = NotebookFormat::from_path(path)?;
    let text = format.serialize(notebook)?;
    tracing::debug!(path = %path.display(), %format, "writing notebook file");
    fs::write(path, text)?;
    Ok(())
}

/// Specifies how to convert a notebook file.
///
/// ```ignore
/// let spec = ConvertSpec::new("analysis.Rmd", ".py").with_output_path("analysis.py");
/// ```
///
/// Without an output path the converted text is returned in memory.
#[derive(Debug, Clone)]
pub struct ConvertSpec {
    pub input: PathBuf,
    /// Target extension (e.g. ".py", "ipynb")
    pub to: String,
    pub output: Option<PathBuf>,
    /// Whether an existing output file may be replaced
    pub overwrite: bool,
}

impl ConvertSpec {
    pub fn new(input: impl AsRef<Path>, to: impl Into<String>) -> Self {
        Self {
            input: input.as_ref().to_path_buf(),
            to: to.into(),
            output: None,
            overwrite: true,
        }
    }

    pub fn with_output_path(mut self, path: impl AsRef<Path>) -> Self {
        self.output = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }
}

/// The output of a successful conversion
#[derive(Debug, Clone, PartialEq)]
pub enum ConvertArtifact {
    InMemory(String),
    File(PathBuf),
}

/// Convert a notebook file as described by a [`ConvertSpec`].
///
/// Both formats are resolved before the input is read.
pub fn convert(spec: ConvertSpec) -> Result<ConvertArtifact, FormatError> {
    let source = NotebookFormat::from_path(&spec.input)?;
    let target = NotebookFormat::from_extension(&spec.to)?;
    if let Some(output) = &spec.output {
        if !spec.overwrite && output.exists() {
            return Err(FormatError::Io(std::io::Error::new(
                std::io::ErrorKind::AlreadyExists,
                format!("{} already exists", output.display()),
            )));
        }
    }

    let notebook = source.parse(&fs::read_to_string(&spec.input)?)?;
    let text = target.serialize(&notebook)?;
    tracing::info!(
        input = %spec.input.display(),
        from = %source,
        to = %target,
        cells = notebook.cells.len(),
        "converted notebook"
    );

    match spec.output {
        Some(path) => {
            fs::write(&path, text)?;
            Ok(ConvertArtifact::File(path))
        }
        None => Ok(ConvertArtifact::InMemory(text)),
    }
}
