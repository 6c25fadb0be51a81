//! Notebook model
//!
//! A notebook is an ordered list of cells plus a free-form metadata map. The text formats only
//! read and write the parts they understand: cell types, sources and metadata. Execution counts
//! and outputs are kept for the ipynb format.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// String-keyed metadata with arbitrary JSON values
pub type Metadata = Map<String, Value>;

/// Metadata key holding the notebook-wide default language
pub const MAIN_LANGUAGE: &str = "main_language";
/// Metadata key holding a code cell's language override
pub const LANGUAGE: &str = "language";
/// Metadata key for the number of blank lines following a cell (when not the default)
pub const SKIPLINES: &str = "skiplines";
/// The cell was delimited with explicit markers although none were required
pub const EXPLICIT_BOUNDARY: &str = "explicit_boundary";

/// Blank lines written after a cell when its metadata does not say otherwise
pub const DEFAULT_SKIPLINES: usize = 1;

/// Type of notebook cell
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellType {
    #[default]
    Code,
    Markdown,
    Raw,
}

impl std::fmt::Display for CellType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Code => "code",
            Self::Markdown => "markdown",
            Self::Raw => "raw",
        };
        write!(f, "{s}")
    }
}

/// A single notebook cell
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    /// nbformat 4.5 cell identifier; text formats do not carry it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub cell_type: CellType,
    #[serde(default)]
    pub metadata: Metadata,
    /// Cell source, lines separated by `\n`
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execution_count: Option<i64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub outputs: Vec<Value>,
}

impl Cell {
    pub fn new(cell_type: CellType, source: impl Into<String>) -> Self {
        Cell {
            cell_type,
            source: source.into(),
            ..Default::default()
        }
    }

    pub fn code(source: impl Into<String>) -> Self {
        Self::new(CellType::Code, source)
    }

    pub fn markdown(source: impl Into<String>) -> Self {
        Self::new(CellType::Markdown, source)
    }

    pub fn raw(source: impl Into<String>) -> Self {
        Self::new(CellType::Raw, source)
    }

    /// Builder-style helper to set a metadata entry
    pub fn with_metadata(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.to_string(), value.into());
        self
    }

    /// Build a cell from source lines
    pub fn from_lines(cell_type: CellType, lines: &[String]) -> Self {
        Self::new(cell_type, lines.join("\n"))
    }

    /// Source lines of the cell. An empty source has no lines.
    pub fn source_lines(&self) -> Vec<&str> {
        if self.source.is_empty() {
            Vec::new()
        } else {
            self.source.split('\n').collect()
        }
    }

    pub fn is_code(&self) -> bool {
        self.cell_type == CellType::Code
    }

    /// The cell's language override, if any
    pub fn language(&self) -> Option<&str> {
        self.metadata.get(LANGUAGE).and_then(Value::as_str)
    }

    /// Blank lines that follow the cell in its text representation
    pub fn skiplines(&self) -> usize {
        self.metadata
            .get(SKIPLINES)
            .and_then(Value::as_u64)
            .map(|n| n as usize)
            .unwrap_or(DEFAULT_SKIPLINES)
    }

    /// Record the blank lines following the cell, omitting the default
    pub fn set_skiplines(&mut self, count: usize) {
        if count == DEFAULT_SKIPLINES {
            self.metadata.remove(SKIPLINES);
        } else {
            self.metadata.insert(SKIPLINES.to_string(), Value::from(count));
        }
    }

    pub fn flag(&self, key: &str) -> bool {
        self.metadata.get(key).and_then(Value::as_bool).unwrap_or(false)
    }
}

/// A notebook: ordered cells and notebook-level metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notebook {
    pub cells: Vec<Cell>,
    #[serde(default)]
    pub metadata: Metadata,
    #[serde(default = "default_nbformat")]
    pub nbformat: u32,
    #[serde(default = "default_nbformat_minor")]
    pub nbformat_minor: u32,
}

fn default_nbformat() -> u32 {
    4
}

fn default_nbformat_minor() -> u32 {
    2
}

impl Default for Notebook {
    fn default() -> Self {
        Notebook {
            cells: Vec::new(),
            metadata: Metadata::new(),
            nbformat: default_nbformat(),
            nbformat_minor: default_nbformat_minor(),
        }
    }
}

impl Notebook {
    pub fn new(cells: Vec<Cell>, metadata: Metadata) -> Self {
        Notebook {
            cells,
            metadata,
            ..Default::default()
        }
    }

    /// Explicit `main_language` metadata, if any
    pub fn main_language(&self) -> Option<&str> {
        self.metadata.get(MAIN_LANGUAGE).and_then(Value::as_str)
    }

    /// `language_info.name` from the kernel metadata, if any
    pub fn language_info_name(&self) -> Option<&str> {
        self.metadata
            .get("language_info")
            .and_then(|info| info.get("name"))
            .and_then(Value::as_str)
    }
}
