//! Jupyter notebook (`.ipynb`) format
//!
//! nbformat v4 JSON. Cell sources are stored as lists of newline-terminated strings; a single
//! string is accepted when reading. Outputs and unknown metadata pass through untouched.
//!
//! Output mirrors what Jupyter writes: keys sorted, one-space indentation, trailing newline.

use crate::error::FormatError;
use crate::format::Format;
use crate::notebook::{Cell, CellType, Metadata, Notebook};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Only major version understood by this codec
pub const NBFORMAT: u32 = 4;

/// Format implementation for Jupyter notebooks
#[derive(Debug, Clone, Copy, Default)]
pub struct IpynbFormat;

impl Format for IpynbFormat {
    fn name(&self) -> &str {
        "ipynb"
    }

    fn description(&self) -> &str {
        "Jupyter notebook (nbformat v4 JSON)"
    }

    fn file_extensions(&self) -> &[&str] {
        &["ipynb"]
    }

    fn parse(&self, source: &str) -> Result<Notebook, FormatError> {
        parse_ipynb(source)
    }

    fn serialize(&self, notebook: &Notebook) -> Result<String, FormatError> {
        serialize_ipynb(notebook)
    }
}

#[derive(Deserialize)]
struct IpynbNotebook {
    cells: Vec<IpynbCell>,
    #[serde(default)]
    metadata: Metadata,
    nbformat: u32,
    #[serde(default)]
    nbformat_minor: u32,
}

#[derive(Deserialize)]
struct IpynbCell {
    cell_type: CellType,
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    metadata: Metadata,
    source: MultilineString,
    #[serde(default)]
    execution_count: Option<i64>,
    #[serde(default)]
    outputs: Vec<Value>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum MultilineString {
    Single(String),
    Lines(Vec<String>),
}

impl From<MultilineString> for String {
    fn from(value: MultilineString) -> Self {
        match value {
            MultilineString::Single(text) => text,
            MultilineString::Lines(lines) => lines.concat(),
        }
    }
}

pub fn parse_ipynb(source: &str) -> Result<Notebook, FormatError> {
    let raw: IpynbNotebook = serde_json::from_str(source)?;
    if raw.nbformat != NBFORMAT {
        return Err(FormatError::malformed(
            format!("nbformat {} is not supported (expected {NBFORMAT})", raw.nbformat),
            &[],
        ));
    }

    let cells: Vec<Cell> = raw
        .cells
        .into_iter()
        .map(|cell| Cell {
            id: cell.id,
            cell_type: cell.cell_type,
            metadata: cell.metadata,
            source: cell.source.into(),
            execution_count: cell.execution_count,
            outputs: cell.outputs,
        })
        .collect();
    tracing::debug!(cells = cells.len(), minor = raw.nbformat_minor, "read ipynb notebook");

    Ok(Notebook {
        cells,
        metadata: raw.metadata,
        nbformat: raw.nbformat,
        nbformat_minor: raw.nbformat_minor,
    })
}

pub fn serialize_ipynb(notebook: &Notebook) -> Result<String, FormatError> {
    let mut document = Metadata::new();
    document.insert(
        "cells".to_string(),
        Value::Array(notebook.cells.iter().map(cell_to_json).collect()),
    );
    document.insert(
        "metadata".to_string(),
        Value::Object(notebook.metadata.clone()),
    );
    document.insert("nbformat".to_string(), Value::from(notebook.nbformat));
    document.insert(
        "nbformat_minor".to_string(),
        Value::from(notebook.nbformat_minor),
    );

    let mut buffer = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b" ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    Value::Object(document).serialize(&mut serializer)?;

    let mut text = String::from_utf8(buffer)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
    text.push('\n');
    Ok(text)
}

fn cell_to_json(cell: &Cell) -> Value {
    let mut map = Metadata::new();
    map.insert(
        "cell_type".to_string(),
        Value::String(cell.cell_type.to_string()),
    );
    if let Some(id) = &cell.id {
        map.insert("id".to_string(), Value::String(id.clone()));
    }
    map.insert("metadata".to_string(), Value::Object(cell.metadata.clone()));
    map.insert("source".to_string(), source_to_json(&cell.source));
    if cell.cell_type == CellType::Code {
        map.insert(
            "execution_count".to_string(),
            cell.execution_count.map_or(Value::Null, Value::from),
        );
        map.insert("outputs".to_string(), Value::Array(cell.outputs.clone()));
    }
    Value::Object(map)
}

/// `"a\nb"` → `["a\n", "b"]`
fn source_to_json(source: &str) -> Value {
    Value::Array(
        source
            .split_inclusive('\n')
            .map(|line| Value::String(line.to_string()))
            .collect(),
    )
}
