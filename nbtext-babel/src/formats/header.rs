//! Header codec
//!
//! The leading lines of a text notebook may carry an executable shebang, an encoding declaration
//! and a YAML front matter block. The `jupyter:` entry of the front matter is the notebook
//! metadata; any other front matter is kept verbatim in a raw cell so that nothing is lost.
//!
//! ```text
//! #!/usr/bin/env python       executable  (scripts only)
//! # -*- coding: utf-8 -*-     encoding    (scripts only)
//! # ---
//! # title: Analysis           -> raw header cell
//! # jupyter:                  -> notebook metadata
//! #   main_language: python
//! # ---
//! ```

use super::profile::FormatProfile;
use crate::error::FormatError;
use crate::notebook::{Cell, CellType, Metadata, Notebook, DEFAULT_SKIPLINES};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

pub const EXECUTABLE: &str = "executable";
pub const ENCODING: &str = "encoding";

static HEADER_FENCE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^---\s*$").expect("valid regex"));
static JUPYTER_KEY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^jupyter\s*:\s*$").expect("valid regex"));
/// Emacs (`# -*- coding: utf-8 -*-`) and vim (`# vim: set fileencoding=utf-8 :`) declarations
static ENCODING_DECLARATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[ \t\f]*#[ \t]*(?:-\*-.*\bcoding[:=][ \t]*[-_.a-zA-Z0-9]+.*-\*-|vim?:.*\bfileencoding=[-_.a-zA-Z0-9]+)",
    )
    .expect("valid regex")
});

/// Result of reading the header of a text notebook
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Header {
    /// Notebook-level metadata
    pub metadata: Metadata,
    /// Raw cell holding front matter that is not notebook metadata
    pub cell: Option<Cell>,
    /// Number of lines that belong to the header
    pub consumed: usize,
}

/// Extract notebook metadata and the optional raw header cell from the first lines.
///
/// When no header is recognized, the result is empty and `consumed` is zero.
pub fn header_to_metadata_and_cell(
    lines: &[String],
    profile: &FormatProfile,
) -> Result<Header, FormatError> {
    let mut metadata = Metadata::new();
    let mut start = 0;

    if profile.line_comment().is_some() {
        if let Some(executable) = lines.first().and_then(|line| line.strip_prefix("#!")) {
            metadata.insert(EXECUTABLE.to_string(), Value::String(executable.to_string()));
            start = 1;
        }
        if let Some(line) = lines.get(start) {
            if ENCODING_DECLARATION.is_match(line) {
                metadata.insert(ENCODING.to_string(), Value::String(line.clone()));
                start += 1;
            }
        }
    }

    let Some(end) = find_front_matter_end(lines, start, profile) else {
        return Ok(Header {
            metadata,
            cell: None,
            consumed: start,
        });
    };

    let mut header = Vec::new();
    let mut jupyter = Vec::new();
    let mut in_jupyter = false;
    for line in &lines[start + 1..end] {
        let line = profile.unescape(line);
        if JUPYTER_KEY.is_match(&line) {
            in_jupyter = true;
        } else if !line.starts_with(char::is_whitespace) {
            in_jupyter = false;
        }
        if in_jupyter {
            jupyter.push(line);
        } else {
            header.push(line);
        }
    }

    if !jupyter.is_empty() {
        let parsed: Value = serde_yaml::from_str(&jupyter.join("\n"))?;
        match parsed.get("jupyter") {
            Some(Value::Object(map)) => metadata.extend(map.clone()),
            Some(Value::Null) | None => {}
            Some(_) => {
                return Err(FormatError::malformed(
                    "the 'jupyter' header entry is not a mapping",
                    &lines[start..],
                ))
            }
        }
    }

    let mut consumed = end + 1;
    let skiplines = match lines.get(consumed) {
        Some(line) if line.trim().is_empty() => {
            consumed += 1;
            1
        }
        _ => 0,
    };

    let cell = if header.iter().any(|line| !line.trim().is_empty()) {
        let mut source = vec!["---".to_string()];
        source.extend(header);
        source.push("---".to_string());
        let mut cell = Cell::from_lines(CellType::Raw, &source);
        cell.set_skiplines(skiplines);
        Some(cell)
    } else {
        None
    };

    tracing::debug!(
        consumed,
        metadata_keys = metadata.len(),
        header_cell = cell.is_some(),
        "parsed notebook header"
    );

    Ok(Header {
        metadata,
        cell,
        consumed,
    })
}

/// Index of the closing fence of a front matter block opening at `start`
fn find_front_matter_end(lines: &[String], start: usize, profile: &FormatProfile) -> Option<usize> {
    let is_fence = |line: &String| {
        line.starts_with(profile.comment) && HEADER_FENCE.is_match(&profile.unescape(line))
    };
    if !is_fence(lines.get(start)?) {
        return None;
    }
    for (offset, line) in lines[start + 1..].iter().enumerate() {
        if !line.starts_with(profile.comment) {
            return None;
        }
        if is_fence(line) {
            return Some(start + 1 + offset);
        }
    }
    None
}

/// Shebang and encoding lines for script formats. The keys are removed from the metadata.
pub fn encoding_and_executable(notebook: &mut Notebook, profile: &FormatProfile) -> Vec<String> {
    let mut lines = Vec::new();
    if profile.line_comment().is_none() {
        return lines;
    }
    if let Some(Value::String(executable)) = take_string(&mut notebook.metadata, EXECUTABLE) {
        lines.push(format!("#!{executable}"));
    }
    if let Some(Value::String(encoding)) = take_string(&mut notebook.metadata, ENCODING) {
        lines.push(encoding);
    }
    lines
}

fn take_string(metadata: &mut Metadata, key: &str) -> Option<Value> {
    if metadata.get(key).is_some_and(Value::is_string) {
        metadata.remove(key)
    } else {
        None
    }
}

/// Render the front matter: the raw header cell (removed from the notebook) followed by the
/// remaining notebook metadata under `jupyter:`.
pub fn metadata_and_cell_to_header(
    notebook: &mut Notebook,
    profile: &FormatProfile,
) -> Result<Vec<String>, FormatError> {
    let mut header: Vec<String> = Vec::new();
    let mut skiplines = DEFAULT_SKIPLINES;

    if let Some(inner) = notebook.cells.first().and_then(header_cell_lines) {
        skiplines = notebook.cells[0].skiplines();
        header = inner;
        notebook.cells.remove(0);
    }

    if !notebook.metadata.is_empty() {
        let mut wrapper = Metadata::new();
        wrapper.insert(
            "jupyter".to_string(),
            Value::Object(notebook.metadata.clone()),
        );
        let yaml = serde_yaml::to_string(&wrapper)?;
        header.extend(yaml.lines().map(str::to_string));
    }

    if header.is_empty() {
        return Ok(Vec::new());
    }

    let mut lines = vec![profile.escape("---")];
    lines.extend(header.iter().map(|line| profile.escape(line)));
    lines.push(profile.escape("---"));
    lines.extend(std::iter::repeat(String::new()).take(skiplines));
    Ok(lines)
}

/// Inner lines of a raw `---` fenced cell
fn header_cell_lines(cell: &Cell) -> Option<Vec<String>> {
    if cell.cell_type != CellType::Raw {
        return None;
    }
    let lines: Vec<&str> = cell
        .source
        .trim_matches(|c| c == '\n' || c == '\t' || c == ' ')
        .split('\n')
        .collect();
    if lines.len() >= 2
        && HEADER_FENCE.is_match(lines[0])
        && HEADER_FENCE.is_match(lines[lines.len() - 1])
    {
        Some(lines[1..lines.len() - 1].iter().map(|l| l.to_string()).collect())
    } else {
        None
    }
}
