//! Notebook inspection views
//!
//! `nbtext inspect <path> [view]` parses a notebook in any supported format and prints
//! what the reader produced. It is mostly useful to check how a text file maps onto cells
//! before converting it.
//!
//! - `json`: the notebook as pretty-printed JSON (cells, metadata, nbformat)
//! - `cells`: one line per cell with its type, line count and metadata

use nbtext_babel::notebook::{Cell, Notebook};
use std::fmt::Write;

/// All available inspection views
pub const AVAILABLE_VIEWS: &[&str] = &["json", "cells"];

pub const DEFAULT_VIEW: &str = "cells";

/// Render a parsed notebook with the named view
pub fn render(notebook: &Notebook, view: &str) -> Result<String, String> {
    match view {
        "json" => serde_json::to_string_pretty(notebook)
            .map(|mut text| {
                text.push('\n');
                text
            })
            .map_err(|e| format!("JSON serialization failed: {e}")),
        "cells" => Ok(cell_table(notebook)),
        _ => Err(format!(
            "Unknown view '{view}'. Available views: {}",
            AVAILABLE_VIEWS.join(", ")
        )),
    }
}

fn cell_table(notebook: &Notebook) -> String {
    let mut out = String::new();
    if !notebook.metadata.is_empty() {
        let keys: Vec<&str> = notebook.metadata.keys().map(String::as_str).collect();
        let _ = writeln!(out, "metadata: {}", keys.join(", "));
    }
    for (index, cell) in notebook.cells.iter().enumerate() {
        let _ = writeln!(out, "{}", cell_row(index, cell));
    }
    out
}

fn cell_row(index: usize, cell: &Cell) -> String {
    let kind = cell.cell_type.to_string();
    let lines = cell.source_lines().len();
    let mut row = format!("[{index}] {kind:<8} {lines:>3} line{}", plural(lines));
    if !cell.metadata.is_empty() {
        // Metadata is a sorted map, so the rendering is stable
        let metadata = serde_json::Value::Object(cell.metadata.clone());
        let _ = write!(row, "  {metadata}");
    }
    row
}

fn plural(count: usize) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}
