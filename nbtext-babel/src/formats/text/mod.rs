//! Text notebook formats
//!
//! R Markdown documents, Python scripts and R (knitr spin) scripts share one reader and one
//! writer. Everything that differs between them lives in their [`FormatProfile`].
//!
//! # Reading
//!
//! The text is split into lines, the header (shebang, encoding, YAML front matter) is decoded
//! into notebook metadata, then [`parser::text_to_cell`] is called until every line is consumed.
//! Finally the notebook languages are resolved.
//!
//! # Writing
//!
//! The writer works on a copy of the notebook. It resolves the default language, renders the
//! header, then renders each cell followed by its `skiplines` blank lines. Two adjustments depend
//! on neighbouring cells:
//!
//! - Python scripts drop the closing `# -` of a chunk when the next cell opens a `# +` chunk
//!   or the cell is the last one. The marker stays after a trailing blank source line.
//! - R Markdown keeps at least two blank lines between two non-code cells; the reader takes
//!   one of them back.
//!
//! # Lossy Conversions
//!
//! Text formats carry no outputs or execution counts. Raw cells in R Markdown other than the
//! front matter are read back as markdown. Blank lines at the end of an R script code cell become
//! the cell's `skiplines`. In the script formats a first markdown cell made of a `---` fenced
//! block is indistinguishable from commented front matter, and reads back as the raw header cell.

pub mod parser;
pub mod serializer;

use crate::error::FormatError;
use crate::format::Format;
use crate::formats::header::{
    encoding_and_executable, header_to_metadata_and_cell, metadata_and_cell_to_header,
};
use crate::formats::language::{resolve_after_reading, resolve_before_writing};
use crate::formats::profile::{Dialect, FormatProfile, PY_CHUNK_START};
use crate::notebook::{Cell, Notebook, EXPLICIT_BOUNDARY};
use parser::text_to_cell;
use serializer::CellExporter;

/// Format implementation for one text dialect
#[derive(Debug, Clone, Copy)]
pub struct TextFormat {
    profile: &'static FormatProfile,
}

impl TextFormat {
    pub fn new(profile: &'static FormatProfile) -> Self {
        TextFormat { profile }
    }

    pub fn profile(&self) -> &'static FormatProfile {
        self.profile
    }
}

impl Format for TextFormat {
    fn name(&self) -> &str {
        match self.profile.dialect {
            Dialect::RMarkdown => "rmd",
            Dialect::PyScript => "py",
            Dialect::RScript => "r",
        }
    }

    fn description(&self) -> &str {
        match self.profile.dialect {
            Dialect::RMarkdown => "R Markdown document with fenced code chunks",
            Dialect::PyScript => "Python script with commented markdown",
            Dialect::RScript => "R script in knitr spin style",
        }
    }

    fn file_extensions(&self) -> &[&str] {
        match self.profile.dialect {
            Dialect::RMarkdown => &["Rmd"],
            Dialect::PyScript => &["py"],
            Dialect::RScript => &["R"],
        }
    }

    fn parse(&self, source: &str) -> Result<Notebook, FormatError> {
        parse_notebook(source, self.profile)
    }

    fn serialize(&self, notebook: &Notebook) -> Result<String, FormatError> {
        serialize_notebook(notebook, self.profile)
    }
}

/// Split text into lines. The empty text has no lines, and a trailing `\r` is dropped.
pub fn split_lines(text: &str) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }
    text.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
        .collect()
}

/// Read a text notebook
pub fn parse_notebook(text: &str, profile: &FormatProfile) -> Result<Notebook, FormatError> {
    let lines = split_lines(text);
    let header = header_to_metadata_and_cell(&lines, profile)?;
    let mut metadata = header.metadata;
    let mut cells: Vec<Cell> = header.cell.into_iter().collect();

    let mut position = header.consumed;
    while position < lines.len() {
        let remaining = &lines[position..];
        let (cell, consumed) = text_to_cell(remaining, profile)?;
        if consumed == 0 {
            return Err(FormatError::malformed(
                "no cell could be read at this position",
                remaining,
            ));
        }
        position += consumed;
        cells.push(cell);
    }

    // A marker that the context requires anyway is not worth recording
    for index in 1..cells.len() {
        if cells[index].is_code() && profile.context_requires_markers(cells.get(index - 1)) {
            cells[index].metadata.remove(EXPLICIT_BOUNDARY);
        }
    }

    resolve_after_reading(&mut metadata, &mut cells, profile);
    tracing::debug!(
        extension = profile.extension,
        cells = cells.len(),
        lines = lines.len(),
        "read text notebook"
    );
    Ok(Notebook::new(cells, metadata))
}

/// Write a text notebook. The caller's notebook is left untouched.
pub fn serialize_notebook(notebook: &Notebook, profile: &FormatProfile) -> Result<String, FormatError> {
    let mut notebook = notebook.clone();
    let default_language = resolve_before_writing(&mut notebook, profile);

    let mut lines = encoding_and_executable(&mut notebook, profile);
    lines.extend(metadata_and_cell_to_header(&mut notebook, profile)?);

    let exporters: Vec<CellExporter> = notebook
        .cells
        .iter()
        .enumerate()
        .map(|(index, cell)| {
            let previous = index.checked_sub(1).map(|p| &notebook.cells[p]);
            CellExporter::new(cell, previous, &default_language, profile)
        })
        .collect();
    let texts: Vec<Vec<String>> = exporters.iter().map(CellExporter::cell_to_text).collect();

    for (index, (exporter, mut text)) in exporters.iter().zip(texts.iter().cloned()).enumerate() {
        let next = texts.get(index + 1);

        // A trailing blank source line would be read back as spacing without the marker
        if profile.dialect == Dialect::PyScript
            && !exporter.ends_with_blank_line()
            && text.last().is_some_and(|line| line == "# -")
        {
            let next_opens_chunk = match next {
                Some(next) => next.first().is_some_and(|line| PY_CHUNK_START.is_match(line)),
                None => true,
            };
            if next_opens_chunk {
                text.pop();
            }
        }
        lines.extend(text);

        let mut skiplines = exporter.skiplines();
        if profile.dialect == Dialect::RMarkdown
            && !exporter.is_code()
            && exporters.get(index + 1).is_some_and(|next| !next.is_code())
        {
            // Two markdown cells need at least two blank lines between them
            skiplines = skiplines.max(1) + 1;
        }
        lines.extend(std::iter::repeat(String::new()).take(skiplines));
    }

    tracing::debug!(
        extension = profile.extension,
        cells = notebook.cells.len(),
        %default_language,
        "wrote text notebook"
    );
    Ok(lines.join("\n"))
}
