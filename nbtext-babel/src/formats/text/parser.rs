//! Cell parser (text → cells)
//!
//! [`text_to_cell`] looks at the first remaining line, decides which construct starts there, and
//! consumes exactly one cell plus the blank lines that follow it. The reader calls it in a loop
//! until no line is left.

use crate::error::FormatError;
use crate::formats::chunk_options::{
    parse_json_options, parse_knitr_options, parse_rmd_header, ENGINE,
};
use crate::formats::profile::{
    Dialect, FormatProfile, MarkdownVariant, PY_CHUNK_END, PY_CHUNK_START, PY_SCRIPT,
    RMD_CHUNK_END, RMD_CHUNK_START, R_CHUNK_OPTIONS,
};
use crate::notebook::{Cell, CellType, EXPLICIT_BOUNDARY, LANGUAGE};
use serde_json::Value;

fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

/// Number of consecutive blank lines starting at `from`
fn count_blank(lines: &[String], from: usize) -> usize {
    lines
        .iter()
        .skip(from)
        .take_while(|line| is_blank(line))
        .count()
}

/// Number of blank lines at the end of `lines`
fn count_trailing_blank(lines: &[String]) -> usize {
    lines.iter().rev().take_while(|line| is_blank(line)).count()
}

/// Parse one cell from the start of `lines`.
///
/// Returns the cell and the number of lines consumed, which is at least one for non-empty input.
pub fn text_to_cell(
    lines: &[String],
    profile: &FormatProfile,
) -> Result<(Cell, usize), FormatError> {
    let Some(first) = lines.first() else {
        return Err(FormatError::malformed("no lines left to parse", lines));
    };

    let (cell, consumed) = match profile.dialect {
        Dialect::RMarkdown => match RMD_CHUNK_START.captures(first) {
            Some(caps) => rmd_chunk_to_cell(lines, &caps[1])?,
            None => markdown_to_cell(lines, profile),
        },
        Dialect::PyScript => match PY_CHUNK_START.captures(first) {
            Some(caps) => py_chunk_to_cell(lines, caps.get(1).map(|m| m.as_str()), profile)?,
            None if profile.is_plain_code(first) => py_code_to_cell(lines),
            None => markdown_to_cell(lines, profile),
        },
        Dialect::RScript => match R_CHUNK_OPTIONS.captures(first) {
            Some(caps) => r_chunk_to_cell(lines, caps.get(1).map_or("", |m| m.as_str()), profile),
            None if profile.is_plain_code(first) => r_code_to_cell(lines, 0, profile),
            None => markdown_to_cell(lines, profile),
        },
    };

    tracing::trace!(cell_type = %cell.cell_type, consumed, "parsed cell");
    Ok((cell, consumed))
}

/// `` ```{r options} `` ... `` ``` ``
fn rmd_chunk_to_cell(lines: &[String], header: &str) -> Result<(Cell, usize), FormatError> {
    let end = lines
        .iter()
        .skip(1)
        .position(|line| RMD_CHUNK_END.is_match(line))
        .map(|offset| offset + 1)
        .ok_or_else(|| FormatError::malformed("code chunk is never closed", lines))?;

    let (language, metadata) = parse_rmd_header(header);
    let mut cell = Cell::from_lines(CellType::Code, &lines[1..end]);
    cell.metadata = metadata;
    if let Some(language) = language {
        cell.metadata
            .insert(LANGUAGE.to_string(), Value::String(language));
    }

    let skip = count_blank(lines, end + 1);
    cell.set_skiplines(skip);
    Ok((cell, end + 1 + skip))
}

/// `# +` / `# + {json}` ... `# -`. The closing marker may be missing when the next chunk
/// starts right away or at the end of input.
fn py_chunk_to_cell(
    lines: &[String],
    options: Option<&str>,
    profile: &FormatProfile,
) -> Result<(Cell, usize), FormatError> {
    let metadata = options
        .map(parse_json_options)
        .transpose()?
        .unwrap_or_default();
    let has_options = !metadata.is_empty();

    let mut end = lines.len();
    let mut closed = false;
    for (index, line) in lines.iter().enumerate().skip(1) {
        if PY_CHUNK_END.is_match(line) {
            end = index;
            closed = true;
            break;
        }
        if PY_CHUNK_START.is_match(line) {
            end = index;
            break;
        }
    }

    let (content, skip, consumed) = if closed {
        let skip = count_blank(lines, end + 1);
        (&lines[1..end], skip, end + 1 + skip)
    } else {
        let skip = count_trailing_blank(&lines[1..end]);
        (&lines[1..end - skip], skip, end)
    };

    let mut cell = Cell::from_lines(CellType::Code, content);
    cell.metadata = metadata;
    if !has_options && !profile.content_requires_markers(&cell.source_lines()) {
        cell.metadata
            .insert(EXPLICIT_BOUNDARY.to_string(), Value::Bool(true));
    }
    cell.set_skiplines(skip);
    Ok((cell, consumed))
}

/// `#+ options` followed by code up to the next markdown line or chunk option line
fn r_chunk_to_cell(lines: &[String], options: &str, profile: &FormatProfile) -> (Cell, usize) {
    let mut metadata = parse_knitr_options(options);
    if let Some(engine) = metadata.remove(ENGINE) {
        metadata.insert(LANGUAGE.to_string(), engine);
    }
    let has_options = !metadata.is_empty();

    let (mut cell, consumed) = r_code_to_cell(lines, 1, profile);
    if !has_options && !profile.content_requires_markers(&cell.source_lines()) {
        metadata.insert(EXPLICIT_BOUNDARY.to_string(), Value::Bool(true));
    }
    cell.metadata.extend(metadata);
    (cell, consumed)
}

/// R code runs from `from` up to the next markdown or chunk option line. Blank lines inside the
/// run belong to the code; trailing ones are the cell's skiplines.
fn r_code_to_cell(lines: &[String], from: usize, profile: &FormatProfile) -> (Cell, usize) {
    let end = lines
        .iter()
        .enumerate()
        .skip(from.max(1))
        .find(|(_, line)| line.starts_with(profile.comment) || R_CHUNK_OPTIONS.is_match(line))
        .map_or(lines.len(), |(index, _)| index);
    let skip = count_trailing_blank(&lines[from..end]);
    let mut cell = Cell::from_lines(CellType::Code, &lines[from..end - skip]);
    cell.set_skiplines(skip);
    (cell, end)
}

/// Implicit Python code: a run of plain code lines, then the blank lines after it
fn py_code_to_cell(lines: &[String]) -> (Cell, usize) {
    let end = lines
        .iter()
        .position(|line| !PY_SCRIPT.is_plain_code(line))
        .unwrap_or(lines.len());
    let skip = count_blank(lines, end);
    let mut cell = Cell::from_lines(CellType::Code, &lines[..end]);
    cell.set_skiplines(skip);
    (cell, end + skip)
}

fn markdown_to_cell(lines: &[String], profile: &FormatProfile) -> (Cell, usize) {
    match profile.markdown {
        MarkdownVariant::Verbatim => verbatim_markdown_to_cell(lines, profile),
        MarkdownVariant::Escaped => escaped_markdown_to_cell(lines, profile),
    }
}

/// R Markdown: markdown runs until the next code chunk. Two or more blank lines followed by
/// more text separate two markdown cells; the writer emits one of those blank lines on its own.
fn verbatim_markdown_to_cell(lines: &[String], profile: &FormatProfile) -> (Cell, usize) {
    let mut content_end = 0;
    let mut blanks = 0;
    let mut next_is_markdown = false;
    let mut index = 0;

    while index < lines.len() {
        let line = &lines[index];
        if index > 0 && profile.starts_code(line) {
            break;
        }
        if is_blank(line) {
            blanks += 1;
        } else {
            if blanks >= 2 && content_end > 0 {
                next_is_markdown = true;
                break;
            }
            blanks = 0;
            content_end = index + 1;
        }
        index += 1;
    }

    let mut skip = index - content_end;
    if next_is_markdown {
        skip -= 1;
    }
    let mut cell = Cell::from_lines(CellType::Markdown, &lines[..content_end]);
    cell.set_skiplines(skip);
    (cell, index)
}

/// Scripts: leading blank lines, then a run of escaped lines. The first blank or unescaped line
/// ends the cell.
fn escaped_markdown_to_cell(lines: &[String], profile: &FormatProfile) -> (Cell, usize) {
    let leading = count_blank(lines, 0);
    let end = leading
        + lines[leading..]
            .iter()
            .take_while(|line| profile.is_escaped(line))
            .count();

    if end == leading {
        // Only blank lines before the next code cell or the end of input
        let mut cell = Cell::markdown("");
        cell.set_skiplines(leading);
        return (cell, leading);
    }

    let source: Vec<String> = lines[..end]
        .iter()
        .map(|line| profile.unescape(line))
        .collect();
    let skip = count_blank(lines, end);
    let mut cell = Cell::from_lines(CellType::Markdown, &source);
    cell.set_skiplines(skip);
    (cell, end + skip)
}
