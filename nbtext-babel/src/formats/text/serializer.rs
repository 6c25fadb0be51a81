//! Cell serializer (cells → text)
//!
//! A [`CellExporter`] renders one cell without its trailing blank lines. The writer appends the
//! blank lines and decides whether an optional closing marker can be dropped, since both depend
//! on the cells around it.

use crate::formats::chunk_options::{json_options, render_knitr_options, render_rmd_header, ENGINE};
use crate::formats::profile::{Dialect, FormatProfile};
use crate::notebook::{Cell, EXPLICIT_BOUNDARY, LANGUAGE};
use serde_json::Value;

pub struct CellExporter<'a> {
    cell: &'a Cell,
    previous: Option<&'a Cell>,
    default_language: &'a str,
    profile: &'a FormatProfile,
}

impl<'a> CellExporter<'a> {
    pub fn new(
        cell: &'a Cell,
        previous: Option<&'a Cell>,
        default_language: &'a str,
        profile: &'a FormatProfile,
    ) -> Self {
        CellExporter {
            cell,
            previous,
            default_language,
            profile,
        }
    }

    pub fn is_code(&self) -> bool {
        self.cell.is_code()
    }

    pub fn skiplines(&self) -> usize {
        self.cell.skiplines()
    }

    /// The cell's source ends with a blank line, which a missing closing marker would lose
    pub fn ends_with_blank_line(&self) -> bool {
        self.cell
            .source_lines()
            .last()
            .is_some_and(|line| line.trim().is_empty())
    }

    /// Text lines of the cell
    pub fn cell_to_text(&self) -> Vec<String> {
        if !self.is_code() {
            return self.profile.escape_lines(self.cell.source_lines());
        }
        match self.profile.dialect {
            Dialect::RMarkdown => self.rmd_code_to_text(),
            Dialect::PyScript => self.py_code_to_text(),
            Dialect::RScript => self.r_code_to_text(),
        }
    }

    fn language(&self) -> &str {
        self.cell.language().unwrap_or(self.default_language)
    }

    fn source(&self) -> impl Iterator<Item = String> + '_ {
        self.cell.source_lines().into_iter().map(str::to_string)
    }

    fn requires_markers(&self, has_options: bool) -> bool {
        has_options
            || self.profile.content_requires_markers(&self.cell.source_lines())
            || self.profile.context_requires_markers(self.previous)
            || self.cell.flag(EXPLICIT_BOUNDARY)
    }

    fn rmd_code_to_text(&self) -> Vec<String> {
        let header = render_rmd_header(self.language(), &self.cell.metadata);
        let mut lines = vec![format!("```{{{header}}}")];
        lines.extend(self.source());
        lines.push("```".to_string());
        lines
    }

    fn py_code_to_text(&self) -> Vec<String> {
        let options = json_options(&self.cell.metadata, self.default_language);
        if !self.requires_markers(!options.is_empty()) {
            return self.source().collect();
        }
        let opening = if options.is_empty() {
            "# +".to_string()
        } else {
            format!("# + {}", Value::Object(options))
        };
        let mut lines = vec![opening];
        lines.extend(self.source());
        lines.push("# -".to_string());
        lines
    }

    fn r_code_to_text(&self) -> Vec<String> {
        let mut metadata = self.cell.metadata.clone();
        if let Some(language) = metadata.remove(LANGUAGE) {
            if language.as_str() != Some(self.default_language) {
                metadata.insert(ENGINE.to_string(), language);
            }
        }
        let options = render_knitr_options(&metadata);
        if !self.requires_markers(!options.is_empty()) {
            return self.source().collect();
        }
        let mut lines = vec![if options.is_empty() {
            "#+".to_string()
        } else {
            format!("#+ {options}")
        }];
        lines.extend(self.source());
        lines
    }
}
