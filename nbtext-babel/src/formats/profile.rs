//! Format profiles
//!
//! A profile is the fixed ruleset of one text dialect: how markdown lines are escaped, which lines
//! open a code chunk, and how markdown cells are delimited. Profiles are plain constants; the
//! conversion picks one from the file extension and never mutates it.

use crate::notebook::Cell;
use once_cell::sync::Lazy;
use regex::Regex;

/// `` ```{r name, echo=FALSE} ``
pub(crate) static RMD_CHUNK_START: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^```\{(.*)\}\s*$").expect("valid regex"));
pub(crate) static RMD_CHUNK_END: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^```\s*$").expect("valid regex"));
/// `# +` or `# + {"hide_input": true}`
pub(crate) static PY_CHUNK_START: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^# \+(?:\s+(\{.*\}))?\s*$").expect("valid regex"));
pub(crate) static PY_CHUNK_END: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^# -\s*$").expect("valid regex"));
/// knitr spin chunk options: `#+ name, echo=FALSE`
pub(crate) static R_CHUNK_OPTIONS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#\+(?:\s+(.*?))?\s*$").expect("valid regex"));

/// Text dialects with a built-in profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
    RMarkdown,
    PyScript,
    RScript,
}

/// How markdown cells are recognized
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkdownVariant {
    /// Markdown is verbatim text; two blank lines separate consecutive markdown cells
    Verbatim,
    /// Markdown lines carry the comment prefix; the first unescaped line ends the cell
    Escaped,
}

/// Immutable description of a text dialect
#[derive(Debug, Clone, Copy)]
pub struct FormatProfile {
    pub dialect: Dialect,
    /// File extension, with the leading dot
    pub extension: &'static str,
    /// Markdown escape prefix (empty for R Markdown)
    pub comment: &'static str,
    pub markdown: MarkdownVariant,
    /// Language assumed when the notebook metadata names none
    pub fallback_language: &'static str,
    start_code: fn(&str) -> bool,
}

pub const RMARKDOWN: FormatProfile = FormatProfile {
    dialect: Dialect::RMarkdown,
    extension: ".Rmd",
    comment: "",
    markdown: MarkdownVariant::Verbatim,
    fallback_language: "R",
    start_code: start_code_rmd,
};

pub const PY_SCRIPT: FormatProfile = FormatProfile {
    dialect: Dialect::PyScript,
    extension: ".py",
    comment: "#",
    markdown: MarkdownVariant::Escaped,
    fallback_language: "python",
    start_code: start_code_py,
};

pub const R_SCRIPT: FormatProfile = FormatProfile {
    dialect: Dialect::RScript,
    extension: ".R",
    comment: "#'",
    markdown: MarkdownVariant::Escaped,
    fallback_language: "R",
    start_code: start_code_r,
};

fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

fn start_code_rmd(line: &str) -> bool {
    RMD_CHUNK_START.is_match(line)
}

fn start_code_py(line: &str) -> bool {
    PY_CHUNK_START.is_match(line) || (!is_blank(line) && !line.starts_with('#'))
}

fn start_code_r(line: &str) -> bool {
    R_CHUNK_OPTIONS.is_match(line) || (!is_blank(line) && !line.starts_with("#'"))
}

impl PartialEq for FormatProfile {
    fn eq(&self, other: &Self) -> bool {
        self.dialect == other.dialect
    }
}

impl Eq for FormatProfile {}

impl FormatProfile {
    /// Does this line open a code cell (explicitly or implicitly)?
    pub fn starts_code(&self, line: &str) -> bool {
        (self.start_code)(line)
    }

    /// Does this line belong to an escaped markdown run?
    pub fn is_escaped(&self, line: &str) -> bool {
        !self.comment.is_empty() && line.starts_with(self.comment) && !self.starts_code(line)
    }

    /// A line that forms an implicit code cell in a script dialect
    pub fn is_plain_code(&self, line: &str) -> bool {
        match self.dialect {
            Dialect::RMarkdown => false,
            Dialect::PyScript => !is_blank(line) && !line.starts_with('#'),
            Dialect::RScript => {
                !is_blank(line) && !line.starts_with("#'") && !R_CHUNK_OPTIONS.is_match(line)
            }
        }
    }

    /// Would these code lines be misread without explicit chunk markers?
    ///
    /// Implicit Python code ends at the first blank or comment line. Implicit R code runs up to
    /// the next markdown line, so only its first line has to look like code.
    pub fn content_requires_markers(&self, lines: &[&str]) -> bool {
        let Some(first) = lines.first() else {
            return true;
        };
        match self.dialect {
            Dialect::RMarkdown => true,
            Dialect::PyScript => lines.iter().any(|line| !self.is_plain_code(line)),
            Dialect::RScript => !self.is_plain_code(first),
        }
    }

    /// Does the previous cell force the next code cell to open with an explicit marker?
    ///
    /// Python scripts merge two implicit code cells that are not separated by a blank line. R
    /// chunks have no closing marker, so any code cell after a code cell opens with `#+`.
    pub fn context_requires_markers(&self, previous: Option<&Cell>) -> bool {
        let Some(previous) = previous.filter(|cell| cell.is_code()) else {
            return false;
        };
        match self.dialect {
            Dialect::RMarkdown => false,
            Dialect::PyScript => previous.skiplines() == 0,
            Dialect::RScript => true,
        }
    }

    /// Comment prefix used when detecting encoding declarations
    pub fn line_comment(&self) -> Option<&'static str> {
        match self.dialect {
            Dialect::RMarkdown => None,
            Dialect::PyScript | Dialect::RScript => Some("#"),
        }
    }

    /// Escape one markdown line
    ///
    /// A Python markdown line that would read as a `# +` marker once escaped is written without
    /// the separating space (`#+`); unescaping still restores it.
    pub fn escape(&self, line: &str) -> String {
        if self.comment.is_empty() {
            return line.to_string();
        }
        if line.is_empty() {
            return self.comment.to_string();
        }
        let escaped = format!("{} {}", self.comment, line);
        if self.dialect == Dialect::PyScript && PY_CHUNK_START.is_match(&escaped) {
            format!("{}{}", self.comment, line)
        } else {
            escaped
        }
    }

    pub fn escape_lines<'a>(&self, lines: impl IntoIterator<Item = &'a str>) -> Vec<String> {
        lines.into_iter().map(|line| self.escape(line)).collect()
    }

    /// Remove the markdown escape, and at most one following space
    pub fn unescape(&self, line: &str) -> String {
        if self.comment.is_empty() {
            return line.to_string();
        }
        let rest = line.strip_prefix(self.comment).unwrap_or(line);
        rest.strip_prefix(' ').unwrap_or(rest).to_string()
    }
}
