//! Chunk option codecs
//!
//! R Markdown chunk headers and knitr spin option lines share the knitr option syntax
//! (`name, key=value, ...`). The Python script dialect stores options as a JSON object after the
//! `# +` marker. Both decode into, and render from, the cell metadata map.

use crate::error::FormatError;
use crate::notebook::{Metadata, EXPLICIT_BOUNDARY, LANGUAGE, SKIPLINES};
use serde_json::{Number, Value};

/// Chunk label
pub const NAME: &str = "name";
pub const HIDE_INPUT: &str = "hide_input";
pub const HIDE_OUTPUT: &str = "hide_output";
/// knitr option naming the chunk language in spin scripts
pub const ENGINE: &str = "engine";

/// Metadata keys that the text formats handle themselves and never write as options
const RESERVED: &[&str] = &[LANGUAGE, NAME, SKIPLINES, EXPLICIT_BOUNDARY];

/// Split an R Markdown chunk header (the text between the braces) into language and options.
pub fn parse_rmd_header(header: &str) -> (Option<String>, Metadata) {
    let header = header.trim();
    let end = header
        .find(|c: char| c.is_whitespace() || c == ',')
        .unwrap_or(header.len());
    let language = &header[..end];
    let rest = header[end..].trim_start_matches(|c: char| c.is_whitespace() || c == ',');
    let language = match language {
        "" => None,
        "r" | "R" => Some("R".to_string()),
        other => Some(other.to_string()),
    };
    (language, parse_knitr_options(rest))
}

/// Render an R Markdown chunk header (without braces)
pub fn render_rmd_header(language: &str, metadata: &Metadata) -> String {
    let tag = if language == "R" { "r" } else { language };
    let options = render_knitr_options(metadata);
    if options.is_empty() {
        tag.to_string()
    } else if metadata.get(NAME).and_then(Value::as_str).is_some() {
        format!("{tag} {options}")
    } else {
        format!("{tag}, {options}")
    }
}

/// Decode `name, key=value, ...` into metadata
pub fn parse_knitr_options(text: &str) -> Metadata {
    let mut metadata = Metadata::new();
    for (index, item) in split_top_level(text).into_iter().enumerate() {
        match item.split_once('=') {
            Some((key, value)) => {
                let key = key.trim();
                let value = parse_r_value(value.trim());
                match (key, value) {
                    ("echo", Value::Bool(echo)) => {
                        metadata.insert(HIDE_INPUT.to_string(), Value::Bool(!echo));
                    }
                    ("include", Value::Bool(include)) => {
                        metadata.insert(HIDE_OUTPUT.to_string(), Value::Bool(!include));
                    }
                    (key, value) => {
                        metadata.insert(key.to_string(), value);
                    }
                }
            }
            None if index == 0 => {
                metadata.insert(NAME.to_string(), Value::String(item));
            }
            None => {
                tracing::warn!(option = %item, "ignoring unlabeled chunk option");
            }
        }
    }
    metadata
}

/// Render metadata as knitr options. Reserved keys other than the chunk name are skipped.
pub fn render_knitr_options(metadata: &Metadata) -> String {
    let mut items = Vec::new();
    if let Some(name) = metadata.get(NAME).and_then(Value::as_str) {
        items.push(name.to_string());
    }
    for (key, value) in metadata {
        if RESERVED.contains(&key.as_str()) {
            continue;
        }
        match (key.as_str(), value) {
            (HIDE_INPUT, Value::Bool(hide)) => items.push(format!("echo={}", r_bool(!hide))),
            (HIDE_OUTPUT, Value::Bool(hide)) => items.push(format!("include={}", r_bool(!hide))),
            (key, value) => items.push(format!("{key}={}", render_r_value(value))),
        }
    }
    items.join(", ")
}

/// Decode the JSON object of a `# + {...}` marker
pub fn parse_json_options(text: &str) -> Result<Metadata, FormatError> {
    serde_json::from_str::<Metadata>(text).map_err(|e| FormatError::InvalidChunkOptions {
        options: text.to_string(),
        message: e.to_string(),
    })
}

/// Metadata written as JSON chunk options: everything except the text-format bookkeeping keys
pub fn json_options(metadata: &Metadata, default_language: &str) -> Metadata {
    metadata
        .iter()
        .filter(|(key, value)| match key.as_str() {
            SKIPLINES | EXPLICIT_BOUNDARY => false,
            LANGUAGE => value.as_str() != Some(default_language),
            _ => true,
        })
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

fn r_bool(value: bool) -> &'static str {
    if value {
        "TRUE"
    } else {
        "FALSE"
    }
}

/// Split on commas that are not inside quotes or brackets
fn split_top_level(text: &str) -> Vec<String> {
    let mut items = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for c in text.chars() {
        if let Some(q) = quote {
            current.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '"' | '\'' => {
                quote = Some(c);
                current.push(c);
            }
            '(' | '[' | '{' => {
                depth += 1;
                current.push(c);
            }
            ')' | ']' | '}' => {
                depth = depth.saturating_sub(1);
                current.push(c);
            }
            ',' if depth == 0 => {
                items.push(std::mem::take(&mut current));
            }
            _ => current.push(c),
        }
    }
    items.push(current);

    items
        .into_iter()
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect()
}

fn parse_r_value(text: &str) -> Value {
    match text {
        "TRUE" | "T" => return Value::Bool(true),
        "FALSE" | "F" => return Value::Bool(false),
        "NULL" => return Value::Null,
        _ => {}
    }
    if let Ok(int) = text.parse::<i64>() {
        return Value::from(int);
    }
    if let Some(number) = text.parse::<f64>().ok().and_then(Number::from_f64) {
        return Value::Number(number);
    }
    if let Some(unquoted) = unquote(text) {
        return Value::String(unquoted);
    }
    if let Some(inner) = text.strip_prefix("c(").and_then(|t| t.strip_suffix(')')) {
        return Value::Array(
            split_top_level(inner)
                .iter()
                .map(|item| parse_r_value(item))
                .collect(),
        );
    }
    // Any other R expression is kept as text
    Value::String(text.to_string())
}

fn unquote(text: &str) -> Option<String> {
    let quote = text.chars().next().filter(|c| *c == '"' || *c == '\'')?;
    let inner = text.strip_prefix(quote)?.strip_suffix(quote)?;
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(c);
        }
    }
    Some(out)
}

fn render_r_value(value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::Bool(b) => r_bool(*b).to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => quote(s),
        Value::Array(items) => format!(
            "c({})",
            items.iter().map(render_r_value).collect::<Vec<_>>().join(", ")
        ),
        Value::Object(_) => quote(&value.to_string()),
    }
}

fn quote(text: &str) -> String {
    format!("\"{}\"", text.replace('\\', "\\\\").replace('"', "\\\""))
}
