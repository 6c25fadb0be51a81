//! Language resolution
//!
//! R Markdown chunks always name their language, so after reading an `.Rmd` document the main
//! language is inferred from the chunks and the per-cell tags that merely repeat it are dropped.
//! When writing, the default language decides which cells need an explicit language tag.

use super::profile::{Dialect, FormatProfile};
use crate::notebook::{Cell, Metadata, Notebook, LANGUAGE, MAIN_LANGUAGE};
use serde_json::Value;

fn language_info_name(metadata: &Metadata) -> Option<&str> {
    metadata
        .get("language_info")
        .and_then(|info| info.get("name"))
        .and_then(Value::as_str)
}

/// Record the dominant code cell language as `main_language`, unless the metadata already names
/// a language, and remove cell languages equal to the main one.
pub fn find_main_language(metadata: &mut Metadata, cells: &mut [Cell]) {
    let explicit = metadata
        .get(MAIN_LANGUAGE)
        .and_then(Value::as_str)
        .or_else(|| language_info_name(metadata))
        .map(str::to_string);

    let main_language = match explicit {
        Some(language) => language,
        None => {
            // (language, count) in order of first appearance
            let mut counts: Vec<(String, usize)> = Vec::new();
            for language in cells.iter().filter(|c| c.is_code()).filter_map(Cell::language) {
                match counts.iter_mut().find(|(l, _)| l == language) {
                    Some((_, count)) => *count += 1,
                    None => counts.push((language.to_string(), 1)),
                }
            }
            let mut best: Option<(String, usize)> = None;
            for (language, count) in counts {
                if best.as_ref().map_or(true, |(_, c)| count > *c) {
                    best = Some((language, count));
                }
            }
            let Some((language, _)) = best else {
                return;
            };
            tracing::debug!(%language, "inferred main language from code chunks");
            metadata.insert(MAIN_LANGUAGE.to_string(), Value::String(language.clone()));
            language
        }
    };

    for cell in cells.iter_mut().filter(|c| c.is_code()) {
        if cell.language() == Some(main_language.as_str()) {
            cell.metadata.remove(LANGUAGE);
        }
    }
}

/// Default language for rendering: `main_language`, then `language_info.name`, then the
/// dialect's fallback.
pub fn get_default_language(notebook: &Notebook, profile: &FormatProfile) -> String {
    notebook
        .main_language()
        .or_else(|| notebook.language_info_name())
        .unwrap_or(profile.fallback_language)
        .to_string()
}

/// Normalize the notebook metadata after reading, per dialect
pub fn resolve_after_reading(metadata: &mut Metadata, cells: &mut [Cell], profile: &FormatProfile) {
    match profile.dialect {
        Dialect::RMarkdown => find_main_language(metadata, cells),
        // Scripts name their language through the extension
        Dialect::PyScript | Dialect::RScript => {
            if !metadata.contains_key(MAIN_LANGUAGE) && language_info_name(metadata).is_none() {
                metadata.insert(
                    MAIN_LANGUAGE.to_string(),
                    Value::String(profile.fallback_language.to_string()),
                );
            }
        }
    }
}

/// Resolve the default language on the writer's working copy. A `main_language` implied by the
/// script extension (R for `.R`, python for `.py`) is removed.
pub fn resolve_before_writing(notebook: &mut Notebook, profile: &FormatProfile) -> String {
    let default_language = get_default_language(notebook, profile);
    if profile.dialect != Dialect::RMarkdown
        && notebook.main_language() == Some(profile.fallback_language)
    {
        notebook.metadata.remove(MAIN_LANGUAGE);
    }
    default_language
}
