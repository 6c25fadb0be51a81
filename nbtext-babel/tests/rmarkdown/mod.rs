//! R Markdown format tests

use crate::common::fixture;
use insta::assert_snapshot;
use nbtext_babel::notebook::{Cell, CellType, Metadata, Notebook, MAIN_LANGUAGE};
use nbtext_babel::{reads, writes, FormatError};
use serde_json::json;

#[test]
fn test_markdown_and_code_cells() {
    let notebook = Notebook::new(
        vec![Cell::markdown("# Title"), Cell::code("1+1")],
        Metadata::new(),
    );
    let text = writes(&notebook, ".Rmd").expect("Failed to write Rmd");
    assert_snapshot!(text, @r###"
    # Title

    ```{r}
    1+1
    ```
    "###);

    let back = reads(&text, ".Rmd").expect("Failed to read Rmd");
    assert_eq!(back.cells.len(), 2);
    assert_eq!(back.cells[0].cell_type, CellType::Markdown);
    assert_eq!(back.cells[0].source, "# Title");
    assert_eq!(back.cells[1].cell_type, CellType::Code);
    assert_eq!(back.cells[1].source, "1+1");
}

#[test]
fn test_rewrite_adds_inferred_main_language() {
    let text = "# Title\n\n```{r}\n1+1\n```\n";
    let notebook = reads(text, ".Rmd").unwrap();
    assert_eq!(notebook.main_language(), Some("R"));

    let rewritten = writes(&notebook, ".Rmd").unwrap();
    assert!(rewritten.starts_with("---\njupyter:\n  main_language: R\n---\n\n"));
    assert!(rewritten.ends_with(text));
    assert_eq!(reads(&rewritten, ".Rmd").unwrap().cells, notebook.cells);
}

#[test]
fn test_unterminated_chunk_is_malformed() {
    let text = "# Title\n\n```{r}\nx <- 1\ny <- 2\n";
    match reads(text, ".Rmd") {
        Err(FormatError::MalformedDocument { snippet, .. }) => {
            assert_eq!(snippet[0], "```{r}");
            assert!(snippet.contains(&"y <- 2".to_string()));
        }
        other => panic!("Expected MalformedDocument, got {other:?}"),
    }
}

#[test]
fn test_main_language_is_inferred() {
    let text = "```{r}\nx <- 1\n```\n\nText\n\n```{r}\ny <- 2\n```\n";
    let notebook = reads(text, ".Rmd").expect("Failed to read Rmd");
    assert_eq!(notebook.metadata.get(MAIN_LANGUAGE), Some(&json!("R")));
    assert!(notebook
        .cells
        .iter()
        .all(|cell| !cell.metadata.contains_key("language")));
}

#[test]
fn test_other_languages_keep_their_tag() {
    let text = "```{python}\nprint(1)\n```\n\n```{python}\nprint(2)\n```\n\n```{r}\nx\n```\n";
    let notebook = reads(text, ".Rmd").expect("Failed to read Rmd");
    assert_eq!(notebook.metadata.get(MAIN_LANGUAGE), Some(&json!("python")));
    assert_eq!(notebook.cells[2].language(), Some("R"));

    let written = writes(&notebook, ".Rmd").unwrap();
    assert!(written.starts_with("---\njupyter:\n  main_language: python\n---\n\n"));
    assert!(written.ends_with(text));
}

#[test]
fn test_chunk_options() {
    let text = "```{r plot, echo=FALSE, fig.height=4.5, fig.cap=\"A plot\"}\nplot(1)\n```\n";
    let mut notebook = reads(text, ".Rmd").expect("Failed to read Rmd");
    notebook.metadata.remove(MAIN_LANGUAGE);
    let cell = &notebook.cells[0];
    assert_eq!(cell.metadata.get("name"), Some(&json!("plot")));
    assert_eq!(cell.metadata.get("hide_input"), Some(&json!(true)));
    assert_eq!(cell.metadata.get("fig.height"), Some(&json!(4.5)));
    assert_eq!(cell.metadata.get("fig.cap"), Some(&json!("A plot")));

    // Options are written name first, then in key order
    assert_snapshot!(writes(&notebook, ".Rmd").unwrap(), @r###"
    ```{r plot, fig.cap="A plot", fig.height=4.5, echo=FALSE}
    plot(1)
    ```
    "###);
}

#[test]
fn test_blank_lines_are_preserved() {
    let text = "Intro\n\n\n\nSecond paragraph cell\n```{r}\nx\n```\n\n\n\nEnd\n";
    let mut notebook = reads(text, ".Rmd").expect("Failed to read Rmd");
    notebook.metadata.remove(MAIN_LANGUAGE);
    assert_eq!(notebook.cells.len(), 4);
    assert_eq!(notebook.cells[0].skiplines(), 2);
    assert_eq!(notebook.cells[1].skiplines(), 0);
    assert_eq!(notebook.cells[2].skiplines(), 3);
    assert_eq!(writes(&notebook, ".Rmd").unwrap(), text);
}

#[test]
fn test_front_matter_round_trip() {
    let text = fixture("analysis.Rmd");
    let notebook = reads(&text, ".Rmd").expect("Failed to read Rmd");

    assert_eq!(notebook.cells[0].cell_type, CellType::Raw);
    assert_eq!(
        notebook.cells[0].source,
        "---\ntitle: \"Analysis\"\noutput: html_document\n---"
    );
    assert_eq!(
        notebook.metadata.get("kernelspec"),
        Some(&json!({"display_name": "R", "language": "R", "name": "ir"}))
    );
    assert_eq!(notebook.cells[2].metadata.get("hide_output"), Some(&json!(true)));
    assert_eq!(notebook.cells.last().unwrap().language(), Some("python"));

    assert_eq!(writes(&notebook, ".Rmd").unwrap(), text);
}

#[test]
fn test_language_info_sets_default_tag() {
    let mut metadata = Metadata::new();
    metadata.insert("language_info".into(), json!({"name": "python"}));
    let notebook = Notebook::new(vec![Cell::code("print(1)")], metadata);
    let text = writes(&notebook, ".Rmd").unwrap();
    assert!(text.contains("```{python}\nprint(1)\n```"));
}
