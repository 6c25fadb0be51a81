//! R script (knitr spin) format tests

use crate::common::fixture;
use insta::assert_snapshot;
use nbtext_babel::notebook::{Cell, CellType, Metadata, Notebook, MAIN_LANGUAGE};
use nbtext_babel::{reads, writes};
use serde_json::json;

#[test]
fn test_spin_fixture_round_trip() {
    let text = fixture("spin.R");
    let notebook = reads(&text, ".R").expect("Failed to read R script");

    assert_eq!(notebook.metadata.get(MAIN_LANGUAGE), Some(&json!("R")));
    assert_eq!(notebook.cells[0].cell_type, CellType::Raw);
    assert_eq!(
        notebook.cells[1].source,
        "# Load data\n\nWe start with a vector."
    );
    assert_eq!(notebook.cells[2].source, "x <- c(1, 2, 3)\n\nsummary(x)");
    assert_eq!(notebook.cells[3].metadata.get("name"), Some(&json!("plot")));
    assert_eq!(notebook.cells[3].metadata.get("fig.width"), Some(&json!(7)));
    assert_eq!(notebook.cells[4].language(), Some("python"));
    assert_eq!(notebook.cells[5].source, "The end.");

    assert_eq!(writes(&notebook, ".R").unwrap(), text);
}

#[test]
fn test_consecutive_code_cells() {
    let notebook = Notebook::new(
        vec![
            Cell::markdown("Two code cells"),
            Cell::code("x <- 1"),
            Cell::code("y <- 2").with_metadata("hide_input", true),
            Cell::code("z <- 3"),
        ],
        Metadata::new(),
    );
    let text = writes(&notebook, ".R").unwrap();
    assert_snapshot!(text, @r###"
    #' Two code cells

    x <- 1

    #+ echo=FALSE
    y <- 2

    #+
    z <- 3
    "###);

    let back = reads(&text, ".R").unwrap();
    assert_eq!(back.cells, notebook.cells);
}

#[test]
fn test_main_language_r_is_implied() {
    let mut metadata = Metadata::new();
    metadata.insert(MAIN_LANGUAGE.into(), json!("R"));
    let notebook = Notebook::new(vec![Cell::code("x <- 1")], metadata);
    assert_eq!(writes(&notebook, ".R").unwrap(), "x <- 1\n");
    assert_eq!(notebook.metadata.len(), 1);
}

#[test]
fn test_python_notebook_as_r_script() {
    let mut metadata = Metadata::new();
    metadata.insert("language_info".into(), json!({"name": "python"}));
    let notebook = Notebook::new(
        vec![
            Cell::code("import os"),
            Cell::code("x <- 1").with_metadata("language", "R"),
        ],
        metadata,
    );
    let text = writes(&notebook, ".R").unwrap();
    assert!(text.ends_with("import os\n\n#+ engine=\"R\"\nx <- 1\n"));

    let back = reads(&text, ".R").unwrap();
    assert_eq!(back.cells, notebook.cells);
    assert!(!back.metadata.contains_key(MAIN_LANGUAGE));
}

#[test]
fn test_roxygen_markdown_escaping() {
    let text = "#' A *title*\n#'\n#' - item\nplot(1)\n";
    let notebook = reads(text, ".R").unwrap();
    assert_eq!(notebook.cells.len(), 2);
    assert_eq!(notebook.cells[0].source, "A *title*\n\n- item");
    assert_eq!(notebook.cells[0].skiplines(), 0);
    assert_eq!(writes(&notebook, ".R").unwrap(), text);
}
