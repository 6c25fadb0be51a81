//! Python script format tests

use crate::common::fixture;
use insta::assert_snapshot;
use nbtext_babel::notebook::{Cell, CellType, Metadata, Notebook};
use nbtext_babel::{reads, writes, FormatError};
use serde_json::json;

#[test]
fn test_markdown_escaping() {
    let notebook = Notebook::new(vec![Cell::markdown("Hello")], Metadata::new());
    assert_eq!(writes(&notebook, ".py").unwrap(), "# Hello\n");

    let back = reads("# Hello", ".py").unwrap();
    assert_eq!(back.cells.len(), 1);
    assert_eq!(back.cells[0].cell_type, CellType::Markdown);
    assert_eq!(back.cells[0].source_lines(), vec!["Hello"]);
}

#[test]
fn test_script_fixture_round_trip() {
    let text = fixture("script.py");
    let notebook = reads(&text, ".py").expect("Failed to read script");

    assert_eq!(
        notebook.metadata.get("executable"),
        Some(&json!("/usr/bin/env python"))
    );
    assert_eq!(
        notebook.metadata.get("encoding"),
        Some(&json!("# -*- coding: utf-8 -*-"))
    );
    assert_eq!(notebook.cells.len(), 5);
    assert_eq!(
        notebook.cells[0].source,
        "# A Python notebook\n\nMarkdown is escaped."
    );
    assert_eq!(notebook.cells[1].source, "import os\nimport sys");
    assert_eq!(
        notebook.cells[2].metadata.get("tags"),
        Some(&json!(["parameters"]))
    );
    assert_eq!(
        notebook.cells[3].source,
        "def f(x):\n    return x + 1\n\nf(alpha)"
    );
    assert_eq!(
        notebook.cells[4].source,
        "# A comment, so this cell needs markers\ny = f(2)"
    );

    assert_eq!(writes(&notebook, ".py").unwrap(), text);
}

#[test]
fn test_code_cells_from_notebook() {
    let notebook = Notebook::new(
        vec![
            Cell::markdown("# Title\n\nSome text"),
            Cell::code("import numpy as np"),
            Cell::code("# comment\nx = np.arange(3)"),
            Cell::code("def g():\n\n    return 1"),
            Cell::code("%%R\nlibrary(ggplot2)").with_metadata("language", "R"),
        ],
        Metadata::new(),
    );
    assert_snapshot!(writes(&notebook, ".py").unwrap(), @r###"
    # # Title
    #
    # Some text

    import numpy as np

    # +
    # comment
    x = np.arange(3)

    # +
    def g():

        return 1

    # + {"language":"R"}
    %%R
    library(ggplot2)
    "###);
}

#[test]
fn test_notebook_round_trip() {
    let cells = vec![
        Cell::markdown("Some *markdown*\n\n- item"),
        Cell::code("x = 1"),
        Cell::code(""),
        Cell::code("# only a comment"),
        Cell::markdown("More text"),
        Cell::code("y = 2").with_metadata("tags", json!(["a", "b"])),
    ];
    let notebook = Notebook::new(cells.clone(), Metadata::new());
    let text = writes(&notebook, ".py").unwrap();
    let back = reads(&text, ".py").unwrap();
    assert_eq!(back.cells, cells);
}

#[test]
fn test_adjacent_code_cells_get_markers() {
    let first = Cell::code("x = 1").with_metadata("skiplines", 0);
    let notebook = Notebook::new(vec![first, Cell::code("y = 2")], Metadata::new());
    let text = writes(&notebook, ".py").unwrap();
    assert_eq!(text, "x = 1\n# +\ny = 2\n");

    let back = reads(&text, ".py").unwrap();
    assert_eq!(back.cells, notebook.cells);
}

#[test]
fn test_unclosed_chunk_at_end() {
    let text = "# +\nx = 1\n\ny = 2\n";
    let notebook = reads(text, ".py").unwrap();
    assert_eq!(notebook.cells.len(), 1);
    assert_eq!(notebook.cells[0].source, "x = 1\n\ny = 2");
    assert_eq!(writes(&notebook, ".py").unwrap(), text);
}

#[test]
fn test_invalid_chunk_options() {
    match reads("# + {\"tags\": }\nx = 1\n", ".py") {
        Err(FormatError::InvalidChunkOptions { options, .. }) => {
            assert!(options.starts_with('{'));
        }
        other => panic!("Expected InvalidChunkOptions, got {other:?}"),
    }
}

#[test]
fn test_r_main_language_is_written_as_header() {
    let mut metadata = Metadata::new();
    metadata.insert("main_language".into(), json!("R"));
    let notebook = Notebook::new(
        vec![Cell::code("print(1)").with_metadata("language", "python")],
        metadata,
    );
    assert_snapshot!(writes(&notebook, ".py").unwrap(), @r###"
    # ---
    # jupyter:
    #   main_language: R
    # ---

    # + {"language":"python"}
    print(1)
    "###);
}

#[test]
fn test_markdown_lines_like_chunk_markers() {
    let notebook = Notebook::new(
        vec![
            Cell::markdown("Steps\n+\nend"),
            Cell::code("x = 1"),
            Cell::markdown("+ {a}"),
        ],
        Metadata::new(),
    );
    let text = writes(&notebook, ".py").unwrap();
    assert_eq!(text, "# Steps\n#+\n# end\n\nx = 1\n\n#+ {a}\n");

    let back = reads(&text, ".py").unwrap();
    assert_eq!(back.cells, notebook.cells);
}

#[test]
fn test_markdown_about_encodings_is_kept() {
    let text = "# File encoding: utf-8\n\nx = 1\n";
    let notebook = reads(text, ".py").unwrap();
    assert!(!notebook.metadata.contains_key("encoding"));
    assert_eq!(notebook.cells.len(), 2);
    assert_eq!(notebook.cells[0].source, "File encoding: utf-8");
    assert_eq!(writes(&notebook, ".py").unwrap(), text);
}
