//! Jupyter notebook format tests

use crate::common::{fixture, fixture_path};
use nbtext_babel::notebook::CellType;
use nbtext_babel::{readf, reads, writes, FormatError};
use serde_json::json;

#[test]
fn test_ipynb_fixture_round_trip() {
    let text = fixture("simple.ipynb");
    let notebook = reads(&text, ".ipynb").expect("Failed to read ipynb");

    assert_eq!(notebook.nbformat, 4);
    assert_eq!(notebook.cells.len(), 3);
    assert_eq!(notebook.cells[0].source, "# Simple notebook\n\nSome *text*.");
    assert_eq!(notebook.cells[1].execution_count, Some(1));
    assert_eq!(notebook.cells[1].outputs[0]["text"], json!(["3\n"]));
    assert_eq!(notebook.cells[2].cell_type, CellType::Raw);

    assert_eq!(writes(&notebook, ".ipynb").unwrap(), text);
}

#[test]
fn test_readf_uses_the_extension() {
    let notebook = readf(fixture_path("simple.ipynb")).expect("Failed to read file");
    assert_eq!(notebook.language_info_name(), Some("python"));
}

#[test]
fn test_readf_rejects_other_files() {
    match readf("notes.txt") {
        Err(FormatError::UnsupportedFormat { name }) => assert_eq!(name, "notes.txt"),
        other => panic!("Expected UnsupportedFormat, got {other:?}"),
    }
}

#[test]
fn test_ipynb_to_script_and_back() {
    let notebook = reads(&fixture("simple.ipynb"), ".ipynb").unwrap();
    let script = writes(&notebook, ".py").unwrap();
    assert!(script.contains("# + {\"tags\":[\"setup\"]}\nx = 1 + 2\nprint(x)\n# -"));

    let back = reads(&script, ".py").unwrap();
    assert_eq!(back.metadata, notebook.metadata);
    assert_eq!(back.cells.len(), 3);
    for (before, after) in notebook.cells.iter().zip(&back.cells) {
        assert_eq!(before.source, after.source);
        assert_eq!(before.metadata, after.metadata);
    }
    // Text formats carry no outputs
    assert!(back.cells[1].outputs.is_empty());
    // and have no raw cells outside the header
    assert_eq!(back.cells[2].cell_type, CellType::Markdown);
}
