//! Property tests shared by the text formats

use nbtext_babel::formats::text::parser::text_to_cell;
use nbtext_babel::formats::{FormatProfile, PY_SCRIPT, RMARKDOWN, R_SCRIPT};
use nbtext_babel::notebook::{Cell, Metadata, Notebook};
use nbtext_babel::{reads, writes};
use proptest::prelude::*;

const PROFILES: [&FormatProfile; 3] = [&RMARKDOWN, &PY_SCRIPT, &R_SCRIPT];

/// Lines that open, close or escape something in at least one dialect
const VOCABULARY: &[&str] = &[
    "",
    "   ",
    "# +",
    "# -",
    "# + {\"tags\": [\"a\"]}",
    "# + {broken}",
    "#",
    "# text",
    "#'",
    "#' text",
    "#+",
    "#+ name, echo=FALSE",
    "```{r}",
    "```{python, echo=FALSE}",
    "```",
    "---",
    "x = 1",
    "text",
];

fn code_line() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9 =]{0,8}"
}

fn markdown_cell() -> impl Strategy<Value = Cell> {
    prop::collection::vec("[a-z+-][a-z+{} ]{0,10}", 1..4).prop_map(|lines| Cell::markdown(lines.join("\n")))
}

fn code_cell() -> impl Strategy<Value = Cell> {
    let middle = prop::collection::vec(prop_oneof![3 => code_line(), 1 => Just(String::new())], 0..3);
    (code_line(), middle, code_line()).prop_map(|(first, middle, last)| {
        let mut lines = vec![first];
        lines.extend(middle);
        lines.push(last);
        Cell::code(lines.join("\n"))
    })
}

fn notebook() -> impl Strategy<Value = Notebook> {
    prop::collection::vec(prop_oneof![markdown_cell(), code_cell()], 0..6)
        .prop_map(|cells| Notebook::new(cells, Metadata::new()))
}

proptest! {
    #[test]
    fn escaping_is_inverted_by_unescaping(line in "[^\r\n]*") {
        for profile in [&PY_SCRIPT, &R_SCRIPT] {
            prop_assert_eq!(profile.unescape(&profile.escape(&line)), line.clone());
        }
    }

    #[test]
    fn parser_always_makes_progress(
        indices in prop::collection::vec(0..VOCABULARY.len(), 1..12)
    ) {
        let lines: Vec<String> = indices.iter().map(|&i| VOCABULARY[i].to_string()).collect();
        for profile in PROFILES {
            if let Ok((_, consumed)) = text_to_cell(&lines, profile) {
                prop_assert!(consumed >= 1);
                prop_assert!(consumed <= lines.len());
            }
        }
    }

    #[test]
    fn text_documents_are_read_completely(
        indices in prop::collection::vec(0..VOCABULARY.len(), 0..16)
    ) {
        let text = indices.iter().map(|&i| VOCABULARY[i]).collect::<Vec<_>>().join("\n");
        for ext in [".Rmd", ".py", ".R"] {
            // Either a notebook or a structured error; never a hang or a panic
            let _ = reads(&text, ext);
        }
    }

    #[test]
    fn notebooks_survive_every_text_format(notebook in notebook()) {
        for ext in [".Rmd", ".py", ".R"] {
            let text = writes(&notebook, ext).unwrap();
            let mut back = reads(&text, ext).unwrap();
            prop_assert_eq!(&back.cells, &notebook.cells, "{} text:\n{}", ext, text);

            // Reading records the inferred main language; without it the text is the same
            back.metadata.remove("main_language");
            prop_assert_eq!(writes(&back, ext).unwrap(), text);
        }
    }
}

#[test]
fn test_default_language_precedence() {
    let mut metadata = Metadata::new();
    metadata.insert("main_language".into(), serde_json::json!("R"));
    metadata.insert("language_info".into(), serde_json::json!({"name": "python"}));
    let notebook = Notebook::new(vec![Cell::code("x <- 1")], metadata);

    let text = writes(&notebook, ".Rmd").unwrap();
    assert!(text.contains("```{r}\nx <- 1\n```"));
    let text = writes(&notebook, ".py").unwrap();
    assert!(!text.contains("\"language\""));
}
