//! Notebook ⇄ text conversion
//!
//!     This crate reads and writes Jupyter notebooks as plain text documents: R Markdown (.Rmd),
//!     Python scripts (.py) and R scripts in knitr spin style (.R). The .ipynb JSON format itself
//!     is supported too, so any two of the four formats can be converted into each other.
//!
//!     This is a pure lib, that is, it powers nbtext-cli but is shell agnostic: no code here
//!     supposes a shell environment, be it stdout printing or env vars.
//!
//!     The file structure :
//!     .
//!     ├── error.rs
//!     ├── format.rs               # Format trait definition
//!     ├── notebook.rs             # Notebook, Cell, metadata keys
//!     ├── convert.rs              # reads/writes, read/write, readf/writef, convert
//!     ├── formats
//!     │   ├── profile.rs          # per-dialect rules (escaping, chunk markers)
//!     │   ├── header.rs           # shebang, encoding and YAML front matter
//!     │   ├── language.rs         # main language inference and defaults
//!     │   ├── chunk_options.rs    # knitr and JSON chunk options
//!     │   ├── text                # shared reader/writer of the text dialects
//!     │   │   ├── parser.rs
//!     │   │   ├── serializer.rs
//!     │   │   └── mod.rs
//!     │   ├── ipynb               # nbformat v4 JSON
//!     │   └── mod.rs              # NotebookFormat
//!     └── lib.rs
//!
//! Testing
//!     tests
//!     ├── lib.rs                  # registers the per-format modules
//!     ├── <format>/mod.rs
//!     └── fixtures
//!         └── <docname>.<ext>
//!
//! Round Trips
//!
//!     Text → notebook → text keeps the cells of documents the reader produced: blank lines are
//!     kept in `skiplines` and optional chunk markers in `explicit_boundary`. The text itself can
//!     change in two ways. Reading `.Rmd` records the inferred `main_language`, which the writer
//!     puts back in a YAML header when the document had none. The `.py` writer elides a closing
//!     `# -` before a `# +` chunk and at the end of the file, so a marker written there by hand
//!     is dropped. Notebook → text → notebook keeps cell types, sources and metadata for
//!     notebooks within the dialect's feature set; outputs never survive a text format.
//!
//! Languages
//!
//!     Code cells in a notebook share a main language. R Markdown names the language of every
//!     chunk, so the reader infers the main language from the chunks. The scripts take it from
//!     the extension and only mark cells in another language. The writer takes the default language from `main_language`,
//!     then `language_info.name`, then the dialect.

pub mod convert;
pub mod error;
pub mod format;
pub mod formats;
pub mod notebook;

pub use convert::{convert, read, readf, reads, write, writef, writes, ConvertArtifact, ConvertSpec};
pub use error::FormatError;
pub use format::Format;
pub use formats::NotebookFormat;
pub use notebook::{Cell, CellType, Metadata, Notebook};
