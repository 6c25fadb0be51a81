// Command-line interface for nbtext
//
// This binary converts Jupyter notebooks to and from their text representations
// (R Markdown, Python scripts with `# +` chunks and knitr-spin R scripts).
//
// The source format is always taken from the input file extension. The target format is
// given with --to (an extension such as .py or Rmd); when omitted the `convert.default_to`
// configuration value is used.
//
// Usage:
//  nbtext <input> [--to <ext>] [--output <file>]          - Convert (default command)
//  nbtext convert <input> [--to <ext>] [--output <file>]  - Same as above (explicit)
//  nbtext inspect <path> [<view>]                         - Show the parsed cells
//  nbtext formats                                         - List supported formats
//
// Configuration is layered: embedded defaults, then ./nbtext.toml, then --config <path>.
// Logging goes to stderr and follows RUST_LOG, falling back to the `log.level` setting.

mod inspect;

use clap::{Arg, ArgAction, Command, ValueHint};
use nbtext_babel::{convert, ConvertArtifact, ConvertSpec, NotebookFormat};
use nbtext_config::{Loader, NbtextConfig, LOCAL_CONFIG};
use std::fs;
use std::path::Path;
use tracing_subscriber::EnvFilter;

const SUBCOMMANDS: &[&str] = &["convert", "inspect", "formats", "help"];

fn build_cli() -> Command {
    Command::new("nbtext")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Convert Jupyter notebooks to and from text formats")
        .long_about(
            "nbtext converts notebooks between .ipynb and text representations that\n\
            diff and edit well.\n\n\
            Formats:\n  \
            - .ipynb: Jupyter notebook (JSON)\n  \
            - .Rmd:   R Markdown\n  \
            - .py:    Python script with '# +' / '# -' code chunks\n  \
            - .R:     R script in knitr spin style ('#'' markdown, '#+' chunks)\n\n\
            Examples:\n  \
            nbtext notebook.ipynb --to .py            # Print the Python script\n  \
            nbtext notebook.ipynb --to Rmd -o nb.Rmd  # Write an R Markdown file\n  \
            nbtext inspect analysis.Rmd               # Show how the file maps onto cells",
        )
        .arg_required_else_help(true)
        .subcommand_required(false)
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .help("Path to an nbtext.toml configuration file")
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .subcommand(
            Command::new("convert")
                .about("Convert a notebook to another format (default command)")
                .long_about(
                    "Convert a notebook between formats.\n\n\
                    The source format is detected from the input file extension.\n\
                    Output goes to stdout by default, or use -o to specify a file.\n\n\
                    Examples:\n  \
                    nbtext convert nb.ipynb --to .py          # Python script on stdout\n  \
                    nbtext convert nb.py --to .ipynb -o nb.ipynb\n  \
                    nbtext nb.Rmd --to R                      # 'convert' is optional",
                )
                .arg(
                    Arg::new("input")
                        .help("Input notebook path")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("to")
                        .long("to")
                        .help("Target extension (defaults to convert.default_to)")
                        .long_help(
                            "Target format, given as an extension with or without the dot.\n\n\
                            Available formats: .ipynb, .Rmd, .py, .R",
                        )
                        .value_hint(ValueHint::Other),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .help("Output file path (defaults to stdout)")
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("no-overwrite")
                        .long("no-overwrite")
                        .help("Fail instead of replacing an existing output file")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("inspect")
                .about("Show how a notebook file is read")
                .long_about(
                    "Parse a notebook and print the result.\n\n\
                    Views:\n  \
                    - cells: one line per cell with type, line count and metadata (default)\n  \
                    - json:  the notebook as JSON",
                )
                .arg(
                    Arg::new("path")
                        .help("Path to the notebook")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("view")
                        .help("View to print. Defaults to 'cells'")
                        .required(false)
                        .value_parser(clap::builder::PossibleValuesParser::new(
                            inspect::AVAILABLE_VIEWS,
                        ))
                        .index(2)
                        .value_hint(ValueHint::Other),
                ),
        )
        .subcommand(Command::new("formats").about("List the supported notebook formats"))
}

fn main() {
    let args: Vec<String> = std::env::args().collect();

    let cli = build_cli();
    let matches = match cli.clone().try_get_matches_from(&args) {
        Ok(m) => m,
        Err(e) => {
            // A bare input file implies the convert subcommand
            if args.len() > 1
                && !args[1].starts_with('-')
                && !SUBCOMMANDS.contains(&args[1].as_str())
            {
                let mut new_args = vec![args[0].clone(), "convert".to_string()];
                new_args.extend_from_slice(&args[1..]);
                match cli.try_get_matches_from(&new_args) {
                    Ok(m) => m,
                    Err(e2) => e2.exit(),
                }
            } else {
                e.exit();
            }
        }
    };

    let config = load_cli_config(matches.get_one::<String>("config").map(|s| s.as_str()));
    init_logging(&config);

    match matches.subcommand() {
        Some(("convert", sub_matches)) => {
            let Some(input) = sub_matches.get_one::<String>("input") else {
                fail("an input file is required");
            };
            let to = sub_matches.get_one::<String>("to").map(|s| s.as_str());
            let output = sub_matches.get_one::<String>("output").map(|s| s.as_str());
            let overwrite = config.convert.overwrite && !sub_matches.get_flag("no-overwrite");
            handle_convert_command(input, to, output, overwrite, &config);
        }
        Some(("inspect", sub_matches)) => {
            let Some(path) = sub_matches.get_one::<String>("path") else {
                fail("a notebook path is required");
            };
            let view = sub_matches
                .get_one::<String>("view")
                .map(|s| s.as_str())
                .unwrap_or(inspect::DEFAULT_VIEW);
            handle_inspect_command(path, view);
        }
        Some(("formats", _)) => {
            handle_formats_command();
        }
        _ => {
            fail("Unknown subcommand. Use --help for usage information.");
        }
    }
}

/// Handle the convert command
fn handle_convert_command(
    input: &str,
    to: Option<&str>,
    output: Option<&str>,
    overwrite: bool,
    config: &NbtextConfig,
) {
    let target = to.unwrap_or(&config.convert.default_to);
    let mut spec = ConvertSpec::new(input, target).with_overwrite(overwrite);
    if let Some(path) = output {
        spec = spec.with_output_path(path);
    }

    match convert(spec) {
        Ok(ConvertArtifact::InMemory(text)) => print!("{text}"),
        Ok(ConvertArtifact::File(path)) => {
            tracing::debug!(output = %path.display(), "wrote converted notebook");
        }
        Err(e) => fail(&format!("Error converting '{input}': {e}")),
    }
}

/// Handle the inspect command
fn handle_inspect_command(path: &str, view: &str) {
    let format = NotebookFormat::from_path(Path::new(path)).unwrap_or_else(|e| fail(&e.to_string()));
    let source = fs::read_to_string(path)
        .unwrap_or_else(|e| fail(&format!("Error reading file '{path}': {e}")));
    let notebook = format
        .parse(&source)
        .unwrap_or_else(|e| fail(&format!("Parse error: {e}")));
    let output = inspect::render(&notebook, view).unwrap_or_else(|e| fail(&e));
    print!("{output}");
}

/// Handle the formats command
fn handle_formats_command() {
    println!("Supported formats:\n");
    for format in NotebookFormat::ALL {
        let codec = format.codec();
        println!("  {:<7} {}", format.extension(), codec.description());
    }
}

fn load_cli_config(explicit_path: Option<&str>) -> NbtextConfig {
    let loader = Loader::new().with_optional_file(LOCAL_CONFIG);
    let loader = if let Some(path) = explicit_path {
        loader.with_file(path)
    } else {
        loader
    };

    loader
        .build()
        .unwrap_or_else(|err| fail(&format!("Failed to load configuration: {err}")))
}

/// Build the log filter: RUST_LOG wins over the configured level
fn log_filter(config: &NbtextConfig) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log.level))
        .unwrap_or_else(|_| EnvFilter::new("warn"))
}

fn init_logging(config: &NbtextConfig) {
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(config))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn fail(message: &str) -> ! {
    eprintln!("{message}");
    std::process::exit(1);
}
