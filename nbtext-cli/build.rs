use clap::{Arg, ArgAction, Command, ValueHint};
use clap_complete::{generate_to, shells::*};
use std::env;
use std::io::Error;

// Mirror of the inspection views from src/inspect.rs
// We need to duplicate this here since build scripts can't access src/ modules
const AVAILABLE_VIEWS: &[&str] = &["json", "cells"];

// Extensions accepted by --to
const TARGET_FORMATS: &[&str] = &[".ipynb", ".Rmd", ".py", ".R"];

fn main() -> Result<(), Error> {
    let outdir = match env::var_os("OUT_DIR") {
        None => return Ok(()),
        Some(outdir) => outdir,
    };

    let config = Arg::new("config")
        .long("config")
        .value_name("PATH")
        .help("Path to an nbtext.toml configuration file")
        .value_hint(ValueHint::FilePath)
        .global(true);

    let mut cmd = Command::new("nbtext")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Convert Jupyter notebooks to and from text formats")
        .arg_required_else_help(true)
        .arg(config)
        .subcommand(
            Command::new("convert")
                .about("Convert a notebook to another format")
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
                        .help("Target extension")
                        .value_parser(clap::builder::PossibleValuesParser::new(TARGET_FORMATS)),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .help("Output file path")
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
                .arg(
                    Arg::new("path")
                        .help("Path to the notebook")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("view")
                        .help("View to print")
                        .value_parser(clap::builder::PossibleValuesParser::new(AVAILABLE_VIEWS))
                        .index(2),
                ),
        )
        .subcommand(Command::new("formats").about("List the supported notebook formats"));

    // Generate completions for bash
    generate_to(Bash, &mut cmd, "nbtext", &outdir)?;

    // Generate completions for zsh
    generate_to(Zsh, &mut cmd, "nbtext", &outdir)?;

    // Generate completions for fish
    generate_to(Fish, &mut cmd, "nbtext", &outdir)?;

    println!("cargo:warning=Shell completions generated in {outdir:?}");

    Ok(())
}
