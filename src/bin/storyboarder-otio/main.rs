//! CLI tool to convert between Storyboarder projects and OpenTimelineIO.
//!
//! Usage:
//!   storyboarder-otio export < project.storyboarder > project.otio
//!   storyboarder-otio import < project.otio > project.storyboarder

use std::fmt;
use std::io::{self, Read, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::{Parser, ValueEnum};
use log::LevelFilter;

use storyboarder_otio::convert;

#[derive(Parser, Debug)]
#[command(
    name = "storyboarder-otio",
    about = "Convert between Storyboarder JSON (stdin/stdout) and OpenTimelineIO",
    version
)]
struct Args {
    /// Conversion direction
    #[arg(value_enum)]
    command: Command,

    /// Log conversion details to stderr
    #[arg(short = 'v', long)]
    verbose: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Command {
    /// Storyboarder JSON -> otio_json
    Export,
    /// otio_json -> Storyboarder JSON
    Import,
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Export => f.write_str("export"),
            Command::Import => f.write_str("import"),
        }
    }
}

fn main() -> ExitCode {
    // 1. Parse arguments; usage errors exit 1, help/version exit 0
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => {
            if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) {
                err.exit();
            }
            let _ = err.print();
            return ExitCode::FAILURE;
        }
    };

    init_logging(args.verbose);

    // 2. Read all of stdin
    let input = match read_input(io::stdin().lock()) {
        Ok(input) => input,
        Err(err) => {
            eprintln!("Error reading from stdin: {err:#}");
            return ExitCode::FAILURE;
        }
    };

    // 3. Convert, then write only once the whole result exists
    let output = match run(args.command, &input) {
        Ok(output) => output,
        Err(err) => {
            eprintln!("Conversion error for command '{}': {err:#}", args.command);
            return ExitCode::FAILURE;
        }
    };

    let mut stdout = io::stdout().lock();
    if let Err(err) = writeln!(stdout, "{output}").and_then(|()| stdout.flush()) {
        eprintln!("Error writing to stdout: {err}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(level)
        .target(env_logger::Target::Stderr)
        .init();
}

/// Reads the whole input, rejecting empty payloads.
fn read_input(mut reader: impl Read) -> Result<String> {
    let mut input = String::new();
    reader
        .read_to_string(&mut input)
        .context("Failed to read input")?;
    if input.is_empty() {
        anyhow::bail!("No input data received from stdin.");
    }
    log::debug!("Read {} bytes from stdin", input.len());
    Ok(input)
}

/// Runs one conversion on in-memory text.
fn run(command: Command, input: &str) -> Result<String> {
    match command {
        Command::Export => {
            convert::export_storyboard(input).context("Failed to export storyboard to OTIO")
        }
        Command::Import => {
            convert::import_timeline(input).context("Failed to import OTIO timeline")
        }
    }
}
