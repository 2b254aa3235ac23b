//! vdproject2xml CLI - converts Visual Studio installer projects to XML and back.
//!
//! This is the main entry point for the vdproject2xml command-line application.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use tracing::info;
use tracing_subscriber::EnvFilter;

use vdproj::prelude::*;

/// vdproject2xml - lossless .vdproj <-> XML converter
///
/// The conversion direction follows the input extension: a `.vdproj` file
/// becomes XML, an `.xml` file becomes a `.vdproj`.
#[derive(Parser)]
#[command(name = "vdproject2xml")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input file (.vdproj or .xml)
    input: PathBuf,

    /// Output file [default: input with the other format's extension]
    output: Option<PathBuf>,

    /// Indent the XML output
    #[arg(short, long, env = "VDPROJECT2XML_INDENT")]
    indent: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let output = match cli.output {
        Some(output) => output,
        None => default_output_path(&cli.input).with_context(|| {
            format!(
                "Cannot choose a conversion for {}: expected a .vdproj or .xml input",
                cli.input.display()
            )
        })?,
    };

    let config = Config::new().pretty_print(cli.indent);

    let start = Instant::now();
    let format = convert_file(&cli.input, &output, &config).with_context(|| {
        format!(
            "Failed to convert {} to {}",
            cli.input.display(),
            output.display()
        )
    })?;

    info!(
        "Converted {} to {} in {:?}",
        format.extension(),
        format.target().extension(),
        start.elapsed()
    );

    Ok(())
}

/// Log to stderr. `RUST_LOG` takes precedence over `-v`.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
