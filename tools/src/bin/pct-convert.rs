//! Converts a point set to another format, deduced from the output
//! extension.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{bail, Result};
use clap::Parser;
use log::info;

use pct_tools::{init_logging, input_path, load_input, save_output};

/// Convert a point set between PLY, XYZ and PCD
#[derive(Debug, Parser)]
#[command(name = "pct-convert", version)]
struct Cli {
    /// Input file (default: read PLY from standard input)
    #[arg(short, long, value_name = "FILE")]
    input: Option<PathBuf>,

    /// Input file, positional alternative to --input
    #[arg(value_name = "FILE", conflicts_with = "input")]
    file: Option<PathBuf>,

    /// Output file; the extension selects the format
    #[arg(short, long, value_name = "FILE", default_value = "out.ply")]
    output: PathBuf,

    /// Display info to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let start = Instant::now();

    let points = load_input(input_path(cli.input, cli.file).as_deref())?;
    if points.is_empty() {
        bail!("zero points read");
    }

    info!("{} point(s) read", points.len());
    save_output(Some(cli.output.as_path()), &points)?;

    info!("done in {:.3} second(s)", start.elapsed().as_secs_f64());
    Ok(())
}
