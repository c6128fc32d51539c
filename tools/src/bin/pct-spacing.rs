//! Estimates the average spacing of a point set.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{bail, Result};
use clap::Parser;
use log::info;

use pct_ops::average_spacing;
use pct_tools::{init_logging, input_path, load_input};

/// Estimate the average spacing from a set of nearest neighbors
#[derive(Debug, Parser)]
#[command(name = "pct-spacing", version)]
struct Cli {
    /// Input file (default: read PLY from standard input)
    #[arg(short, long, value_name = "FILE")]
    input: Option<PathBuf>,

    /// Input file, positional alternative to --input
    #[arg(value_name = "FILE", conflicts_with = "input")]
    file: Option<PathBuf>,

    /// Number of nearest neighbors used
    #[arg(short, long, default_value_t = 6)]
    neighbors: usize,

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

    info!("neighbors = {}", cli.neighbors);
    let spacing = average_spacing(&points, cli.neighbors);
    println!("{}", spacing);

    info!("done in {:.3} second(s)", start.elapsed().as_secs_f64());
    Ok(())
}
