//! Estimates the normal vectors of a point set from local neighborhoods.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{bail, Result};
use clap::Parser;
use log::info;

use pct_ops::estimate_normals;
use pct_tools::{init_logging, input_path, load_input, save_output};

/// Estimate per-point normals from a PCA of the nearest neighbors
#[derive(Debug, Parser)]
#[command(name = "pct-normals", version)]
struct Cli {
    /// Input file (default: read PLY from standard input)
    #[arg(short, long, value_name = "FILE")]
    input: Option<PathBuf>,

    /// Input file, positional alternative to --input
    #[arg(value_name = "FILE", conflicts_with = "input")]
    file: Option<PathBuf>,

    /// Output file (default: write PLY to standard output)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Number of nearest neighbors used
    #[arg(short, long, default_value_t = 12)]
    neighbors: usize,

    /// Display info to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let start = Instant::now();

    let mut points = load_input(input_path(cli.input, cli.file).as_deref())?;
    if points.is_empty() {
        bail!("zero points read");
    }

    info!("neighbors = {}", cli.neighbors);
    estimate_normals(&mut points, cli.neighbors);

    save_output(cli.output.as_deref(), &points)?;
    info!("done in {:.3} second(s)", start.elapsed().as_secs_f64());
    Ok(())
}
