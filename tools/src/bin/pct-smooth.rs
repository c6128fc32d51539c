//! Smooths a point set by projection onto local least-variance planes.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{bail, Result};
use clap::Parser;
use log::info;

use pct_ops::smooth_point_set;
use pct_tools::{init_logging, input_path, load_input, save_output};

/// Smooth a point set with iterated neighborhood plane projection
#[derive(Debug, Parser)]
#[command(name = "pct-smooth", version)]
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

    /// Number of iterations
    #[arg(short, long, default_value_t = 1)]
    repeat: usize,

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
    info!("repeat = {}", cli.repeat);
    smooth_point_set(&mut points, cli.neighbors, cli.repeat);

    save_output(cli.output.as_deref(), &points)?;
    info!("done in {:.3} second(s)", start.elapsed().as_secs_f64());
    Ok(())
}
