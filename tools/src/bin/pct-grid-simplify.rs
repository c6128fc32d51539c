//! Simplifies a point set based on a regular 3D grid.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{bail, Result};
use clap::Parser;
use log::info;

use pct_ops::grid_simplify;
use pct_tools::{init_logging, input_path, load_input, report_removed, save_output};

/// Keep one point per occupied cell of a regular grid
#[derive(Debug, Parser)]
#[command(name = "pct-grid-simplify", version)]
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

    /// Length of a grid cell
    #[arg(short, long, default_value_t = 0.1)]
    epsilon: f64,

    /// Display info to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let start = Instant::now();

    if cli.epsilon <= 0.0 {
        bail!("epsilon must be positive");
    }

    let mut points = load_input(input_path(cli.input, cli.file).as_deref())?;
    if points.is_empty() {
        bail!("zero points read");
    }

    info!("epsilon = {}", cli.epsilon);
    grid_simplify(&mut points, cli.epsilon);
    report_removed(&points);

    save_output(cli.output.as_deref(), &points)?;
    info!("done in {:.3} second(s)", start.elapsed().as_secs_f64());
    Ok(())
}
