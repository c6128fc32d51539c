//! Removes outliers based on the local average distance to neighbors.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{bail, Result};
use clap::Parser;
use log::info;

use pct_ops::{remove_radius_outliers, remove_statistical_outliers};
use pct_tools::{init_logging, input_path, load_input, report_removed, save_output};

/// Remove outliers from a point set
#[derive(Debug, Parser)]
#[command(name = "pct-outliers", version)]
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
    #[arg(short, long, default_value_t = 6)]
    neighbors: usize,

    /// Percentage of points allowed to be removed
    #[arg(short, long, default_value_t = 1.0)]
    percent: f64,

    /// Distance threshold below which a point is never removed
    #[arg(short, long, default_value_t = 0.1)]
    distance: f64,

    /// Use the radius criterion instead: remove points with too few
    /// neighbors within this radius
    #[arg(short, long)]
    radius: Option<f64>,

    /// Minimum neighbor count within --radius (the point itself counts)
    #[arg(long, default_value_t = 3)]
    min_neighbors: usize,

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

    match cli.radius {
        Some(radius) => {
            info!("radius = {}", radius);
            info!("min-neighbors = {}", cli.min_neighbors);
            remove_radius_outliers(&mut points, radius, cli.min_neighbors);
        }
        None => {
            info!("neighbors = {}", cli.neighbors);
            info!("percent = {}", cli.percent);
            info!("distance = {}", cli.distance);
            remove_statistical_outliers(&mut points, cli.neighbors, cli.percent, cli.distance);
        }
    }
    report_removed(&points);

    save_output(cli.output.as_deref(), &points)?;
    info!("done in {:.3} second(s)", start.elapsed().as_secs_f64());
    Ok(())
}
