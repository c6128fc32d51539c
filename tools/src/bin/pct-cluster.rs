//! Clusters a point set given a tolerance and a minimum number of points.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{bail, Result};
use clap::Parser;
use log::info;

use pct_ops::cluster::{cluster_point_set, ClusterOutput};
use pct_tools::{init_logging, input_path, load_input, report_removed, save_output};

/// Cluster a point set given a tolerance and a minimum number of points
#[derive(Debug, Parser)]
#[command(name = "pct-cluster", version)]
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

    /// Maximum distance between two connected points
    #[arg(short = 'c', long = "cluster", default_value_t = 0.1)]
    tolerance: f64,

    /// Minimum number of points per cluster (default: 1% of the input)
    #[arg(short, long)]
    min_points: Option<usize>,

    /// Keep only the biggest cluster
    #[arg(short = 'B', long, conflicts_with = "label")]
    biggest: bool,

    /// Keep all points and store one label per cluster
    #[arg(short = 'L', long)]
    label: bool,

    /// Display info to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let start = Instant::now();

    if cli.tolerance < 0.0 {
        bail!("cluster tolerance must be non-negative");
    }

    let mut points = load_input(input_path(cli.input, cli.file).as_deref())?;
    if points.is_empty() {
        bail!("zero points read");
    }

    let min_points = cli
        .min_points
        .unwrap_or_else(|| ((points.len() as f64 * 0.01) as usize).max(1));
    let output = if cli.biggest {
        ClusterOutput::Biggest
    } else if cli.label {
        ClusterOutput::Label
    } else {
        ClusterOutput::Filter
    };

    info!("cluster = {}", cli.tolerance);
    info!("min-points = {}", min_points);
    info!("output = {:?}", output);

    let stats = cluster_point_set(&mut points, cli.tolerance, min_points, output);

    info!("{} cluster(s) kept", stats.clusters);
    if let Some(largest) = stats.largest {
        info!("largest cluster has {} point(s)", largest);
    }
    if output != ClusterOutput::Label {
        report_removed(&points);
    }

    save_output(cli.output.as_deref(), &points)?;
    info!("done in {:.3} second(s)", start.elapsed().as_secs_f64());
    Ok(())
}
