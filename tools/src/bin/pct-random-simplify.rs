//! Simplifies a point set randomly.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{bail, Result};
use clap::Parser;
use log::info;

use pct_ops::random_simplify;
use pct_tools::{init_logging, input_path, load_input, report_removed, save_output};

/// Remove a percentage of points chosen uniformly at random
#[derive(Debug, Parser)]
#[command(name = "pct-random-simplify", version)]
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

    /// Removed percentage
    #[arg(short, long, default_value_t = 50.0)]
    percent: f64,

    /// Display info to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let start = Instant::now();

    if !(0.0..=100.0).contains(&cli.percent) {
        bail!("percent must be between 0 and 100");
    }

    let mut points = load_input(input_path(cli.input, cli.file).as_deref())?;
    if points.is_empty() {
        bail!("zero points read");
    }

    info!("percent = {}", cli.percent);
    random_simplify(&mut points, cli.percent);
    report_removed(&points);

    save_output(cli.output.as_deref(), &points)?;
    info!("done in {:.3} second(s)", start.elapsed().as_secs_f64());
    Ok(())
}
