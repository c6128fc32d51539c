//! Shared glue for the pct command-line tools: logger setup, input/output
//! resolution and the removal report every retiring tool prints.

use std::fs::File;
use std::io::{self, BufReader, BufWriter};
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use log::info;

use pct_core::PointSet;
use pct_io::Format;

/// Route `log` records to stderr; `--verbose` enables the info level.
pub fn init_logging(verbose: bool) {
    let level = if verbose {
        log::LevelFilter::Info
    } else {
        log::LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(level)
        .format_timestamp(None)
        .format_target(false)
        .init();
}

/// The input path: an explicit `--input` wins over the positional form.
pub fn input_path(flag: Option<PathBuf>, positional: Option<PathBuf>) -> Option<PathBuf> {
    flag.or(positional)
}

/// Read a point set from `path`, or PLY from standard input when no path
/// is given.
pub fn load_input(path: Option<&Path>) -> Result<PointSet> {
    match path {
        Some(path) => {
            let format = Format::from_path(path)
                .ok_or_else(|| anyhow!("unrecognized input extension: {}", path.display()))?;
            let file =
                File::open(path).with_context(|| format!("cannot open {}", path.display()))?;
            pct_io::read_point_set(BufReader::new(file), format)
                .with_context(|| format!("cannot read {}", path.display()))
        }
        None => pct_io::read_point_set(io::stdin().lock(), Format::Ply)
            .context("cannot read point set from standard input"),
    }
}

/// Write the active points to `path` (format deduced from the extension),
/// or PLY to standard output when no path is given.
pub fn save_output(path: Option<&Path>, points: &PointSet) -> Result<()> {
    match path {
        Some(path) => {
            let format = Format::from_path(path)
                .ok_or_else(|| anyhow!("unrecognized output extension: {}", path.display()))?;
            let file =
                File::create(path).with_context(|| format!("cannot create {}", path.display()))?;
            let mut writer = BufWriter::new(file);
            pct_io::write_point_set(&mut writer, points, format)
                .with_context(|| format!("cannot write {}", path.display()))
        }
        None => {
            let stdout = io::stdout();
            let mut writer = BufWriter::new(stdout.lock());
            pct_io::write_point_set(&mut writer, points, Format::Ply)
                .context("cannot write point set to standard output")
        }
    }
}

/// Removal statistics, logged after any operation that retires points.
pub fn report_removed(points: &PointSet) {
    let removed = points.garbage_len();
    let total = points.len() + removed;
    let percent = if total > 0 {
        100.0 * removed as f64 / total as f64
    } else {
        0.0
    };
    info!(
        "{:.2}% / {} point(s) removed ({} point(s) remaining)",
        percent,
        removed,
        points.len()
    );
}
