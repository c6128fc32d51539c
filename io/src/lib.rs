//! Point-set file I/O.
//!
//! Supports reading and writing point sets in:
//! - PLY (ASCII, with normals, colors and integer vertex properties)
//! - XYZ (plain coordinates, optionally followed by normals)
//! - PCD (ASCII subset of the Point Cloud Library format)

pub mod pcd;
pub mod ply;
pub mod xyz;

pub use pcd::{read_pcd, write_pcd};
pub use ply::{read_ply, write_ply};
pub use xyz::{read_xyz, write_xyz};

pub use pct_core::{Error, Result};

use std::io::{BufRead, Write};
use std::path::Path;

use pct_core::PointSet;

/// Supported point-set file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Ply,
    Xyz,
    Pcd,
}

impl Format {
    /// Deduce a format from a file extension, case-insensitively.
    pub fn from_path(path: &Path) -> Option<Format> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "ply" => Some(Format::Ply),
            "xyz" => Some(Format::Xyz),
            "pcd" => Some(Format::Pcd),
            _ => None,
        }
    }
}

/// Read a point set in the given format.
pub fn read_point_set<R: BufRead>(reader: R, format: Format) -> Result<PointSet> {
    match format {
        Format::Ply => read_ply(reader),
        Format::Xyz => read_xyz(reader),
        Format::Pcd => read_pcd(reader),
    }
}

/// Write the active points of a point set in the given format.
pub fn write_point_set<W: Write>(writer: &mut W, points: &PointSet, format: Format) -> Result<()> {
    match format {
        Format::Ply => write_ply(writer, points),
        Format::Xyz => write_xyz(writer, points),
        Format::Pcd => write_pcd(writer, points),
    }
}
