//! Core types for the pct point-set toolkit.
//!
//! Provides the [`PointSet`] container (stable point identifiers, optional
//! per-point attributes, an in-place partition/retire model) and the spatial
//! index used for radius and nearest-neighbor queries.

pub mod index;
pub mod point_set;

pub use index::{RTreeIndex, RangeQuery};
pub use point_set::{Color, PointId, PointSet};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
