//! Point-set processing algorithms.
//!
//! Each module provides one operation over a [`pct_core::PointSet`]:
//!
//! - [`cluster`]: connected-component clustering under a distance tolerance
//! - [`normals`]: normal estimation and orientation
//! - [`outliers`]: statistical and radius outlier removal
//! - [`simplify`]: grid and random simplification
//! - [`smooth`]: projection smoothing
//! - [`spacing`]: average spacing estimation
//!
//! Operations that drop points retire them through the point set's
//! reorder/truncate model, so callers can report removal counts before
//! compacting.

pub mod cluster;
pub mod normals;
pub mod outliers;
pub mod simplify;
pub mod smooth;
pub mod spacing;

pub use cluster::{cluster_point_set, cluster_with_index, ClusterOutput, ClusterStats};
pub use normals::{estimate_normals, orient_normals};
pub use outliers::{remove_radius_outliers, remove_statistical_outliers};
pub use simplify::{grid_simplify, random_simplify};
pub use smooth::smooth_point_set;
pub use spacing::average_spacing;
