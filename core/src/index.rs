//! Spatial queries over a [`PointSet`].
//!
//! The R-tree owns copies of the active coordinates, so the index keeps
//! answering queries against the original cloud even while the point set's
//! logical view is being rewritten.

use nalgebra::Point3;
use rstar::{PointDistance, RTree, RTreeObject, AABB};

use crate::point_set::{PointId, PointSet};

/// Range-query capability consumed by the clustering engine.
///
/// Implementations must return every stored point whose distance to
/// `center` is at most `radius` (the query point itself included when
/// stored). Result order is unspecified and duplicates are tolerated;
/// points farther than `radius` must never appear.
pub trait RangeQuery {
    fn points_within(&self, center: &Point3<f64>, radius: f64, out: &mut Vec<PointId>);
}

struct IndexedPoint {
    id: PointId,
    pos: [f64; 3],
}

impl RTreeObject for IndexedPoint {
    type Envelope = AABB<[f64; 3]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.pos)
    }
}

impl PointDistance for IndexedPoint {
    fn distance_2(&self, point: &[f64; 3]) -> f64 {
        let dx = self.pos[0] - point[0];
        let dy = self.pos[1] - point[1];
        let dz = self.pos[2] - point[2];
        dx * dx + dy * dy + dz * dz
    }
}

/// R-tree over the active points of a [`PointSet`].
pub struct RTreeIndex {
    tree: RTree<IndexedPoint>,
}

impl RTreeIndex {
    /// Bulk-load the active range of `points`.
    pub fn build(points: &PointSet) -> Self {
        let items: Vec<IndexedPoint> = points
            .iter()
            .map(|id| {
                let p = points.point(id);
                IndexedPoint {
                    id,
                    pos: [p.x, p.y, p.z],
                }
            })
            .collect();
        Self {
            tree: RTree::bulk_load(items),
        }
    }

    /// The `k` nearest stored points to `center` with their distances,
    /// closest first. When `center` is a stored point it appears in the
    /// result at distance zero.
    pub fn nearest(&self, center: &Point3<f64>, k: usize) -> Vec<(PointId, f64)> {
        self.tree
            .nearest_neighbor_iter_with_distance_2(&[center.x, center.y, center.z])
            .take(k)
            .map(|(item, d2)| (item.id, d2.sqrt()))
            .collect()
    }
}

impl RangeQuery for RTreeIndex {
    fn points_within(&self, center: &Point3<f64>, radius: f64, out: &mut Vec<PointId>) {
        let q = [center.x, center.y, center.z];
        out.extend(
            self.tree
                .locate_within_distance(q, radius * radius)
                .map(|item| item.id),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line_cloud() -> PointSet {
        PointSet::from_points(vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
            Point3::new(10.0, 0.0, 0.0),
        ])
    }

    #[test]
    fn radius_query_is_inclusive() {
        let points = line_cloud();
        let index = RTreeIndex::build(&points);

        let mut out = Vec::new();
        index.points_within(&Point3::new(0.0, 0.0, 0.0), 1.0, &mut out);
        // Exactly at the radius counts, and the query point is returned too.
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn zero_radius_matches_coincident_points_only() {
        let points = line_cloud();
        let index = RTreeIndex::build(&points);

        let mut out = Vec::new();
        index.points_within(&Point3::new(1.0, 0.0, 0.0), 0.0, &mut out);
        let ids: Vec<PointId> = points.iter().collect();
        assert_eq!(out, vec![ids[1]]);
    }

    #[test]
    fn nearest_orders_by_distance() {
        let points = line_cloud();
        let index = RTreeIndex::build(&points);

        let found = index.nearest(&Point3::new(0.0, 0.0, 0.0), 3);
        let dists: Vec<f64> = found.iter().map(|&(_, d)| d).collect();
        assert_eq!(dists, vec![0.0, 1.0, 2.0]);
    }

    #[test]
    fn index_ignores_retired_points() {
        let mut points = line_cloud();
        let ids: Vec<PointId> = points.iter().collect();
        points.reorder_and_truncate(&[ids[0], ids[3]]);

        let index = RTreeIndex::build(&points);
        let mut out = Vec::new();
        index.points_within(&Point3::new(1.5, 0.0, 0.0), 1.0, &mut out);
        assert!(out.is_empty());
    }
}
