//! Connected-component clustering of a point set.
//!
//! Two points are directly connected when one lies within a distance
//! tolerance of the other; clusters are the connected components of that
//! relation. Components are discovered by flood fill over radius queries,
//! so the proximity graph is never materialized: the only traversal state
//! is a FIFO work queue and a visited set, and memory stays proportional
//! to the current component.
//!
//! The partition itself is a deterministic function of the points and the
//! tolerance. The relation is symmetric and membership is transitive, so
//! neither the iteration order nor the order in which the index returns
//! neighbors can change which points end up together, only the order in
//! which clusters are discovered.

use std::collections::VecDeque;

use pct_core::{PointId, PointSet, RTreeIndex, RangeQuery};

/// Sentinel label for points that belong to no surviving cluster.
pub const UNLABELED: i32 = -1;

/// How discovered clusters are written back into the point set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClusterOutput {
    /// Keep every cluster with at least `min_points` points, drop the rest.
    #[default]
    Filter,
    /// Keep only the largest surviving cluster.
    Biggest,
    /// Keep all points; store one label per surviving cluster in the
    /// integer map `"label"`, [`UNLABELED`] elsewhere.
    Label,
}

/// Summary of one clustering run.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClusterStats {
    /// Number of clusters that met the minimum size.
    pub clusters: usize,
    /// Size of the largest surviving cluster, if any survived.
    pub largest: Option<usize>,
}

/// Cluster `points` with an R-tree built over the current active range.
///
/// `tolerance` is the maximum distance between two directly connected
/// points; `min_points` is the size a cluster needs to survive the
/// post-filter. See [`cluster_with_index`] for the full contract.
pub fn cluster_point_set(
    points: &mut PointSet,
    tolerance: f64,
    min_points: usize,
    output: ClusterOutput,
) -> ClusterStats {
    let index = RTreeIndex::build(points);
    cluster_with_index(points, &index, tolerance, min_points, output)
}

/// Cluster `points` using a caller-supplied range-query index.
///
/// The index must answer queries against the point set as it is on entry;
/// it is only read during discovery, and the point set is only rewritten
/// once discovery has finished. Candidates returned by a query are
/// enqueued unconditionally and deduplicated when popped, so an index
/// that returns duplicates or the query point itself is fine.
///
/// A cluster smaller than `min_points` is dropped and never considered
/// for `Biggest`, even when every cluster is dropped: in that degenerate
/// case `Filter` and `Biggest` truncate the set to zero points and
/// `Label` leaves every point at the sentinel.
pub fn cluster_with_index<Q: RangeQuery>(
    points: &mut PointSet,
    index: &Q,
    tolerance: f64,
    min_points: usize,
    output: ClusterOutput,
) -> ClusterStats {
    debug_assert!(tolerance >= 0.0);
    debug_assert!(min_points >= 1);

    let mut clusters: Vec<Vec<PointId>> = Vec::new();
    let mut visited = vec![false; points.total_len()];
    let mut todo: VecDeque<PointId> = VecDeque::new();
    let mut neighbors: Vec<PointId> = Vec::new();
    let mut largest: Option<usize> = None;
    let mut largest_len = 0usize;

    for seed in points.iter() {
        let mut cluster: Vec<PointId> = Vec::new();
        todo.clear();
        todo.push_back(seed);

        while let Some(current) = todo.pop_front() {
            if visited[current.index()] {
                continue;
            }
            visited[current.index()] = true;
            cluster.push(current);

            neighbors.clear();
            index.points_within(points.point(current), tolerance, &mut neighbors);
            todo.extend(neighbors.iter().copied());
        }

        // Seed was already consumed by an earlier component.
        if cluster.is_empty() {
            continue;
        }

        if cluster.len() >= min_points {
            if cluster.len() > largest_len {
                largest_len = cluster.len();
                largest = Some(clusters.len());
            }
            clusters.push(cluster);
        }
    }

    match output {
        ClusterOutput::Label => {
            let label = points.add_int_map("label", UNLABELED);
            // The map may pre-exist (e.g. read from a file): reset it so
            // filtered-out points always carry the sentinel.
            label.fill(UNLABELED);
            for (i, cluster) in clusters.iter().enumerate() {
                for id in cluster {
                    label[id.index()] = i as i32;
                }
            }
        }
        ClusterOutput::Filter => {
            let keep: Vec<PointId> = clusters.iter().flatten().copied().collect();
            points.reorder_and_truncate(&keep);
        }
        ClusterOutput::Biggest => match largest {
            Some(i) => points.reorder_and_truncate(&clusters[i]),
            None => points.reorder_and_truncate(&[]),
        },
    }

    ClusterStats {
        clusters: clusters.len(),
        largest: largest.map(|i| clusters[i].len()),
    }
}
