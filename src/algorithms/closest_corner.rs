//! Assignment of points to dominating corners.

use crate::geometry;
use crate::Point;
use crate::Point2D;
use crate::WeightedCluster;
use itertools::Itertools as _;

/// The result of [closest_corner].
#[derive(Debug, Clone, PartialEq)]
pub struct CornerAssignment {
    /// One cluster per corner, in the order corners were given.  Clusters of
    /// corners that were not picked by any point are empty.
    pub clusters: Vec<WeightedCluster>,

    /// Number of input clusters that were assigned to a corner.
    pub assigned_count: usize,
}

impl CornerAssignment {
    /// Whether all of the `input_len` input clusters found a dominating
    /// corner.
    pub fn is_feasible(&self, input_len: usize) -> bool {
        self.assigned_count == input_len
    }

    pub fn cost(&self) -> f64 {
        self.clusters.iter().map(WeightedCluster::cost).sum()
    }
}

/// Index of the corner closest to `position` among those that dominate it.
///
/// Among corners at the same distance, the first one wins.
fn best_corner(position: &Point2D, corners: &[Point2D]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (idx, corner) in corners.iter().enumerate() {
        if !geometry::dominates(corner, position) {
            continue;
        }
        let distance = geometry::manhattan(corner, position);
        if best.map_or(true, |(_, best_distance)| distance < best_distance) {
            best = Some((idx, distance));
        }
    }
    best.map(|(idx, _)| idx)
}

/// Merge each cluster into the bucket of the closest corner that dominates
/// it.
///
/// Input clusters are usually singletons; a larger cluster is placed as a
/// whole, using its own corner as position.  Clusters that are dominated by
/// no corner are left out, which is reported through
/// [`CornerAssignment::assigned_count`].
///
/// Since the corner `c` dominates the point `p`, their Manhattan distance is
/// `(c.x + c.y) - (p.x + p.y)`: the closest dominating corner is also the
/// cheapest one.
pub fn closest_corner(clusters: &[WeightedCluster], corners: &[Point2D]) -> CornerAssignment {
    let mut buckets: Vec<WeightedCluster> = corners
        .iter()
        .map(|corner| WeightedCluster::accumulator(*corner))
        .collect();
    let mut assigned_count = 0;

    for cluster in clusters {
        if let Some(idx) = best_corner(&cluster.corner(), corners) {
            buckets[idx].union_with(cluster);
            assigned_count += 1;
        }
    }

    CornerAssignment {
        clusters: buckets,
        assigned_count,
    }
}

/// The set of potential container points: every x coordinate of the input
/// paired with every y coordinate of the input.
///
/// There always is an optimal solution whose corners are all in this set,
/// since each corner can be moved down (resp. left) until it touches the
/// point of its cluster with the largest y (resp. x) coordinate.
///
/// Corners are deduplicated and sorted by x, then by y.
pub fn candidate_corners(points: &[Point]) -> Vec<Point2D> {
    let xs: Vec<f64> = points
        .iter()
        .map(|point| point.position.x)
        .sorted_by(crate::partial_cmp)
        .dedup()
        .collect();
    let ys: Vec<f64> = points
        .iter()
        .map(|point| point.position.y)
        .sorted_by(crate::partial_cmp)
        .dedup()
        .collect();

    xs.iter()
        .cartesian_product(&ys)
        .map(|(x, y)| Point2D::new(*x, *y))
        .collect()
}
