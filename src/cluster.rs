//! Weighted clusters and their merge algebra.

use crate::geometry::{self, Point, Point2D};
use std::collections::BTreeSet;
use std::fmt;

/// A set of points, summarized by its weighted centroid and the smallest
/// corner that dominates all of its members.
///
/// Members are indices into the point slice the cluster was built from.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedCluster {
    members: BTreeSet<usize>,
    centroid: Point2D,
    total_weight: f64,
    corner: Point2D,
}

impl WeightedCluster {
    /// A cluster made of the point at index `point_idx`.
    pub fn singleton(point_idx: usize, point: &Point) -> Self {
        Self {
            members: BTreeSet::from([point_idx]),
            centroid: point.position,
            total_weight: point.weight,
            corner: point.position,
        }
    }

    /// An empty cluster positioned at `center`, used to accumulate points
    /// during iterative algorithms.
    pub fn accumulator(center: Point2D) -> Self {
        Self {
            members: BTreeSet::new(),
            centroid: center,
            total_weight: 0.0,
            corner: Point2D::zeros(),
        }
    }

    pub fn members(&self) -> &BTreeSet<usize> {
        &self.members
    }

    pub fn centroid(&self) -> Point2D {
        self.centroid
    }

    pub fn total_weight(&self) -> f64 {
        self.total_weight
    }

    pub fn corner(&self) -> Point2D {
        self.corner
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Cost of serving every member from the cluster's corner.
    pub fn cost(&self) -> f64 {
        self.total_weight * geometry::corner_norm(&self.corner)
    }

    /// Manhattan distance between the centroids of two clusters.
    pub fn distance(&self, other: &Self) -> f64 {
        geometry::manhattan(&self.centroid, &other.centroid)
    }

    /// Merge two clusters into one.
    ///
    /// The centroid of the result is the weighted average of both centroids,
    /// and its corner the component-wise maximum of both corners.
    #[must_use]
    pub fn merge(mut self, other: Self) -> Self {
        self.union_with(&other);
        self
    }

    /// In-place version of [`WeightedCluster::merge`], for accumulators.
    pub(crate) fn union_with(&mut self, other: &Self) {
        if other.is_empty() {
            return;
        }
        if self.is_empty() {
            self.members = other.members.clone();
            self.centroid = other.centroid;
            self.total_weight = other.total_weight;
            self.corner = other.corner;
            return;
        }
        debug_assert!(
            self.members.is_disjoint(&other.members),
            "merged clusters must not share points",
        );

        let total_weight = self.total_weight + other.total_weight;
        let (self_ratio, other_ratio) = if total_weight > 0.0 {
            (
                self.total_weight / total_weight,
                other.total_weight / total_weight,
            )
        } else {
            // Zero-weight points: fall back to an unweighted average.
            let self_len = self.members.len() as f64;
            let other_len = other.members.len() as f64;
            let len = self_len + other_len;
            (self_len / len, other_len / len)
        };

        self.centroid = self.centroid * self_ratio + other.centroid * other_ratio;
        self.corner = geometry::sup(&self.corner, &other.corner);
        self.total_weight = total_weight;
        self.members.extend(other.members.iter().copied());
    }

    /// Sum of the weighted squared distances from each member to the
    /// centroid.
    ///
    /// `points` must be the slice the cluster's members index into.
    pub fn error(&self, points: &[Point]) -> f64 {
        self.members
            .iter()
            .map(|&idx| {
                let point = &points[idx];
                let distance = geometry::manhattan(&point.position, &self.centroid);
                point.weight * distance * distance
            })
            .sum()
    }
}

impl fmt::Display for WeightedCluster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "cluster of {} points (centroid ({}, {}), corner ({}, {}), weight {})",
            self.members.len(),
            self.centroid.x,
            self.centroid.y,
            self.corner.x,
            self.corner.y,
            self.total_weight,
        )
    }
}

/// One singleton cluster per point, in input order.
pub fn singletons(points: &[Point]) -> Vec<WeightedCluster> {
    points
        .iter()
        .enumerate()
        .map(|(idx, point)| WeightedCluster::singleton(idx, point))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use proptest::prelude::*;

    #[test]
    fn test_merge() {
        let points = [Point::new(1.0, 4.0, 1.0), Point::new(3.0, 2.0, 3.0)];
        let a = WeightedCluster::singleton(0, &points[0]);
        let b = WeightedCluster::singleton(1, &points[1]);

        let merged = a.merge(b);

        assert_eq!(merged.members(), &BTreeSet::from([0, 1]));
        assert_eq!(merged.total_weight(), 4.0);
        assert_eq!(merged.corner(), Point2D::new(3.0, 4.0));
        assert_abs_diff_eq!(merged.centroid().x, 2.5);
        assert_abs_diff_eq!(merged.centroid().y, 2.5);
        assert_eq!(merged.cost(), 28.0);
    }

    #[test]
    fn test_merge_empty() {
        let point = Point::new(-1.0, -2.0, 2.0);
        let singleton = WeightedCluster::singleton(0, &point);
        let empty = WeightedCluster::accumulator(Point2D::new(5.0, 5.0));

        assert_eq!(singleton.clone().merge(empty.clone()), singleton);

        // An empty accumulator adopts the other cluster's corner, even when
        // it lies below the origin.
        let merged = empty.merge(singleton.clone());
        assert_eq!(merged, singleton);
    }

    #[test]
    fn test_merge_zero_weights() {
        let points = [Point::new(0.0, 0.0, 0.0), Point::new(2.0, 4.0, 0.0)];
        let merged = WeightedCluster::singleton(0, &points[0])
            .merge(WeightedCluster::singleton(1, &points[1]));
        assert_eq!(merged.total_weight(), 0.0);
        assert_eq!(merged.centroid(), Point2D::new(1.0, 2.0));
    }

    #[test]
    fn test_error() {
        let points = [
            Point::new(0.0, 0.0, 1.0),
            Point::new(2.0, 0.0, 1.0),
            Point::new(7.0, 7.0, 5.0),
        ];
        let cluster = WeightedCluster::singleton(0, &points[0])
            .merge(WeightedCluster::singleton(1, &points[1]));
        assert_abs_diff_eq!(cluster.error(&points), 2.0);
        assert_eq!(WeightedCluster::singleton(2, &points[2]).error(&points), 0.0);
    }

    fn point() -> impl Strategy<Value = Point> {
        (-1e3..1e3, -1e3..1e3, 0.0..1e3).prop_map(|(x, y, w)| Point::new(x, y, w))
    }

    proptest!(
        /// Merging keeps the corner as the component-wise max, sums weights
        /// and computes the weighted centroid.
        #[test]
        fn merge_closure(points in prop::collection::vec(point(), 2..40), split in 1..39_usize) {
            let split = usize::min(split, points.len() - 1);
            let clusters = singletons(&points);
            let left = clusters[..split]
                .iter()
                .cloned()
                .reduce(WeightedCluster::merge)
                .unwrap();
            let right = clusters[split..]
                .iter()
                .cloned()
                .reduce(WeightedCluster::merge)
                .unwrap();

            let expected_corner = geometry::sup(&left.corner(), &right.corner());
            let expected_weight = left.total_weight() + right.total_weight();
            let merged = left.merge(right);

            prop_assert_eq!(merged.corner(), expected_corner);
            prop_assert_eq!(merged.total_weight(), expected_weight);
            prop_assert_eq!(merged.len(), points.len());
            for point in &points {
                prop_assert!(geometry::dominates(&merged.corner(), &point.position));
            }

            let total: f64 = points.iter().map(|p| p.weight).sum();
            if total > 1e-6 {
                let x: f64 = points.iter().map(|p| p.weight * p.position.x).sum::<f64>() / total;
                let y: f64 = points.iter().map(|p| p.weight * p.position.y).sum::<f64>() / total;
                prop_assert!((merged.centroid().x - x).abs() < 1e-6 * (1.0 + x.abs()));
                prop_assert!((merged.centroid().y - y).abs() < 1e-6 * (1.0 + y.abs()));
            }
        }
    );
}
