//! Closest pair of clusters, by Manhattan distance between centroids.
//!
//! Two variants are provided: a quadratic scan, and the classical divide and
//! conquer algorithm which runs in `O(n log² n)` on clusters sorted by the
//! horizontal position of their centroid.
//!
//! Both variants break ties the same way: among pairs at the minimal
//! distance, the one with the lexicographically smallest `(i, j)` wins.

use crate::WeightedCluster;
use std::cmp::Ordering;

/// Below this size, [fast_closest_pair] falls back to [slow_closest_pair].
const BRUTE_FORCE_THRESHOLD: usize = 4;

/// Indices of the closest pair of clusters in a slice, with `i < j`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClosestPair {
    pub distance: f64,
    pub i: usize,
    pub j: usize,
}

impl ClosestPair {
    fn new(clusters: &[WeightedCluster], a: usize, b: usize) -> Self {
        let (i, j) = if a < b { (a, b) } else { (b, a) };
        Self {
            distance: clusters[i].distance(&clusters[j]),
            i,
            j,
        }
    }

    fn offset(self, offset: usize) -> Self {
        Self {
            distance: self.distance,
            i: self.i + offset,
            j: self.j + offset,
        }
    }

    fn cmp_key(&self, other: &Self) -> Ordering {
        crate::partial_cmp(&self.distance, &other.distance)
            .then(self.i.cmp(&other.i))
            .then(self.j.cmp(&other.j))
    }

    fn min(self, other: Self) -> Self {
        if other.cmp_key(&self) == Ordering::Less {
            other
        } else {
            self
        }
    }
}

fn min_pair(a: Option<ClosestPair>, b: Option<ClosestPair>) -> Option<ClosestPair> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, None) => a,
        (None, b) => b,
    }
}

/// Find the closest pair by comparing every pair of clusters.
///
/// Returns `None` when there are less than two clusters.
pub fn slow_closest_pair(clusters: &[WeightedCluster]) -> Option<ClosestPair> {
    let mut best: Option<ClosestPair> = None;
    for i in 0..clusters.len() {
        for j in i + 1..clusters.len() {
            let candidate = ClosestPair::new(clusters, i, j);
            best = match best {
                Some(best) if best.distance <= candidate.distance => Some(best),
                _ => Some(candidate),
            };
        }
    }
    best
}

/// Find the closest pair with the divide and conquer algorithm.
///
/// `clusters` must be sorted by the horizontal position of their centroids.
///
/// Returns `None` when there are less than two clusters.
pub fn fast_closest_pair(clusters: &[WeightedCluster]) -> Option<ClosestPair> {
    debug_assert!(
        clusters
            .windows(2)
            .all(|w| w[0].centroid().x <= w[1].centroid().x),
        "clusters must be sorted by centroid x",
    );

    let size = clusters.len();
    if size < BRUTE_FORCE_THRESHOLD {
        return slow_closest_pair(clusters);
    }

    let half = size / 2;
    let (left, right) = clusters.split_at(half);
    let left_best = fast_closest_pair(left);
    let right_best = fast_closest_pair(right).map(|pair| pair.offset(half));
    let best = min_pair(left_best, right_best)?;

    let mid = 0.5 * (clusters[half - 1].centroid().x + clusters[half].centroid().x);
    let strip_best = closest_pair_strip(clusters, mid, best.distance);

    min_pair(Some(best), strip_best)
}

/// Closest pair among the clusters that lie within `half_width` of the
/// vertical line at `mid`.
fn closest_pair_strip(
    clusters: &[WeightedCluster],
    mid: f64,
    half_width: f64,
) -> Option<ClosestPair> {
    let mut strip: Vec<usize> = (0..clusters.len())
        .filter(|&idx| f64::abs(clusters[idx].centroid().x - mid) <= half_width)
        .collect();
    strip.sort_by(|&a, &b| {
        crate::partial_cmp(&clusters[a].centroid().y, &clusters[b].centroid().y)
            .then(a.cmp(&b))
    });

    let mut best: Option<ClosestPair> = None;
    for (pos, &a) in strip.iter().enumerate() {
        let a_y = clusters[a].centroid().y;
        for &b in &strip[pos + 1..] {
            // Sorted by y: further candidates are even further away.
            // Pairs at exactly the bound are still checked for ties.
            let bound = best.map_or(half_width, |best| f64::min(best.distance, half_width));
            if clusters[b].centroid().y - a_y > bound {
                break;
            }
            best = min_pair(best, Some(ClosestPair::new(clusters, a, b)));
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::singletons;
    use crate::Point;
    use proptest::prelude::*;

    fn sorted_clusters(points: &[Point]) -> Vec<WeightedCluster> {
        let mut clusters = singletons(points);
        clusters.sort_by(|a, b| crate::partial_cmp(&a.centroid().x, &b.centroid().x));
        clusters
    }

    #[test]
    fn test_empty() {
        assert_eq!(slow_closest_pair(&[]), None);
        assert_eq!(fast_closest_pair(&[]), None);
        let single = singletons(&[Point::new(1.0, 1.0, 1.0)]);
        assert_eq!(slow_closest_pair(&single), None);
        assert_eq!(fast_closest_pair(&single), None);
    }

    #[test]
    fn test_small() {
        let points = [
            Point::new(0.0, 0.0, 1.0),
            Point::new(1.0, 5.0, 1.0),
            Point::new(2.0, 0.5, 1.0),
            Point::new(4.0, 4.0, 1.0),
            Point::new(5.0, 4.5, 1.0),
            Point::new(9.0, 0.0, 1.0),
        ];
        let clusters = sorted_clusters(&points);
        let expected = ClosestPair {
            distance: 1.5,
            i: 3,
            j: 4,
        };
        assert_eq!(slow_closest_pair(&clusters), Some(expected));
        assert_eq!(fast_closest_pair(&clusters), Some(expected));
    }

    #[test]
    fn test_across_split() {
        // The closest pair straddles the dividing line.
        let points = [
            Point::new(0.0, 0.0, 1.0),
            Point::new(1.0, 10.0, 1.0),
            Point::new(4.9, 5.0, 1.0),
            Point::new(5.1, 5.0, 1.0),
            Point::new(9.0, 10.0, 1.0),
            Point::new(10.0, 0.0, 1.0),
        ];
        let clusters = sorted_clusters(&points);
        let pair = fast_closest_pair(&clusters).unwrap();
        assert_eq!((pair.i, pair.j), (2, 3));
        assert!((pair.distance - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_ties() {
        // Every neighbouring pair on the grid is at distance 1.
        let points: Vec<Point> = (0..4)
            .flat_map(|x| (0..4).map(move |y| Point::new(x as f64, y as f64, 1.0)))
            .collect();
        let clusters = sorted_clusters(&points);
        let slow = slow_closest_pair(&clusters).unwrap();
        let fast = fast_closest_pair(&clusters).unwrap();
        assert_eq!(slow, fast);
        assert_eq!((slow.i, slow.j), (0, 1));
    }

    proptest!(
        /// Both variants agree on the closest pair.
        #[test]
        fn slow_and_fast_agree(
            coords in prop::collection::vec((0..20_i32, 0..20_i32), 0..50)
        ) {
            let points: Vec<Point> = coords
                .iter()
                .map(|&(x, y)| Point::new(f64::from(x), f64::from(y), 1.0))
                .collect();
            let clusters = sorted_clusters(&points);
            prop_assert_eq!(slow_closest_pair(&clusters), fast_closest_pair(&clusters));
        }

        #[test]
        fn slow_and_fast_agree_on_floats(
            coords in prop::collection::vec((-1e3..1e3, -1e3..1e3), 2..50)
        ) {
            let points: Vec<Point> = coords
                .iter()
                .map(|&(x, y)| Point::new(x, y, 1.0))
                .collect();
            let clusters = sorted_clusters(&points);
            let slow = slow_closest_pair(&clusters).unwrap();
            let fast = fast_closest_pair(&clusters).unwrap();
            prop_assert_eq!(slow.distance, fast.distance);
        }
    );
}
