//! A weighted variant of Lloyd's k-means algorithm.
//!
//! Centers are initialized to the heaviest points, and each round assigns
//! every point to its nearest center (in Manhattan distance) before moving
//! centers to the weighted centroid of their points.  The algorithm runs a
//! fixed number of rounds, there is no convergence check.

use super::Error;
use crate::cluster::singletons;
use crate::Point;
use crate::RunInfo;
use crate::Solution;
use crate::WeightedCluster;
use rayon::prelude::*;

/// Index of the center nearest to `cluster`.  Ties go to the first center.
fn nearest_center(cluster: &WeightedCluster, centers: &[WeightedCluster]) -> usize {
    let mut best = (f64::INFINITY, 0);
    for (idx, center) in centers.iter().enumerate() {
        let distance = cluster.distance(center);
        if distance < best.0 {
            best = (distance, idx);
        }
    }
    best.1
}

/// Copies of the `cluster_count` heaviest clusters, heaviest first.  Clusters
/// of equal weight are taken in input order.
fn heaviest(clusters: &[WeightedCluster], cluster_count: usize) -> Vec<WeightedCluster> {
    let mut order: Vec<usize> = (0..clusters.len()).collect();
    // Stable sort, for the tie-break.
    order.sort_by(|&a, &b| {
        crate::partial_cmp(&clusters[b].total_weight(), &clusters[a].total_weight())
    });
    order
        .into_iter()
        .take(cluster_count)
        .map(|idx| clusters[idx].clone())
        .collect()
}

/// Run `iter_count` rounds of k-means on the given clusters.
///
/// Input clusters are left untouched.  Returns one cluster per center, some
/// of which may be empty when no point was closest to their center during
/// the last round.
///
/// Fails with [`Error::InvalidClusterCount`] if `cluster_count` is zero or
/// larger than `clusters.len()`.
pub fn k_means(
    clusters: &[WeightedCluster],
    cluster_count: usize,
    iter_count: usize,
) -> Result<Vec<WeightedCluster>, Error> {
    if cluster_count == 0 || clusters.len() < cluster_count {
        return Err(Error::InvalidClusterCount {
            max: clusters.len(),
            actual: cluster_count,
        });
    }
    let _span = tracing::info_span!("k_means", cluster_count, iter_count).entered();

    let mut centers = heaviest(clusters, cluster_count);

    for iter in 0..iter_count {
        let span = tracing::info_span!("k_means round", iter);
        let _enter = span.enter();

        let assignments: Vec<usize> = clusters
            .par_iter()
            .map(|cluster| nearest_center(cluster, &centers))
            .collect();

        let mut accumulators: Vec<WeightedCluster> = centers
            .iter()
            .map(|center| WeightedCluster::accumulator(center.centroid()))
            .collect();
        // Sequential, in input order, so that centroids do not depend on how
        // the work was split between threads.
        for (cluster, center) in clusters.iter().zip(assignments) {
            accumulators[center].union_with(cluster);
        }

        let empty_count = accumulators.iter().filter(|c| c.is_empty()).count();
        if empty_count > 0 {
            tracing::debug!(empty_count, "some centers received no point");
        }
        centers = accumulators;
    }

    Ok(centers)
}

/// # K-means
///
/// Cluster points around `cluster_count` centers with `iter_count` rounds of
/// Lloyd's algorithm, then serve each cluster from the corner of its
/// bounding box.
///
/// Distances are Manhattan distances between centroids, and centers move to
/// the weighted centroid of their points at each round.  Centers that are
/// left without points are dropped from the solution, which may then have
/// less than `cluster_count` clusters.
///
/// The result is a good starting point for [`crate::Solution::reassign`].
///
/// # Example
///
/// ```rust
/// # fn main() -> Result<(), csp2d::Error> {
/// use csp2d::Point;
/// use csp2d::Select as _;
///
/// let points = [
///     Point::new(0.0, 0.0, 1.0),
///     Point::new(1.0, 0.0, 2.0),
///     Point::new(9.0, 9.0, 3.0),
///     Point::new(10.0, 9.0, 1.0),
/// ];
///
/// let (solution, _) = csp2d::KMeans { cluster_count: 2, iter_count: 4 }
///     .select(&points[..])?;
///
/// assert_eq!(solution.clusters.len(), 2);
/// assert_eq!(solution.cost, 3.0 * 1.0 + 4.0 * 19.0);
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Copy, Debug)]
pub struct KMeans {
    pub cluster_count: usize,
    pub iter_count: usize,
}

impl Default for KMeans {
    fn default() -> Self {
        Self {
            cluster_count: 2,
            iter_count: 5,
        }
    }
}

impl<P> crate::Select<P> for KMeans
where
    P: AsRef<[Point]>,
{
    type Metadata = RunInfo;
    type Error = Error;

    fn select(&mut self, points: P) -> Result<(Solution, Self::Metadata), Self::Error> {
        let points = points.as_ref();
        super::check_input(points, self.cluster_count)?;
        let clusters = k_means(&singletons(points), self.cluster_count, self.iter_count)?;
        Ok((Solution::new(clusters), RunInfo::iterations(self.iter_count)))
    }
}
