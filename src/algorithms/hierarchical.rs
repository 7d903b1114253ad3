use super::closest_pair::fast_closest_pair;
use super::Error;
use crate::cluster::singletons;
use crate::Point;
use crate::RunInfo;
use crate::Solution;
use crate::WeightedCluster;

/// Insert `cluster` into `clusters` while keeping them sorted by centroid x.
///
/// Clusters with the same x stay before the inserted one.
fn binary_insert(clusters: &mut Vec<WeightedCluster>, cluster: WeightedCluster) {
    let x = cluster.centroid().x;
    let idx = clusters.partition_point(|c| c.centroid().x <= x);
    clusters.insert(idx, cluster);
}

/// Merge the closest pair of clusters until `cluster_count` remain.
///
/// Returns the clusters sorted by centroid x, and the number of merges that
/// were done.  If there already are `cluster_count` clusters or less, they
/// are returned unchanged, in input order.
pub fn hierarchical_clustering(
    mut clusters: Vec<WeightedCluster>,
    cluster_count: usize,
) -> (Vec<WeightedCluster>, usize) {
    let _span = tracing::info_span!("hierarchical_clustering", cluster_count).entered();

    if clusters.len() <= cluster_count {
        return (clusters, 0);
    }

    // Stable sort: clusters with the same x keep their input order.
    clusters.sort_by(|a, b| crate::partial_cmp(&a.centroid().x, &b.centroid().x));

    let mut merge_count = 0;
    while cluster_count < clusters.len() {
        let pair = match fast_closest_pair(&clusters) {
            Some(pair) => pair,
            None => break,
        };
        tracing::trace!(i = pair.i, j = pair.j, distance = pair.distance, "merge");

        // j > i, remove it first to keep i valid.
        let second = clusters.remove(pair.j);
        let first = clusters.remove(pair.i);
        binary_insert(&mut clusters, first.merge(second));
        merge_count += 1;
    }

    tracing::info!(merge_count, "done");
    (clusters, merge_count)
}

/// # Hierarchical clustering
///
/// Start from one cluster per point and repeatedly merge the two clusters
/// whose centroids are the closest (in Manhattan distance), until
/// `cluster_count` clusters are left.  Each cluster is then served by the
/// corner of its bounding box.
///
/// Finding the closest pair is done by [`crate::fast_closest_pair`], hence a
/// total complexity of `O(n² log² n)`.
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
///     Point::new(1.0, 1.0, 1.0),
///     Point::new(10.0, 10.0, 1.0),
///     Point::new(11.0, 10.0, 1.0),
/// ];
///
/// let (solution, _) = csp2d::Hierarchical { cluster_count: 2 }.select(&points[..])?;
///
/// assert_eq!(solution.clusters.len(), 2);
/// assert_eq!(solution.cost, 2.0 * 2.0 + 2.0 * 21.0);
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Copy, Debug)]
pub struct Hierarchical {
    pub cluster_count: usize,
}

impl Default for Hierarchical {
    fn default() -> Self {
        Self { cluster_count: 2 }
    }
}

impl<P> crate::Select<P> for Hierarchical
where
    P: AsRef<[Point]>,
{
    type Metadata = RunInfo;
    type Error = Error;

    fn select(&mut self, points: P) -> Result<(Solution, Self::Metadata), Self::Error> {
        let points = points.as_ref();
        super::check_input(points, self.cluster_count)?;
        let (clusters, merge_count) =
            hierarchical_clustering(singletons(points), self.cluster_count);
        Ok((Solution::new(clusters), RunInfo::iterations(merge_count)))
    }
}
