use super::closest_corner::candidate_corners;
use super::closest_corner::closest_corner;
use super::closest_corner::CornerAssignment;
use super::Error;
use crate::cluster::singletons;
use crate::Point;
use crate::Point2D;
use crate::Solution;
use crate::WeightedCluster;
use itertools::Itertools as _;
use rayon::iter::ParallelBridge as _;
use rayon::iter::ParallelIterator as _;
use std::cmp::Ordering;

/// Diagnostic data for [BruteForce].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Metadata {
    /// Number of potential container points.
    pub candidate_count: usize,

    /// Number of corner combinations that were evaluated.
    pub combination_count: usize,

    /// Number of combinations where every point had a dominating corner.
    pub feasible_count: usize,
}

/// Thread-local state of the search.
#[derive(Default)]
struct Search {
    combination_count: usize,
    feasible_count: usize,
    /// Cost, combination index and assignment of the best feasible
    /// combination found so far.
    best: Option<(f64, usize, CornerAssignment)>,
}

impl Search {
    fn visit(mut self, combination_idx: usize, assignment: Option<CornerAssignment>) -> Self {
        self.combination_count += 1;
        if let Some(assignment) = assignment {
            self.feasible_count += 1;
            let cost = assignment.cost();
            self.best = Self::better(self.best, Some((cost, combination_idx, assignment)));
        }
        self
    }

    fn merge(self, other: Self) -> Self {
        Self {
            combination_count: self.combination_count + other.combination_count,
            feasible_count: self.feasible_count + other.feasible_count,
            best: Self::better(self.best, other.best),
        }
    }

    /// Lowest cost wins, then the first combination in enumeration order.
    fn better(
        a: Option<(f64, usize, CornerAssignment)>,
        b: Option<(f64, usize, CornerAssignment)>,
    ) -> Option<(f64, usize, CornerAssignment)> {
        match (a, b) {
            (Some(a), Some(b)) => {
                let ordering = crate::partial_cmp(&a.0, &b.0).then(a.1.cmp(&b.1));
                if ordering == Ordering::Greater {
                    Some(b)
                } else {
                    Some(a)
                }
            }
            (a, None) => a,
            (None, b) => b,
        }
    }
}

/// Try every combination of `container_count` corners among `candidates` and
/// return the cheapest assignment where every cluster is dominated.
///
/// Runs in `O(C(m, k) * m * n)` where `m` is the number of candidates.
///
/// Combinations that leave a cluster without a dominating corner are
/// skipped.  If no combination is feasible, [`Error::NotFound`] is returned.
pub fn exhaustive_search(
    clusters: &[WeightedCluster],
    candidates: &[Point2D],
    container_count: usize,
) -> Result<(CornerAssignment, Metadata), Error> {
    let _span = tracing::info_span!(
        "exhaustive_search",
        candidate_count = candidates.len(),
        container_count
    )
    .entered();

    let search = candidates
        .iter()
        .copied()
        .combinations(container_count)
        .enumerate()
        .par_bridge()
        .fold(Search::default, |search, (combination_idx, corners)| {
            let assignment = closest_corner(clusters, &corners);
            let assignment = assignment.is_feasible(clusters.len()).then_some(assignment);
            search.visit(combination_idx, assignment)
        })
        .reduce(Search::default, Search::merge);

    let metadata = Metadata {
        candidate_count: candidates.len(),
        combination_count: search.combination_count,
        feasible_count: search.feasible_count,
    };
    tracing::info!(
        combination_count = metadata.combination_count,
        feasible_count = metadata.feasible_count,
        "search done"
    );

    match search.best {
        Some((cost, _, assignment)) => {
            tracing::info!(cost, "best combination");
            Ok((assignment, metadata))
        }
        None => Err(Error::NotFound),
    }
}

/// # Exhaustive search
///
/// Solve the container selection problem exactly by trying every combination
/// of `container_count` corners among the [potential container
/// points][crate::candidate_corners], assigning each point to its closest
/// dominating corner.
///
/// The number of combinations grows exponentially with `container_count`:
/// this is meant for small inputs and as a reference for heuristics.
///
/// # Example
///
/// ```rust
/// # fn main() -> Result<(), csp2d::Error> {
/// use csp2d::Point;
/// use csp2d::Select as _;
///
/// let points = [
///     Point::new(1.0, 1.0, 1.0),
///     Point::new(1.0, 3.0, 1.0),
///     Point::new(3.0, 1.0, 1.0),
///     Point::new(3.0, 3.0, 1.0),
/// ];
///
/// let (solution, metadata) = csp2d::BruteForce { container_count: 1 }
///     .select(&points[..])?;
///
/// assert_eq!(solution.cost, 24.0);
/// assert_eq!(metadata.feasible_count, 1);
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Copy, Debug)]
pub struct BruteForce {
    pub container_count: usize,
}

impl Default for BruteForce {
    fn default() -> Self {
        Self { container_count: 1 }
    }
}

impl<P> crate::Select<P> for BruteForce
where
    P: AsRef<[Point]>,
{
    type Metadata = Metadata;
    type Error = Error;

    fn select(&mut self, points: P) -> Result<(Solution, Self::Metadata), Self::Error> {
        let points = points.as_ref();
        super::check_input(points, self.container_count)?;
        let candidates = candidate_corners(points);
        // Duplicate points may leave less candidates than containers.
        let container_count = usize::min(self.container_count, candidates.len());
        let (assignment, metadata) =
            exhaustive_search(&singletons(points), &candidates, container_count)?;
        Ok((Solution::new(assignment.clusters), metadata))
    }
}
