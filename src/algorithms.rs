use std::fmt;

mod angular;
mod brute_force;
mod closest_corner;
pub mod closest_pair;
mod hierarchical;
mod k_means;

pub use angular::AngularSections;
pub use angular::ProfileEstimate;
pub use angular::Ray;
pub use angular::Transform;
pub use brute_force::exhaustive_search;
pub use brute_force::BruteForce;
pub use brute_force::Metadata as BruteForceMetadata;
pub use closest_corner::candidate_corners;
pub use closest_corner::closest_corner;
pub use closest_corner::CornerAssignment;
pub use closest_pair::fast_closest_pair;
pub use closest_pair::slow_closest_pair;
pub use closest_pair::ClosestPair;
pub use hierarchical::hierarchical_clustering;
pub use hierarchical::Hierarchical;
pub use k_means::k_means;
pub use k_means::KMeans;

/// Common errors thrown by algorithms.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// No solution that matches the given criteria could been found.
    NotFound,

    /// The requested number of clusters is zero or larger than the number of
    /// input points.
    InvalidClusterCount { max: usize, actual: usize },

    /// The angular transform needs at least one ray.
    InvalidRayCount,

    /// Some points are dominated by none of the given corners.
    InfeasibleAssignment { assigned: usize, total: usize },

    /// Input contains negative (or NaN) weights and such values are not
    /// supported.
    NegativeValues,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::NotFound => write!(f, "no feasible solution found"),
            Error::InvalidClusterCount { max, actual } => write!(
                f,
                "invalid cluster count (expected between 1 and {max}, got {actual})",
            ),
            Error::InvalidRayCount => write!(f, "expected at least one ray"),
            Error::InfeasibleAssignment { assigned, total } => write!(
                f,
                "only {assigned} out of {total} points have a dominating corner",
            ),
            Error::NegativeValues => write!(f, "input contains negative weights"),
        }
    }
}

impl std::error::Error for Error {}

/// Check the parameters shared by every solver: weights must be
/// non-negative and `cluster_count` must be within `1..=points.len()`.
fn check_input(points: &[crate::Point], cluster_count: usize) -> Result<(), Error> {
    if points.iter().any(|point| !(0.0 <= point.weight)) {
        return Err(Error::NegativeValues);
    }
    if cluster_count == 0 || points.len() < cluster_count {
        return Err(Error::InvalidClusterCount {
            max: points.len(),
            actual: cluster_count,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Point;

    #[test]
    fn test_check_input() {
        let points = [Point::new(1.0, 1.0, 1.0), Point::new(2.0, 2.0, 0.0)];
        assert_eq!(check_input(&points, 1), Ok(()));
        assert_eq!(check_input(&points, 2), Ok(()));
        assert_eq!(
            check_input(&points, 0),
            Err(Error::InvalidClusterCount { max: 2, actual: 0 }),
        );
        assert_eq!(
            check_input(&points, 3),
            Err(Error::InvalidClusterCount { max: 2, actual: 3 }),
        );
        assert_eq!(
            check_input(&[], 1),
            Err(Error::InvalidClusterCount { max: 0, actual: 1 }),
        );

        let negative = [Point::new(1.0, 1.0, -1.0)];
        assert_eq!(check_input(&negative, 1), Err(Error::NegativeValues));
        let nan = [Point::new(1.0, 1.0, f64::NAN)];
        assert_eq!(check_input(&nan, 1), Err(Error::NegativeValues));
    }
}
