//! Preprocessing step of the PTAS for the container selection problem, as
//! described by Schieber et al.
//!
//! The first quadrant is cut into `ray_count` angular sections by rays of
//! slopes `tan(i * θ)`, `θ = π / (2 * ray_count)`.  Each potential container
//! point is moved onto one of the two rays bounding its section, by growing
//! either its x or its y coordinate, whichever needs the smaller move.  Since
//! coordinates only grow, a moved container still dominates what the
//! original one dominated.
//!
//! The exact scheme then enumerates "profiles" (one point per ray), which is
//! only estimated here.

use super::Error;
use crate::Point2D;
use std::f64::consts::FRAC_PI_2;

const SECONDS_PER_YEAR: f64 = 60.0 * 60.0 * 24.0 * 365.0;

/// A ray from the origin and the container points snapped onto it.
#[derive(Debug, Clone, PartialEq)]
pub struct Ray {
    /// `y / x` along the ray, infinite for the vertical ray.
    pub slope: f64,
    pub points: Vec<Point2D>,
}

/// The result of [`AngularSections::transform`].
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    /// Precision of the scheme, ie. the angle between the two rays of a
    /// section, times two.
    pub epsilon: f64,

    /// `rays[0]` is the vertical ray, then rays are sorted by decreasing
    /// slope.  Section `s` lies between `rays[s]` and `rays[s + 1]`.
    pub rays: Vec<Ray>,

    /// Section of each input point.
    pub sections: Vec<usize>,

    /// Position of each input point after it has been snapped onto a ray.
    pub snapped: Vec<Point2D>,
}

/// Rough size and running time of the profile enumeration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProfileEstimate {
    /// Product of the number of points on each non-empty ray.
    pub profile_count: f64,

    /// Time to build all profiles, in years.
    pub profile_years: f64,

    /// Time to run the whole scheme, in years.
    pub total_years: f64,
}

impl Transform {
    /// Estimate the cost of enumerating every profile, given a machine
    /// running `ops_per_second` operations per second.
    pub fn profile_estimate(&self, ops_per_second: f64) -> ProfileEstimate {
        let profile_count: f64 = self
            .rays
            .iter()
            .filter(|ray| !ray.points.is_empty())
            .map(|ray| ray.points.len() as f64)
            .product();
        let point_count: usize = self.rays.iter().map(|ray| ray.points.len()).sum();
        // Averaged over the sections, the vertical ray is not counted.
        let section_count = self.rays.len() - 1;
        let average_ray_len = point_count as f64 / section_count as f64;

        let profile_years = profile_count / (ops_per_second * SECONDS_PER_YEAR);
        ProfileEstimate {
            profile_count,
            profile_years,
            total_years: average_ray_len * profile_years / 2.0,
        }
    }
}

/// Slope of the line going through the origin and `point`.
///
/// Points on the y axis have an infinite slope, the origin and points below
/// the x axis are treated as lying on it.
fn slope(point: &Point2D) -> f64 {
    if point.x == 0.0 {
        if point.y > 0.0 {
            f64::INFINITY
        } else {
            0.0
        }
    } else {
        f64::max(point.y / point.x, 0.0)
    }
}

/// Horizontal move needed to reach the ray of slope `lower`.
fn delta_right(point: &Point2D, lower: f64) -> f64 {
    if lower == 0.0 {
        // The only way onto the x axis is to already be on it.
        if point.y == 0.0 {
            0.0
        } else {
            f64::INFINITY
        }
    } else {
        f64::max(point.y / lower - point.x, 0.0)
    }
}

/// Vertical move needed to reach the ray of slope `upper`.
fn delta_up(point: &Point2D, upper: f64) -> f64 {
    if upper.is_infinite() {
        if point.x == 0.0 {
            0.0
        } else {
            f64::INFINITY
        }
    } else {
        f64::max(point.x * upper - point.y, 0.0)
    }
}

/// # Angular sections
///
/// Preprocessing of the container selection PTAS: snap potential container
/// points onto `ray_count` rays and estimate how long enumerating all
/// profiles would take.
///
/// The running time estimate is a rough projection assuming
/// `ops_per_second` elementary operations per second.
///
/// # Example
///
/// ```rust
/// # fn main() -> Result<(), csp2d::Error> {
/// use csp2d::Point2D;
///
/// let candidates = [Point2D::new(1.0, 0.9), Point2D::new(3.0, 1.0)];
/// let transform = csp2d::AngularSections::default().transform(&candidates)?;
///
/// assert_eq!(transform.snapped.len(), 2);
/// for (snapped, original) in transform.snapped.iter().zip(&candidates) {
///     assert!(csp2d::dominates(snapped, original));
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Copy, Debug)]
pub struct AngularSections {
    pub ray_count: usize,
    pub ops_per_second: f64,
}

impl Default for AngularSections {
    fn default() -> Self {
        Self {
            ray_count: 8,
            ops_per_second: 1e9,
        }
    }
}

impl AngularSections {
    /// Slopes of the non-vertical rays, in decreasing order.
    fn slopes(&self) -> Vec<f64> {
        let theta = FRAC_PI_2 / self.ray_count as f64;
        (0..self.ray_count)
            .rev()
            .map(|i| f64::tan(i as f64 * theta))
            .collect()
    }

    /// Assign each candidate to its angular section and snap it onto one of
    /// the section's rays.
    pub fn transform(&self, candidates: &[Point2D]) -> Result<Transform, Error> {
        if self.ray_count == 0 {
            return Err(Error::InvalidRayCount);
        }
        let _span = tracing::info_span!("angular_transform", ray_count = self.ray_count).entered();

        let slopes = self.slopes();
        let mut rays: Vec<Ray> = std::iter::once(f64::INFINITY)
            .chain(slopes.iter().copied())
            .map(|slope| Ray {
                slope,
                points: Vec::new(),
            })
            .collect();

        let mut sections = Vec::with_capacity(candidates.len());
        let mut snapped = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            let candidate_slope = slope(candidate);
            let section = slopes
                .iter()
                .position(|&s| s <= candidate_slope)
                .unwrap_or(slopes.len() - 1);
            let upper = rays[section].slope;
            let lower = rays[section + 1].slope;

            let right = delta_right(candidate, lower);
            let up = delta_up(candidate, upper);
            let (point, ray) = if right < up {
                (Point2D::new(candidate.x + right, candidate.y), section + 1)
            } else if up.is_finite() {
                (Point2D::new(candidate.x, candidate.y + up), section)
            } else {
                // Neither ray can be reached (a single section spanning the
                // whole quadrant): stay in place, on the lower ray's list.
                (*candidate, section + 1)
            };

            rays[ray].points.push(point);
            sections.push(section);
            snapped.push(point);
        }

        let transform = Transform {
            epsilon: 2.0 * FRAC_PI_2 / self.ray_count as f64,
            rays,
            sections,
            snapped,
        };
        tracing::info!(epsilon = transform.epsilon, "transform done");
        Ok(transform)
    }

    /// Transform the candidates and estimate the cost of the profile
    /// enumeration on the result.
    pub fn estimate(&self, candidates: &[Point2D]) -> Result<ProfileEstimate, Error> {
        let transform = self.transform(candidates)?;
        let estimate = transform.profile_estimate(self.ops_per_second);
        tracing::info!(
            profile_count = estimate.profile_count,
            profile_years = estimate.profile_years,
            total_years = estimate.total_years,
            "profile estimate"
        );
        Ok(estimate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    #[test]
    fn test_slopes() {
        let slopes = AngularSections {
            ray_count: 4,
            ..AngularSections::default()
        }
        .slopes();
        assert_eq!(slopes.len(), 4);
        assert_relative_eq!(slopes[0], f64::tan(3.0 * (FRAC_PI_2 / 4.0)));
        assert_relative_eq!(slopes[2], 1.0, epsilon = 1e-12);
        assert_eq!(slopes[3], 0.0);
        assert!(slopes.windows(2).all(|w| w[1] < w[0]));
    }

    #[test]
    fn test_snap() {
        // With two rays, the sections are split by the diagonal.
        let sections = AngularSections {
            ray_count: 2,
            ..AngularSections::default()
        };
        let candidates = [
            Point2D::new(4.0, 1.0), // below the diagonal, closer to it
            Point2D::new(4.0, 0.0), // on the x axis
            Point2D::new(1.0, 4.0), // above the diagonal
            Point2D::new(0.0, 2.0), // on the y axis
        ];
        let transform = sections.transform(&candidates).unwrap();

        assert_relative_eq!(transform.epsilon, FRAC_PI_2);
        assert_eq!(transform.sections, vec![1, 1, 0, 0]);
        assert_relative_eq!(transform.snapped[0].x, 4.0);
        assert_relative_eq!(transform.snapped[0].y, 4.0, epsilon = 1e-12);
        assert_eq!(transform.snapped[1], Point2D::new(4.0, 0.0));
        assert_relative_eq!(transform.snapped[2].x, 4.0, epsilon = 1e-12);
        assert_eq!(transform.snapped[2].y, 4.0);
        assert_eq!(transform.snapped[3], Point2D::new(0.0, 2.0));

        let ray_lens: Vec<usize> = transform.rays.iter().map(|r| r.points.len()).collect();
        assert_eq!(ray_lens, vec![1, 2, 1]);
    }

    #[test]
    fn test_estimate() {
        let sections = AngularSections {
            ray_count: 2,
            ops_per_second: 1.0 / SECONDS_PER_YEAR,
        };
        let candidates = [
            Point2D::new(4.0, 1.0),
            Point2D::new(4.0, 0.0),
            Point2D::new(1.0, 4.0),
            Point2D::new(0.0, 2.0),
        ];
        let estimate = sections.estimate(&candidates).unwrap();
        assert_eq!(estimate.profile_count, 2.0);
        assert_relative_eq!(estimate.profile_years, 2.0);
        // 4 points over 2 sections.
        assert_relative_eq!(estimate.total_years, 2.0 * 2.0 / 2.0);
    }

    #[test]
    fn test_single_ray() {
        let sections = AngularSections {
            ray_count: 1,
            ..AngularSections::default()
        };
        let candidates = [Point2D::new(2.0, 3.0), Point2D::new(0.0, 1.0)];
        let transform = sections.transform(&candidates).unwrap();
        assert_eq!(transform.snapped, candidates.to_vec());
    }

    #[test]
    fn test_invalid() {
        let sections = AngularSections {
            ray_count: 0,
            ..AngularSections::default()
        };
        assert_eq!(
            sections.transform(&[Point2D::new(1.0, 1.0)]),
            Err(Error::InvalidRayCount),
        );
    }

    proptest!(
        /// Every candidate lands in exactly one section and its snapped
        /// version dominates it, with a single coordinate moved.
        #[test]
        fn coverage(
            ray_count in 1..64_usize,
            candidates in prop::collection::vec(
                (0.0..1e4, 0.0..1e4).prop_map(|(x, y)| Point2D::new(x, y)),
                0..100,
            ),
        ) {
            let sections = AngularSections { ray_count, ..AngularSections::default() };
            let transform = sections.transform(&candidates).unwrap();

            prop_assert_eq!(transform.sections.len(), candidates.len());
            prop_assert_eq!(transform.snapped.len(), candidates.len());
            let ray_points: usize = transform.rays.iter().map(|r| r.points.len()).sum();
            prop_assert_eq!(ray_points, candidates.len());

            for ((candidate, snapped), section) in
                candidates.iter().zip(&transform.snapped).zip(&transform.sections)
            {
                prop_assert!(*section < ray_count);
                prop_assert!(crate::dominates(snapped, candidate));
                prop_assert!(snapped.x == candidate.x || snapped.y == candidate.y);
                prop_assert!(snapped.x.is_finite() && snapped.y.is_finite());
            }
        }
    );
}
