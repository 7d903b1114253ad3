//! Solvers for the weighted 2D container selection problem (CSP).
//!
//! Given a set of weighted points, the problem is to pick `k` container
//! points such that every input point is dominated (component-wise less or
//! equal) by the container it is assigned to, while minimizing
//!
//! ```text
//! Σ  weight(p) * (container(p).x + container(p).y)
//! ```
//!
//! # Crate Layout
//!
//! Points are grouped into [`WeightedCluster`]s, which carry a weighted
//! centroid and the smallest corner that dominates all of their members.
//! Solvers implement the [`Select`] trait and return a [`Solution`], ie. a
//! list of clusters and their total cost.
//!
//! # Available algorithms
//!
//! ## Solvers
//!
//! - [Exhaustive search][BruteForce] over candidate corners, exact on the
//!   [candidate set][candidate_corners],
//! - [K-means][KMeans], a weighted variant of Lloyd's algorithm using
//!   Manhattan distances,
//! - [Hierarchical clustering][Hierarchical], built on the
//!   [closest pair][fast_closest_pair] algorithm.
//!
//! Clusters computed by the heuristics can be improved by reassigning each
//! point to its [closest dominating corner][closest_corner].
//!
//! ## Estimators
//!
//! - [Angular sections][AngularSections] snap candidate corners onto rays to
//!   estimate the size of the search space of the PTAS of Schieber et al.

#![warn(
    missing_copy_implementations,
    missing_debug_implementations,
    rust_2018_idioms
)]

mod algorithms;
mod cluster;
mod geometry;
mod run_info;


pub use crate::algorithms::*;
pub use crate::cluster::singletons;
pub use crate::cluster::WeightedCluster;
pub use crate::geometry::lower_bound;
pub use crate::geometry::{dominates, manhattan};
pub use crate::geometry::{Point, Point2D};
pub use crate::run_info::RunInfo;

pub use nalgebra;

use std::cmp::Ordering;

/// The `Select` trait allows for solving instances of the container selection
/// problem.
///
/// Solvers implement this trait.
///
/// The generic argument `M` defines the input of the algorithms (usually a
/// slice of [`Point`]s).
pub trait Select<M> {
    /// Diagnostic data returned for a specific run of the algorithm.
    type Metadata;

    /// Error details, should the algorithm fail to run.
    type Error;

    /// Group the given points into clusters, each one served by the corner
    /// of its bounding box.
    fn select(&mut self, points: M) -> Result<(Solution, Self::Metadata), Self::Error>;
}

/// A set of clusters and their total cost.
///
/// Clusters of a solution are never empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Solution {
    pub clusters: Vec<WeightedCluster>,
    pub cost: f64,
}

impl Solution {
    /// Build a solution, dropping empty clusters.
    pub fn new(clusters: Vec<WeightedCluster>) -> Self {
        let clusters: Vec<_> = clusters
            .into_iter()
            .filter(|cluster| !cluster.is_empty())
            .collect();
        let cost = clusters.iter().map(WeightedCluster::cost).sum();
        Self { clusters, cost }
    }

    /// Corners of the solution's clusters, in order.
    pub fn corners(&self) -> Vec<Point2D> {
        self.clusters.iter().map(WeightedCluster::corner).collect()
    }

    /// Ratio between the cost of the solution and [`lower_bound`].
    ///
    /// When the lower bound is zero (eg. all weights are zero), the ratio is
    /// `1.0` for a solution of zero cost and infinite otherwise.
    pub fn approximation_ratio(&self, points: &[Point]) -> f64 {
        let bound = lower_bound(points);
        if bound == 0.0 {
            if self.cost == 0.0 {
                1.0
            } else {
                f64::INFINITY
            }
        } else {
            self.cost / bound
        }
    }

    /// Reassign every point to the closest corner (among the solution's)
    /// that dominates it.
    ///
    /// Points that are members of the solution stay assigned and the cost of
    /// serving them can only decrease, but the solution may also pick up
    /// points it did not cover.  Fails with
    /// [`Error::InfeasibleAssignment`] when some point is dominated by none
    /// of the corners, for example when the solution was computed with no
    /// k-means round.
    pub fn reassign(&self, points: &[Point]) -> Result<Solution, Error> {
        let corners = self.corners();
        let assignment = closest_corner(&singletons(points), &corners);
        if !assignment.is_feasible(points.len()) {
            return Err(Error::InfeasibleAssignment {
                assigned: assignment.assigned_count,
                total: points.len(),
            });
        }
        Ok(Solution::new(assignment.clusters))
    }
}

fn partial_cmp<W>(a: &W, b: &W) -> Ordering
where
    W: PartialOrd,
{
    if a < b {
        Ordering::Less
    } else if b < a {
        Ordering::Greater
    } else {
        Ordering::Equal
    }
}
