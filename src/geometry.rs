//! A few useful geometric types and predicates.
//!
//! All distances in this crate are Manhattan (L1) distances, which matches the
//! cost model: the cost of a container is proportional to `x + y`.

use nalgebra::Vector2;

pub type Point2D = Vector2<f64>;

/// Manhattan distance between two points.
#[inline]
pub fn manhattan(a: &Point2D, b: &Point2D) -> f64 {
    f64::abs(a.x - b.x) + f64::abs(a.y - b.y)
}

/// Whether `a` dominates `b`, ie. `a.x >= b.x` and `a.y >= b.y`.
#[inline]
pub fn dominates(a: &Point2D, b: &Point2D) -> bool {
    b.x <= a.x && b.y <= a.y
}

/// Component-wise maximum of two points.
#[inline]
pub fn sup(a: &Point2D, b: &Point2D) -> Point2D {
    Point2D::new(f64::max(a.x, b.x), f64::max(a.y, b.y))
}

/// The L1 norm of a corner, ie. what one unit of weight costs when assigned
/// to it.
#[inline]
pub fn corner_norm(corner: &Point2D) -> f64 {
    corner.x + corner.y
}

/// A weighted input point.
///
/// Points are identified by their index in the input slice.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub position: Point2D,
    pub weight: f64,
}

impl Point {
    pub fn new(x: f64, y: f64, weight: f64) -> Self {
        Self {
            position: Point2D::new(x, y),
            weight,
        }
    }
}

/// Cheapest possible cost of a solution: every point sits in a container
/// placed exactly on it.
pub fn lower_bound(points: &[Point]) -> f64 {
    points
        .iter()
        .map(|point| point.weight * corner_norm(&point.position))
        .sum()
}
