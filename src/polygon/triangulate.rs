//! Polygon triangulation using ear clipping.
//!
//! Converts a simple counter-clockwise loop into triangles that exactly
//! cover it. The triangulation seeds the Hertel–Mehlhorn partitioner.
//!
//! # Algorithm
//!
//! The ear clipping algorithm works by repeatedly finding and removing "ears":
//! - An ear is a triangle formed by three consecutive vertices
//! - The middle vertex must be convex (reflex vertices cannot form ears)
//! - No other remaining vertex may lie inside or on the ear triangle
//!
//! Loops produced by hole bridging visit some points twice. Copies of an
//! ear's own corners are skipped during the containment test.
//!
//! # Complexity
//!
//! - Time: O(n³) worst case for a loop with n vertices
//! - Space: O(n)
//!
//! # Example
//!
//! ```
//! use convexum::polygon::triangulate_loop;
//! use convexum::Point2;
//!
//! let pts = vec![
//!     Point2::new(0.0, 0.0),
//!     Point2::new(1.0, 0.0),
//!     Point2::new(1.0, 1.0),
//!     Point2::new(0.0, 1.0),
//! ];
//!
//! let triangles = triangulate_loop(&pts, &[0, 1, 2, 3], 1e-10).unwrap();
//!
//! // A square is divided into 2 triangles
//! assert_eq!(triangles.len(), 2);
//! ```

use super::core::Polygon;
use super::validate::{validate_loop, LoopKind};
use crate::error::{PartitionError, PartitionResult};
use crate::primitives::{Point2, Segment2};
use crate::tolerance::{orient2d, point_in_triangle, point_on_segment, Orientation};
use log::trace;
use num_traits::Float;

/// A triangle from polygon triangulation, represented by three points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolygonTriangle<F> {
    /// First vertex of the triangle.
    pub a: Point2<F>,
    /// Second vertex of the triangle.
    pub b: Point2<F>,
    /// Third vertex of the triangle.
    pub c: Point2<F>,
}

impl<F: Float> PolygonTriangle<F> {
    /// Creates a new triangle from three points.
    #[inline]
    pub fn new(a: Point2<F>, b: Point2<F>, c: Point2<F>) -> Self {
        Self { a, b, c }
    }

    /// Computes the area of the triangle.
    pub fn area(&self) -> F {
        let two = F::from(2.0).unwrap();
        ((self.b.x - self.a.x) * (self.c.y - self.a.y)
            - (self.c.x - self.a.x) * (self.b.y - self.a.y))
            .abs()
            / two
    }

    /// Returns the centroid of the triangle.
    pub fn centroid(&self) -> Point2<F> {
        let three = F::from(3.0).unwrap();
        Point2::new(
            (self.a.x + self.b.x + self.c.x) / three,
            (self.a.y + self.b.y + self.c.y) / three,
        )
    }
}

/// Result of polygon triangulation with vertex indices.
#[derive(Debug, Clone, PartialEq)]
pub struct TriangulationResult {
    /// Triangle vertex indices. Each triple (i, j, k) is a counter-clockwise
    /// triangle made of point indices from the triangulated loop.
    pub indices: Vec<(usize, usize, usize)>,
}

impl TriangulationResult {
    /// Returns the number of triangles.
    #[inline]
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Returns true if there are no triangles.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Triangulates an index loop using ear clipping.
///
/// `poly` must be counter-clockwise and simple (or a bridged loop whose
/// only contacts are its zero-width seams). Triangles reference the same
/// point indices as `poly`.
///
/// A vertex lying on the straight line between its neighbours never forms
/// an ear; when nothing else is clippable such a vertex is dropped as a
/// zero-area ear. If neither step makes progress, the loop is degenerate
/// and [`PartitionError::NoEar`] is returned.
pub fn triangulate_loop<F: Float>(
    points: &[Point2<F>],
    poly: &[usize],
    eps: F,
) -> PartitionResult<TriangulationResult> {
    let n = poly.len();
    if n < 3 {
        return Err(PartitionError::TooFewVertices { count: n });
    }

    let mut remaining: Vec<usize> = poly.to_vec();
    let mut triangles: Vec<(usize, usize, usize)> = Vec::with_capacity(n - 2);

    while remaining.len() > 3 {
        let m = remaining.len();

        if let Some(i) = find_ear(points, &remaining, eps) {
            let prev = (i + m - 1) % m;
            let next = (i + 1) % m;
            triangles.push((remaining[prev], remaining[i], remaining[next]));
            remaining.remove(i);
        } else if let Some(i) = find_straight_vertex(points, &remaining, eps) {
            trace!("dropping straight vertex {}", remaining[i]);
            remaining.remove(i);
        } else {
            return Err(PartitionError::NoEar { remaining: m });
        }
    }

    let (a, b, c) = (remaining[0], remaining[1], remaining[2]);
    if orient2d(points[a], points[b], points[c], eps) == Orientation::CounterClockwise {
        triangles.push((a, b, c));
    }

    Ok(TriangulationResult { indices: triangles })
}

/// Finds the first ear of the remaining loop.
fn find_ear<F: Float>(points: &[Point2<F>], remaining: &[usize], eps: F) -> Option<usize> {
    let m = remaining.len();
    (0..m).find(|&i| is_ear(points, remaining, (i + m - 1) % m, i, (i + 1) % m, eps))
}

/// Checks if vertex at position `curr` forms an ear with its neighbors.
fn is_ear<F: Float>(
    points: &[Point2<F>],
    remaining: &[usize],
    prev: usize,
    curr: usize,
    next: usize,
    eps: F,
) -> bool {
    let (ia, ib, ic) = (remaining[prev], remaining[curr], remaining[next]);
    let a = points[ia];
    let b = points[ib];
    let c = points[ic];

    if orient2d(a, b, c, eps) != Orientation::CounterClockwise {
        return false;
    }

    !remaining
        .iter()
        .filter(|&&k| k != ia && k != ib && k != ic)
        .any(|&k| point_in_triangle(points[k], a, b, c, eps))
}

/// Finds a vertex lying strictly between its two neighbours on a line.
fn find_straight_vertex<F: Float>(
    points: &[Point2<F>],
    remaining: &[usize],
    eps: F,
) -> Option<usize> {
    let m = remaining.len();
    (0..m).find(|&i| {
        let a = points[remaining[(i + m - 1) % m]];
        let b = points[remaining[i]];
        let c = points[remaining[(i + 1) % m]];
        orient2d(a, b, c, eps) == Orientation::Collinear
            && (b - a).dot(c - b) > F::zero()
            && point_on_segment(b, Segment2::new(a, c), eps)
    })
}

/// Triangulates a polygon that owns its vertices.
///
/// The polygon is validated as a counter-clockwise simple loop first.
///
/// # Example
///
/// ```
/// use convexum::polygon::{Polygon, triangulate_polygon};
/// use convexum::Point2;
///
/// // L-shaped polygon (concave)
/// let l_shape = Polygon::new(vec![
///     Point2::new(0.0, 0.0),
///     Point2::new(2.0, 0.0),
///     Point2::new(2.0, 1.0),
///     Point2::new(1.0, 1.0),
///     Point2::new(1.0, 2.0),
///     Point2::new(0.0, 2.0),
/// ]);
///
/// let triangles = triangulate_polygon(&l_shape, 1e-10).unwrap();
/// assert_eq!(triangles.len(), 4); // 6 vertices -> 4 triangles
/// ```
pub fn triangulate_polygon<F: Float>(
    polygon: &Polygon<F>,
    eps: F,
) -> PartitionResult<Vec<PolygonTriangle<F>>> {
    let identity: Vec<usize> = (0..polygon.len()).collect();
    validate_loop(&polygon.vertices, &identity, LoopKind::Outer, eps, true)?;

    let result = triangulate_loop(&polygon.vertices, &identity, eps)?;

    Ok(result
        .indices
        .iter()
        .map(|&(i, j, k)| {
            PolygonTriangle::new(
                polygon.vertices[i],
                polygon.vertices[j],
                polygon.vertices[k],
            )
        })
        .collect())
}

/// Computes the total area of a triangulation.
///
/// Useful for verifying that the triangulation covers the input polygon.
pub fn triangulation_area<F: Float>(triangles: &[PolygonTriangle<F>]) -> F {
    triangles
        .iter()
        .map(|t| t.area())
        .fold(F::zero(), |a, b| a + b)
}
