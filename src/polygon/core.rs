//! Core polygon types and basic operations.
//!
//! Two representations are used throughout the crate:
//!
//! - [`IndexPolygon`]: a closed loop of indices into a shared point table.
//!   This is what the partitioners consume and produce.
//! - [`Polygon`]: a closed loop that owns its vertices, for callers that do
//!   not keep a point table around.

use crate::error::Winding;
use crate::primitives::Point2;
use crate::tolerance::{orient2d, Orientation};
use num_traits::Float;

/// A closed loop of indices into a point table.
///
/// Outer boundaries run counter-clockwise, holes clockwise.
pub type IndexPolygon = Vec<usize>;

/// A simple polygon represented as a sequence of vertices.
///
/// The polygon is implicitly closed (the last vertex connects to the first).
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon<F> {
    /// The vertices of the polygon, counter-clockwise for outer boundaries.
    pub vertices: Vec<Point2<F>>,
}

impl<F: Float> Polygon<F> {
    /// Creates a new polygon from vertices.
    #[inline]
    pub fn new(vertices: Vec<Point2<F>>) -> Self {
        Self { vertices }
    }

    /// Builds a polygon by looking up `indices` in `points`.
    ///
    /// # Panics
    ///
    /// Panics if any index is out of range for `points`.
    pub fn from_indices(points: &[Point2<F>], indices: &[usize]) -> Self {
        Self {
            vertices: indices.iter().map(|&i| points[i]).collect(),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Returns the signed area of the polygon using the shoelace formula.
    ///
    /// Positive for CCW winding, negative for CW winding.
    pub fn signed_area(&self) -> F {
        polygon_signed_area(&self.vertices)
    }

    /// Returns the absolute area of the polygon.
    pub fn area(&self) -> F {
        self.signed_area().abs()
    }

    /// Tests if a point is inside the polygon.
    pub fn contains(&self, point: Point2<F>) -> bool {
        polygon_contains(&self.vertices, point)
    }

    /// Tests if the polygon is convex, treating turns within `eps` as straight.
    pub fn is_convex(&self, eps: F) -> bool {
        let identity: Vec<usize> = (0..self.vertices.len()).collect();
        loop_is_convex(&self.vertices, &identity, eps)
    }

    /// Returns a polygon with reversed winding order.
    pub fn reversed(&self) -> Self {
        let mut vertices = self.vertices.clone();
        vertices.reverse();
        Self { vertices }
    }
}

/// Computes the signed area of a vertex loop using the shoelace formula.
///
/// Positive for CCW winding, negative for CW winding.
pub fn polygon_signed_area<F: Float>(vertices: &[Point2<F>]) -> F {
    if vertices.len() < 3 {
        return F::zero();
    }

    let n = vertices.len();
    let mut twice_area = F::zero();
    for i in 0..n {
        let a = vertices[i];
        let b = vertices[(i + 1) % n];
        twice_area = twice_area + a.x * b.y - b.x * a.y;
    }

    twice_area / (F::one() + F::one())
}

/// Tests if a point is inside a vertex loop using ray casting.
///
/// Points on the boundary may return either true or false.
pub fn polygon_contains<F: Float>(vertices: &[Point2<F>], point: Point2<F>) -> bool {
    crossing_parity(vertices.len(), |i| vertices[i], point)
}

/// Signed area of an index loop. Positive for CCW winding.
pub fn loop_signed_area<F: Float>(points: &[Point2<F>], poly: &[usize]) -> F {
    if poly.len() < 3 {
        return F::zero();
    }

    let n = poly.len();
    let mut twice_area = F::zero();
    for i in 0..n {
        let a = points[poly[i]];
        let b = points[poly[(i + 1) % n]];
        twice_area = twice_area + a.x * b.y - b.x * a.y;
    }

    twice_area / (F::one() + F::one())
}

/// Ray-casting containment test for an index loop.
///
/// Zero-width seams (an edge traversed once in each direction) cancel out,
/// so loops produced by hole bridging are handled correctly.
pub fn loop_contains<F: Float>(points: &[Point2<F>], poly: &[usize], point: Point2<F>) -> bool {
    crossing_parity(poly.len(), |i| points[poly[i]], point)
}

fn crossing_parity<F: Float>(n: usize, at: impl Fn(usize) -> Point2<F>, point: Point2<F>) -> bool {
    if n < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let vi = at(i);
        let vj = at(j);

        if ((vi.y > point.y) != (vj.y > point.y))
            && (point.x < (vj.x - vi.x) * (point.y - vi.y) / (vj.y - vi.y) + vi.x)
        {
            inside = !inside;
        }
        j = i;
    }

    inside
}

/// Winding of an index loop, or `None` when its area is within `eps` of zero.
pub fn winding<F: Float>(points: &[Point2<F>], poly: &[usize], eps: F) -> Option<Winding> {
    let area = loop_signed_area(points, poly);
    if area > eps {
        Some(Winding::CounterClockwise)
    } else if area < -eps {
        Some(Winding::Clockwise)
    } else {
        None
    }
}

/// Tests if an index loop is convex.
///
/// Every non-straight turn must have the same sign; straight (collinear)
/// turns are tolerated as degenerate-convex.
pub fn loop_is_convex<F: Float>(points: &[Point2<F>], poly: &[usize], eps: F) -> bool {
    let n = poly.len();
    if n < 3 {
        return true;
    }

    let mut seen: Option<Orientation> = None;
    for i in 0..n {
        let turn = orient2d(
            points[poly[i]],
            points[poly[(i + 1) % n]],
            points[poly[(i + 2) % n]],
            eps,
        );
        if turn == Orientation::Collinear {
            continue;
        }
        match seen {
            None => seen = Some(turn),
            Some(s) if s != turn => return false,
            _ => {}
        }
    }

    true
}

/// Returns true if the vertex at position `i` of a CCW loop is a notch.
#[inline]
pub fn is_reflex<F: Float>(points: &[Point2<F>], poly: &[usize], i: usize, eps: F) -> bool {
    let n = poly.len();
    orient2d(
        points[poly[(i + n - 1) % n]],
        points[poly[i]],
        points[poly[(i + 1) % n]],
        eps,
    ) == Orientation::Clockwise
}

/// Axis-aligned bounds of an index loop as `(min, max)`.
pub(crate) fn loop_bounds<F: Float>(
    points: &[Point2<F>],
    poly: &[usize],
) -> Option<(Point2<F>, Point2<F>)> {
    let first = points[*poly.first()?];
    let mut min = first;
    let mut max = first;

    for &i in &poly[1..] {
        let v = points[i];
        min.x = min.x.min(v.x);
        min.y = min.y.min(v.y);
        max.x = max.x.max(v.x);
        max.y = max.y.max(v.y);
    }

    Some((min, max))
}
