//! Diagonal and visibility computation for simple polygons.
//!
//! A diagonal is a segment between two non-adjacent vertices that lies in
//! the closed polygon and meets the boundary only at its endpoints. The
//! [`VisibilityGraph`] records, for every vertex pair, whether it is a
//! boundary edge or a valid diagonal.
//!
//! # Example
//!
//! ```
//! use convexum::polygon::VisibilityGraph;
//! use convexum::Point2;
//!
//! // L-shape with its notch at position 3.
//! let pts = vec![
//!     Point2::new(0.0, 0.0),
//!     Point2::new(2.0, 0.0),
//!     Point2::new(2.0, 1.0),
//!     Point2::new(1.0, 1.0),
//!     Point2::new(1.0, 2.0),
//!     Point2::new(0.0, 2.0),
//! ];
//!
//! let graph = VisibilityGraph::build(&pts, &[0, 1, 2, 3, 4, 5], 1e-10);
//! assert!(graph.is_diagonal(0, 3));
//! assert!(!graph.is_diagonal(2, 4)); // passes outside the notch
//! ```

use super::core::loop_contains;
use crate::primitives::{Point2, Segment2};
use crate::tolerance::{in_cone, point_on_segment, segments_cross};
use log::debug;
use num_traits::Float;

/// Tests whether the open segment between two points of the table is free
/// of every loop in `loops`.
///
/// The segment is blocked if it properly crosses an edge, or if any vertex
/// other than its own endpoints lies on it.
pub fn segment_is_clear<F: Float>(
    points: &[Point2<F>],
    a: usize,
    b: usize,
    loops: &[&[usize]],
    eps: F,
) -> bool {
    let pa = points[a];
    let pb = points[b];
    let segment = Segment2::new(pa, pb);

    for poly in loops {
        let n = poly.len();
        for k in 0..n {
            let u = poly[k];
            let w = poly[(k + 1) % n];

            if segments_cross(pa, pb, points[u], points[w], eps) {
                return false;
            }
            if u != a && u != b && point_on_segment(points[u], segment, eps) {
                return false;
            }
        }
    }

    true
}

/// Tests whether positions `i` and `j` of a counter-clockwise simple loop
/// are joined by a valid diagonal.
///
/// Checks, in order: non-adjacency, that the segment leaves each endpoint
/// into the polygon interior, that it is clear of the boundary, and that
/// its midpoint is inside.
pub fn is_valid_diagonal<F: Float>(
    points: &[Point2<F>],
    poly: &[usize],
    i: usize,
    j: usize,
    eps: F,
) -> bool {
    let n = poly.len();
    if n < 4 || i == j || (i + 1) % n == j || (j + 1) % n == i {
        return false;
    }

    let vi = points[poly[i]];
    let vj = points[poly[j]];

    let cone = |at: usize, toward: Point2<F>| {
        in_cone(
            points[poly[(at + n - 1) % n]],
            points[poly[at]],
            points[poly[(at + 1) % n]],
            toward,
            eps,
        )
    };

    cone(i, vj)
        && cone(j, vi)
        && segment_is_clear(points, poly[i], poly[j], &[poly], eps)
        && loop_contains(points, poly, vi.midpoint(vj))
}

/// Pairwise visibility between the vertices of a simple polygon.
///
/// Positions refer to places in the loop, not point indices. Two positions
/// are visible when they are adjacent on the boundary or joined by a valid
/// diagonal.
#[derive(Debug, Clone)]
pub struct VisibilityGraph {
    n: usize,
    visible: Vec<bool>,
}

impl VisibilityGraph {
    /// Builds the graph by testing every vertex pair. O(n³).
    pub fn build<F: Float>(points: &[Point2<F>], poly: &[usize], eps: F) -> Self {
        let n = poly.len();
        let mut visible = vec![false; n * n];

        for i in 0..n {
            let j = (i + 1) % n;
            visible[i * n + j] = true;
            visible[j * n + i] = true;
        }

        let mut diagonals = 0usize;
        for i in 0..n {
            for j in (i + 2)..n {
                if is_valid_diagonal(points, poly, i, j, eps) {
                    visible[i * n + j] = true;
                    visible[j * n + i] = true;
                    diagonals += 1;
                }
            }
        }

        debug!("visibility graph: {} vertices, {} diagonals", n, diagonals);

        Self { n, visible }
    }

    /// Number of vertices in the underlying loop.
    #[inline]
    pub fn len(&self) -> usize {
        self.n
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// True if positions `i` and `j` are adjacent or joined by a diagonal.
    #[inline]
    pub fn is_visible(&self, i: usize, j: usize) -> bool {
        self.visible[i * self.n + j]
    }

    /// True if positions `i` and `j` are joined by a valid diagonal.
    pub fn is_diagonal(&self, i: usize, j: usize) -> bool {
        let n = self.n;
        i != j && (i + 1) % n != j && (j + 1) % n != i && self.is_visible(i, j)
    }

    /// All diagonals as `(i, j)` position pairs with `i < j`, in
    /// lexicographic order.
    pub fn diagonals(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..self.n).flat_map(move |i| {
            ((i + 1)..self.n)
                .filter(move |&j| self.is_diagonal(i, j))
                .map(move |j| (i, j))
        })
    }
}
