//! Input validation for partitioning.
//!
//! Every loop handed to a partitioner is checked here first. A loop must
//! have at least three in-range, distinct vertices, non-zero area, the
//! winding its role demands, and (optionally) a simple boundary. Across
//! loops, no two may touch and holes must nest directly inside an outer.
//!
//! # Example
//!
//! ```
//! use convexum::{Point2, PartitionError, polygon::{validate_loop, LoopKind}};
//!
//! let pts = vec![
//!     Point2::new(0.0, 0.0),
//!     Point2::new(4.0, 0.0),
//!     Point2::new(1.0, 3.0),
//!     Point2::new(3.0, 3.0),
//! ];
//!
//! // A bow-tie crosses itself.
//! let err = validate_loop(&pts, &[0, 1, 2, 3], LoopKind::Outer, 1e-10, true);
//! assert_eq!(err, Err(PartitionError::SelfIntersecting));
//! ```

use super::core::{loop_bounds, loop_contains, loop_signed_area};
use crate::error::{PartitionError, PartitionResult, Winding};
use crate::primitives::{Point2, Segment2};
use crate::tolerance::{segments_intersect, SegmentIntersection};
use log::debug;
use num_traits::Float;
use std::collections::HashSet;

/// Role of a loop in a polygon-with-holes input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopKind {
    /// Outer boundary, counter-clockwise.
    Outer,
    /// Hole boundary, clockwise.
    Hole,
}

impl LoopKind {
    /// The winding a loop of this kind must have.
    pub fn expected_winding(self) -> Winding {
        match self {
            LoopKind::Outer => Winding::CounterClockwise,
            LoopKind::Hole => Winding::Clockwise,
        }
    }
}

/// Information about a self-intersection.
#[derive(Debug, Clone)]
pub struct SelfIntersection<F> {
    /// A point where the two edges meet.
    pub point: Point2<F>,
    /// Position of the first edge (edge `i` runs from vertex `i` to `i + 1`).
    pub edge1: usize,
    /// Position of the second edge.
    pub edge2: usize,
}

#[inline]
fn edge<F: Float>(points: &[Point2<F>], poly: &[usize], i: usize) -> Segment2<F> {
    Segment2::new(points[poly[i]], points[poly[(i + 1) % poly.len()]])
}

/// Returns a point where edges `i` and `j` of `poly` illegally meet.
///
/// Adjacent edges may share their common vertex but must not fold back
/// onto each other. Non-adjacent edges must not meet at all.
fn edge_conflict<F: Float>(
    points: &[Point2<F>],
    poly: &[usize],
    i: usize,
    j: usize,
    eps: F,
) -> Option<Point2<F>> {
    let n = poly.len();
    let adjacent = j == i + 1 || (i == 0 && j == n - 1);

    match segments_intersect(edge(points, poly, i), edge(points, poly, j), eps) {
        SegmentIntersection::None => None,
        SegmentIntersection::Point { point, .. } => (!adjacent).then_some(point),
        SegmentIntersection::Overlapping { start, .. } => Some(start),
    }
}

/// Checks if an index loop has any self-intersections.
///
/// Returns true if non-adjacent edges meet, or adjacent edges overlap.
pub fn has_self_intersection<F: Float>(points: &[Point2<F>], poly: &[usize], eps: F) -> bool {
    let n = poly.len();
    (0..n).any(|i| ((i + 1)..n).any(|j| edge_conflict(points, poly, i, j, eps).is_some()))
}

/// Finds all self-intersections in an index loop.
pub fn find_self_intersections<F: Float>(
    points: &[Point2<F>],
    poly: &[usize],
    eps: F,
) -> Vec<SelfIntersection<F>> {
    let n = poly.len();
    let mut intersections = Vec::new();

    for i in 0..n {
        for j in (i + 1)..n {
            if let Some(point) = edge_conflict(points, poly, i, j, eps) {
                intersections.push(SelfIntersection {
                    point,
                    edge1: i,
                    edge2: j,
                });
            }
        }
    }

    intersections
}

/// Checks if a loop is simple (no self-intersections).
#[inline]
pub fn is_simple<F: Float>(points: &[Point2<F>], poly: &[usize], eps: F) -> bool {
    !has_self_intersection(points, poly, eps)
}

/// Validates a single loop for its role.
///
/// The O(n²) simplicity test runs only when `check_simple` is set.
pub fn validate_loop<F: Float>(
    points: &[Point2<F>],
    poly: &[usize],
    kind: LoopKind,
    eps: F,
    check_simple: bool,
) -> PartitionResult<()> {
    let n = poly.len();
    if n < 3 {
        return Err(PartitionError::TooFewVertices { count: n });
    }

    let mut seen = HashSet::with_capacity(n);
    for &index in poly {
        if index >= points.len() {
            return Err(PartitionError::IndexOutOfRange {
                index,
                len: points.len(),
            });
        }
        if !seen.insert(index) {
            return Err(PartitionError::RepeatedIndex { index });
        }
    }

    for i in 0..n {
        let a = poly[i];
        let b = poly[(i + 1) % n];
        if points[a].distance_squared(points[b]) <= eps * eps {
            return Err(PartitionError::CoincidentVertices { a, b });
        }
    }

    let area = loop_signed_area(points, poly);
    if area.abs() <= eps {
        return Err(PartitionError::ZeroArea);
    }

    let expected = kind.expected_winding();
    let actual = if area > F::zero() {
        Winding::CounterClockwise
    } else {
        Winding::Clockwise
    };
    if actual != expected {
        return Err(PartitionError::WrongOrientation { expected });
    }

    if check_simple && has_self_intersection(points, poly, eps) {
        return Err(PartitionError::SelfIntersecting);
    }

    Ok(())
}

fn bounds_overlap<F: Float>(a: (Point2<F>, Point2<F>), b: (Point2<F>, Point2<F>), eps: F) -> bool {
    a.0.x <= b.1.x + eps && b.0.x <= a.1.x + eps && a.0.y <= b.1.y + eps && b.0.y <= a.1.y + eps
}

fn loops_touch<F: Float>(points: &[Point2<F>], a: &[usize], b: &[usize], eps: F) -> bool {
    (0..a.len()).any(|i| {
        let ea = edge(points, a, i);
        (0..b.len()).any(|j| {
            segments_intersect(ea, edge(points, b, j), eps) != SegmentIntersection::None
        })
    })
}

/// Validates a set of outer boundaries and holes and resolves nesting.
///
/// On success returns, for each hole, the position of the outer loop whose
/// region directly contains it. Loop positions in errors refer to the
/// combined list of outers followed by holes, except for
/// [`PartitionError::HoleOutside`] which names a hole position.
pub fn validate_loops<F: Float>(
    points: &[Point2<F>],
    outers: &[Vec<usize>],
    holes: &[Vec<usize>],
    eps: F,
    check_simple: bool,
) -> PartitionResult<Vec<usize>> {
    for outer in outers {
        validate_loop(points, outer, LoopKind::Outer, eps, check_simple)?;
    }
    for hole in holes {
        validate_loop(points, hole, LoopKind::Hole, eps, check_simple)?;
    }

    let loops: Vec<&[usize]> = outers
        .iter()
        .chain(holes.iter())
        .map(|l| l.as_slice())
        .collect();
    let kind = |k: usize| {
        if k < outers.len() {
            LoopKind::Outer
        } else {
            LoopKind::Hole
        }
    };

    let mut bounds = Vec::with_capacity(loops.len());
    for l in &loops {
        bounds.push(loop_bounds(points, l).ok_or(PartitionError::TooFewVertices { count: 0 })?);
    }
    for first in 0..loops.len() {
        for second in (first + 1)..loops.len() {
            if bounds_overlap(bounds[first], bounds[second], eps)
                && loops_touch(points, loops[first], loops[second], eps)
            {
                return Err(PartitionError::LoopsIntersect { first, second });
            }
        }
    }

    let areas: Vec<F> = loops
        .iter()
        .map(|l| loop_signed_area(points, l).abs())
        .collect();

    let mut hosts = Vec::with_capacity(holes.len());
    for k in 0..loops.len() {
        // Loops are disjoint, so one vertex decides containment.
        let sample = points[loops[k][0]];
        let innermost = (0..loops.len())
            .filter(|&j| j != k && loop_contains(points, loops[j], sample))
            .min_by(|&a, &b| areas[a].partial_cmp(&areas[b]).unwrap_or(std::cmp::Ordering::Equal));

        match (kind(k), innermost) {
            (LoopKind::Outer, None) => {}
            (LoopKind::Outer, Some(j)) if kind(j) == LoopKind::Hole => {}
            (LoopKind::Outer, Some(_)) => return Err(PartitionError::InvalidNesting { index: k }),
            (LoopKind::Hole, None) => {
                return Err(PartitionError::HoleOutside {
                    hole: k - outers.len(),
                })
            }
            (LoopKind::Hole, Some(j)) if kind(j) == LoopKind::Outer => hosts.push(j),
            (LoopKind::Hole, Some(_)) => return Err(PartitionError::InvalidNesting { index: k }),
        }
    }

    debug!(
        "validated {} outer loops and {} holes",
        outers.len(),
        holes.len()
    );

    Ok(hosts)
}
