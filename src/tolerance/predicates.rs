//! Geometric predicates with explicit tolerance.

use crate::primitives::{Point2, Segment2};
use num_traits::Float;

/// Result of an orientation test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// Left turn (positive area).
    CounterClockwise,
    /// Right turn (negative area).
    Clockwise,
    /// Points are collinear (within tolerance).
    Collinear,
}

/// Computes the orientation of three points with tolerance.
///
/// Classifies the turn `a -> b -> c` by the sign of the cross product of
/// `b - a` and `c - b`, which equals twice the signed area of the triangle:
/// - `CounterClockwise` for a left turn
/// - `Clockwise` for a right turn
/// - `Collinear` when the absolute cross product is at most `eps`
#[inline]
pub fn orient2d<F: Float>(a: Point2<F>, b: Point2<F>, c: Point2<F>, eps: F) -> Orientation {
    let cross = (b - a).cross(c - b);

    if cross > eps {
        Orientation::CounterClockwise
    } else if cross < -eps {
        Orientation::Clockwise
    } else {
        Orientation::Collinear
    }
}

/// Checks if a point lies on a line segment within tolerance.
///
/// Returns `true` if the point `p` is within distance `eps` of the segment.
#[inline]
pub fn point_on_segment<F: Float>(p: Point2<F>, segment: Segment2<F>, eps: F) -> bool {
    segment.distance_squared_to_point(p) <= eps * eps
}

/// Result of a segment intersection test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SegmentIntersection<F> {
    /// Segments do not intersect.
    None,
    /// Segments intersect at a single point.
    Point {
        /// The intersection point.
        point: Point2<F>,
        /// Parameter along first segment (0 = start, 1 = end).
        t1: F,
        /// Parameter along second segment (0 = start, 1 = end).
        t2: F,
    },
    /// Segments are collinear and share more than a point.
    Overlapping {
        /// Start of the overlapping region.
        start: Point2<F>,
        /// End of the overlapping region.
        end: Point2<F>,
    },
}

/// Tests if two closed line segments intersect, with tolerance.
///
/// Touching endpoints count as a `Point` intersection. Collinear segments that
/// share a stretch of positive length are reported as `Overlapping`.
pub fn segments_intersect<F: Float>(
    s1: Segment2<F>,
    s2: Segment2<F>,
    eps: F,
) -> SegmentIntersection<F> {
    let d1 = s1.direction();
    let d2 = s2.direction();
    let cross = d1.cross(d2);
    let d = s2.start - s1.start;
    let eps_sq = eps * eps;

    if cross.abs() <= eps {
        let len_sq = d1.magnitude_squared();
        if len_sq <= eps_sq {
            if point_on_segment(s1.start, s2, eps) {
                let (_, t2) = s2.closest_point(s1.start);
                return SegmentIntersection::Point {
                    point: s1.start,
                    t1: F::zero(),
                    t2,
                };
            }
            return SegmentIntersection::None;
        }

        // Parallel: only collinear segments can meet.
        let offset = d.cross(d1);
        if offset * offset > eps_sq * len_sq {
            return SegmentIntersection::None;
        }

        // Project s2 onto s1's parameter range.
        let ta = (s2.start - s1.start).dot(d1) / len_sq;
        let tb = (s2.end - s1.start).dot(d1) / len_sq;
        let (t_min, t_max) = if ta <= tb { (ta, tb) } else { (tb, ta) };

        let overlap_start = t_min.max(F::zero());
        let overlap_end = t_max.min(F::one());

        if overlap_start > overlap_end + eps {
            return SegmentIntersection::None;
        }

        if (overlap_end - overlap_start).abs() <= eps {
            let point = s1.point_at(overlap_start);
            let (_, t2) = s2.closest_point(point);
            return SegmentIntersection::Point {
                point,
                t1: overlap_start,
                t2,
            };
        }

        return SegmentIntersection::Overlapping {
            start: s1.point_at(overlap_start),
            end: s1.point_at(overlap_end),
        };
    }

    // s1.start + t1 * d1 = s2.start + t2 * d2, solved by Cramer's rule.
    let t1 = d.cross(d2) / cross;
    let t2 = d.cross(d1) / cross;

    let lo = -eps;
    let hi = F::one() + eps;

    if t1 >= lo && t1 <= hi && t2 >= lo && t2 <= hi {
        let t1 = t1.max(F::zero()).min(F::one());
        SegmentIntersection::Point {
            point: s1.point_at(t1),
            t1,
            t2: t2.max(F::zero()).min(F::one()),
        }
    } else {
        SegmentIntersection::None
    }
}

/// Tests whether segments `p1-p2` and `p3-p4` cross at a single interior point.
///
/// Shared endpoints, touching, and collinear configurations do not count: every
/// endpoint must lie strictly on opposite sides of the other segment's line.
#[inline]
pub fn segments_cross<F: Float>(
    p1: Point2<F>,
    p2: Point2<F>,
    p3: Point2<F>,
    p4: Point2<F>,
    eps: F,
) -> bool {
    let o1 = orient2d(p1, p2, p3, eps);
    let o2 = orient2d(p1, p2, p4, eps);
    let o3 = orient2d(p3, p4, p1, eps);
    let o4 = orient2d(p3, p4, p2, eps);

    let opposite = |a: Orientation, b: Orientation| {
        matches!(
            (a, b),
            (Orientation::CounterClockwise, Orientation::Clockwise)
                | (Orientation::Clockwise, Orientation::CounterClockwise)
        )
    };

    opposite(o1, o2) && opposite(o3, o4)
}

/// Tests whether `p` lies inside or on the boundary of triangle `abc`.
///
/// Works for either winding of the triangle.
pub fn point_in_triangle<F: Float>(
    p: Point2<F>,
    a: Point2<F>,
    b: Point2<F>,
    c: Point2<F>,
    eps: F,
) -> bool {
    let o1 = orient2d(a, b, p, eps);
    let o2 = orient2d(b, c, p, eps);
    let o3 = orient2d(c, a, p, eps);

    let has_cw = [o1, o2, o3].contains(&Orientation::Clockwise);
    let has_ccw = [o1, o2, o3].contains(&Orientation::CounterClockwise);

    !(has_cw && has_ccw)
}

/// Tests whether the direction from `v` towards `q` points strictly into the
/// interior wedge at vertex `v` of a boundary running `prev -> v -> next`.
///
/// The interior is taken to lie on the left of the boundary, which holds for
/// counter-clockwise outer loops and for clockwise hole loops alike.
pub fn in_cone<F: Float>(
    prev: Point2<F>,
    v: Point2<F>,
    next: Point2<F>,
    q: Point2<F>,
    eps: F,
) -> bool {
    if orient2d(prev, v, next, eps) != Orientation::Clockwise {
        // Convex (or straight) corner: q must be left of v->next and right of v->prev.
        orient2d(v, q, prev, eps) == Orientation::CounterClockwise
            && orient2d(q, v, next, eps) == Orientation::CounterClockwise
    } else {
        // Reflex corner: q must avoid the closed exterior wedge.
        !(orient2d(v, q, next, eps) != Orientation::Clockwise
            && orient2d(q, v, prev, eps) != Orientation::Clockwise)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn p(x: f64, y: f64) -> Point2<f64> {
        Point2::new(x, y)
    }

    #[test]
    fn test_orient2d_turns() {
        assert_eq!(
            orient2d(p(0.0, 0.0), p(1.0, 0.0), p(0.5, 1.0), 1e-10),
            Orientation::CounterClockwise
        );
        assert_eq!(
            orient2d(p(0.0, 0.0), p(1.0, 0.0), p(0.5, -1.0), 1e-10),
            Orientation::Clockwise
        );
        assert_eq!(
            orient2d(p(0.0, 0.0), p(1.0, 0.0), p(2.0, 0.0), 1e-10),
            Orientation::Collinear
        );
    }

    #[test]
    fn test_orient2d_tolerance() {
        let a = p(0.0, 0.0);
        let b = p(1.0, 0.0);
        assert_eq!(orient2d(a, b, p(2.0, 1e-12), 1e-10), Orientation::Collinear);
        assert_eq!(
            orient2d(a, b, p(2.0, 1e-8), 1e-10),
            Orientation::CounterClockwise
        );
    }

    #[test]
    fn test_point_on_segment() {
        let seg = Segment2::from_coords(0.0, 0.0, 10.0, 0.0);
        assert!(point_on_segment(p(0.0, 0.0), seg, 1e-10));
        assert!(point_on_segment(p(5.0, 0.0), seg, 1e-10));
        assert!(point_on_segment(p(5.0, 0.5), seg, 1.0));
        assert!(!point_on_segment(p(5.0, 0.5), seg, 0.1));
        assert!(!point_on_segment(p(15.0, 0.0), seg, 1e-10));
    }

    #[test]
    fn test_segments_intersect_crossing() {
        let s1 = Segment2::from_coords(0.0, 0.0, 10.0, 10.0);
        let s2 = Segment2::from_coords(0.0, 10.0, 10.0, 0.0);

        match segments_intersect(s1, s2, 1e-10) {
            SegmentIntersection::Point { point, t1, t2 } => {
                assert_relative_eq!(point.x, 5.0, epsilon = 1e-10);
                assert_relative_eq!(point.y, 5.0, epsilon = 1e-10);
                assert_relative_eq!(t1, 0.5, epsilon = 1e-10);
                assert_relative_eq!(t2, 0.5, epsilon = 1e-10);
            }
            other => panic!("expected point intersection, got {other:?}"),
        }
    }

    #[test]
    fn test_segments_intersect_shared_endpoint() {
        let s1 = Segment2::from_coords(0.0, 0.0, 5.0, 5.0);
        let s2 = Segment2::from_coords(5.0, 5.0, 10.0, 0.0);

        match segments_intersect(s1, s2, 1e-10) {
            SegmentIntersection::Point { point, t1, t2 } => {
                assert_relative_eq!(point.x, 5.0, epsilon = 1e-10);
                assert_relative_eq!(t1, 1.0, epsilon = 1e-10);
                assert_relative_eq!(t2, 0.0, epsilon = 1e-10);
            }
            other => panic!("expected point intersection, got {other:?}"),
        }
    }

    #[test]
    fn test_segments_intersect_disjoint() {
        let s1 = Segment2::from_coords(0.0, 0.0, 10.0, 0.0);
        let parallel = Segment2::from_coords(0.0, 1.0, 10.0, 1.0);
        let collinear_apart = Segment2::from_coords(11.0, 0.0, 15.0, 0.0);
        let short = Segment2::from_coords(6.0, 4.0, 10.0, 1.0);

        assert_eq!(
            segments_intersect(s1, parallel, 1e-10),
            SegmentIntersection::None
        );
        assert_eq!(
            segments_intersect(s1, collinear_apart, 1e-10),
            SegmentIntersection::None
        );
        assert_eq!(segments_intersect(s1, short, 1e-10), SegmentIntersection::None);
    }

    #[test]
    fn test_segments_intersect_overlap() {
        let s1 = Segment2::from_coords(0.0, 0.0, 10.0, 0.0);
        let s2 = Segment2::from_coords(15.0, 0.0, 5.0, 0.0);

        match segments_intersect(s1, s2, 1e-10) {
            SegmentIntersection::Overlapping { start, end } => {
                assert_relative_eq!(start.x, 5.0, epsilon = 1e-10);
                assert_relative_eq!(end.x, 10.0, epsilon = 1e-10);
            }
            other => panic!("expected overlap, got {other:?}"),
        }
    }

    #[test]
    fn test_segments_cross_is_proper() {
        // X crossing
        assert!(segments_cross(
            p(0.0, 0.0),
            p(2.0, 2.0),
            p(0.0, 2.0),
            p(2.0, 0.0),
            1e-10
        ));
        // Shared endpoint
        assert!(!segments_cross(
            p(0.0, 0.0),
            p(1.0, 1.0),
            p(1.0, 1.0),
            p(2.0, 0.0),
            1e-10
        ));
        // T junction: endpoint touches the other segment
        assert!(!segments_cross(
            p(0.0, 0.0),
            p(2.0, 0.0),
            p(1.0, 0.0),
            p(1.0, 1.0),
            1e-10
        ));
        // Collinear overlap
        assert!(!segments_cross(
            p(0.0, 0.0),
            p(2.0, 0.0),
            p(1.0, 0.0),
            p(3.0, 0.0),
            1e-10
        ));
    }

    #[test]
    fn test_point_in_triangle() {
        let (a, b, c) = (p(0.0, 0.0), p(2.0, 0.0), p(1.0, 2.0));
        assert!(point_in_triangle(p(1.0, 0.5), a, b, c, 1e-10));
        assert!(point_in_triangle(p(1.0, 0.0), a, b, c, 1e-10));
        assert!(point_in_triangle(p(1.0, 0.5), c, b, a, 1e-10));
        assert!(!point_in_triangle(p(2.0, 2.0), a, b, c, 1e-10));
    }

    #[test]
    fn test_in_cone_convex_corner() {
        // Corner (0,0) of a CCW unit square: prev (0,1), next (1,0).
        let (prev, v, next) = (p(0.0, 1.0), p(0.0, 0.0), p(1.0, 0.0));
        assert!(in_cone(prev, v, next, p(1.0, 1.0), 1e-10));
        assert!(!in_cone(prev, v, next, p(-1.0, 1.0), 1e-10));
        // Along an edge is not strictly inside.
        assert!(!in_cone(prev, v, next, p(2.0, 0.0), 1e-10));
    }

    #[test]
    fn test_in_cone_reflex_corner() {
        // Inner corner (1,1) of the L-shape, prev (2,1), next (1,2).
        let (prev, v, next) = (p(2.0, 1.0), p(1.0, 1.0), p(1.0, 2.0));
        assert!(in_cone(prev, v, next, p(0.0, 0.0), 1e-10));
        assert!(in_cone(prev, v, next, p(0.0, 2.0), 1e-10));
        assert!(in_cone(prev, v, next, p(2.0, 0.0), 1e-10));
        assert!(!in_cone(prev, v, next, p(2.0, 2.0), 1e-10));
    }
}
