//! Minimum convex partition with a Keil–Snoeyink style dynamic program.
//!
//! Positions `a < b` joined by an edge or a diagonal bound the sub-polygon
//! made of the chain `a..=b` closed by the chord `b -> a`. For each chord
//! the program keeps the fewest pieces needed besides the piece that holds
//! the chord, together with the "narrowest" shapes that piece can take at
//! `a` and at `b`. Only minimum-cost shapes are kept: a costlier piece is
//! never better than cutting along the chord.
//!
//! The piece of a chord is peeled at its vertex `j` just before `b`. What
//! lies between `a` and `j` is one of:
//!
//! - a straight run of edges and diagonals from `a` to `j`
//! - a smaller piece reached across the diagonal `a-j`
//! - the whole piece of the chord `a-j`, when `b` lies on that segment
//!
//! The last case gives pieces with a straight angle at `b`. Straight input
//! vertices are ordinary corners of the pieces they sit on.

use super::core::{loop_is_convex, IndexPolygon, Polygon};
use super::validate::{validate_loop, LoopKind};
use super::visibility::VisibilityGraph;
use crate::error::{PartitionError, PartitionResult};
use crate::primitives::{Point2, Segment2};
use crate::tolerance::{orient2d, point_on_segment, Orientation};
use log::debug;
use num_traits::Float;
use std::collections::VecDeque;

const UNSOLVED: usize = usize::MAX;

/// How the piece of a chord `(a, b)` gets from `a` to its split vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lead {
    /// Straight run from `a` to the split.
    Run,
    /// Across the diagonal `a-split`, continuing with that chord's choice.
    Extend(usize),
    /// `b` lies on the segment `a-split`; the piece is that chord's choice.
    Through(usize),
}

/// One minimum-cost shape of the piece holding a chord.
#[derive(Debug, Clone, Copy)]
struct Choice {
    /// Vertex after `a` in the piece.
    first: usize,
    /// Vertex before `b` in the piece.
    split: usize,
    lead: Lead,
}

#[derive(Debug, Clone)]
struct Chord {
    cost: usize,
    choices: Vec<Choice>,
}

/// Cheapest run of collinear links between two positions.
#[derive(Debug, Clone, Copy)]
struct Run {
    cost: usize,
    first: usize,
    /// Vertex before the end of the run, `None` for a single link.
    via: Option<usize>,
}

struct Solver<'a, F> {
    points: &'a [Point2<F>],
    poly: &'a [usize],
    eps: F,
    n: usize,
    graph: VisibilityGraph,
    open: Vec<bool>,
    chords: Vec<Chord>,
    runs: Vec<Option<Run>>,
}

impl<'a, F: Float> Solver<'a, F> {
    fn new(points: &'a [Point2<F>], poly: &'a [usize], eps: F) -> Self {
        let n = poly.len();
        let mut solver = Self {
            points,
            poly,
            eps,
            n,
            graph: VisibilityGraph::build(points, poly, eps),
            open: vec![false; n * n],
            chords: vec![
                Chord {
                    cost: UNSOLVED,
                    choices: Vec::new(),
                };
                n * n
            ],
            runs: vec![None; n * n],
        };
        solver.mark_open();
        solver
    }

    #[inline]
    fn point(&self, i: usize) -> Point2<F> {
        self.points[self.poly[i]]
    }

    #[inline]
    fn turn(&self, a: usize, b: usize, c: usize) -> Orientation {
        orient2d(self.point(a), self.point(b), self.point(c), self.eps)
    }

    #[inline]
    fn reflex(&self, a: usize, b: usize, c: usize) -> bool {
        self.turn(a, b, c) == Orientation::Clockwise
    }

    /// True if position `x` lies on the segment between `a` and `b`.
    #[inline]
    fn on_segment(&self, x: usize, a: usize, b: usize) -> bool {
        point_on_segment(
            self.point(x),
            Segment2::new(self.point(a), self.point(b)),
            self.eps,
        )
    }

    #[inline]
    fn chord(&self, a: usize, b: usize) -> &Chord {
        &self.chords[a * self.n + b]
    }

    #[inline]
    fn run(&self, a: usize, b: usize) -> Option<Run> {
        self.runs[a * self.n + b]
    }

    /// Marks the chords whose sub-polygon is well formed.
    ///
    /// Edges and diagonals qualify, and so does a segment `a-j` that runs
    /// along a qualifying chord `a-b` and continues past `b` to `j`.
    fn mark_open(&mut self) {
        let n = self.n;
        for gap in (2..n).rev() {
            for a in 0..(n - gap) {
                let j = a + gap;
                let open = self.graph.is_visible(a, j)
                    || ((j + 1)..n).any(|b| {
                        self.open[a * n + b]
                            && (b == j + 1 || self.graph.is_visible(j, b))
                            && self.on_segment(b, a, j)
                    });
                self.open[a * n + j] = open;
            }
        }
    }

    /// Pieces spent on the far side of the link `x-y` when it bounds a
    /// piece: none for an edge, the sub-polygon's optimum for a diagonal.
    fn link_cost(&self, x: usize, y: usize) -> Option<usize> {
        if y == x + 1 {
            return Some(0);
        }
        if !self.graph.is_diagonal(x, y) {
            return None;
        }
        let cost = self.chord(x, y).cost;
        (cost != UNSOLVED).then(|| cost + 1)
    }

    fn solve(&mut self) {
        let n = self.n;
        for a in 0..(n - 1) {
            self.runs[a * n + a + 1] = Some(Run {
                cost: 0,
                first: a + 1,
                via: None,
            });
        }

        for gap in 2..n {
            for a in 0..(n - gap) {
                let b = a + gap;
                if self.open[a * n + b] {
                    self.solve_chord(a, b);
                }
                self.runs[a * n + b] = self.best_run(a, b);
            }
        }
    }

    fn best_run(&self, a: usize, b: usize) -> Option<Run> {
        let mut best = self.link_cost(a, b).map(|cost| Run {
            cost,
            first: b,
            via: None,
        });

        for x in (a + 1)..b {
            if !self.on_segment(x, a, b) {
                continue;
            }
            let (Some(head), Some(tail)) = (self.run(a, x), self.link_cost(x, b)) else {
                continue;
            };
            let cost = head.cost + tail;
            if best.map_or(true, |run| cost < run.cost) {
                best = Some(Run {
                    cost,
                    first: head.first,
                    via: Some(x),
                });
            }
        }

        best
    }

    fn solve_chord(&mut self, a: usize, b: usize) {
        let mut cost = UNSOLVED;
        let mut choices = Vec::new();

        for j in (a + 1)..b {
            let Some(tail) = self.link_cost(j, b) else {
                continue;
            };

            match self.turn(a, j, b) {
                Orientation::Clockwise => {}
                Orientation::Collinear => {
                    if !self.on_segment(b, a, j) {
                        continue;
                    }
                    let inner = self.chord(a, j);
                    if inner.cost == UNSOLVED {
                        continue;
                    }
                    if let Some(k) = self.narrowest(a, &inner.choices, |_| true) {
                        let choice = Choice {
                            first: inner.choices[k].first,
                            split: j,
                            lead: Lead::Through(k),
                        };
                        self.offer(a, b, &mut cost, &mut choices, inner.cost + tail, choice);
                    }
                }
                Orientation::CounterClockwise => {
                    if let Some(run) = self.run(a, j) {
                        let choice = Choice {
                            first: run.first,
                            split: j,
                            lead: Lead::Run,
                        };
                        self.offer(a, b, &mut cost, &mut choices, run.cost + tail, choice);
                    }

                    if !self.graph.is_diagonal(a, j) {
                        continue;
                    }
                    let inner = self.chord(a, j);
                    if inner.cost == UNSOLVED {
                        continue;
                    }
                    let fits =
                        |c: &Choice| !self.reflex(b, a, c.first) && !self.reflex(c.split, j, b);
                    if let Some(k) = self.narrowest(a, &inner.choices, fits) {
                        let choice = Choice {
                            first: inner.choices[k].first,
                            split: j,
                            lead: Lead::Extend(k),
                        };
                        self.offer(a, b, &mut cost, &mut choices, inner.cost + tail, choice);
                    }
                }
            }
        }

        let chord = &mut self.chords[a * self.n + b];
        chord.cost = cost;
        chord.choices = choices;
    }

    /// Index of the accepted choice whose first edge leaves `a` closest to
    /// the chord.
    fn narrowest(
        &self,
        a: usize,
        choices: &[Choice],
        fits: impl Fn(&Choice) -> bool,
    ) -> Option<usize> {
        let mut best: Option<usize> = None;
        for (k, choice) in choices.iter().enumerate() {
            if !fits(choice) {
                continue;
            }
            let narrower = match best {
                None => true,
                Some(m) => self.turn(a, choices[m].first, choice.first) == Orientation::CounterClockwise,
            };
            if narrower {
                best = Some(k);
            }
        }
        best
    }

    /// True if `x` is at least as narrow as `y` at both ends of `(a, b)`.
    fn covers(&self, a: usize, b: usize, x: &Choice, y: &Choice) -> bool {
        self.turn(a, y.first, x.first) != Orientation::Clockwise
            && self.turn(b, y.split, x.split) != Orientation::CounterClockwise
    }

    fn offer(
        &self,
        a: usize,
        b: usize,
        cost: &mut usize,
        choices: &mut Vec<Choice>,
        candidate: usize,
        choice: Choice,
    ) {
        if candidate > *cost {
            return;
        }
        if candidate < *cost {
            *cost = candidate;
            choices.clear();
            choices.push(choice);
            return;
        }
        if choices.iter().any(|c| self.covers(a, b, c, &choice)) {
            return;
        }
        choices.retain(|c| !self.covers(a, b, &choice, c));
        choices.push(choice);
    }

    /// Follows the first choice of every chord from the root and collects
    /// the vertex positions of each part.
    fn collect_parts(&self) -> PartitionResult<Vec<Vec<usize>>> {
        let mut parts = Vec::new();
        let mut pending: VecDeque<(usize, usize)> = VecDeque::new();
        pending.push_back((0, self.n - 1));

        while let Some((a, b)) = pending.pop_front() {
            let mut choice = *self
                .chord(a, b)
                .choices
                .first()
                .ok_or(PartitionError::Unresolvable { start: a, end: b })?;
            let mut end = b;
            let mut piece = vec![b];

            loop {
                let j = choice.split;
                if end - j > 1 {
                    pending.push_back((j, end));
                }
                piece.push(j);

                match choice.lead {
                    Lead::Extend(k) | Lead::Through(k) => {
                        choice = self.chord(a, j).choices[k];
                        end = j;
                    }
                    Lead::Run => {
                        let mut at = j;
                        loop {
                            let run = self
                                .run(a, at)
                                .ok_or(PartitionError::Unresolvable { start: a, end: at })?;
                            let from = run.via.unwrap_or(a);
                            if at - from > 1 {
                                pending.push_back((from, at));
                            }
                            if from == a {
                                break;
                            }
                            piece.push(from);
                            at = from;
                        }
                        piece.push(a);
                        break;
                    }
                }
            }

            piece.reverse();
            parts.push(piece);
        }

        Ok(parts)
    }
}

/// Computes a minimum-cardinality convex partition of a counter-clockwise
/// simple loop.
///
/// `poly` is expected to be validated already. Only diagonals between
/// existing vertices are used. A loop that is already convex is returned
/// unchanged as the only part.
pub fn keil_snoeyink<F: Float>(
    points: &[Point2<F>],
    poly: &[usize],
    eps: F,
) -> PartitionResult<Vec<IndexPolygon>> {
    let n = poly.len();
    if n < 3 {
        return Err(PartitionError::TooFewVertices { count: n });
    }
    if loop_is_convex(points, poly, eps) {
        return Ok(vec![poly.to_vec()]);
    }

    let mut solver = Solver::new(points, poly, eps);
    solver.solve();

    let cuts = solver.chord(0, n - 1).cost;
    if cuts == UNSOLVED {
        return Err(PartitionError::Unresolvable { start: 0, end: n - 1 });
    }

    let parts: Vec<IndexPolygon> = solver
        .collect_parts()?
        .into_iter()
        .map(|positions| positions.into_iter().map(|p| poly[p]).collect())
        .collect();

    debug!(
        "keil-snoeyink: {} vertices, {} diagonals, {} parts",
        n,
        cuts,
        parts.len()
    );

    Ok(parts)
}

/// Optimal convex decomposition of a polygon that owns its vertices.
///
/// The polygon is validated as a counter-clockwise simple loop first.
///
/// # Example
///
/// ```
/// use convexum::polygon::{Polygon, optimal_convex_decomposition};
/// use convexum::Point2;
///
/// let l_shape = Polygon::new(vec![
///     Point2::new(0.0, 0.0),
///     Point2::new(2.0, 0.0),
///     Point2::new(2.0, 1.0),
///     Point2::new(1.0, 1.0),
///     Point2::new(1.0, 2.0),
///     Point2::new(0.0, 2.0),
/// ]);
///
/// let parts = optimal_convex_decomposition(&l_shape, 1e-10).unwrap();
/// assert_eq!(parts.len(), 2);
/// ```
pub fn optimal_convex_decomposition<F: Float>(
    polygon: &Polygon<F>,
    eps: F,
) -> PartitionResult<Vec<Polygon<F>>> {
    let identity: Vec<usize> = (0..polygon.len()).collect();
    validate_loop(&polygon.vertices, &identity, LoopKind::Outer, eps, true)?;

    let parts = keil_snoeyink(&polygon.vertices, &identity, eps)?;
    Ok(parts
        .iter()
        .map(|part| Polygon::from_indices(&polygon.vertices, part))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::polygon::core::loop_signed_area;
    use crate::polygon::decompose::{count_reflex_vertices, hertel_mehlhorn};
    use approx::assert_relative_eq;

    fn p(x: f64, y: f64) -> Point2<f64> {
        Point2::new(x, y)
    }

    fn check_parts(points: &[Point2<f64>], poly: &[usize], parts: &[IndexPolygon]) {
        let total: f64 = parts.iter().map(|part| loop_signed_area(points, part)).sum();
        assert_relative_eq!(total, loop_signed_area(points, poly), epsilon = 1e-9);
        for part in parts {
            assert!(part.len() >= 3);
            assert!(loop_is_convex(points, part, 1e-10));
            assert!(loop_signed_area(points, part) > 0.0);
        }
    }

    #[test]
    fn test_convex_input_returned_unchanged() {
        let pts = vec![p(0.0, 0.0), p(1.0, 0.0), p(1.0, 1.0), p(0.0, 1.0)];
        let parts = keil_snoeyink(&pts, &[0, 1, 2, 3], 1e-10).unwrap();
        assert_eq!(parts, vec![vec![0, 1, 2, 3]]);
    }

    #[test]
    fn test_l_shape() {
        let pts = vec![
            p(0.0, 0.0),
            p(2.0, 0.0),
            p(2.0, 1.0),
            p(1.0, 1.0),
            p(1.0, 2.0),
            p(0.0, 2.0),
        ];
        let poly = [0, 1, 2, 3, 4, 5];
        let parts = keil_snoeyink(&pts, &poly, 1e-10).unwrap();
        assert_eq!(parts, vec![vec![0, 3, 4, 5], vec![0, 1, 2, 3]]);
        check_parts(&pts, &poly, &parts);
    }

    #[test]
    fn test_maps_positions_to_point_indices() {
        // Same L-shape stored in reverse in the point table.
        let pts = vec![
            p(0.0, 2.0),
            p(1.0, 2.0),
            p(1.0, 1.0),
            p(2.0, 1.0),
            p(2.0, 0.0),
            p(0.0, 0.0),
        ];
        let poly = [5, 4, 3, 2, 1, 0];
        let parts = keil_snoeyink(&pts, &poly, 1e-10).unwrap();
        assert_eq!(parts, vec![vec![5, 2, 1, 0], vec![5, 4, 3, 2]]);
    }

    #[test]
    fn test_u_shape() {
        let pts = vec![
            p(0.0, 0.0),
            p(3.0, 0.0),
            p(3.0, 3.0),
            p(2.0, 3.0),
            p(2.0, 1.0),
            p(1.0, 1.0),
            p(1.0, 3.0),
            p(0.0, 3.0),
        ];
        let poly: Vec<usize> = (0..8).collect();
        let parts = keil_snoeyink(&pts, &poly, 1e-10).unwrap();
        assert_eq!(parts.len(), 3);
        check_parts(&pts, &poly, &parts);
    }

    #[test]
    fn test_straight_angle_at_diagonal_end() {
        // The diagonal 1-5 continues the bottom edges 0-1 and 4-5, so both
        // parts have a straight angle at one end of it.
        let pts = vec![
            p(0.0, -2.0),
            p(1.0, -2.0),
            p(1.0, -3.0),
            p(3.0, -3.0),
            p(3.0, -2.0),
            p(2.0, -2.0),
            p(2.0, 3.0),
            p(0.0, 3.0),
        ];
        let poly: Vec<usize> = (0..8).collect();
        let parts = keil_snoeyink(&pts, &poly, 1e-10).unwrap();
        assert_eq!(parts, vec![vec![0, 1, 5, 6, 7], vec![1, 2, 3, 4, 5]]);
        check_parts(&pts, &poly, &parts);

        let hm = hertel_mehlhorn(&pts, &poly, 1e-10).unwrap();
        assert!(parts.len() <= hm.len());
    }

    #[test]
    fn test_straight_vertices_any_start() {
        // L-shape with a vertex in the middle of each long edge.
        let pts = vec![
            p(0.0, 0.0),
            p(1.0, 0.0),
            p(2.0, 0.0),
            p(2.0, 1.0),
            p(1.0, 1.0),
            p(1.0, 2.0),
            p(0.0, 2.0),
            p(0.0, 1.0),
        ];
        for shift in 0..8 {
            let poly: Vec<usize> = (0..8).map(|k| (k + shift) % 8).collect();
            let parts = keil_snoeyink(&pts, &poly, 1e-10).unwrap();
            assert_eq!(parts.len(), 2, "start {}", shift);
            check_parts(&pts, &poly, &parts);
        }
    }

    #[test]
    fn test_collinear_run_along_bottom() {
        // Comb with two teeth: the bottom edge is split by the tooth bases.
        let pts = vec![
            p(0.0, 0.0),
            p(1.0, 0.0),
            p(2.0, 0.0),
            p(3.0, 0.0),
            p(3.0, 2.0),
            p(2.0, 2.0),
            p(2.0, 1.0),
            p(1.0, 1.0),
            p(1.0, 2.0),
            p(0.0, 2.0),
        ];
        let poly: Vec<usize> = (0..10).collect();
        let parts = keil_snoeyink(&pts, &poly, 1e-10).unwrap();
        assert_eq!(parts.len(), 3);
        check_parts(&pts, &poly, &parts);
    }

    #[test]
    fn test_never_worse_than_hertel_mehlhorn() {
        let pts = vec![
            p(0.0, -3.0),
            p(1.0, -1.0),
            p(3.0, 0.0),
            p(1.0, 1.0),
            p(0.0, 3.0),
            p(-1.0, 1.0),
            p(-3.0, 0.0),
            p(-1.0, -1.0),
        ];
        let poly: Vec<usize> = (0..8).collect();
        let opt = keil_snoeyink(&pts, &poly, 1e-10).unwrap();
        let hm = hertel_mehlhorn(&pts, &poly, 1e-10).unwrap();
        check_parts(&pts, &poly, &opt);

        let r = count_reflex_vertices(&pts, &poly, 1e-10);
        assert!(opt.len() <= hm.len());
        assert!(opt.len() >= r.div_ceil(2) + 1);
        assert!(opt.len() <= r + 1);
    }

    #[test]
    fn test_too_few_vertices() {
        let pts = vec![p(0.0, 0.0), p(1.0, 0.0)];
        assert_eq!(
            keil_snoeyink(&pts, &[0, 1], 1e-10),
            Err(PartitionError::TooFewVertices { count: 2 })
        );
    }

    #[test]
    fn test_polygon_wrapper_rejects_clockwise() {
        let square = Polygon::new(vec![p(0.0, 0.0), p(0.0, 1.0), p(1.0, 1.0), p(1.0, 0.0)]);
        assert!(matches!(
            optimal_convex_decomposition(&square, 1e-10),
            Err(PartitionError::WrongOrientation { .. })
        ));
    }

    #[test]
    fn test_f32_support() {
        let pts = vec![
            Point2::new(0.0_f32, 0.0),
            Point2::new(2.0, 0.0),
            Point2::new(2.0, 1.0),
            Point2::new(1.0, 1.0),
            Point2::new(1.0, 2.0),
            Point2::new(0.0, 2.0),
        ];
        let parts = keil_snoeyink(&pts, &[0, 1, 2, 3, 4, 5], 1e-6).unwrap();
        assert_eq!(parts.len(), 2);
    }
}
