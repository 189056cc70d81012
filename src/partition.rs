//! High-level partitioning entry points.
//!
//! [`PolygonPartition`] validates its input and dispatches to the
//! partitioners in [`crate::polygon`]:
//!
//! - [`apply_opt`](PolygonPartition::apply_opt): minimum number of parts,
//!   O(n³), single polygon without holes
//! - [`apply_hm`](PolygonPartition::apply_hm): Hertel–Mehlhorn, fast,
//!   at most four times the optimum
//! - [`apply`](PolygonPartition::apply): several outer polygons with holes,
//!   bridged and then partitioned with Hertel–Mehlhorn
//!
//! # Example
//!
//! ```
//! use convexum::{Point2, PolygonPartition};
//!
//! let pts = vec![
//!     Point2::new(0.0, 0.0),
//!     Point2::new(4.0, 0.0),
//!     Point2::new(4.0, 4.0),
//!     Point2::new(0.0, 4.0),
//!     Point2::new(1.0, 1.0),
//!     Point2::new(1.0, 3.0),
//!     Point2::new(3.0, 3.0),
//!     Point2::new(3.0, 1.0),
//! ];
//!
//! let partition = PolygonPartition::new();
//! let parts = partition
//!     .apply(&pts, &[vec![0, 1, 2, 3]], &[vec![4, 5, 6, 7]])
//!     .unwrap();
//! assert!(parts.len() >= 4);
//! ```

use crate::error::{PartitionError, PartitionResult};
use crate::polygon::{
    hertel_mehlhorn, keil_snoeyink, merge_holes, validate_loop, validate_loops, IndexPolygon,
    LoopKind,
};
use crate::primitives::Point2;
use log::{debug, warn};
use num_traits::Float;

/// Parameters for polygon partitioning.
#[derive(Debug, Clone, Copy)]
pub struct PartitionParams<F> {
    /// Collinearity tolerance passed to every geometric predicate.
    /// Default: 1e-10
    pub epsilon: F,

    /// Largest polygon `apply_opt` will solve optimally. Bigger inputs fall
    /// back to Hertel–Mehlhorn. If None, no limit.
    pub optimal_vertex_limit: Option<usize>,

    /// Whether to run the O(n²) self-intersection check on every loop.
    /// Default: true
    pub validate_simplicity: bool,
}

impl<F: Float> Default for PartitionParams<F> {
    fn default() -> Self {
        Self {
            epsilon: F::from(1e-10).unwrap(),
            optimal_vertex_limit: None,
            validate_simplicity: true,
        }
    }
}

impl<F: Float> PartitionParams<F> {
    /// Set the predicate tolerance.
    #[must_use]
    pub fn with_epsilon(mut self, epsilon: F) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Set the vertex ceiling for the optimal path.
    #[must_use]
    pub fn with_optimal_vertex_limit(mut self, limit: usize) -> Self {
        self.optimal_vertex_limit = Some(limit);
        self
    }

    /// Set whether loops are checked for self-intersections.
    #[must_use]
    pub fn with_validate_simplicity(mut self, validate: bool) -> Self {
        self.validate_simplicity = validate;
        self
    }
}

/// Convex partitioner for polygons given as index loops over a point table.
///
/// Outer boundaries must be counter-clockwise and holes clockwise. Every
/// returned part is a counter-clockwise convex loop of point indices.
#[derive(Debug, Clone, Copy)]
pub struct PolygonPartition<F> {
    params: PartitionParams<F>,
}

impl<F: Float> Default for PolygonPartition<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: Float> PolygonPartition<F> {
    /// Creates a partitioner with default parameters.
    pub fn new() -> Self {
        Self {
            params: PartitionParams::default(),
        }
    }

    /// Creates a partitioner with the given parameters.
    pub fn with_params(params: PartitionParams<F>) -> Self {
        Self { params }
    }

    /// Returns the active parameters.
    pub fn params(&self) -> &PartitionParams<F> {
        &self.params
    }

    fn validate_outer(&self, points: &[Point2<F>], poly: &[usize]) -> PartitionResult<()> {
        validate_loop(
            points,
            poly,
            LoopKind::Outer,
            self.params.epsilon,
            self.params.validate_simplicity,
        )
    }

    /// Partitions a single hole-free polygon into the minimum number of
    /// convex parts.
    ///
    /// # Example
    ///
    /// ```
    /// use convexum::{Point2, PolygonPartition};
    ///
    /// let pts = vec![
    ///     Point2::new(0.0, 0.0),
    ///     Point2::new(2.0, 0.0),
    ///     Point2::new(2.0, 1.0),
    ///     Point2::new(1.0, 1.0),
    ///     Point2::new(1.0, 2.0),
    ///     Point2::new(0.0, 2.0),
    /// ];
    ///
    /// let parts = PolygonPartition::new().apply_opt(&pts, &[0, 1, 2, 3, 4, 5]).unwrap();
    /// assert_eq!(parts.len(), 2);
    /// ```
    pub fn apply_opt(
        &self,
        points: &[Point2<F>],
        poly: &[usize],
    ) -> PartitionResult<Vec<IndexPolygon>> {
        self.validate_outer(points, poly)?;

        if let Some(limit) = self.params.optimal_vertex_limit {
            if poly.len() > limit {
                warn!(
                    "polygon has {} vertices, above the optimal limit of {}; using hertel-mehlhorn",
                    poly.len(),
                    limit
                );
                return hertel_mehlhorn(points, poly, self.params.epsilon);
            }
        }

        keil_snoeyink(points, poly, self.params.epsilon)
    }

    /// Partitions a single hole-free polygon with Hertel–Mehlhorn.
    pub fn apply_hm(
        &self,
        points: &[Point2<F>],
        poly: &[usize],
    ) -> PartitionResult<Vec<IndexPolygon>> {
        self.validate_outer(points, poly)?;
        hertel_mehlhorn(points, poly, self.params.epsilon)
    }

    /// Partitions several outer polygons and their holes.
    ///
    /// Each hole is attached to the outer polygon that directly contains
    /// it. An outer polygon may itself sit inside a hole of another one.
    /// Holes are bridged into their host and the result is partitioned
    /// with Hertel–Mehlhorn. Parts are returned outer by outer, in input
    /// order.
    pub fn apply(
        &self,
        points: &[Point2<F>],
        polys: &[IndexPolygon],
        holes: &[IndexPolygon],
    ) -> PartitionResult<Vec<IndexPolygon>> {
        let eps = self.params.epsilon;
        let hosts = validate_loops(points, polys, holes, eps, self.params.validate_simplicity)?;

        let mut parts = Vec::new();
        for (outer_id, outer) in polys.iter().enumerate() {
            let own: Vec<usize> = (0..holes.len())
                .filter(|&h| hosts[h] == outer_id)
                .collect();
            let own_holes: Vec<IndexPolygon> = own.iter().map(|&h| holes[h].clone()).collect();

            let merged = merge_holes(points, outer, &own_holes, eps).map_err(|err| match err {
                PartitionError::NoBridge { hole } => PartitionError::NoBridge { hole: own[hole] },
                other => other,
            })?;

            parts.extend(hertel_mehlhorn(points, &merged, eps)?);
        }

        debug!(
            "partitioned {} polygons with {} holes into {} parts",
            polys.len(),
            holes.len(),
            parts.len()
        );

        Ok(parts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::polygon::{loop_contains, loop_is_convex, loop_signed_area};
    use approx::assert_relative_eq;

    fn p(x: f64, y: f64) -> Point2<f64> {
        Point2::new(x, y)
    }

    fn l_shape() -> Vec<Point2<f64>> {
        vec![
            p(0.0, 0.0),
            p(2.0, 0.0),
            p(2.0, 1.0),
            p(1.0, 1.0),
            p(1.0, 2.0),
            p(0.0, 2.0),
        ]
    }

    fn square_with_hole() -> Vec<Point2<f64>> {
        vec![
            p(0.0, 0.0),
            p(4.0, 0.0),
            p(4.0, 4.0),
            p(0.0, 4.0),
            p(1.0, 1.0),
            p(1.0, 3.0),
            p(3.0, 3.0),
            p(3.0, 1.0),
        ]
    }

    /// True if `a` is `b` up to a cyclic shift.
    fn same_cycle(a: &[usize], b: &[usize]) -> bool {
        a.len() == b.len() && (0..b.len()).any(|s| (0..a.len()).all(|k| a[k] == b[(k + s) % b.len()]))
    }

    fn area_of(points: &[Point2<f64>], parts: &[IndexPolygon]) -> f64 {
        parts.iter().map(|part| loop_signed_area(points, part)).sum()
    }

    #[test]
    fn test_default_params() {
        let params = PartitionParams::<f64>::default();
        assert_relative_eq!(params.epsilon, 1e-10);
        assert_eq!(params.optimal_vertex_limit, None);
        assert!(params.validate_simplicity);
    }

    #[test]
    fn test_params_builders() {
        let params = PartitionParams::<f64>::default()
            .with_epsilon(1e-6)
            .with_optimal_vertex_limit(64)
            .with_validate_simplicity(false);
        assert_relative_eq!(params.epsilon, 1e-6);
        assert_eq!(params.optimal_vertex_limit, Some(64));
        assert!(!params.validate_simplicity);

        let partition = PolygonPartition::with_params(params);
        assert_eq!(partition.params().optimal_vertex_limit, Some(64));
    }

    #[test]
    fn test_square_is_single_part() {
        let pts = vec![p(0.0, 0.0), p(1.0, 0.0), p(1.0, 1.0), p(0.0, 1.0)];
        let partition = PolygonPartition::new();

        let opt = partition.apply_opt(&pts, &[0, 1, 2, 3]).unwrap();
        let hm = partition.apply_hm(&pts, &[0, 1, 2, 3]).unwrap();
        assert_eq!(opt.len(), 1);
        assert_eq!(hm.len(), 1);
        assert!(same_cycle(&opt[0], &[0, 1, 2, 3]));
        assert!(same_cycle(&hm[0], &[0, 1, 2, 3]));
    }

    #[test]
    fn test_l_shape_two_parts() {
        let pts = l_shape();
        let poly = [0, 1, 2, 3, 4, 5];
        let partition = PolygonPartition::new();

        for parts in [
            partition.apply_opt(&pts, &poly).unwrap(),
            partition.apply_hm(&pts, &poly).unwrap(),
        ] {
            assert_eq!(parts.len(), 2);
            assert_relative_eq!(area_of(&pts, &parts), 3.0);
            for part in &parts {
                assert!(loop_is_convex(&pts, part, 1e-10));
            }
        }
    }

    #[test]
    fn test_optimal_limit_falls_back() {
        let pts = l_shape();
        let params = PartitionParams::default().with_optimal_vertex_limit(4);
        let parts = PolygonPartition::with_params(params)
            .apply_opt(&pts, &[0, 1, 2, 3, 4, 5])
            .unwrap();
        assert_eq!(parts, vec![vec![2, 3, 0, 1], vec![5, 0, 3, 4]]);
    }

    #[test]
    fn test_square_with_hole() {
        let pts = square_with_hole();
        let hole = vec![4, 5, 6, 7];
        let parts = PolygonPartition::new()
            .apply(&pts, &[vec![0, 1, 2, 3]], &[hole.clone()])
            .unwrap();

        assert_relative_eq!(area_of(&pts, &parts), 16.0 - 4.0);
        for part in &parts {
            assert!(loop_is_convex(&pts, part, 1e-10));
            let n = part.len() as f64;
            let cx = part.iter().map(|&i| pts[i].x).sum::<f64>() / n;
            let cy = part.iter().map(|&i| pts[i].y).sum::<f64>() / n;
            assert!(!loop_contains(&pts, &hole, p(cx, cy)));
        }
    }

    #[test]
    fn test_island_inside_hole() {
        let mut pts = square_with_hole();
        pts.extend([p(1.5, 1.5), p(2.5, 1.5), p(2.5, 2.5), p(1.5, 2.5)]);
        let polys = vec![vec![0, 1, 2, 3], vec![8, 9, 10, 11]];
        let holes = vec![vec![4, 5, 6, 7]];

        let parts = PolygonPartition::new().apply(&pts, &polys, &holes).unwrap();
        assert_relative_eq!(area_of(&pts, &parts), 12.0 + 1.0);
        assert!(parts.iter().any(|part| same_cycle(part, &[8, 9, 10, 11])));
    }

    #[test]
    fn test_apply_without_holes_matches_hm() {
        let pts = l_shape();
        let poly = vec![0, 1, 2, 3, 4, 5];
        let partition = PolygonPartition::new();
        assert_eq!(
            partition.apply(&pts, &[poly.clone()], &[]).unwrap(),
            partition.apply_hm(&pts, &poly).unwrap()
        );
    }

    #[test]
    fn test_degenerate_inputs_rejected() {
        let pts = l_shape();
        let partition = PolygonPartition::new();

        assert_eq!(
            partition.apply_opt(&pts, &[0, 1]),
            Err(PartitionError::TooFewVertices { count: 2 })
        );
        assert_eq!(
            partition.apply_hm(&pts, &[0, 1]),
            Err(PartitionError::TooFewVertices { count: 2 })
        );
        assert!(matches!(
            partition.apply_opt(&pts, &[5, 4, 3, 2, 1, 0]),
            Err(PartitionError::WrongOrientation { .. })
        ));
    }

    #[test]
    fn test_self_intersecting_rejected() {
        let pts = vec![p(0.0, 0.0), p(4.0, 0.0), p(1.0, 3.0), p(3.0, 3.0)];
        let partition = PolygonPartition::new();
        assert_eq!(
            partition.apply_opt(&pts, &[0, 1, 2, 3]),
            Err(PartitionError::SelfIntersecting)
        );
        assert_eq!(
            partition.apply_hm(&pts, &[0, 1, 2, 3]),
            Err(PartitionError::SelfIntersecting)
        );
    }

    #[test]
    fn test_hole_outside_rejected() {
        let mut pts = square_with_hole();
        pts.extend([p(10.0, 10.0), p(10.0, 11.0), p(11.0, 11.0), p(11.0, 10.0)]);
        assert_eq!(
            PolygonPartition::new().apply(&pts, &[vec![0, 1, 2, 3]], &[vec![8, 9, 10, 11]]),
            Err(PartitionError::HoleOutside { hole: 0 })
        );
    }

    #[test]
    fn test_f32_support() {
        let pts: Vec<Point2<f32>> = l_shape()
            .iter()
            .map(|v| Point2::new(v.x as f32, v.y as f32))
            .collect();
        let partition = PolygonPartition::with_params(PartitionParams::default().with_epsilon(1e-6));
        let parts = partition.apply_opt(&pts, &[0, 1, 2, 3, 4, 5]).unwrap();
        assert_eq!(parts.len(), 2);
    }
}
