//! Convex polygon decomposition with the Hertel–Mehlhorn heuristic.
//!
//! The loop is triangulated, then adjacent pieces are merged across shared
//! diagonals whenever the union stays convex. Every diagonal is considered
//! once, so the result depends only on the triangulation and is
//! deterministic.
//!
//! With `r` notches the result has at most `2r + 1` parts, and never more
//! than four times the optimum.
//!
//! # Example
//!
//! ```
//! use convexum::polygon::{Polygon, convex_decomposition};
//! use convexum::Point2;
//!
//! // L-shaped polygon (non-convex)
//! let l_shape = Polygon::new(vec![
//!     Point2::new(0.0, 0.0),
//!     Point2::new(2.0, 0.0),
//!     Point2::new(2.0, 1.0),
//!     Point2::new(1.0, 1.0),
//!     Point2::new(1.0, 2.0),
//!     Point2::new(0.0, 2.0),
//! ]);
//!
//! let convex_parts = convex_decomposition(&l_shape, 1e-10).unwrap();
//! assert_eq!(convex_parts.len(), 2);
//! for part in &convex_parts {
//!     assert!(part.is_convex(1e-10));
//! }
//! ```

use super::core::{is_reflex, loop_is_convex, IndexPolygon, Polygon};
use super::triangulate::triangulate_loop;
use super::validate::{validate_loop, LoopKind};
use crate::error::{PartitionError, PartitionResult};
use crate::primitives::Point2;
use crate::tolerance::{orient2d, Orientation};
use log::{debug, trace};
use num_traits::Float;
use std::collections::BTreeMap;

/// Partitions a counter-clockwise loop into convex pieces.
///
/// `poly` is expected to be validated already. Loops produced by hole
/// bridging are accepted: their seams are ordinary shared edges between
/// triangles and may be merged across like any diagonal.
///
/// A loop that is already convex is returned unchanged as the only part.
pub fn hertel_mehlhorn<F: Float>(
    points: &[Point2<F>],
    poly: &[usize],
    eps: F,
) -> PartitionResult<Vec<IndexPolygon>> {
    if poly.len() < 3 {
        return Err(PartitionError::TooFewVertices { count: poly.len() });
    }
    if loop_is_convex(points, poly, eps) {
        return Ok(vec![poly.to_vec()]);
    }

    let triangulation = triangulate_loop(points, poly, eps)?;

    let mut regions: Vec<IndexPolygon> = triangulation
        .indices
        .iter()
        .map(|&(a, b, c)| vec![a, b, c])
        .collect();
    let mut parent: Vec<usize> = (0..regions.len()).collect();

    // Directed edge -> triangle holding it.
    let mut edges: BTreeMap<(usize, usize), usize> = BTreeMap::new();
    for (t, &(a, b, c)) in triangulation.indices.iter().enumerate() {
        for edge in [(a, b), (b, c), (c, a)] {
            edges.entry(edge).or_insert(t);
        }
    }

    // An edge seen in both directions separates two triangles.
    let diagonals: Vec<(usize, usize, usize, usize)> = edges
        .iter()
        .filter(|&(&(u, w), _)| u < w)
        .filter_map(|(&(u, w), &left)| edges.get(&(w, u)).map(|&right| (u, w, left, right)))
        .collect();

    let mut merges = 0usize;
    for (u, w, left, right) in diagonals {
        let ra = find(&mut parent, left);
        let rb = find(&mut parent, right);
        if ra == rb {
            continue;
        }

        if let Some(merged) = try_merge(points, &regions[ra], &regions[rb], u, w, eps) {
            trace!("merged across diagonal ({}, {})", u, w);
            regions[ra] = merged;
            regions[rb].clear();
            parent[rb] = ra;
            merges += 1;
        }
    }

    let parts: Vec<IndexPolygon> = regions.into_iter().filter(|r| !r.is_empty()).collect();

    debug!(
        "hertel-mehlhorn: {} triangles, {} merges, {} parts",
        triangulation.len(),
        merges,
        parts.len()
    );

    Ok(parts)
}

fn find(parent: &mut [usize], mut x: usize) -> usize {
    while parent[x] != x {
        parent[x] = parent[parent[x]];
        x = parent[x];
    }
    x
}

/// Merges region `a` (holding edge `u -> w`) with region `b` (holding
/// `w -> u`) if neither shared endpoint becomes reflex.
fn try_merge<F: Float>(
    points: &[Point2<F>],
    a: &[usize],
    b: &[usize],
    u: usize,
    w: usize,
    eps: F,
) -> Option<IndexPolygon> {
    let na = a.len();
    let nb = b.len();

    let ia = (0..na).find(|&i| a[i] == u && a[(i + 1) % na] == w)?;
    let ib = (0..nb).find(|&i| b[i] == w && b[(i + 1) % nb] == u)?;

    let a_prev = a[(ia + na - 1) % na];
    let a_next = a[(ia + 2) % na];
    let b_prev = b[(ib + nb - 1) % nb];
    let b_next = b[(ib + 2) % nb];

    let turn = |p: usize, v: usize, q: usize| orient2d(points[p], points[v], points[q], eps);
    if turn(a_prev, u, b_next) == Orientation::Clockwise
        || turn(b_prev, w, a_next) == Orientation::Clockwise
    {
        return None;
    }

    // Walk a from w round to u, then b from just after u to just before w.
    let mut merged = Vec::with_capacity(na + nb - 2);
    merged.extend((0..na).map(|k| a[(ia + 1 + k) % na]));
    merged.extend((0..nb - 2).map(|k| b[(ib + 2 + k) % nb]));

    Some(merged)
}

/// Decomposes a polygon that owns its vertices into convex parts.
///
/// The polygon is validated as a counter-clockwise simple loop first.
pub fn convex_decomposition<F: Float>(
    polygon: &Polygon<F>,
    eps: F,
) -> PartitionResult<Vec<Polygon<F>>> {
    let identity: Vec<usize> = (0..polygon.len()).collect();
    validate_loop(&polygon.vertices, &identity, LoopKind::Outer, eps, true)?;

    let parts = hertel_mehlhorn(&polygon.vertices, &identity, eps)?;
    Ok(parts
        .iter()
        .map(|part| Polygon::from_indices(&polygon.vertices, part))
        .collect())
}

/// Returns the number of reflex (concave) vertices in a CCW loop.
///
/// A reflex vertex is one where the interior angle is greater than 180°.
pub fn count_reflex_vertices<F: Float>(points: &[Point2<F>], poly: &[usize], eps: F) -> usize {
    if poly.len() < 3 {
        return 0;
    }
    (0..poly.len())
        .filter(|&i| is_reflex(points, poly, i, eps))
        .count()
}

/// Returns positions of reflex (concave) vertices in a CCW loop.
pub fn find_reflex_vertices<F: Float>(points: &[Point2<F>], poly: &[usize], eps: F) -> Vec<usize> {
    if poly.len() < 3 {
        return vec![];
    }
    (0..poly.len())
        .filter(|&i| is_reflex(points, poly, i, eps))
        .collect()
}
