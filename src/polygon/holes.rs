//! Hole elimination by bridging.
//!
//! Each hole is joined to its host outer boundary by a zero-width seam: a
//! segment walked once in each direction. The result is a single weakly
//! simple counter-clockwise loop that the Hertel–Mehlhorn partitioner
//! accepts directly.
//!
//! Holes are processed right to left by their largest x coordinate. For
//! each one, the closest hole/host vertex pair whose connecting segment is
//! clear of every remaining loop is used as the seam.
//!
//! # Example
//!
//! ```
//! use convexum::polygon::merge_holes;
//! use convexum::Point2;
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
//! let merged = merge_holes(&pts, &[0, 1, 2, 3], &[vec![4, 5, 6, 7]], 1e-10).unwrap();
//! assert_eq!(merged, vec![0, 4, 5, 6, 7, 4, 0, 1, 2, 3]);
//! ```

use super::core::IndexPolygon;
use super::visibility::segment_is_clear;
use crate::error::{PartitionError, PartitionResult};
use crate::primitives::Point2;
use crate::tolerance::in_cone;
use log::{debug, trace};
use num_traits::Float;
use std::cmp::Ordering;

#[inline]
fn cone_at<F: Float>(
    points: &[Point2<F>],
    poly: &[usize],
    at: usize,
    toward: Point2<F>,
    eps: F,
) -> bool {
    let n = poly.len();
    in_cone(
        points[poly[(at + n - 1) % n]],
        points[poly[at]],
        points[poly[(at + 1) % n]],
        toward,
        eps,
    )
}

/// Connects one hole to the host loop.
///
/// Candidate (hole vertex, host vertex) pairs are tried nearest first,
/// ties broken by hole position then host position. A pair is accepted
/// when the seam leaves both vertices into the region between the loops
/// and is clear of the host, the hole, and every loop in `blockers`.
///
/// Returns the spliced loop, or `None` if no pair is feasible.
pub fn bridge_hole<F: Float>(
    points: &[Point2<F>],
    host: &[usize],
    hole: &[usize],
    blockers: &[&[usize]],
    eps: F,
) -> Option<IndexPolygon> {
    let mut candidates: Vec<(F, usize, usize)> = Vec::with_capacity(hole.len() * host.len());
    for (hp, &h) in hole.iter().enumerate() {
        for (vp, &v) in host.iter().enumerate() {
            candidates.push((points[h].distance_squared(points[v]), hp, vp));
        }
    }
    candidates.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));

    let mut loops: Vec<&[usize]> = Vec::with_capacity(blockers.len() + 2);
    loops.push(host);
    loops.push(hole);
    loops.extend_from_slice(blockers);

    let (_, hp, vp) = candidates.into_iter().find(|&(_, hp, vp)| {
        let h = hole[hp];
        let v = host[vp];
        cone_at(points, host, vp, points[h], eps)
            && cone_at(points, hole, hp, points[v], eps)
            && segment_is_clear(points, v, h, &loops, eps)
    })?;

    trace!("bridging host vertex {} to hole vertex {}", host[vp], hole[hp]);

    let mut merged = Vec::with_capacity(host.len() + hole.len() + 2);
    merged.extend_from_slice(&host[..=vp]);
    merged.extend_from_slice(&hole[hp..]);
    merged.extend_from_slice(&hole[..hp]);
    merged.push(hole[hp]);
    merged.push(host[vp]);
    merged.extend_from_slice(&host[vp + 1..]);

    Some(merged)
}

/// Merges every hole of one outer loop into a single loop.
///
/// `outer` must be counter-clockwise and every hole clockwise, all inside
/// `outer` and pairwise disjoint. Errors name holes by their position in
/// `holes`.
pub fn merge_holes<F: Float>(
    points: &[Point2<F>],
    outer: &[usize],
    holes: &[IndexPolygon],
    eps: F,
) -> PartitionResult<IndexPolygon> {
    let max_x = |hole: &IndexPolygon| {
        hole.iter()
            .map(|&i| points[i].x)
            .fold(F::neg_infinity(), F::max)
    };

    let mut order: Vec<usize> = (0..holes.len()).collect();
    order.sort_by(|&a, &b| {
        max_x(&holes[b])
            .partial_cmp(&max_x(&holes[a]))
            .unwrap_or(Ordering::Equal)
    });

    let mut host = outer.to_vec();
    for (done, &hole) in order.iter().enumerate() {
        let blockers: Vec<&[usize]> = order[done + 1..]
            .iter()
            .map(|&k| holes[k].as_slice())
            .collect();

        host = bridge_hole(points, &host, &holes[hole], &blockers, eps)
            .ok_or(PartitionError::NoBridge { hole })?;
    }

    debug!(
        "bridged {} holes into a loop of {} vertices",
        holes.len(),
        host.len()
    );

    Ok(host)
}
